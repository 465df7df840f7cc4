use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of words shown in the word-memory test.
pub const WORD_MEMORY_TOTAL_WORDS: u32 = 20;

/// Anything stamped with the moment it was recorded.
pub trait Dated {
    fn recorded_at(&self) -> DateTime<Utc>;

    /// Calendar day (UTC) the record belongs to.
    fn day(&self) -> NaiveDate {
        self.recorded_at().date_naive()
    }
}

/// Time taken to count from 1 to 120.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountingTestResult {
    pub date: DateTime<Utc>,
    pub time: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordMemoryTestResult {
    pub date: DateTime<Utc>,
    pub words_presented_count: u32,
    pub words_recalled_count: u32,
}

impl WordMemoryTestResult {
    /// Recalled share of the words actually presented, in percent.
    ///
    /// Not rounded; `0.0` when nothing was presented.
    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        if self.words_presented_count == 0 {
            return 0.0;
        }
        f64::from(self.words_recalled_count) / f64::from(self.words_presented_count) * 100.0
    }

    /// Recalled share of the standard word list, in percent.
    #[must_use]
    pub fn list_accuracy_percent(&self) -> f64 {
        f64::from(self.words_recalled_count) / f64::from(WORD_MEMORY_TOTAL_WORDS) * 100.0
    }
}

/// Time taken to complete the color/word interference test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StroopTestResult {
    pub date: DateTime<Utc>,
    pub time: f64,
}

impl Dated for CountingTestResult {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.date
    }
}

impl Dated for WordMemoryTestResult {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.date
    }
}

impl Dated for StroopTestResult {
    fn recorded_at(&self) -> DateTime<Utc> {
        self.date
    }
}

/// The three weekly-test streams, each an append-only log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTestData {
    pub counting_test: Vec<CountingTestResult>,
    pub word_memory_test: Vec<WordMemoryTestResult>,
    pub stroop_test: Vec<StroopTestResult>,
}

impl WeeklyTestData {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counting_test.is_empty()
            && self.word_memory_test.is_empty()
            && self.stroop_test.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeeklyTestKind {
    Counting,
    WordMemory,
    Stroop,
}

impl WeeklyTestKind {
    pub const ALL: [WeeklyTestKind; 3] = [
        WeeklyTestKind::Counting,
        WeeklyTestKind::WordMemory,
        WeeklyTestKind::Stroop,
    ];

    /// Key of this stream inside the persisted weekly-test object.
    #[must_use]
    pub fn storage_field(self) -> &'static str {
        match self {
            WeeklyTestKind::Counting => "countingTest",
            WeeklyTestKind::WordMemory => "wordMemoryTest",
            WeeklyTestKind::Stroop => "stroopTest",
        }
    }
}

impl fmt::Display for WeeklyTestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeeklyTestKind::Counting => "counting",
            WeeklyTestKind::WordMemory => "word memory",
            WeeklyTestKind::Stroop => "stroop",
        })
    }
}
