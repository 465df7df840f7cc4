use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::model::{
    CountingTestResult, Dated, StroopTestResult, WeeklyTestData, WordMemoryTestResult,
};

const NOT_AVAILABLE: &str = "N/A";

/// Keep the latest record per calendar day.
///
/// "Latest" is the greatest recorded timestamp; on a tie the record seen
/// first wins.
#[must_use]
pub fn latest_per_day<T: Dated + Clone>(results: &[T]) -> BTreeMap<NaiveDate, T> {
    let mut grouped: BTreeMap<NaiveDate, T> = BTreeMap::new();
    for result in results {
        match grouped.get(&result.day()) {
            Some(existing) if existing.recorded_at() >= result.recorded_at() => {}
            _ => {
                grouped.insert(result.day(), result.clone());
            }
        }
    }
    grouped
}

/// One table row: the latest weekly-test results recorded on a day.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionData {
    pub date: NaiveDate,
    pub date_label: String,
    pub counting_time: String,
    pub word_accuracy: String,
    pub stroop_time: String,
    pub counting_num: Option<f64>,
    pub word_accuracy_num: Option<f64>,
    pub stroop_num: Option<f64>,
}

#[derive(Default)]
struct DayGroup {
    counting: Option<CountingTestResult>,
    word: Option<WordMemoryTestResult>,
    stroop: Option<StroopTestResult>,
}

/// Merge the three weekly-test streams into one row per day, newest first.
#[must_use]
pub fn derive_sessions(data: &WeeklyTestData) -> Vec<SessionData> {
    let mut days: BTreeMap<NaiveDate, DayGroup> = BTreeMap::new();

    for (day, r) in latest_per_day(&data.counting_test) {
        days.entry(day).or_default().counting = Some(r);
    }
    for (day, r) in latest_per_day(&data.word_memory_test) {
        days.entry(day).or_default().word = Some(r);
    }
    for (day, r) in latest_per_day(&data.stroop_test) {
        days.entry(day).or_default().stroop = Some(r);
    }

    days.into_iter()
        .rev()
        .map(|(date, group)| {
            let counting_num = group.counting.map(|r| r.time);
            let word_accuracy_num = group.word.map(|r| r.list_accuracy_percent());
            let stroop_num = group.stroop.map(|r| r.time);
            SessionData {
                date,
                date_label: date.format("%d/%m/%Y").to_string(),
                counting_time: seconds_label(counting_num),
                word_accuracy: word_accuracy_num
                    .map_or_else(|| NOT_AVAILABLE.to_owned(), |pct| format!("{pct:.1}%")),
                stroop_time: seconds_label(stroop_num),
                counting_num,
                word_accuracy_num,
                stroop_num,
            }
        })
        .collect()
}

fn seconds_label(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_owned(), |secs| format!("{secs} sec"))
}

/// Column a session table is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    Date,
    Counting,
    Word,
    Stroop,
}

/// Error returned when a sort column name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortKey::Date),
            "counting" => Ok(SortKey::Counting),
            "word" => Ok(SortKey::Word),
            "stroop" => Ok(SortKey::Stroop),
            other => Err(UnknownSortKey(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    /// `+1` for ascending, `-1` for descending.
    #[must_use]
    pub fn signum(self) -> i8 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }

    #[must_use]
    pub fn from_signum(value: i8) -> Self {
        if value < 0 {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

fn projection(session: &SessionData, key: SortKey) -> Option<f64> {
    match key {
        SortKey::Date => Some(f64::from(session.date.num_days_from_ce())),
        SortKey::Counting => session.counting_num,
        SortKey::Word => session.word_accuracy_num,
        SortKey::Stroop => session.stroop_num,
    }
}

/// Missing values behave as `+inf` and stay at the end in both directions.
fn compare(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
    }
}

/// Stable sort of session rows by the given column.
#[must_use]
pub fn sort_sessions(
    sessions: &[SessionData],
    key: SortKey,
    direction: SortDirection,
) -> Vec<SessionData> {
    let mut sorted = sessions.to_vec();
    sorted.sort_by(|a, b| compare(projection(a, key), projection(b, key), direction));
    sorted
}
