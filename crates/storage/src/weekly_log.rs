use std::sync::Arc;

use brain_core::model::{
    CountingTestResult, StroopTestResult, WeeklyTestData, WordMemoryTestResult,
};
use brain_core::observable::{ListenerKey, Observable};
use chrono::{DateTime, Utc};

use crate::kv::{KeyValueStore, keys};
use crate::mapping::{decode_weekly, encode_weekly};

/// Weekly-test results for the three tests, oldest first within each
/// stream, mirrored to the key-value store.
pub struct WeeklyTestLog {
    store: Arc<dyn KeyValueStore>,
    data: Observable<WeeklyTestData>,
}

impl WeeklyTestLog {
    /// Load persisted weekly tests. Unreadable data yields empty streams.
    #[must_use]
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let data = read_weekly(store.as_ref());
        Self {
            store,
            data: Observable::new(data),
        }
    }

    pub fn add_counting(&self, time: f64, at: DateTime<Utc>) -> CountingTestResult {
        let result = CountingTestResult { date: at, time };
        self.mutate(|data| data.counting_test.push(result.clone()));
        result
    }

    pub fn add_word_memory(
        &self,
        words_presented_count: u32,
        words_recalled_count: u32,
        at: DateTime<Utc>,
    ) -> WordMemoryTestResult {
        let result = WordMemoryTestResult {
            date: at,
            words_presented_count,
            words_recalled_count,
        };
        self.mutate(|data| data.word_memory_test.push(result.clone()));
        result
    }

    pub fn add_stroop(&self, time: f64, at: DateTime<Utc>) -> StroopTestResult {
        let result = StroopTestResult { date: at, time };
        self.mutate(|data| data.stroop_test.push(result.clone()));
        result
    }

    #[must_use]
    pub fn data(&self) -> WeeklyTestData {
        self.data.get()
    }

    #[must_use]
    pub fn counting(&self) -> Vec<CountingTestResult> {
        self.data.with(|d| d.counting_test.clone())
    }

    #[must_use]
    pub fn word_memory(&self) -> Vec<WordMemoryTestResult> {
        self.data.with(|d| d.word_memory_test.clone())
    }

    #[must_use]
    pub fn stroop(&self) -> Vec<StroopTestResult> {
        self.data.with(|d| d.stroop_test.clone())
    }

    /// Drop every stream.
    pub fn clear(&self) {
        self.mutate(|data| *data = WeeklyTestData::default());
    }

    pub fn subscribe(&self, listener: impl Fn(&WeeklyTestData) + 'static) -> ListenerKey {
        self.data.subscribe(listener)
    }

    pub fn unsubscribe(&self, key: ListenerKey) -> bool {
        self.data.unsubscribe(key)
    }

    fn mutate(&self, f: impl FnOnce(&mut WeeklyTestData)) {
        self.data.update(|data| {
            f(data);
            let written = encode_weekly(data)
                .and_then(|raw| self.store.set(keys::WEEKLY_TESTS, &raw));
            if let Err(e) = written {
                tracing::error!(error = %e, "failed to persist weekly tests");
            }
        });
    }
}

fn read_weekly(store: &dyn KeyValueStore) -> WeeklyTestData {
    let raw = match store.get(keys::WEEKLY_TESTS) {
        Ok(Some(raw)) => raw,
        Ok(None) => return WeeklyTestData::default(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read weekly tests, starting empty");
            return WeeklyTestData::default();
        }
    };
    match decode_weekly(&raw) {
        Ok(decoded) => {
            if decoded.repaired > 0 {
                tracing::warn!(skipped = decoded.repaired, "skipped unreadable weekly test entries");
            }
            decoded.value
        }
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable weekly tests");
            WeeklyTestData::default()
        }
    }
}
