//! Daily completion and journey-day tracking.

use std::sync::Arc;

use brain_core::Clock;
use brain_core::time::start_of_day;
use chrono::{DateTime, SecondsFormat, Utc};
use storage::{KeyValueStore, keys};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Notifications fired when a drill session finishes.
pub trait CompletionHooks {
    fn mark_daily_drill_completed(&self);
    fn record_first_day_if_unset(&self);
}

/// Tracks whether today's drill is done and which day of the journey it is.
///
/// Both markers are stored as the start of a UTC day in ISO-8601.
#[derive(Clone)]
pub struct DailyProgress {
    clock: Clock,
    store: Arc<dyn KeyValueStore>,
}

impl DailyProgress {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn KeyValueStore>) -> Self {
        Self { clock, store }
    }

    #[must_use]
    pub fn last_drill_date(&self) -> Option<DateTime<Utc>> {
        self.read_day(keys::LAST_DRILL_DATE)
    }

    #[must_use]
    pub fn first_drill_day(&self) -> Option<DateTime<Utc>> {
        self.read_day(keys::FIRST_DRILL_DAY)
    }

    /// True until a drill has been completed today.
    #[must_use]
    pub fn is_drill_pending(&self) -> bool {
        let today = start_of_day(self.clock.now());
        self.last_drill_date().is_none_or(|last| last < today)
    }

    /// One-based day of the journey.
    ///
    /// When a drill was completed but no first day was ever recorded, today
    /// becomes the first day.
    #[must_use]
    pub fn day_number(&self) -> u32 {
        let today = start_of_day(self.clock.now());
        match (self.first_drill_day(), self.last_drill_date()) {
            (Some(first), _) => {
                let millis = (today - first).num_milliseconds().abs();
                let days = (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
                u32::try_from(days + 1).unwrap_or(u32::MAX)
            }
            (None, Some(_)) => {
                self.write_day(keys::FIRST_DRILL_DAY, today);
                1
            }
            (None, None) => 1,
        }
    }

    /// Forget both markers.
    pub fn reset(&self) {
        for key in [keys::FIRST_DRILL_DAY, keys::LAST_DRILL_DATE] {
            if let Err(e) = self.store.remove(key) {
                tracing::error!(error = %e, key, "failed to clear daily progress");
            }
        }
    }

    fn read_day(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, key, "could not read daily progress");
                return None;
            }
        };
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(at) => Some(at.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!(error = %e, key, raw = %raw, "ignoring unreadable date");
                None
            }
        }
    }

    fn write_day(&self, key: &str, day: DateTime<Utc>) {
        let raw = day.to_rfc3339_opts(SecondsFormat::Millis, true);
        if let Err(e) = self.store.set(key, &raw) {
            tracing::error!(error = %e, key, "failed to persist daily progress");
        }
    }
}

impl CompletionHooks for DailyProgress {
    fn mark_daily_drill_completed(&self) {
        self.write_day(keys::LAST_DRILL_DATE, start_of_day(self.clock.now()));
    }

    fn record_first_day_if_unset(&self) {
        if self.first_drill_day().is_none() {
            self.write_day(keys::FIRST_DRILL_DAY, start_of_day(self.clock.now()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::time::fixed_now;
    use chrono::Duration;
    use storage::InMemoryStore;

    fn progress_at(store: &Arc<InMemoryStore>, at: DateTime<Utc>) -> DailyProgress {
        DailyProgress::new(Clock::fixed(at), store.clone())
    }

    #[test]
    fn fresh_install_is_day_one_and_pending() {
        let store = Arc::new(InMemoryStore::new());
        let progress = progress_at(&store, fixed_now());
        assert!(progress.is_drill_pending());
        assert_eq!(progress.day_number(), 1);
    }

    #[test]
    fn completion_clears_pending_until_tomorrow() {
        let store = Arc::new(InMemoryStore::new());
        let today = progress_at(&store, fixed_now());
        today.mark_daily_drill_completed();
        today.mark_daily_drill_completed();
        assert!(!today.is_drill_pending());
        assert_eq!(
            store.get(keys::LAST_DRILL_DATE).unwrap().as_deref(),
            Some("2023-11-14T00:00:00.000Z")
        );

        let tomorrow = progress_at(&store, fixed_now() + Duration::days(1));
        assert!(tomorrow.is_drill_pending());
    }

    #[test]
    fn first_day_is_recorded_once() {
        let store = Arc::new(InMemoryStore::new());
        progress_at(&store, fixed_now()).record_first_day_if_unset();
        let later = progress_at(&store, fixed_now() + Duration::days(3));
        later.record_first_day_if_unset();

        assert_eq!(later.first_drill_day(), Some(start_of_day(fixed_now())));
        assert_eq!(later.day_number(), 4);
    }

    #[test]
    fn missing_first_day_is_backfilled_from_last_drill() {
        let store = Arc::new(InMemoryStore::with_entries([(
            keys::LAST_DRILL_DATE,
            "2023-11-01T00:00:00.000Z",
        )]));
        let progress = progress_at(&store, fixed_now());
        assert_eq!(progress.day_number(), 1);
        assert_eq!(progress.first_drill_day(), Some(start_of_day(fixed_now())));
    }

    #[test]
    fn partial_days_round_up() {
        // A first day stored with a local-time offset still counts whole days.
        let store = Arc::new(InMemoryStore::with_entries([(
            keys::FIRST_DRILL_DAY,
            "2023-11-12T05:00:00.000Z",
        )]));
        assert_eq!(progress_at(&store, fixed_now()).day_number(), 3);
    }

    #[test]
    fn reset_forgets_everything() {
        let store = Arc::new(InMemoryStore::new());
        let progress = progress_at(&store, fixed_now());
        progress.mark_daily_drill_completed();
        progress.record_first_day_if_unset();
        progress.reset();
        progress.reset();

        assert!(progress.is_drill_pending());
        assert_eq!(progress.first_drill_day(), None);
    }
}
