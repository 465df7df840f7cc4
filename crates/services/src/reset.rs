use std::rc::Rc;

use storage::{ResultLog, WeeklyTestLog};

use crate::progress::DailyProgress;

/// Clears user progress. Settings are never touched.
#[derive(Clone)]
pub struct ResetService {
    results: Rc<ResultLog>,
    weekly: Rc<WeeklyTestLog>,
    progress: DailyProgress,
}

impl ResetService {
    #[must_use]
    pub fn new(results: Rc<ResultLog>, weekly: Rc<WeeklyTestLog>, progress: DailyProgress) -> Self {
        Self {
            results,
            weekly,
            progress,
        }
    }

    /// Drill results, weekly tests and the daily markers.
    pub fn reset_all_progress(&self) {
        self.reset_drill_progress();
        self.reset_weekly_test_progress();
        self.progress.reset();
        tracing::info!("all progress reset");
    }

    pub fn reset_drill_progress(&self) {
        self.results.clear();
    }

    pub fn reset_weekly_test_progress(&self) {
        self.weekly.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::Clock;
    use brain_core::model::DrillResult;
    use brain_core::time::fixed_now;
    use std::sync::Arc;
    use storage::{InMemoryStore, KeyValueStore};

    use crate::progress::CompletionHooks;

    #[test]
    fn reset_all_clears_every_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let results = Rc::new(ResultLog::load(Arc::clone(&store)));
        let weekly = Rc::new(WeeklyTestLog::load(Arc::clone(&store)));
        let progress = DailyProgress::new(Clock::fixed(fixed_now()), Arc::clone(&store));

        results.append(DrillResult::record(fixed_now(), 40.0, 10, 10).unwrap());
        weekly.add_stroop(33.0, fixed_now());
        progress.mark_daily_drill_completed();
        progress.record_first_day_if_unset();

        let reset = ResetService::new(Rc::clone(&results), Rc::clone(&weekly), progress.clone());
        reset.reset_all_progress();
        reset.reset_all_progress();

        assert!(results.is_empty());
        assert!(weekly.data().is_empty());
        assert!(progress.is_drill_pending());
        assert_eq!(progress.first_drill_day(), None);
    }

    #[test]
    fn partial_resets_leave_the_other_log() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let results = Rc::new(ResultLog::load(Arc::clone(&store)));
        let weekly = Rc::new(WeeklyTestLog::load(Arc::clone(&store)));
        let progress = DailyProgress::new(Clock::fixed(fixed_now()), store);

        results.append(DrillResult::record(fixed_now(), 40.0, 10, 10).unwrap());
        weekly.add_counting(70.0, fixed_now());

        let reset = ResetService::new(Rc::clone(&results), Rc::clone(&weekly), progress);
        reset.reset_weekly_test_progress();
        assert_eq!(results.len(), 1);
        assert!(weekly.data().is_empty());

        reset.reset_drill_progress();
        assert!(results.is_empty());
    }
}
