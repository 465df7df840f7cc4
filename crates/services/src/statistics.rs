use std::rc::Rc;

use brain_core::chart::{
    self, ChartPoint, ChartSeries, ChartTab, counting_time, full_label, stroop_time,
    word_accuracy,
};
use brain_core::stats::{
    self, SessionData, SortDirection, SortKey, StatsData, derive_sessions, sort_sessions,
};
use storage::{ResultLog, WeeklyTestLog};

/// Read-only statistics over the result logs.
#[derive(Clone)]
pub struct StatisticsService {
    results: Rc<ResultLog>,
    weekly: Rc<WeeklyTestLog>,
}

impl StatisticsService {
    #[must_use]
    pub fn new(results: Rc<ResultLog>, weekly: Rc<WeeklyTestLog>) -> Self {
        Self { results, weekly }
    }

    #[must_use]
    pub fn stats(&self) -> StatsData {
        stats::compute_stats(&self.results.all())
    }

    /// Weekly-test rows, newest day first.
    #[must_use]
    pub fn sessions(&self) -> Vec<SessionData> {
        derive_sessions(&self.weekly.data())
    }

    #[must_use]
    pub fn sorted_sessions(&self, key: SortKey, direction: SortDirection) -> Vec<SessionData> {
        sort_sessions(&self.sessions(), key, direction)
    }

    #[must_use]
    pub fn drill_chart(&self) -> Vec<ChartPoint> {
        chart::drill_time_series(&self.results.all())
    }

    #[must_use]
    pub fn weekly_chart(&self, tab: ChartTab) -> ChartSeries {
        match tab {
            ChartTab::Counting => {
                chart::weekly_series(&self.weekly.counting(), counting_time, full_label)
            }
            ChartTab::Word => {
                chart::weekly_series(&self.weekly.word_memory(), word_accuracy, full_label)
            }
            ChartTab::Stroop => chart::weekly_series(&self.weekly.stroop(), stroop_time, full_label),
        }
    }

    /// Whether the drill count has just reached a weekly-test milestone.
    #[must_use]
    pub fn weekly_test_available(&self) -> bool {
        stats::weekly_test_available(self.results.len())
    }
}
