use chrono::NaiveDate;

use crate::model::{DrillResult, Medal};
use crate::time::format_seconds;

/// How many recent drills the summary lists.
pub const RECENT_ACTIVITIES_LIMIT: usize = 10;

/// A weekly test unlocks after every this many completed drills.
pub const WEEKLY_TEST_INTERVAL: usize = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MedalCounts {
    pub gold: usize,
    pub silver: usize,
    pub bronze: usize,
}

impl MedalCounts {
    fn record(&mut self, medal: Medal) {
        match medal {
            Medal::Gold => self.gold += 1,
            Medal::Silver => self.silver += 1,
            Medal::Bronze => self.bronze += 1,
            Medal::None => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentActivity {
    pub date: NaiveDate,
    /// Elapsed time as `MM:SS`.
    pub time: String,
    pub medal: Medal,
}

/// Summary of all valid drill results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsData {
    pub total_drills: usize,
    /// Mean elapsed time as `MM:SS`.
    pub average_time: String,
    pub medal_counts: MedalCounts,
    pub recent_activities: Vec<RecentActivity>,
}

impl Default for StatsData {
    fn default() -> Self {
        Self {
            total_drills: 0,
            average_time: format_seconds(0.0),
            medal_counts: MedalCounts::default(),
            recent_activities: Vec::new(),
        }
    }
}

/// Aggregate drill results into summary statistics.
///
/// Entries without a usable date or time are skipped. Recent activities are
/// the first entries in input order; pass results most recent first.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_stats(results: &[DrillResult]) -> StatsData {
    let mut stats = StatsData::default();
    let mut total_time = 0.0_f64;

    for result in results {
        let Some(date) = result.valid_date() else {
            continue;
        };

        stats.total_drills += 1;
        total_time += result.time_in_seconds();
        stats.medal_counts.record(result.medal());

        if stats.recent_activities.len() < RECENT_ACTIVITIES_LIMIT {
            stats.recent_activities.push(RecentActivity {
                date: date.date_naive(),
                time: format_seconds(result.time_in_seconds()),
                medal: result.medal(),
            });
        }
    }

    if stats.total_drills > 0 {
        stats.average_time = format_seconds(total_time / stats.total_drills as f64);
    }

    stats
}

/// Whether a weekly test is due after `drill_count` completed drills.
#[must_use]
pub fn weekly_test_available(drill_count: usize) -> bool {
    drill_count > 0 && drill_count % WEEKLY_TEST_INTERVAL == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResultId;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn result(days_ago: i64, secs: f64) -> DrillResult {
        DrillResult::record(fixed_now() - Duration::days(days_ago), secs, 10, 10).unwrap()
    }

    #[test]
    fn empty_input_gives_zeroed_stats() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total_drills, 0);
        assert_eq!(stats.average_time, "00:00");
        assert_eq!(stats.medal_counts, MedalCounts::default());
        assert!(stats.recent_activities.is_empty());
    }

    #[test]
    fn averages_and_counts_medals() {
        let results = vec![result(0, 20.0), result(1, 45.0), result(2, 70.0), result(3, 100.0)];
        let stats = compute_stats(&results);

        assert_eq!(stats.total_drills, 4);
        // (20 + 45 + 70 + 100) / 4 = 58.75
        assert_eq!(stats.average_time, "00:58");
        assert_eq!(
            stats.medal_counts,
            MedalCounts {
                gold: 1,
                silver: 1,
                bronze: 1
            }
        );
        assert_eq!(stats.recent_activities[0].date, fixed_now().date_naive());
        assert_eq!(stats.recent_activities[3].time, "01:40");
    }

    #[test]
    fn malformed_entries_are_excluded() {
        let broken_time =
            DrillResult::from_persisted(ResultId::generate(), Some(fixed_now()), f64::NAN, 10, 10, Medal::Gold);
        let missing_date =
            DrillResult::from_persisted(ResultId::generate(), None, 12.0, 10, 10, Medal::Gold);
        let stats = compute_stats(&[broken_time, result(0, 40.0), missing_date]);

        assert_eq!(stats.total_drills, 1);
        assert_eq!(stats.average_time, "00:40");
        assert_eq!(stats.medal_counts.gold, 0);
        assert_eq!(stats.recent_activities.len(), 1);
    }

    #[test]
    fn recent_activities_keep_input_order_and_cap() {
        let results: Vec<_> = (0..15).map(|i| result(i, 10.0 + i as f64)).collect();
        let stats = compute_stats(&results);
        assert_eq!(stats.recent_activities.len(), RECENT_ACTIVITIES_LIMIT);
        assert_eq!(stats.recent_activities[0].time, "00:10");
        assert_eq!(stats.recent_activities[9].time, "00:19");
    }

    #[test]
    fn weekly_test_every_seventh_drill() {
        assert!(!weekly_test_available(0));
        assert!(!weekly_test_available(6));
        assert!(weekly_test_available(7));
        assert!(weekly_test_available(14));
        assert!(!weekly_test_available(15));
    }
}
