//! Summaries and table rows derived from persisted results.

mod sessions;
mod summary;

pub use sessions::{
    SessionData, SortDirection, SortKey, UnknownSortKey, derive_sessions, latest_per_day,
    sort_sessions,
};
pub use summary::{
    MedalCounts, RECENT_ACTIVITIES_LIMIT, RecentActivity, StatsData, WEEKLY_TEST_INTERVAL,
    compute_stats, weekly_test_available,
};
