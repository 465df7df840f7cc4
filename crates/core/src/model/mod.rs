mod drill_result;
mod ids;
pub mod medal;
mod problem;
mod settings;
mod weekly;

pub use ids::{ParseIdError, ResultId};

pub use drill_result::{DrillResult, DrillResultError, LEGACY_DEFAULT_COUNT};
pub use medal::{Medal, UnknownMedal};
pub use problem::{Operator, Problem};
pub use settings::{DEFAULT_DAILY_PROBLEMS, DrillSettings, MAX_DAILY_PROBLEMS, MIN_DAILY_PROBLEMS};
pub use weekly::{
    CountingTestResult, Dated, StroopTestResult, WORD_MEMORY_TOTAL_WORDS, WeeklyTestData,
    WeeklyTestKind, WordMemoryTestResult,
};
