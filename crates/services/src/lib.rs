#![forbid(unsafe_code)]

pub mod app_services;
pub mod drill;
pub mod error;
pub mod progress;
pub mod reset;
pub mod statistics;

pub use brain_core::Clock;

pub use app_services::AppServices;
pub use drill::{
    DrillPhase, DrillProgress, DrillSession, DrillSessionController, SubmitOutcome, TimerDriver,
};
pub use error::{AppServicesError, DrillError};
pub use progress::{CompletionHooks, DailyProgress};
pub use reset::ResetService;
pub use statistics::StatisticsService;
