//! Timed arithmetic drill sessions.

mod controller;
mod session;
mod timer;

pub use controller::DrillSessionController;
pub use session::{DrillPhase, DrillProgress, DrillSession, SubmitOutcome};
pub use timer::{TICK_PERIOD, Ticker, TimerDriver};
