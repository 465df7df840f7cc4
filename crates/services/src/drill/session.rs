use chrono::{DateTime, Utc};

use brain_core::model::{DrillResult, Medal, Problem};
use brain_core::time::{elapsed_seconds, format_clock};

use crate::error::DrillError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DrillPhase {
    #[default]
    Idle,
    Drilling,
    Finished,
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// What happened to a submitted answer.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// No session is running.
    Ignored,
    Correct,
    /// Wrong or unparseable; the cursor stays put.
    Incorrect,
    /// The last problem was answered; carries the recorded result.
    Finished(DrillResult),
}

/// Aggregated view of drill progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrillProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State of one timed drill.
///
/// Every transition takes the current time explicitly; elapsed time is
/// always derived from the stored start timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrillSession {
    phase: DrillPhase,
    problems: Vec<Problem>,
    current_index: usize,
    user_answer: String,
    score: u32,
    started_at: Option<DateTime<Utc>>,
    elapsed_seconds: u64,
    awarded_medal: Medal,
    input_error: bool,
}

impl DrillSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start drilling through `problems`.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::NoProblems` for an empty batch; the session is
    /// left untouched.
    pub fn begin(&mut self, problems: Vec<Problem>, now: DateTime<Utc>) -> Result<(), DrillError> {
        if problems.is_empty() {
            return Err(DrillError::NoProblems);
        }
        *self = Self {
            phase: DrillPhase::Drilling,
            problems,
            started_at: Some(now),
            ..Self::default()
        };
        Ok(())
    }

    /// Refresh the elapsed time. Returns false outside `Drilling`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase != DrillPhase::Drilling {
            return false;
        }
        self.elapsed_seconds = self.elapsed_at(now);
        true
    }

    /// Check `input` against the current problem.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::Result` if the finished drill cannot be recorded.
    pub fn submit(&mut self, input: &str, now: DateTime<Utc>) -> Result<SubmitOutcome, DrillError> {
        if self.phase != DrillPhase::Drilling {
            return Ok(SubmitOutcome::Ignored);
        }
        let Some(problem) = self.problems.get(self.current_index) else {
            return Ok(SubmitOutcome::Ignored);
        };

        self.user_answer.clear();
        if !problem.accepts(input) {
            self.input_error = true;
            return Ok(SubmitOutcome::Incorrect);
        }

        self.score += 1;
        self.current_index += 1;
        self.input_error = false;

        if self.current_index < self.problems.len() {
            return Ok(SubmitOutcome::Correct);
        }
        self.finish(now).map(SubmitOutcome::Finished)
    }

    fn finish(&mut self, now: DateTime<Utc>) -> Result<DrillResult, DrillError> {
        let elapsed = self.elapsed_at(now);
        let problem_count = u32::try_from(self.problems.len()).unwrap_or(u32::MAX);
        #[allow(clippy::cast_precision_loss)]
        let result = DrillResult::record(now, elapsed as f64, problem_count, self.score)?;

        self.elapsed_seconds = elapsed;
        self.awarded_medal = result.medal();
        self.phase = DrillPhase::Finished;
        Ok(result)
    }

    pub fn clear_input_error(&mut self) {
        self.input_error = false;
    }

    pub fn set_user_answer(&mut self, text: impl Into<String>) {
        self.user_answer = text.into();
    }

    /// Back to a blank idle session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn elapsed_at(&self, now: DateTime<Utc>) -> u64 {
        self.started_at
            .map_or(0, |start| elapsed_seconds(start, now))
    }

    #[must_use]
    pub fn phase(&self) -> DrillPhase {
        self.phase
    }

    #[must_use]
    pub fn is_drilling(&self) -> bool {
        self.phase == DrillPhase::Drilling
    }

    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    #[must_use]
    pub fn current_problem(&self) -> Option<&Problem> {
        match self.phase {
            DrillPhase::Drilling => self.problems.get(self.current_index),
            _ => None,
        }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn user_answer(&self) -> &str {
        &self.user_answer
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Elapsed time as `MM:SS`.
    #[must_use]
    pub fn formatted_time(&self) -> String {
        format_clock(self.elapsed_seconds)
    }

    #[must_use]
    pub fn awarded_medal(&self) -> Medal {
        self.awarded_medal
    }

    #[must_use]
    pub fn input_error(&self) -> bool {
        self.input_error
    }

    #[must_use]
    pub fn progress(&self) -> DrillProgress {
        let total = self.problems.len();
        let answered = self.current_index.min(total);
        DrillProgress {
            total,
            answered,
            remaining: total - answered,
        }
    }
}
