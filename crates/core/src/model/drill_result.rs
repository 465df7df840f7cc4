use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Medal, ResultId};

/// Default used for missing problem/correct counts in legacy records.
pub const LEGACY_DEFAULT_COUNT: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DrillResultError {
    #[error("a drill result needs at least one problem")]
    NoProblems,

    #[error("correct count ({correct}) exceeds problem count ({total})")]
    CountMismatch { correct: u32, total: u32 },

    #[error("elapsed time must be finite and non-negative, got {0}")]
    InvalidTime(f64),
}

/// Outcome of one completed drill session.
///
/// Results recorded by the app always carry a date. Records rehydrated from
/// storage may not (legacy or corrupt entries); those are kept in the log
/// but skipped by statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct DrillResult {
    id: ResultId,
    date: Option<DateTime<Utc>>,
    time_in_seconds: f64,
    problem_count: u32,
    correct_count: u32,
    medal: Medal,
}

impl DrillResult {
    /// Build a validated result.
    ///
    /// # Errors
    ///
    /// Returns `DrillResultError::NoProblems` for a zero problem count,
    /// `DrillResultError::CountMismatch` if more answers are correct than
    /// were asked, and `DrillResultError::InvalidTime` for negative or
    /// non-finite times.
    pub fn new(
        id: ResultId,
        date: DateTime<Utc>,
        time_in_seconds: f64,
        problem_count: u32,
        correct_count: u32,
        medal: Medal,
    ) -> Result<Self, DrillResultError> {
        if problem_count == 0 {
            return Err(DrillResultError::NoProblems);
        }
        if correct_count > problem_count {
            return Err(DrillResultError::CountMismatch {
                correct: correct_count,
                total: problem_count,
            });
        }
        if !time_in_seconds.is_finite() || time_in_seconds < 0.0 {
            return Err(DrillResultError::InvalidTime(time_in_seconds));
        }

        Ok(Self {
            id,
            date: Some(date),
            time_in_seconds,
            problem_count,
            correct_count,
            medal,
        })
    }

    /// Record a freshly completed drill: new id, medal derived from the time.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DrillResult::new`].
    pub fn record(
        date: DateTime<Utc>,
        time_in_seconds: f64,
        problem_count: u32,
        correct_count: u32,
    ) -> Result<Self, DrillResultError> {
        Self::new(
            ResultId::generate(),
            date,
            time_in_seconds,
            problem_count,
            correct_count,
            Medal::for_time(time_in_seconds),
        )
    }

    /// Rehydrate a result from persisted storage without rejecting it.
    ///
    /// Storage already substituted defaults for missing fields; this keeps
    /// the counts consistent (`problem_count > 0`, `correct_count` clamped)
    /// but leaves the date and time as found so statistics can filter them.
    #[must_use]
    pub fn from_persisted(
        id: ResultId,
        date: Option<DateTime<Utc>>,
        time_in_seconds: f64,
        problem_count: u32,
        correct_count: u32,
        medal: Medal,
    ) -> Self {
        let problem_count = if problem_count == 0 {
            LEGACY_DEFAULT_COUNT
        } else {
            problem_count
        };
        Self {
            id,
            date,
            time_in_seconds,
            problem_count,
            correct_count: correct_count.min(problem_count),
            medal,
        }
    }

    #[must_use]
    pub fn id(&self) -> ResultId {
        self.id
    }

    #[must_use]
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    #[must_use]
    pub fn time_in_seconds(&self) -> f64 {
        self.time_in_seconds
    }

    #[must_use]
    pub fn problem_count(&self) -> u32 {
        self.problem_count
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn medal(&self) -> Medal {
        self.medal
    }

    /// Date of a result usable by statistics: known date and a finite,
    /// non-negative time. `None` for malformed records.
    #[must_use]
    pub fn valid_date(&self) -> Option<DateTime<Utc>> {
        if self.time_in_seconds.is_finite() && self.time_in_seconds >= 0.0 {
            self.date
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid_date().is_some()
    }
}
