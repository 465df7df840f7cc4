use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound (exclusive) in seconds for a gold medal.
pub const GOLD_THRESHOLD_SECS: f64 = 30.0;
/// Upper bound (exclusive) in seconds for a silver medal.
pub const SILVER_THRESHOLD_SECS: f64 = 60.0;
/// Upper bound (exclusive) in seconds for a bronze medal.
pub const BRONZE_THRESHOLD_SECS: f64 = 90.0;

/// Chart colors keyed by medal tier.
pub mod colors {
    pub const GOLD: &str = "#FFD700";
    pub const SILVER: &str = "#C0C0C0";
    pub const BRONZE: &str = "#CD7F32";
    pub const DEFAULT: &str = "#0ea5e9";
    pub const WORD_ACCURACY: &str = "#10b981";
}

/// Coarse performance tier derived from drill completion time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
    #[default]
    None,
}

impl Medal {
    /// Medal earned for finishing in `seconds`.
    ///
    /// Intervals are closed-open: exactly 30s is silver, exactly 90s is none.
    #[must_use]
    pub fn for_time(seconds: f64) -> Self {
        if seconds < GOLD_THRESHOLD_SECS {
            Medal::Gold
        } else if seconds < SILVER_THRESHOLD_SECS {
            Medal::Silver
        } else if seconds < BRONZE_THRESHOLD_SECS {
            Medal::Bronze
        } else {
            Medal::None
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Medal::Gold => "gold",
            Medal::Silver => "silver",
            Medal::Bronze => "bronze",
            Medal::None => "none",
        }
    }

    /// Chart point color for this tier.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Medal::Gold => colors::GOLD,
            Medal::Silver => colors::SILVER,
            Medal::Bronze => colors::BRONZE,
            Medal::None => colors::DEFAULT,
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a medal name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown medal: {0}")]
pub struct UnknownMedal(pub String);

impl FromStr for Medal {
    type Err = UnknownMedal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gold" => Ok(Medal::Gold),
            "silver" => Ok(Medal::Silver),
            "bronze" => Ok(Medal::Bronze),
            "none" => Ok(Medal::None),
            other => Err(UnknownMedal(other.to_owned())),
        }
    }
}
