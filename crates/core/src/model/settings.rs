/// Fewest problems a daily drill may ask for.
pub const MIN_DAILY_PROBLEMS: u32 = 10;
/// Most problems a daily drill may ask for.
pub const MAX_DAILY_PROBLEMS: u32 = 100;
pub const DEFAULT_DAILY_PROBLEMS: u32 = 100;

/// User-facing drill configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrillSettings {
    daily_problems_count: u32,
}

impl DrillSettings {
    /// Build settings, clamping the problem count into the supported range.
    #[must_use]
    pub fn new(daily_problems_count: u32) -> Self {
        Self {
            daily_problems_count: daily_problems_count
                .clamp(MIN_DAILY_PROBLEMS, MAX_DAILY_PROBLEMS),
        }
    }

    #[must_use]
    pub fn daily_problems_count(&self) -> u32 {
        self.daily_problems_count
    }
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self {
            daily_problems_count: DEFAULT_DAILY_PROBLEMS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_range() {
        assert_eq!(DrillSettings::new(0).daily_problems_count(), 10);
        assert_eq!(DrillSettings::new(55).daily_problems_count(), 55);
        assert_eq!(DrillSettings::new(500).daily_problems_count(), 100);
        assert_eq!(DrillSettings::default().daily_problems_count(), 100);
    }
}
