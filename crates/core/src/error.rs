use thiserror::Error;

use crate::chart::UnknownChartTab;
use crate::model::{DrillResultError, ParseIdError, UnknownMedal};
use crate::stats::UnknownSortKey;

/// Any domain validation failure raised by this crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    DrillResult(#[from] DrillResultError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error(transparent)]
    Medal(#[from] UnknownMedal),
    #[error(transparent)]
    SortKey(#[from] UnknownSortKey),
    #[error(transparent)]
    ChartTab(#[from] UnknownChartTab),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Medal, ResultId};
    use crate::time::fixed_now;

    #[test]
    fn wraps_domain_errors() {
        let err: Error = crate::model::DrillResult::record(fixed_now(), 10.0, 0, 0)
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::DrillResult(DrillResultError::NoProblems)));

        let err: Error = "gold-ish".parse::<Medal>().unwrap_err().into();
        assert_eq!(err.to_string(), "unknown medal: gold-ish");

        let err: Error = "nope".parse::<ResultId>().unwrap_err().into();
        assert!(matches!(err, Error::Id(_)));

        let err: Error = "speed".parse::<crate::stats::SortKey>().unwrap_err().into();
        assert!(matches!(err, Error::SortKey(_)));
    }
}
