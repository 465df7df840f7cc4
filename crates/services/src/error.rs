//! Shared error types for the services crate.

use thiserror::Error;

use brain_core::model::DrillResultError;
use storage::StorageError;

/// Errors emitted by the drill session controller.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DrillError {
    #[error("could not generate any problems for the drill")]
    NoProblems,
    #[error(transparent)]
    Result(#[from] DrillResultError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
