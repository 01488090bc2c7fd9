//! Core error types

use thiserror::Error;

use crate::core::window::ViewId;
use crate::platform::api::OutputId;

/// Recoverable failures of core operations.
///
/// None of these are fatal to the compositor; they are logged and, for
/// output configuration requests, reported back to the requester.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid view ID: {0:?}")]
    InvalidViewId(ViewId),

    #[error("Unknown output: {0:?}")]
    UnknownOutput(OutputId),

    #[error("An output configuration test is already pending")]
    OutputTestPending,

    #[error("Output {0:?} rejected the requested state")]
    OutputHeadRejected(OutputId),

    #[error("Committing output {0:?} failed")]
    OutputCommitFailed(OutputId),

    #[error("No output configuration test is pending")]
    NoPendingTest,

    #[error("State error: {0}")]
    StateError(String),
}

impl CoreError {
    pub fn state_error(msg: impl Into<String>) -> Self {
        Self::StateError(msg.into())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
