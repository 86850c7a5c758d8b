//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::StaffId;
use storage::repository::StoreError;

/// Errors emitted by an active test session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("a test needs at least one question")]
    NoQuestions,
    #[error("position {position} is out of range for {len} questions")]
    OutOfRange { position: usize, len: usize },
    #[error("option {option} does not exist on the question at position {position}")]
    InvalidOption { position: usize, option: usize },
    #[error("the session no longer accepts answers")]
    Closed,
}

/// Errors emitted while starting a test attempt.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BeginError {
    #[error("staff member {0} is not active")]
    InactiveStaff(StaffId),
    #[error("employee code does not match")]
    CodeMismatch,
    #[error("staff member {0} has already taken the test today")]
    AlreadyAttemptedToday(StaffId),
    #[error("question bank unavailable")]
    QuestionsUnavailable(#[source] StoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
