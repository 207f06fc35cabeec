//! Error types for task store operations.

use taskdeck_core::TaskId;
use thiserror::Error;

/// Errors that can occur during `TaskStore` operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// No task with this id is held by the store.
    #[error("Task not found: {0}")]
    NotFound(TaskId),
}

impl StoreError {
    /// The id the failed operation referred to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        match self {
            Self::NotFound(id) => *id,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
