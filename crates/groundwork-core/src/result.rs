//! Convenience result type alias for Groundwork.

use crate::error::AppError;

/// A specialized `Result` type for Groundwork operations.
pub type AppResult<T> = Result<T, AppError>;
