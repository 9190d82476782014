//! Result alias used throughout the application.

use crate::error::AppError;

/// Shorthand for a result carrying [`AppError`].
pub type AppResult<T> = Result<T, AppError>;
