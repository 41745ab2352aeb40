pub mod person;
pub mod student;

pub use person::*;
pub use student::*;

use crate::error::{AppError, AppResult};

/// Presence check for a required payload field.
pub(crate) fn require<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::BadRequest(format!("{} is required", field)))
}
