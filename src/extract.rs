use std::num::IntErrorKind;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// `axum::Json` whose rejections answer with a JSON `message`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Primary key from the `:id` path segment.
///
/// An integer too large for the key type cannot name a stored record, so it
/// is a not-found rather than a malformed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i64);

#[async_trait]
impl FromRequestParts<AppState> for RecordId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        parse_record_id(&raw, state).map(RecordId)
    }
}

fn parse_record_id(raw: &str, state: &AppState) -> AppResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) => Ok(id),
        Err(err) if matches!(err.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Err(AppError::not_found(state.kind))
        }
        Err(_) => Err(AppError::BadRequest(format!(
            "Invalid id `{}`: expected an integer",
            raw
        ))),
    }
}
