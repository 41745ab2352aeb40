pub mod persons;
pub mod students;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use crate::AppState;

/// `GET /test`. Never touches the database.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "message": format!("{} is running.", state.kind.api_name()) })),
    )
}
