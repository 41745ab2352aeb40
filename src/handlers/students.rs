use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::{
    db,
    error::AppResult,
    extract::{AppJson, RecordId},
    models::StudentPayload,
    AppState,
};

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_students(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let start = Instant::now();
    let students = db::fetch_all_students(&state.db).await?;

    info!(
        count = students.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed students"
    );

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Students retrieved successfully",
            "count": students.len(),
            "data": students,
        })),
    ))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_student(
    State(state): State<AppState>,
    AppJson(payload): AppJson<StudentPayload>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let fields = payload.into_fields()?;
    let student = db::insert_student(&state.db, &fields).await?;

    info!(id = student.id, "Created student");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Student successfully added",
            "data": student,
        })),
    ))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_student(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let student = db::fetch_student_by_id(&state.db, id).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Student retrieved successfully",
            "data": student,
        })),
    ))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_student(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    AppJson(payload): AppJson<StudentPayload>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let student = db::update_student(&state.db, id, &payload.into_overwrite()).await?;

    info!(id, "Updated student");

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Student updated successfully",
            "data": student,
        })),
    ))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_student(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    db::delete_student(&state.db, id).await?;

    info!(id, "Deleted student");

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Student deleted",
            "id": id,
        })),
    ))
}
