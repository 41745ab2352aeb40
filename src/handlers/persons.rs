use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::{
    db::{self, PersonCreated},
    error::AppResult,
    extract::{AppJson, RecordId},
    models::PersonPayload,
    AppState,
};

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_persons(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let start = Instant::now();
    let persons = db::fetch_all_persons(&state.db).await?;

    info!(
        count = persons.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed persons"
    );

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Persons retrieved successfully",
            "count": persons.len(),
            "data": persons,
        })),
    ))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_person(
    State(state): State<AppState>,
    AppJson(payload): AppJson<PersonPayload>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let fields = payload.into_fields()?;

    let (status, message, person) = match db::create_or_update_person(&state.db, &fields).await? {
        PersonCreated::Inserted(person) => {
            info!(id = person.id, "Created person");
            (StatusCode::CREATED, "Person successfully added", person)
        }
        PersonCreated::SurnameUpdated(person) => {
            info!(id = person.id, surname = %person.surname, "Updated surname of existing person");
            (StatusCode::OK, "Surname updated successfully", person)
        }
    };

    Ok((
        status,
        Json(serde_json::json!({
            "message": message,
            "data": person,
        })),
    ))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_person(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let person = db::fetch_person_by_id(&state.db, id).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Person retrieved successfully",
            "data": person,
        })),
    ))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_person(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    AppJson(payload): AppJson<PersonPayload>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let person = db::update_person(&state.db, id, payload).await?;

    info!(id, "Updated person");

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Person updated successfully",
            "data": person,
        })),
    ))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_person(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    db::delete_person(&state.db, id).await?;

    info!(id, "Deleted person");

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Person deleted",
            "id": id,
        })),
    ))
}
