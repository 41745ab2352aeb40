//! Person and Student CRUD services over Postgres.
//!
//! Both services share this library; each binary picks a [`ServiceKind`] and
//! serves exactly one table.

use axum::{routing::get, Router};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod seed;
pub mod server;

/// Which record type a service process manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Persons,
    Students,
}

impl ServiceKind {
    pub fn table(self) -> &'static str {
        match self {
            ServiceKind::Persons => "persons",
            ServiceKind::Students => "students",
        }
    }

    /// Singular record name used in messages.
    pub fn record_name(self) -> &'static str {
        match self {
            ServiceKind::Persons => "Person",
            ServiceKind::Students => "Student",
        }
    }

    pub fn api_name(self) -> &'static str {
        match self {
            ServiceKind::Persons => "Person API",
            ServiceKind::Students => "Student API",
        }
    }
}

/// Shared application state. Cheap to clone; the pool is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub kind: ServiceKind,
}

impl AppState {
    pub fn new(db: PgPool, kind: ServiceKind) -> Self {
        Self { db, kind }
    }
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/test", get(handlers::health));

    let router = match state.kind {
        // ── Persons CRUD ────────────────────────────────────────────────────
        ServiceKind::Persons => router
            .route(
                "/persons",
                get(handlers::persons::list_persons).post(handlers::persons::create_person),
            )
            .route(
                "/persons/:id",
                get(handlers::persons::get_person)
                    .put(handlers::persons::update_person)
                    .delete(handlers::persons::delete_person),
            ),

        // ── Students CRUD ───────────────────────────────────────────────────
        ServiceKind::Students => router
            .route(
                "/students",
                get(handlers::students::list_students).post(handlers::students::create_student),
            )
            .route(
                "/students/:id",
                get(handlers::students::get_student)
                    .put(handlers::students::update_student)
                    .delete(handlers::students::delete_student),
            ),
    };

    router
        // ── Middleware ──────────────────────────────────────────────────────
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
