//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - The browser-facing JSON API and index page
//! - The scanning-device endpoint
//! - Response envelopes and request extractors

pub mod envelope;
pub mod extractors;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use libris_core::library::LibraryService;
use libris_db::LibraryRepository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Loan ledger.
    pub library: LibraryService,
}

impl AppState {
    /// Builds state with the ledger backed by the given connection.
    pub fn new(db: DatabaseConnection) -> Self {
        let repository = LibraryRepository::new(db.clone());
        Self {
            db: Arc::new(db),
            library: LibraryService::new(Arc::new(repository)),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::app_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
