//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod device;
pub mod health;
pub mod index;
pub mod loans;

/// Creates the router with every page and API route.
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(index::routes())
        .merge(health::routes())
        .merge(loans::routes())
        .merge(device::routes())
}
