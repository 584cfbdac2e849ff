//! User administration API module

mod handler;

use axum::{
    Router,
    middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    // The whole user API is admin-only
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", axum::routing::delete(handler::delete))
        .route("/{id}/modules", put(handler::set_modules))
        .layer(middleware::from_fn(require_admin))
}
