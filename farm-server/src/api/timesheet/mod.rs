//! Timesheet API module

mod handler;

use axum::{
    Router,
    middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/timesheet", routes())
}

fn routes() -> Router<ServerState> {
    let user_routes = Router::new()
        .route("/clock-in", post(handler::clock_in))
        .route("/clock-out", post(handler::clock_out))
        .route("/status", get(handler::status));

    let admin_routes = Router::new()
        .route("/summary", get(handler::summary))
        .layer(middleware::from_fn(require_admin));

    user_routes.merge(admin_routes)
}
