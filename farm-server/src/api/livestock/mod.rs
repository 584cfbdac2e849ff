//! Livestock API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/livestock", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/overview", get(handler::overview))
        .route("/sites/{id}/events", get(handler::list_events).post(handler::record_event))
        .route("/sites/{id}/production", post(handler::quick_production))
}
