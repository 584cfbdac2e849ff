//! Riding lesson API module

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/horses", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/lessons", get(handler::list).post(handler::schedule))
        .route("/lessons/{id}", delete(handler::delete))
}
