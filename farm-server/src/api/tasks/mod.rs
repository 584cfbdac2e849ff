//! Task API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tasks", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/mine", get(handler::mine))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/complete", post(handler::complete))
}
