//! Subscription API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/subscriptions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/exceptions", get(handler::list_exceptions).post(handler::add_exception))
        .route("/due-today", get(handler::due_today))
        .route("/book-today", post(handler::book_today))
}
