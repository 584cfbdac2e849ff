//! Cattle API module

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cattle", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::intake))
        .route("/book", get(handler::herd_book))
        .route(
            "/{id}",
            get(handler::detail).put(handler::update).delete(handler::exit),
        )
        .route("/{id}/events", get(handler::list_events).post(handler::add_event))
        .route("/{id}/events/{event_id}", delete(handler::delete_event))
}
