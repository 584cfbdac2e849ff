//! Egg ledger API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/eggs", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/overview", get(handler::overview))
        .route("/series", get(handler::series))
        .route("/production", post(handler::record_production))
        .route("/disposal", post(handler::record_disposal))
}
