//! Module catalog API module

mod handler;

use axum::{Router, middleware, routing::get, routing::put};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/modules", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new().route("/", get(handler::visible));

    let admin_routes = Router::new()
        .route("/all", get(handler::list_all))
        .route("/{id}/active", put(handler::set_active))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(admin_routes)
}
