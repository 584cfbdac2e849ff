//! HTTP API
//!
//! One submodule per feature area, each exposing a `router()`. The
//! assembled app carries the tower-http middleware stack and the auth
//! middleware; everything under `/api/` except login and health requires
//! a valid token.

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod auth;
pub mod cattle;
pub mod eggs;
pub mod health;
pub mod horses;
pub mod livestock;
pub mod modules;
pub mod sites;
pub mod subscriptions;
pub mod tasks;
pub mod timesheet;
pub mod users;

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// All routes, no middleware, no state.
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(auth::router())
        .merge(modules::router())
        .merge(eggs::router())
        .merge(subscriptions::router())
        .merge(sites::router())
        .merge(livestock::router())
        .merge(cattle::router())
        .merge(horses::router())
        .merge(users::router())
        .merge(tasks::router())
        .merge(timesheet::router())
        .merge(health::router())
}

/// Fully configured application: routes + middleware + state.
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // ========== Tower HTTP Middleware ==========
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // ========== Application Middleware ==========
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .with_state(state)
}
