//! Authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// Require a valid bearer token on every `/api/` route.
///
/// The token only identifies the caller; username and admin flag are
/// re-read from the database on each request, so deleting a user or
/// changing their admin status takes effect immediately instead of when
/// the token expires. On success the resulting [`CurrentUser`] is stored
/// in the request extensions for handlers and downstream middleware.
///
/// Skipped for:
/// - `OPTIONS *` (CORS preflight)
/// - paths outside `/api/` (they 404 normally)
/// - `/api/auth/login` and `/api/health`
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }
    if path == "/api/auth/login" || path == "/api/health" {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), "Missing authorization header");
            return Err(AppError::unauthorized());
        }
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims)
                .map_err(|e| AppError::invalid_token(format!("Malformed claims: {e}")))?;
            let Some(row) = crate::db::repository::user::find_by_id(&state.pool, user.id).await?
            else {
                tracing::warn!(target: "security", user_id = user.id, "Token for deleted user");
                return Err(AppError::unauthorized());
            };
            req.extensions_mut().insert(CurrentUser {
                id: row.id,
                username: row.username,
                is_admin: row.is_admin,
            });
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(target: "security", error = %e, uri = %req.uri(), "Token validation failed");
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Require the authenticated user to be an administrator.
///
/// Must run after [`require_auth`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;
    if !user.is_admin {
        tracing::warn!(
            target: "security",
            username = %user.username,
            uri = %req.uri(),
            "Admin access denied"
        );
        return Err(AppError::forbidden("Administrator access required"));
    }

    Ok(next.run(req).await)
}
