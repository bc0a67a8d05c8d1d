#![allow(dead_code)] // not wired onto the primary routes; see build_router

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::tokens::TokenKind;
use crate::errors::AppError;
use crate::state::AppState;

/// Bearer-token guard for routes that require a logged-in user.
///
/// Missing/blank token → 401; failed verification → 403. On success the
/// decoded [`Claims`](crate::auth::tokens::Claims) are attached to the
/// request extensions for downstream handlers. Not wired onto the login and
/// profile routes; apply with `axum::middleware::from_fn_with_state`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = bearer_token(header).ok_or(AppError::Unauthorized)?;

    let claims = state
        .tokens
        .verify(token, TokenKind::Access)
        .claims()
        .ok_or(AppError::Forbidden)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
fn bearer_token(header: Option<&str>) -> Option<&str> {
    let token = header?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
