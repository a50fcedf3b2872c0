//! Authentication middleware and the `CurrentUser` extractor

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};

use super::jwt::{CurrentUser, JwtError, JwtService};
use crate::state::AppState;

/// Verify the bearer token and resolve the caller
fn authenticate(state: &AppState, req: &Request) -> Result<CurrentUser, AppError> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(header) = header else {
        tracing::debug!(uri = %req.uri(), "Missing Authorization header");
        return Err(AppError::not_authenticated());
    };

    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    let user = state
        .jwt
        .validate_token(token)
        .and_then(CurrentUser::try_from)
        .map_err(|e| {
            tracing::warn!(error = %e, uri = %req.uri(), "Token rejected");
            match e {
                JwtError::Expired => AppError::token_expired(),
                JwtError::Invalid(_) => AppError::invalid_token("Invalid token"),
            }
        })?;

    Ok(user)
}

/// Require a valid bearer token; injects [`CurrentUser`] into the request
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state, &req)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Require a valid bearer token with the admin role
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state, &req)?;
    if !user.is_admin() {
        tracing::warn!(
            user_id = %user.id,
            role = %user.role,
            uri = %req.uri(),
            "Admin route denied"
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::not_authenticated)
    }
}
