use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use tracing::{debug, warn};

use crate::{
    auth::{
        dto::AuthResponse,
        repo::User,
        tokens::{TokenIssuer, TokenKind},
    },
    error::AppError,
    state::AppState,
};

/// Signs a fresh access/refresh pair for `user`.
pub fn start_session(tokens: &TokenIssuer, user: User) -> Result<AuthResponse, AppError> {
    let token = tokens
        .issue(user.id, TokenKind::Access)
        .map_err(AppError::internal("Failed to sign token"))?;
    let refresh_token = tokens
        .issue(user.id, TokenKind::Refresh)
        .map_err(AppError::internal("Failed to sign token"))?;
    debug!(user_id = user.id, "session tokens issued");
    Ok(AuthResponse {
        token,
        refresh_token,
        user: user.into(),
    })
}

/// Id of the caller, taken from a valid `Authorization: Bearer <access token>`.
pub struct AuthUser(pub i64);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = value
            .split_once(' ')
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim())
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header"))?;

        state
            .tokens
            .verify(token, TokenKind::Access)
            .map(AuthUser)
            .map_err(|e| {
                warn!(error = %e, "rejected bearer token");
                AppError::unauthorized("Invalid or expired token")
            })
    }
}
