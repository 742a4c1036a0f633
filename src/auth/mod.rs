pub mod token;

pub use token::{Claims, TokenService};

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::common::AppState;
use crate::error::AppError;

/// Hash a clear-text password for storage.
///
/// # Errors
///
/// Returns an error if bcrypt fails internally.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

/// Check a clear-text password against a stored hash.
///
/// # Errors
///
/// Returns an error if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}

/// Authenticated caller, extracted from the `Authorization` header of a
/// protected request. Pure gate: no side effects, runs before the handler.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        let claims = state.tokens.verify(token).map_err(|e| {
            tracing::debug!("Token rejected: {e}");
            AppError::Forbidden("invalid or expired token".to_string())
        })?;

        Ok(Self {
            id: claims.sub,
            email: claims.email,
        })
    }
}
