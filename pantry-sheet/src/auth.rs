use axum::extract::FromRef;
use axum::http::{header, request::Parts};
use axum::{async_trait, extract::FromRequestParts};
use sha2::{Digest, Sha256};

use crate::config::AuthConfig;
use crate::errors::WebError;

/// Proof that the caller presented the configured bearer token.
/// Use this as a request guard on every sheet route.
pub struct SheetPrincipal;

#[async_trait]
impl<S> FromRequestParts<S> for SheetPrincipal
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(expected) = AuthConfig::from_ref(state).token else {
            return Ok(SheetPrincipal);
        };

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(WebError::Auth("No Authorization header"))?;
        let auth_str = auth_header
            .to_str()
            .map_err(|_| WebError::Auth("Invalid Authorization header"))?;
        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or(WebError::Auth("Authorization must be Bearer token"))?;

        // Only digests are compared, never the raw tokens
        if Sha256::digest(token.as_bytes()) == Sha256::digest(expected.as_bytes()) {
            Ok(SheetPrincipal)
        } else {
            Err(WebError::Auth("Invalid bearer token"))
        }
    }
}
