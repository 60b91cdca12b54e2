//! Token decoders: bearer string → verified `ClaimSet`.
//!
//! - `jwt`: signature + exp/nbf (+ iss/aud when configured) verification via `jsonwebtoken`
//! - `echo`: contract-test stub, trusts any token and echoes it as the `email` claim

pub mod echo;
pub mod jwt;

use async_trait::async_trait;
use thiserror::Error;

use crate::services::auth::claims::ClaimSet;

pub use echo::EchoEmailDecoder;
pub use jwt::JwtDecoder;

/// Any reason a token could not be turned into claims.
///
/// Every variant is a token problem from the caller's point of view.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("malformed token: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait TokenDecoder: Send + Sync + 'static {
    async fn decode(&self, token: &str) -> Result<ClaimSet, DecodeError>;
}
