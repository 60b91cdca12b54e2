//! Credentials presented on a request.
//!
//! The gate builds a `Credentials` value from the `Authorization` header and the
//! manager matches on it; only `Bearer` can ever authenticate.

use axum::http::{HeaderMap, header};

/// Opaque bearer token. Never printed via Debug.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Bearer(BearerToken),
    /// Any other scheme (Basic, Digest, garbage). Kept only for logging.
    Other { scheme: String },
}

impl Credentials {
    /// Parse a raw `Authorization` header value.
    ///
    /// The scheme is matched case-insensitively; an empty bearer token is not a bearer
    /// credential.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        let (scheme, rest) = match value.split_once(' ') {
            Some((scheme, rest)) => (scheme, rest.trim()),
            None => (value, ""),
        };

        if scheme.eq_ignore_ascii_case("bearer") && !rest.is_empty() {
            Credentials::Bearer(BearerToken::new(rest))
        } else {
            Credentials::Other {
                scheme: scheme.to_string(),
            }
        }
    }

    /// `None` when the header is absent. A non-UTF-8 header is `Other`.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let raw = headers.get(header::AUTHORIZATION)?;
        Some(match raw.to_str() {
            Ok(value) => Self::parse(value),
            Err(_) => Credentials::Other {
                scheme: String::new(),
            },
        })
    }
}
