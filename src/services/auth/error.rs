use thiserror::Error;

/// Classified authentication outcome. The only error type that leaves the manager.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("bearer token is expected")]
    InvalidCredentialType,

    #[error("invalid bearer token: {reason}")]
    InvalidToken { reason: String },

    #[error("unknown subject")]
    UnknownSubject { subject: Option<String> },

    #[error("authentication service failure: {0}")]
    AuthenticationServiceFailure(#[source] anyhow::Error),
}

impl AuthError {
    /// `true` for failures that are not the caller's fault (surfaced as 5xx).
    pub fn is_service_failure(&self) -> bool {
        matches!(self, AuthError::AuthenticationServiceFailure(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentialType => "invalid_credential_type",
            AuthError::InvalidToken { .. } => "invalid_token",
            AuthError::UnknownSubject { .. } => "unknown_subject",
            AuthError::AuthenticationServiceFailure(_) => "service_failure",
        }
    }
}
