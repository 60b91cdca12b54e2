/*
 * Responsibility
 * - Credentials → AuthenticatedSession の一連の流れ (decode → convert → lookup → 組み立て)
 * - 各ステップの失敗を AuthError の 4 分類に写像する (classify)
 *
 * Notes
 * - retry / cache はしない。毎回 decode と lookup を行う
 * - 権限は UserDirectory のものを採用し、token の scope は使わない
 */
use std::{sync::Arc, time::Duration};

use crate::services::auth::{
    converter::{ConvertError, JwtAuthentication, JwtAuthenticationConverter},
    credentials::Credentials,
    decoder::{DecodeError, TokenDecoder},
    directory::{DirectoryError, UserDirectory, UserRecord},
    error::AuthError,
    session::{AuthenticatedSession, SESSION_ISSUER},
};

pub const DEFAULT_DECODE_TIMEOUT: Duration = Duration::from_secs(5);

/// Step-local failure before classification.
#[derive(Debug)]
enum PipelineError {
    Auth(AuthError),
    Decode(DecodeError),
    Convert(ConvertError),
    Directory(DirectoryError),
    DecodeTimeout(Duration),
}

/// Single place where step failures become the public taxonomy.
fn classify(err: PipelineError) -> AuthError {
    match err {
        PipelineError::Auth(e) => e,
        PipelineError::Decode(e) => AuthError::InvalidToken {
            reason: e.to_string(),
        },
        PipelineError::Convert(ConvertError::MissingSubject { .. })
        | PipelineError::Convert(ConvertError::NonTextSubject { .. }) => {
            AuthError::UnknownSubject { subject: None }
        }
        PipelineError::Convert(ConvertError::Authorities(e)) => {
            AuthError::AuthenticationServiceFailure(e)
        }
        PipelineError::Directory(e) => AuthError::AuthenticationServiceFailure(e.into()),
        PipelineError::DecodeTimeout(after) => AuthError::AuthenticationServiceFailure(
            anyhow::anyhow!("token decode timed out after {:?}", after),
        ),
    }
}

#[derive(Clone)]
pub struct AuthenticationManager {
    decoder: Arc<dyn TokenDecoder>,
    converter: JwtAuthenticationConverter,
    directory: Arc<dyn UserDirectory>,
    decode_timeout: Duration,
}

impl std::fmt::Debug for AuthenticationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationManager")
            .field("converter", &self.converter)
            .field("decode_timeout", &self.decode_timeout)
            .finish_non_exhaustive()
    }
}

impl AuthenticationManager {
    pub fn new(
        decoder: Arc<dyn TokenDecoder>,
        converter: JwtAuthenticationConverter,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            decoder,
            converter,
            directory,
            decode_timeout: DEFAULT_DECODE_TIMEOUT,
        }
    }

    pub fn with_decode_timeout(mut self, timeout: Duration) -> Self {
        self.decode_timeout = timeout;
        self
    }

    pub async fn authenticate(
        &self,
        credentials: Credentials,
    ) -> Result<AuthenticatedSession, AuthError> {
        self.run(credentials).await.map_err(classify)
    }

    async fn run(&self, credentials: Credentials) -> Result<AuthenticatedSession, PipelineError> {
        let token = match credentials {
            Credentials::Bearer(token) => token,
            Credentials::Other { scheme } => {
                tracing::debug!(scheme = %scheme, "non-bearer credentials presented");
                return Err(PipelineError::Auth(AuthError::InvalidCredentialType));
            }
        };

        let claims = tokio::time::timeout(self.decode_timeout, self.decoder.decode(token.as_str()))
            .await
            .map_err(|_| PipelineError::DecodeTimeout(self.decode_timeout))?
            .map_err(PipelineError::Decode)?;

        let authentication = self
            .converter
            .convert(&claims)
            .await
            .map_err(PipelineError::Convert)?;

        let user = self
            .directory
            .find_by_subject(&authentication.subject)
            .await
            .map_err(PipelineError::Directory)?
            .ok_or_else(|| {
                PipelineError::Auth(AuthError::UnknownSubject {
                    subject: Some(authentication.subject.clone()),
                })
            })?;

        Ok(self.authorize(authentication, user))
    }

    fn authorize(&self, authentication: JwtAuthentication, user: UserRecord) -> AuthenticatedSession {
        AuthenticatedSession {
            subject: authentication.subject,
            name_attribute_key: self.converter.principal_claim_name().to_string(),
            authorities: user.authorities,
            attributes: authentication.claims.claims().clone(),
            issuer: SESSION_ISSUER,
        }
    }
}
