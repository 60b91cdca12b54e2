/*
 * Responsibility
 * - ClaimSet → JwtAuthentication (subject + token 由来の authority) への変換
 * - subject を読む claim 名 (principal claim) の設定と検証
 */
use std::sync::Arc;

use thiserror::Error;

use crate::config::ConfigError;
use crate::services::auth::{
    authority::{Authorities, GrantedAuthoritiesConverter, ScopeAuthoritiesConverter},
    claims::{ClaimSet, SUBJECT_CLAIM},
};

/// Result of converting a decoded token. Not yet checked against the directory.
#[derive(Debug, Clone)]
pub struct JwtAuthentication {
    pub claims: ClaimSet,
    pub token_authorities: Authorities,
    pub subject: String,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("subject claim '{claim}' is missing or blank")]
    MissingSubject { claim: String },
    #[error("subject claim '{claim}' is not a text value")]
    NonTextSubject { claim: String },
    #[error("authorities conversion failed: {0}")]
    Authorities(#[source] anyhow::Error),
}

#[derive(Clone)]
pub struct JwtAuthenticationConverter {
    principal_claim_name: Option<String>,
    authorities_converter: Arc<dyn GrantedAuthoritiesConverter>,
}

impl std::fmt::Debug for JwtAuthenticationConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuthenticationConverter")
            .field("principal_claim_name", &self.principal_claim_name)
            .finish_non_exhaustive()
    }
}

impl Default for JwtAuthenticationConverter {
    fn default() -> Self {
        Self {
            principal_claim_name: None,
            authorities_converter: Arc::new(ScopeAuthoritiesConverter::default()),
        }
    }
}

impl JwtAuthenticationConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the subject from `name` instead of `sub`. Blank names are rejected.
    pub fn set_principal_claim_name(&mut self, name: &str) -> Result<(), ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::Invalid("principal claim name"));
        }
        self.principal_claim_name = Some(name.to_string());
        Ok(())
    }

    pub fn set_authorities_converter(&mut self, converter: Arc<dyn GrantedAuthoritiesConverter>) {
        self.authorities_converter = converter;
    }

    /// Claim the subject is read from.
    pub fn principal_claim_name(&self) -> &str {
        self.principal_claim_name.as_deref().unwrap_or(SUBJECT_CLAIM)
    }

    pub async fn convert(&self, claims: &ClaimSet) -> Result<JwtAuthentication, ConvertError> {
        let token_authorities = self
            .authorities_converter
            .convert(claims)
            .await
            .map_err(ConvertError::Authorities)?;

        let claim = self.principal_claim_name();
        let subject = claims
            .claim_as_string(claim)
            .map_err(|e| ConvertError::NonTextSubject { claim: e.claim })?
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConvertError::MissingSubject {
                claim: claim.to_string(),
            })?;

        Ok(JwtAuthentication {
            claims: claims.clone(),
            token_authorities,
            subject,
        })
    }
}
