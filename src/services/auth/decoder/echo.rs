//! Contract-test decoder stub.
//!
//! Trusts any token: the token string itself becomes the `email` claim, with the
//! corporate domain appended when missing. Validity window is 60 seconds from now.
//! Never enabled in production (see `Config::from_env`).

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use crate::services::auth::{
    claims::{ClaimSet, EXPIRES_AT_CLAIM, ISSUED_AT_CLAIM},
    decoder::{DecodeError, TokenDecoder},
};

pub const DEFAULT_EMAIL_DOMAIN: &str = "@company.com";
const VALIDITY_SECONDS: i64 = 60;

#[derive(Debug, Clone)]
pub struct EchoEmailDecoder {
    email_domain: String,
}

impl Default for EchoEmailDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_EMAIL_DOMAIN)
    }
}

impl EchoEmailDecoder {
    pub fn new(email_domain: impl Into<String>) -> Self {
        Self {
            email_domain: email_domain.into(),
        }
    }

    fn email_for(&self, token: &str) -> String {
        if token.ends_with(&self.email_domain) {
            token.to_string()
        } else {
            format!("{}{}", token, self.email_domain)
        }
    }
}

#[async_trait]
impl TokenDecoder for EchoEmailDecoder {
    async fn decode(&self, token: &str) -> Result<ClaimSet, DecodeError> {
        let issued_at = Utc::now();
        let expires_at = issued_at + Duration::seconds(VALIDITY_SECONDS);

        let headers = BTreeMap::from([("key".to_string(), json!("value"))]);
        let claims = BTreeMap::from([
            ("email".to_string(), Value::String(self.email_for(token))),
            (ISSUED_AT_CLAIM.to_string(), json!(issued_at.timestamp())),
            (EXPIRES_AT_CLAIM.to_string(), json!(expires_at.timestamp())),
        ]);

        Ok(ClaimSet::new("token", headers, claims))
    }
}
