/*
 * Responsibility
 * - 認証成功時に組み立てる AuthenticatedSession (1 リクエスト限り)
 * - middleware が request extensions に格納し、handler は extractor 経由で受け取る
 */
use std::collections::BTreeMap;

use serde_json::Value;

use crate::services::auth::authority::{Authorities, GrantedAuthority};

/// Label of the client registration every session is tagged with.
pub const SESSION_ISSUER: &str = "example_app";

#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub subject: String,
    /// Claim the subject was read from (e.g. `email`).
    pub name_attribute_key: String,
    /// Granted by the user directory, never by the token.
    pub authorities: Authorities,
    /// Full claim set of the token.
    pub attributes: BTreeMap<String, Value>,
    pub issuer: &'static str,
}

impl AuthenticatedSession {
    pub fn has_authority(&self, authority: &GrantedAuthority) -> bool {
        self.authorities.contains(authority)
    }

    pub fn has_any_authority(&self, required: &Authorities) -> bool {
        required.iter().any(|a| self.has_authority(a))
    }
}
