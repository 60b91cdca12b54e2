/*
 * Responsibility
 * - Decoder が返す「検証済み claim 集合」の型 (ClaimSet)
 * - claim 値の文字列化ルール / iat・exp の時刻変換をここに閉じ込める
 */
use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

pub const SUBJECT_CLAIM: &str = "sub";
pub const ISSUED_AT_CLAIM: &str = "iat";
pub const EXPIRES_AT_CLAIM: &str = "exp";

/// A claim was present but could not be read as text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("claim '{claim}' is not a text value")]
pub struct NonTextClaim {
    pub claim: String,
}

/// Claims of a successfully decoded token.
///
/// Immutable once built: decoders construct it, everything downstream only reads.
#[derive(Clone, PartialEq)]
pub struct ClaimSet {
    token_value: String,
    headers: BTreeMap<String, Value>,
    claims: BTreeMap<String, Value>,
}

impl std::fmt::Debug for ClaimSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the raw token
        f.debug_struct("ClaimSet")
            .field("headers", &self.headers)
            .field("claims", &self.claims)
            .finish()
    }
}

impl ClaimSet {
    pub fn new(
        token_value: impl Into<String>,
        headers: BTreeMap<String, Value>,
        claims: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            token_value: token_value.into(),
            headers,
            claims,
        }
    }

    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    pub fn headers(&self) -> &BTreeMap<String, Value> {
        &self.headers
    }

    pub fn claims(&self) -> &BTreeMap<String, Value> {
        &self.claims
    }

    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// Read a claim as text.
    ///
    /// - `Ok(None)`: claim absent (or JSON null)
    /// - strings are returned as-is, numbers and booleans are rendered
    /// - arrays and objects are rejected
    pub fn claim_as_string(&self, name: &str) -> Result<Option<String>, NonTextClaim> {
        match self.claims.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(Value::Array(_)) | Some(Value::Object(_)) => Err(NonTextClaim {
                claim: name.to_string(),
            }),
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp(ISSUED_AT_CLAIM)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp(EXPIRES_AT_CLAIM)
    }

    fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        let secs = self.claims.get(name)?.as_i64()?;
        Utc.timestamp_opt(secs, 0).single()
    }
}
