/*
 * Responsibility
 * - GrantedAuthority (権限トークン) の型
 * - token の claim から authority を抽出する strategy (GrantedAuthoritiesConverter)
 *
 * Notes
 * - token 由来の authority は JwtAuthentication にだけ載る
 * - セッションの権限は UserDirectory 側が正 (manager 参照)
 */
use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::services::auth::claims::ClaimSet;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GrantedAuthority(String);

impl GrantedAuthority {
    pub fn new(authority: impl Into<String>) -> Self {
        Self(authority.into())
    }
}

impl std::fmt::Display for GrantedAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GrantedAuthority {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

pub type Authorities = BTreeSet<GrantedAuthority>;

/// Build an authority set from string literals.
pub fn authorities<'a>(names: impl IntoIterator<Item = &'a str>) -> Authorities {
    names.into_iter().map(GrantedAuthority::from).collect()
}

/// Strategy that extracts authorities from a decoded token.
///
/// Errors are unexpected failures (e.g. a remote lookup); a claim with an unusable
/// shape should simply contribute no authorities.
#[async_trait]
pub trait GrantedAuthoritiesConverter: Send + Sync + 'static {
    async fn convert(&self, claims: &ClaimSet) -> anyhow::Result<Authorities>;
}

const WELL_KNOWN_AUTHORITIES_CLAIMS: [&str; 2] = ["scope", "scp"];
const DEFAULT_AUTHORITY_PREFIX: &str = "SCOPE_";

/// Default converter: one authority per scope value, prefixed with `SCOPE_`.
///
/// Reads `scope`, falling back to `scp`, unless a claim name is set explicitly.
/// Accepts a space-separated string or an array of strings.
#[derive(Debug, Clone)]
pub struct ScopeAuthoritiesConverter {
    claim_name: Option<String>,
    prefix: String,
}

impl Default for ScopeAuthoritiesConverter {
    fn default() -> Self {
        Self {
            claim_name: None,
            prefix: DEFAULT_AUTHORITY_PREFIX.to_string(),
        }
    }
}

impl ScopeAuthoritiesConverter {
    pub fn with_claim_name(mut self, claim_name: impl Into<String>) -> Self {
        self.claim_name = Some(claim_name.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn authorities_claim<'a>(&self, claims: &'a ClaimSet) -> Option<&'a Value> {
        match &self.claim_name {
            Some(name) => claims.claim(name),
            None => WELL_KNOWN_AUTHORITIES_CLAIMS
                .iter()
                .find_map(|name| claims.claim(name)),
        }
    }

    fn extract(&self, claims: &ClaimSet) -> Authorities {
        let values: Vec<&str> = match self.authorities_claim(claims) {
            Some(Value::String(s)) => s.split_whitespace().collect(),
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };

        values
            .into_iter()
            .filter(|v| !v.trim().is_empty())
            .map(|v| GrantedAuthority::new(format!("{}{}", self.prefix, v)))
            .collect()
    }
}

#[async_trait]
impl GrantedAuthoritiesConverter for ScopeAuthoritiesConverter {
    async fn convert(&self, claims: &ClaimSet) -> anyhow::Result<Authorities> {
        Ok(self.extract(claims))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> ClaimSet {
        let map: BTreeMap<String, Value> = value.as_object().cloned().unwrap().into_iter().collect();
        ClaimSet::new("t", BTreeMap::new(), map)
    }

    #[tokio::test]
    async fn space_separated_scope_becomes_prefixed_authorities() {
        let converter = ScopeAuthoritiesConverter::default();
        let got = converter
            .convert(&claims(json!({ "scope": "read  write" })))
            .await
            .unwrap();

        assert_eq!(got, authorities(["SCOPE_read", "SCOPE_write"]));
    }

    #[tokio::test]
    async fn scp_array_is_used_when_scope_is_absent() {
        let converter = ScopeAuthoritiesConverter::default();
        let got = converter
            .convert(&claims(json!({ "scp": ["a", 1, "b"] })))
            .await
            .unwrap();

        assert_eq!(got, authorities(["SCOPE_a", "SCOPE_b"]));
    }

    #[tokio::test]
    async fn custom_claim_and_prefix() {
        let converter = ScopeAuthoritiesConverter::default()
            .with_claim_name("roles")
            .with_prefix("ROLE_");
        let got = converter
            .convert(&claims(json!({ "roles": ["admin"], "scope": "ignored" })))
            .await
            .unwrap();

        assert_eq!(got, authorities(["ROLE_admin"]));
    }

    #[tokio::test]
    async fn missing_or_odd_claim_yields_no_authorities() {
        let converter = ScopeAuthoritiesConverter::default();
        assert!(converter.convert(&claims(json!({}))).await.unwrap().is_empty());
        assert!(
            converter
                .convert(&claims(json!({ "scope": { "nested": true } })))
                .await
                .unwrap()
                .is_empty()
        );
    }
}
