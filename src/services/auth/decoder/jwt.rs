use std::collections::BTreeMap;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};

use crate::services::auth::{
    claims::ClaimSet,
    decoder::{DecodeError, TokenDecoder},
};

/// Optional issuer / audience / leeway checks applied on top of signature + `exp`.
#[derive(Debug, Clone, Default)]
pub struct JwtExpectations {
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

/// JWT verifier (EdDSA public key or HS256 shared secret).
///
/// - Debug never prints key material.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// `public_key_pem` must be an Ed25519 public key in PEM format.
    pub fn from_ed_pem(public_key_pem: &str, expect: &JwtExpectations) -> Result<Self, String> {
        let decoding_key = DecodingKey::from_ed_pem(public_key_pem.as_bytes())
            .map_err(|e| format!("invalid ed25519 public key pem: {}", e))?;

        Ok(Self::new(decoding_key, Algorithm::EdDSA, expect))
    }

    pub fn from_hs256_secret(secret: &[u8], expect: &JwtExpectations) -> Result<Self, String> {
        if secret.is_empty() {
            return Err("hs256 secret must not be empty".to_string());
        }
        Ok(Self::new(
            DecodingKey::from_secret(secret),
            Algorithm::HS256,
            expect,
        ))
    }

    fn new(decoding_key: DecodingKey, algorithm: Algorithm, expect: &JwtExpectations) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_required_spec_claims(&["exp"]);
        validation.validate_nbf = true;
        validation.leeway = expect.leeway_seconds;

        if let Some(issuer) = &expect.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &expect.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key,
            validation,
        }
    }
}

#[async_trait]
impl TokenDecoder for JwtDecoder {
    async fn decode(&self, token: &str) -> Result<ClaimSet, DecodeError> {
        let data = jsonwebtoken::decode::<Map<String, Value>>(
            token,
            &self.decoding_key,
            &self.validation,
        )?;

        let headers = match serde_json::to_value(&data.header) {
            Ok(Value::Object(map)) => map
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .collect::<BTreeMap<_, _>>(),
            Ok(_) => BTreeMap::new(),
            Err(e) => return Err(DecodeError::Malformed(e.to_string())),
        };

        Ok(ClaimSet::new(
            token,
            headers,
            data.claims.into_iter().collect(),
        ))
    }
}
