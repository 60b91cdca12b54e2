/// Factory: build `AuthenticationManager` from application `Config`.
use std::sync::Arc;

use crate::config::{Config, DecoderConfig};
use crate::error::AppError;
use crate::services::auth::{
    AuthenticationManager, EchoEmailDecoder, JwtAuthenticationConverter, JwtDecoder,
    StaticUserDirectory, TokenDecoder, decoder::jwt::JwtExpectations,
};

pub fn build_token_decoder(config: &Config) -> Result<Arc<dyn TokenDecoder>, AppError> {
    let expect = JwtExpectations {
        issuer: config.auth_issuer.clone(),
        audience: config.auth_audience.clone(),
        leeway_seconds: config.access_token_leeway_seconds,
    };

    let decoder: Arc<dyn TokenDecoder> = match &config.decoder {
        DecoderConfig::Ed25519Pem(pem) => {
            Arc::new(JwtDecoder::from_ed_pem(pem, &expect).map_err(|e| {
                tracing::error!(error = %e, "failed to build EdDSA token decoder");
                AppError::Internal
            })?)
        }
        DecoderConfig::Hs256Secret(secret) => Arc::new(
            JwtDecoder::from_hs256_secret(secret.as_bytes(), &expect).map_err(|e| {
                tracing::error!(error = %e, "failed to build HS256 token decoder");
                AppError::Internal
            })?,
        ),
        DecoderConfig::Echo { email_domain } => {
            tracing::warn!("echo token decoder enabled: any bearer token is trusted");
            Arc::new(EchoEmailDecoder::new(email_domain.clone()))
        }
    };

    Ok(decoder)
}

pub fn build_directory(config: &Config) -> StaticUserDirectory {
    match &config.directory_users {
        Some(entries) => StaticUserDirectory::from_entries(entries),
        None => StaticUserDirectory::seeded(),
    }
}

pub fn build_authentication_manager(
    config: &Config,
) -> Result<Arc<AuthenticationManager>, AppError> {
    let decoder = build_token_decoder(config)?;

    let mut converter = JwtAuthenticationConverter::new();
    converter.set_principal_claim_name(&config.principal_claim_name)?;

    let directory = build_directory(config);
    tracing::info!(users = directory.len(), "user directory loaded");

    let manager = AuthenticationManager::new(decoder, converter, Arc::new(directory))
        .with_decode_timeout(config.decode_timeout);

    Ok(Arc::new(manager))
}
