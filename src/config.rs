/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, CORS 許可、token decoder、user directory など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;
use crate::services::auth::decoder::echo::DEFAULT_EMAIL_DOMAIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    /// Unknown values are rejected: development mode unlocks the echo decoder.
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            _ => Err(ConfigError::Invalid("APP_ENV")),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        tracing::error!(error = %e, "configuration error");
        AppError::Internal
    }
}

/// Where bearer tokens get verified.
#[derive(Clone)]
pub enum DecoderConfig {
    Ed25519Pem(String),
    Hs256Secret(String),
    /// Contract-test stub. Development only.
    Echo { email_domain: String },
}

impl fmt::Debug for DecoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            DecoderConfig::Ed25519Pem(_) => f.write_str("Ed25519Pem(***)"),
            DecoderConfig::Hs256Secret(_) => f.write_str("Hs256Secret(***)"),
            DecoderConfig::Echo { email_domain } => f
                .debug_struct("Echo")
                .field("email_domain", email_domain)
                .finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout: Duration,

    pub decoder: DecoderConfig,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,
    pub decode_timeout: Duration,
    pub principal_claim_name: String,

    // None => built-in demo users
    pub directory_users: Option<Vec<(String, Vec<String>)>>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source. `from_env` passes the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match get("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = match get("APP_ENV") {
            Some(v) => AppEnv::parse(&v)?,
            None => AppEnv::Development,
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_timeout = Duration::from_secs(parse_or(
            &get,
            "REQUEST_TIMEOUT_SECONDS",
            30,
        )?);
        if request_timeout.is_zero() {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        let decoder = decoder_config(&get, app_env)?;

        let auth_issuer = get("AUTH_ISSUER").filter(|s| !s.trim().is_empty());
        let auth_audience = get("AUTH_AUDIENCE").filter(|s| !s.trim().is_empty());

        let access_token_leeway_seconds = parse_or(&get, "ACCESS_TOKEN_LEEWAY_SECONDS", 60)?;

        let decode_timeout = Duration::from_millis(parse_or(&get, "AUTH_DECODE_TIMEOUT_MS", 5000)?);
        if decode_timeout.is_zero() {
            return Err(ConfigError::Invalid("AUTH_DECODE_TIMEOUT_MS"));
        }

        let principal_claim_name = get("AUTH_PRINCIPAL_CLAIM").unwrap_or_else(|| "email".to_string());
        if principal_claim_name.trim().is_empty() {
            return Err(ConfigError::Invalid("AUTH_PRINCIPAL_CLAIM"));
        }

        let directory_users = match get("DIRECTORY_USERS") {
            Some(raw) => Some(
                parse_directory_users(&raw).ok_or(ConfigError::Invalid("DIRECTORY_USERS"))?,
            ),
            None => None,
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            request_timeout,
            decoder,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            decode_timeout,
            principal_claim_name,
            directory_users,
        })
    }
}

fn parse_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match get(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn decoder_config(
    get: &impl Fn(&str) -> Option<String>,
    app_env: AppEnv,
) -> Result<DecoderConfig, ConfigError> {
    let kind = get("AUTH_DECODER").unwrap_or_else(|| "jwt".to_string());

    match kind.to_ascii_lowercase().as_str() {
        "jwt" => {
            if let Some(pem) = get("ACCESS_JWT_PUBLIC_KEY_PEM") {
                return Ok(DecoderConfig::Ed25519Pem(pem.replace("\\n", "\n")));
            }
            match get("ACCESS_JWT_HS256_SECRET") {
                Some(secret) if !secret.is_empty() => Ok(DecoderConfig::Hs256Secret(secret)),
                Some(_) => Err(ConfigError::Invalid("ACCESS_JWT_HS256_SECRET")),
                None => Err(ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM")),
            }
        }
        "echo" if app_env.is_production() => Err(ConfigError::Invalid("AUTH_DECODER")),
        "echo" => Ok(DecoderConfig::Echo {
            email_domain: get("ECHO_EMAIL_DOMAIN")
                .unwrap_or_else(|| DEFAULT_EMAIL_DOMAIN.to_string()),
        }),
        _ => Err(ConfigError::Invalid("AUTH_DECODER")),
    }
}

/// `subject=AUTH1|AUTH2,subject2=AUTH3`. Returns `None` on any malformed entry.
fn parse_directory_users(raw: &str) -> Option<Vec<(String, Vec<String>)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (subject, authorities) = entry.split_once('=')?;
            let subject = subject.trim();
            if subject.is_empty() {
                return None;
            }
            let authorities = authorities
                .split('|')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect();
            Some((subject.to_string(), authorities))
        })
        .collect()
}
