/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, JWKS, 証明書キャッシュ, S3 など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;
use crate::services::attachments::S3Settings;
use crate::services::authorizer::{certificate::CertificateCachePolicy, jwks::DEFAULT_JWKS_TIMEOUT};

pub const DEFAULT_JWKS_URL: &str = "https://dataviz.auth0.com/.well-known/jwks.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
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

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub jwks_url: String,
    pub jwks_timeout: Duration,
    pub cert_cache_policy: CertificateCachePolicy,
    // Valkey/Redis URL; in-process slot when unset
    pub cert_cache_url: Option<String>,

    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,

    // None: attachment uploads disabled
    pub attachments: Option<S3Settings>,
}

fn optional_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match optional_var(key) {
        Some(v) => v.parse::<T>().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

/// Whole seconds, non-zero; unset falls back to `DEFAULT_JWKS_TIMEOUT`.
fn jwks_timeout(raw: Option<&str>) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_JWKS_TIMEOUT);
    };

    match raw.parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(Duration::from_secs(seconds)),
        _ => Err(ConfigError::Invalid("JWKS_TIMEOUT_SECONDS")),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parse_var("PORT", 3000)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let jwks_url = optional_var("JWKS_URL").unwrap_or_else(|| DEFAULT_JWKS_URL.to_string());
        let parsed = url::Url::parse(&jwks_url).map_err(|_| ConfigError::Invalid("JWKS_URL"))?;
        if app_env.is_production() && parsed.scheme() != "https" {
            return Err(ConfigError::Invalid("JWKS_URL"));
        }

        let jwks_timeout = jwks_timeout(optional_var("JWKS_TIMEOUT_SECONDS").as_deref())?;

        let cert_cache_policy =
            CertificateCachePolicy::from_ttl_seconds(parse_var("CERT_CACHE_TTL_SECONDS", 0)?);
        let cert_cache_url = optional_var("CERT_CACHE_URL");

        let auth_issuer = optional_var("AUTH_ISSUER");
        let auth_audience = optional_var("AUTH_AUDIENCE");
        let access_token_leeway_seconds = parse_var("ACCESS_TOKEN_LEEWAY_SECONDS", 0)?;

        // AWS credentials / region are read by the S3 client itself (AmazonS3Builder::from_env)
        let attachments = match optional_var("ATTACHMENTS_S3_BUCKET") {
            Some(bucket) => Some(S3Settings {
                bucket,
                url_expiration_seconds: parse_var("SIGNED_URL_EXPIRATION", 300)?,
            }),
            None => None,
        };

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            jwks_url,
            jwks_timeout,
            cert_cache_policy,
            cert_cache_url,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            attachments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwks_timeout_defaults_to_the_client_default() {
        assert_eq!(jwks_timeout(None).unwrap(), DEFAULT_JWKS_TIMEOUT);
        assert_eq!(jwks_timeout(Some("12")).unwrap(), Duration::from_secs(12));
    }

    #[test]
    fn jwks_timeout_rejects_zero_and_garbage() {
        for raw in ["0", "-1", "1.5", "soon"] {
            assert!(matches!(
                jwks_timeout(Some(raw)),
                Err(ConfigError::Invalid("JWKS_TIMEOUT_SECONDS"))
            ));
        }
    }
}
