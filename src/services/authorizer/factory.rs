/// Factory: build `TokenAuthorizer` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::authorizer::{
    TokenAuthorizer, VerificationSettings,
    certificate::{CertificateStore, MemoryCertificateStore, ValkeyCertificateStore},
    jwks::JwksClient,
};

pub async fn build_token_authorizer(config: &Config) -> Result<Arc<TokenAuthorizer>, AppError> {
    let jwks = JwksClient::new(config.jwks_url.clone(), config.jwks_timeout).map_err(|e| {
        tracing::error!(error = %e, "failed to build JWKS http client");
        AppError::Internal
    })?;

    let certificates: Arc<dyn CertificateStore> = match config.cert_cache_url.as_deref() {
        Some(url) => {
            let store = ValkeyCertificateStore::new(url, config.cert_cache_policy)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "failed to connect certificate cache");
                    AppError::Internal
                })?;
            tracing::info!(backend = store.backend_name(), "using shared certificate cache");
            Arc::new(store)
        }
        None => Arc::new(MemoryCertificateStore::new(config.cert_cache_policy)),
    };

    let settings = VerificationSettings {
        issuer: config.auth_issuer.clone(),
        audience: config.auth_audience.clone(),
        leeway_seconds: config.access_token_leeway_seconds,
    };

    Ok(Arc::new(TokenAuthorizer::new(jwks, certificates, settings)))
}
