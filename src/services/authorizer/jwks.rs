//! Identity provider key set (JWKS) fetching.
//!
//! - One GET per call, no retries. Caching is the certificate store's job.
//! - The HTTP client carries a bounded timeout so a slow provider turns into
//!   a verification failure instead of a hung authorization path.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::services::authorizer::VerificationError;

pub const DEFAULT_JWKS_TIMEOUT: Duration = Duration::from_secs(5);

/// `{ "keys": [ ... ] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonWebKeySet {
    #[serde(default)]
    pub keys: Vec<JsonWebKey>,
}

/// The subset of a JWK the authorizer looks at. Other members are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonWebKey {
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default)]
    pub kty: Option<String>,
    #[serde(default, rename = "use")]
    pub usage: Option<String>,
    #[serde(default)]
    pub x5c: Option<Vec<String>>,
}

impl JsonWebKey {
    /// RSA signing key with a kid and at least one certificate in its chain.
    pub fn is_rsa_signing_key(&self) -> bool {
        self.usage.as_deref() == Some("sig")
            && self.kty.as_deref() == Some("RSA")
            && self.kid.as_deref().is_some_and(|kid| !kid.is_empty())
            && self.first_certificate().is_some()
    }

    /// First (leaf) certificate of the chain, base64 DER.
    pub fn first_certificate(&self) -> Option<&str> {
        self.x5c
            .as_deref()
            .and_then(|chain| chain.first())
            .map(String::as_str)
    }
}

impl JsonWebKeySet {
    /// Find the RSA signing key whose `kid` exactly matches.
    pub fn signing_key(&self, kid: Option<&str>) -> Result<&JsonWebKey, VerificationError> {
        let no_match = || VerificationError::NoMatchingSigningKey {
            kid: kid.map(str::to_string),
        };

        if self.keys.is_empty() {
            warn!("no keys found in JWKS");
            return Err(no_match());
        }

        let mut signing_keys = self.keys.iter().filter(|k| k.is_rsa_signing_key()).peekable();

        if signing_keys.peek().is_none() {
            warn!(keys = self.keys.len(), "no signing keys found in JWKS");
            return Err(no_match());
        }

        let kid = kid.ok_or_else(no_match)?;

        signing_keys
            .find(|k| k.kid.as_deref() == Some(kid))
            .ok_or_else(|| {
                warn!(kid = %kid, "unable to find signing key with kid");
                no_match()
            })
    }
}

/// HTTP client for the provider's published key set.
#[derive(Debug, Clone)]
pub struct JwksClient {
    jwks_url: String,
    http_client: reqwest::Client,
}

impl JwksClient {
    pub fn new(jwks_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            jwks_url: jwks_url.into(),
            http_client,
        })
    }

    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Fetch the key set once. Any transport, status or body error is `KeySetUnavailable`.
    pub async fn fetch(&self) -> Result<JsonWebKeySet, VerificationError> {
        info!(jwks_url = %self.jwks_url, "fetching signing keys");

        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, timeout = e.is_timeout(), "JWKS request failed");
                VerificationError::KeySetUnavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "JWKS endpoint returned an error status");
            return Err(VerificationError::KeySetUnavailable(format!(
                "unexpected status {status}"
            )));
        }

        let jwks: JsonWebKeySet = response.json().await.map_err(|e| {
            warn!(error = %e, "JWKS response is not a key set");
            VerificationError::KeySetUnavailable(e.to_string())
        })?;

        debug!(keys = jwks.keys.len(), "fetched JWKS");

        Ok(jwks)
    }
}
