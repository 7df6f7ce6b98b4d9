use std::{fmt, sync::Arc};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, Header, Validation};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::services::authorizer::{
    Decision, VerificationError, bearer,
    certificate::{Certificate, CertificateStore},
    jwks::JwksClient,
    pem,
};

/// The only algorithm the identity provider signs with.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::RS256;

/// Claim checks applied on top of the signature.
#[derive(Debug, Clone, Default)]
pub struct VerificationSettings {
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

/// The one claim the authorizer reads. Time and issuer claims are checked by
/// `jsonwebtoken` on the raw payload, so their JSON types do not matter here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<Value>,
}

impl TokenClaims {
    /// `sub` as a principal id. Strings are taken as-is, numbers in their JSON form.
    pub fn subject(&self) -> Option<String> {
        let subject = match self.sub.as_ref()? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        (!subject.trim().is_empty()).then_some(subject)
    }
}

/// Token that passed signature and claim verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub principal_id: String,
    pub kid: Option<String>,
}

/// Bearer token authorizer backed by the provider's JWKS and a single-slot certificate store.
pub struct TokenAuthorizer {
    jwks: JwksClient,
    certificates: Arc<dyn CertificateStore>,
    validation: Validation,
}

impl fmt::Debug for TokenAuthorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthorizer")
            .field("jwks_url", &self.jwks.jwks_url())
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenAuthorizer {
    pub fn new(
        jwks: JwksClient,
        certificates: Arc<dyn CertificateStore>,
        settings: VerificationSettings,
    ) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.leeway = settings.leeway_seconds;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // exp/nbf are checked when present but not demanded
        validation.set_required_spec_claims::<&str>(&[]);

        if let Some(issuer) = settings.issuer.as_deref() {
            validation.set_issuer(&[issuer]);
        }
        match settings.audience.as_deref() {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            jwks,
            certificates,
            validation,
        }
    }

    /// Decide ALLOW/DENY for an `Authorization` header value. Never fails:
    /// every verification error becomes the same DENY decision.
    pub async fn authorize(&self, authorization: Option<&str>) -> Decision {
        match self.verify(authorization).await {
            Ok(verified) => {
                info!(principal_id = %verified.principal_id, "user authorized");
                Decision::allow(verified.principal_id)
            }
            Err(err) => {
                warn!(reason = err.reason(), error = %err, "user not authorized");
                Decision::deny()
            }
        }
    }

    /// Extract, decode, resolve the signing certificate and verify.
    pub async fn verify(
        &self,
        authorization: Option<&str>,
    ) -> Result<VerifiedToken, VerificationError> {
        let token = bearer::extract_token(authorization)?;
        let (header, _) = decode_unverified(token)?;

        debug!(kid = ?header.kid, alg = ?header.alg, "verifying token");

        let certificate = self.resolve_certificate(header.kid.as_deref()).await?;
        let decoding_key = DecodingKey::from_rsa_pem(certificate.as_pem().as_bytes())?;

        let data = jsonwebtoken::decode::<TokenClaims>(token, &decoding_key, &self.validation)?;

        let principal_id = data
            .claims
            .subject()
            .ok_or_else(|| VerificationError::UndecodableToken("missing 'sub' claim".to_string()))?;

        Ok(VerifiedToken {
            principal_id,
            kid: header.kid,
        })
    }

    /// Cached certificate if any (whatever its kid), otherwise fetch, convert and cache.
    async fn resolve_certificate(&self, kid: Option<&str>) -> Result<Certificate, VerificationError> {
        match self.certificates.get().await {
            Ok(Some(certificate)) => {
                debug!("using cached certificate");
                return Ok(certificate);
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "certificate store read failed, fetching signing keys");
            }
        }

        let jwks = self.jwks.fetch().await?;
        let signing_key = jwks.signing_key(kid)?;
        let der = signing_key
            .first_certificate()
            .ok_or_else(|| VerificationError::NoMatchingSigningKey {
                kid: kid.map(str::to_string),
            })?;

        let pem = pem::certificate_to_pem(der)?;

        // Refuse to cache anything that is not a usable RSA key
        DecodingKey::from_rsa_pem(pem.as_bytes())?;

        let certificate = Certificate::from_pem(pem);

        match self.certificates.set_if_absent(certificate.clone()).await {
            Ok(true) => info!(kid = ?kid, "certificate fetched and cached"),
            Ok(false) => debug!("certificate slot already filled by another request"),
            Err(err) => warn!(error = %err, "failed to cache certificate"),
        }

        Ok(certificate)
    }
}

/// Structural decode without signature verification.
///
/// A token must be three dot-separated base64url segments with a JSON header
/// (readable by `jsonwebtoken`) and a JSON object payload.
pub fn decode_unverified(token: &str) -> Result<(Header, TokenClaims), VerificationError> {
    let header = jsonwebtoken::decode_header(token)
        .map_err(|e| VerificationError::UndecodableToken(e.to_string()))?;

    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => {
            return Err(VerificationError::UndecodableToken(
                "expected three token segments".to_string(),
            ));
        }
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| VerificationError::UndecodableToken(e.to_string()))?;

    // Any JSON object is a valid payload; only `sub` is picked out
    let payload: Map<String, Value> = serde_json::from_slice(&bytes)
        .map_err(|e| VerificationError::UndecodableToken(e.to_string()))?;
    let claims = TokenClaims {
        sub: payload.get("sub").cloned(),
    };

    Ok((header, claims))
}
