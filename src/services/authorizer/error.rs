//! Verification failures.
//!
//! Every variant collapses to the same DENY decision at the authorizer
//! boundary. The variants only exist so that logs (and tests) can tell the
//! failure branches apart.

use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("no authentication header")]
    MissingCredential,

    #[error("invalid authentication header")]
    MalformedCredential,

    #[error("token is not a well-formed signed token: {0}")]
    UndecodableToken(String),

    #[error("signing key set unavailable: {0}")]
    KeySetUnavailable(String),

    #[error("no signing key matches kid {kid:?}")]
    NoMatchingSigningKey { kid: Option<String> },

    #[error("invalid certificate in signing key chain: {0}")]
    InvalidCertificate(String),

    #[error("token signature is invalid: {0}")]
    SignatureInvalid(String),

    #[error("token time claims violated: {0}")]
    ClaimsExpired(String),
}

impl VerificationError {
    /// Stable short label used as a structured log field.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::MalformedCredential => "malformed_credential",
            Self::UndecodableToken(_) => "undecodable_token",
            Self::KeySetUnavailable(_) => "key_set_unavailable",
            Self::NoMatchingSigningKey { .. } => "no_matching_signing_key",
            Self::InvalidCertificate(_) => "invalid_certificate",
            Self::SignatureInvalid(_) => "signature_invalid",
            Self::ClaimsExpired(_) => "claims_expired",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for VerificationError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => {
                Self::ClaimsExpired(e.to_string())
            }
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::MissingRequiredClaim(_) => Self::UndecodableToken(e.to_string()),
            ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat => {
                Self::InvalidCertificate(e.to_string())
            }
            // InvalidSignature, InvalidAlgorithm, issuer/audience mismatch, crypto failures
            _ => Self::SignatureInvalid(e.to_string()),
        }
    }
}
