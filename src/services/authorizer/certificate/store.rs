use std::{fmt, future::Future, pin::Pin, time::Duration};

use crate::services::cache::CacheError;

/// PEM-encoded signing certificate resolved from the key set.
#[derive(Clone, PartialEq, Eq)]
pub struct Certificate(String);

impl Certificate {
    pub fn from_pem(pem: impl Into<String>) -> Self {
        Self(pem.into())
    }

    pub fn as_pem(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // PEM bodies are long and useless in logs
        f.debug_tuple("Certificate")
            .field(&format_args!("{} bytes", self.0.len()))
            .finish()
    }
}

/// How long a cached certificate stays trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CertificateCachePolicy {
    /// Keep the first certificate for the lifetime of the store.
    /// Rotated provider keys are not picked up until the process restarts.
    #[default]
    Pinned,
    /// Drop the certificate after the given age; the next request refetches.
    Expiring(Duration),
}

impl CertificateCachePolicy {
    /// `0` seconds means pinned.
    pub fn from_ttl_seconds(seconds: u64) -> Self {
        if seconds == 0 {
            Self::Pinned
        } else {
            Self::Expiring(Duration::from_secs(seconds))
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        match self {
            Self::Pinned => None,
            Self::Expiring(ttl) => Some(*ttl),
        }
    }
}

/// Single-slot certificate store. The slot is not keyed by `kid`.
///
/// - `get()`: `Ok(None)` when empty (or expired under the store's policy)
/// - `set_if_absent()`: `Ok(true)` if this call filled the slot,
///   `Ok(false)` if another writer got there first
pub trait CertificateStore: Send + Sync {
    fn get<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Certificate>, CertificateStoreError>> + Send + 'a>>;

    fn set_if_absent<'a>(
        &'a self,
        certificate: Certificate,
    ) -> Pin<Box<dyn Future<Output = Result<bool, CertificateStoreError>> + Send + 'a>>;
}

#[derive(Debug, thiserror::Error)]
pub enum CertificateStoreError {
    #[error(transparent)]
    Cache(#[from] CacheError),
}
