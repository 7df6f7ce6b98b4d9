use std::{future::Future, pin::Pin, sync::Arc};

use crate::services::{
    authorizer::certificate::store::{
        Certificate, CertificateCachePolicy, CertificateStore, CertificateStoreError,
    },
    cache::{CacheClient, CacheError, ValkeyClient},
};

/// Valkey-backed certificate slot (Redis protocol).
///
/// Lets several authorizer processes share one fetched certificate. Expiry is
/// delegated to the backend (`SET NX EX`), pinned slots are written without TTL.
#[derive(Clone)]
pub struct ValkeyCertificateStore<C: CacheClient> {
    cache: Arc<C>,
    key: String,
    policy: CertificateCachePolicy,
}

impl ValkeyCertificateStore<ValkeyClient> {
    pub async fn new(redis_url: &str, policy: CertificateCachePolicy) -> Result<Self, CacheError> {
        let client = ValkeyClient::new(redis_url).await?;

        Ok(Self::new_with_cache(
            Arc::new(client),
            "authorizer:certificate",
            policy,
        ))
    }
}

impl<C: CacheClient> ValkeyCertificateStore<C> {
    pub fn new_with_cache(cache: Arc<C>, key: impl Into<String>, policy: CertificateCachePolicy) -> Self {
        Self {
            cache,
            key: key.into(),
            policy,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.cache.backend_name()
    }
}

impl<C: CacheClient> CertificateStore for ValkeyCertificateStore<C> {
    fn get<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Certificate>, CertificateStoreError>> + Send + 'a>>
    {
        Box::pin(async move {
            let pem = self.cache.get_string(&self.key).await?;
            Ok(pem.map(Certificate::from_pem))
        })
    }

    fn set_if_absent<'a>(
        &'a self,
        certificate: Certificate,
    ) -> Pin<Box<dyn Future<Output = Result<bool, CertificateStoreError>> + Send + 'a>> {
        Box::pin(async move {
            let stored = self
                .cache
                .set_if_absent(&self.key, certificate.as_pem(), self.policy.ttl())
                .await?;

            Ok(stored)
        })
    }
}
