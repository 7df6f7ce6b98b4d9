use std::{future::Future, pin::Pin, time::Instant};

use tokio::sync::RwLock;

use crate::services::authorizer::certificate::store::{
    Certificate, CertificateCachePolicy, CertificateStore, CertificateStoreError,
};

#[derive(Debug)]
struct Slot {
    certificate: Certificate,
    stored_at: Instant,
}

/// In-process certificate slot.
///
/// The write lock makes `set_if_absent` atomic, so concurrent first requests
/// cannot tear the slot; the first writer wins.
#[derive(Debug, Default)]
pub struct MemoryCertificateStore {
    slot: RwLock<Option<Slot>>,
    policy: CertificateCachePolicy,
}

impl MemoryCertificateStore {
    pub fn new(policy: CertificateCachePolicy) -> Self {
        Self {
            slot: RwLock::new(None),
            policy,
        }
    }

    fn is_fresh(&self, slot: &Slot) -> bool {
        match self.policy.ttl() {
            None => true,
            Some(ttl) => slot.stored_at.elapsed() < ttl,
        }
    }
}

impl CertificateStore for MemoryCertificateStore {
    fn get<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Certificate>, CertificateStoreError>> + Send + 'a>>
    {
        Box::pin(async move {
            let slot = self.slot.read().await;

            Ok(slot
                .as_ref()
                .filter(|s| self.is_fresh(s))
                .map(|s| s.certificate.clone()))
        })
    }

    fn set_if_absent<'a>(
        &'a self,
        certificate: Certificate,
    ) -> Pin<Box<dyn Future<Output = Result<bool, CertificateStoreError>> + Send + 'a>> {
        Box::pin(async move {
            let mut slot = self.slot.write().await;

            if slot.as_ref().is_some_and(|s| self.is_fresh(s)) {
                return Ok(false);
            }

            *slot = Some(Slot {
                certificate,
                stored_at: Instant::now(),
            });

            Ok(true)
        })
    }
}
