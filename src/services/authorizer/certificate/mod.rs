pub mod memory;
pub mod store;
pub mod valkey;

pub use memory::MemoryCertificateStore;
pub use store::{Certificate, CertificateCachePolicy, CertificateStore, CertificateStoreError};
pub use valkey::ValkeyCertificateStore;
