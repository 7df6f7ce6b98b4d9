//! Todo attachment storage on S3.
//!
//! - Upload URLs are SigV4 query-string presigned `PUT` URLs from `object_store`,
//!   so the client uploads straight to the bucket.
//! - Credentials and region come from the standard AWS environment
//!   (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`, `AWS_REGION`).
//! - The object key is the todo id; the stored `attachmentUrl` is the public
//!   object URL.

use std::time::Duration;

use axum::http::Method;
use object_store::{
    aws::{AmazonS3, AmazonS3Builder},
    path::Path,
    signer::Signer,
};
use thiserror::Error;
use tracing::info;

// SigV4 presigned URLs are valid for at most 7 days
const MAX_EXPIRATION_SECONDS: u64 = 604_800;

#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub url_expiration_seconds: u64,
}

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("invalid upload url expiration: {0} seconds")]
    InvalidExpiration(u64),
    #[error("s3 client configuration failed: {0}")]
    Client(#[source] object_store::Error),
    #[error("signing failed: {0}")]
    Signing(#[source] object_store::Error),
}

#[derive(Debug)]
pub struct S3Attachments {
    store: AmazonS3,
    bucket: String,
    url_expiration_seconds: u64,
}

impl S3Attachments {
    /// S3 client configured from the AWS environment variables.
    pub fn from_env(settings: S3Settings) -> Result<Self, AttachmentError> {
        Self::with_builder(AmazonS3Builder::from_env(), settings)
    }

    /// S3 client from an explicit builder; bucket and virtual-hosted addressing are applied here.
    pub fn with_builder(
        builder: AmazonS3Builder,
        settings: S3Settings,
    ) -> Result<Self, AttachmentError> {
        let store = builder
            .with_bucket_name(&settings.bucket)
            .with_virtual_hosted_style_request(true)
            .with_allow_http(false)
            .build()
            .map_err(AttachmentError::Client)?;

        Ok(Self {
            store,
            bucket: settings.bucket,
            url_expiration_seconds: settings.url_expiration_seconds,
        })
    }

    pub fn url_expiration_seconds(&self) -> u64 {
        self.url_expiration_seconds
    }

    /// Presigned PUT URL for `object_id`, valid for `expires_in` seconds.
    pub async fn issue_upload_url(
        &self,
        object_id: &str,
        expires_in: u64,
    ) -> Result<String, AttachmentError> {
        if expires_in == 0 || expires_in > MAX_EXPIRATION_SECONDS {
            return Err(AttachmentError::InvalidExpiration(expires_in));
        }

        info!(object_id = %object_id, expires_in, "generating upload URL");

        let url = self
            .store
            .signed_url(
                Method::PUT,
                &Path::from(object_id),
                Duration::from_secs(expires_in),
            )
            .await
            .map_err(AttachmentError::Signing)?;

        Ok(url.into())
    }

    pub fn public_url(&self, object_id: &str) -> String {
        format!(
            "https://{}.s3.amazonaws.com/{}",
            self.bucket,
            Path::from(object_id)
        )
    }
}
