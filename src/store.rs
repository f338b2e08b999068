use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{ArchiveError, Result};
use crate::quote::storage_key;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A single write to the bucket: the serialized quote plus its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageObject {
    pub bucket: String,
    pub key: String,
    pub body: String,
    pub content_type: String,
    pub acl: ObjectCannedAcl,
}

impl StorageObject {
    /// Keys the quote by its own `time.updated` and serializes it as-is.
    pub fn from_quote(bucket: &str, quote: &Value) -> Result<Self> {
        let key = storage_key(quote)?;
        let body = serde_json::to_string(quote)?;
        Ok(StorageObject {
            bucket: bucket.to_string(),
            key,
            body,
            content_type: JSON_CONTENT_TYPE.to_string(),
            acl: ObjectCannedAcl::PublicRead,
        })
    }
}

#[async_trait]
pub trait ObjectStore {
    async fn put_object(&self, object: &StorageObject) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        S3ObjectStore { client }
    }

    /// Uses the ambient credential chain (Lambda role, env, profile).
    pub async fn from_env() -> Self {
        let shared_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        S3ObjectStore::new(Client::new(&shared_config))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, object: &StorageObject) -> Result<()> {
        debug!(bucket = %object.bucket, key = %object.key, "putting object");
        self.client
            .put_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .body(ByteStream::from(object.body.clone().into_bytes()))
            .content_type(&object.content_type)
            .acl(object.acl.clone())
            .send()
            .await
            .map_err(|e| {
                let reason = DisplayErrorContext(&e).to_string();
                error!(bucket = %object.bucket, key = %object.key, %reason, "put_object failed");
                ArchiveError::Storage {
                    bucket: object.bucket.clone(),
                    key: object.key.clone(),
                    reason,
                }
            })?;
        Ok(())
    }
}
