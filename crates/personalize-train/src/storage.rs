//! Training data upload

use crate::error::{Result, TrainError};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::{primitives::ByteStream, Client};
use tracing::{debug, info, instrument};

/// Where an upload landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub key: String,
    /// `s3://bucket/key`, the form Personalize import jobs expect
    pub location: String,
    pub checksum: String,
    pub size: i64,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn bucket(&self) -> &str;

    async fn upload(&self, key: &str, data: Vec<u8>, content_type: Option<&str>)
        -> Result<UploadResult>;
}

pub fn s3_location(bucket: &str, key: &str) -> String {
    format!("s3://{}/{}", bucket, key)
}

pub(crate) fn calculate_sha256(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// S3 bucket created by the stage's stack
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// `path_style` is needed for S3-compatible endpoints such as LocalStack
    pub fn new(sdk_config: &SdkConfig, bucket: impl Into<String>, path_style: bool) -> Self {
        let config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(path_style)
            .build();
        let bucket = bucket.into();

        info!(bucket = %bucket, path_style, "Storage client initialized");

        Self {
            client: Client::from_conf(config),
            bucket,
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    #[instrument(skip(self, data))]
    async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<UploadResult> {
        let checksum = calculate_sha256(&data);
        let size = data.len() as i64;

        debug!("Uploading {} bytes to s3://{}/{}", size, self.bucket, key);

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request
            .send()
            .await
            .map_err(|e| TrainError::aws("PutObject", e))?;

        let location = s3_location(&self.bucket, key);
        info!(location = %location, size, "Uploaded training data");

        Ok(UploadResult {
            key: key.to_string(),
            location,
            checksum,
            size,
        })
    }
}
