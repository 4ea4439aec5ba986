//! S3 object store adapter

use async_trait::async_trait;
use aws_sdk_s3::{
    error::{DisplayErrorContext, ProvideErrorMetadata},
    primitives::ByteStream,
    Client,
};
use bytes::Bytes;
use tracing::{debug, error, info};

use super::{ObjectStore, StoreError, StoreResult};
use crate::models::Page;
use crate::settings::ObjectStoreConfig;

/// Error code S3 returns for a continuation token it cannot parse
const INVALID_ARGUMENT: &str = "InvalidArgument";

/// Object store backed by a single S3 bucket.
///
/// The client is built once at startup from ambient AWS credentials; each
/// trait call issues exactly one request.
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Build a client from the shared SDK config, applying endpoint overrides
    /// for S3-compatible services such as MinIO.
    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig, config: &ObjectStoreConfig) -> Self {
        let mut builder = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(config.force_path_style);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        info!("Initializing S3 client for bucket: {}", config.bucket);
        Self::new(Client::from_conf(builder.build()), config.bucket.clone())
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<String>,
    ) -> StoreResult<()> {
        debug!("Uploading object to S3: {} ({} bytes)", key, body.len());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .set_content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!("S3 upload failed for s3://{}/{}: {}", self.bucket, key, DisplayErrorContext(&e));
                StoreError::ObjectStore(format!("failed to upload {}: {}", key, e))
            })?;

        Ok(())
    }

    async fn list_objects(&self, page_token: Option<String>) -> StoreResult<Page<String>> {
        debug!("Listing objects in bucket: {}", self.bucket);
        let continued = page_token.is_some();

        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .set_continuation_token(page_token)
            .send()
            .await
            .map_err(|e| {
                let rejected_token = continued
                    && e.as_service_error().and_then(|se| se.code()) == Some(INVALID_ARGUMENT);
                if rejected_token {
                    return StoreError::InvalidPageToken("continuation token rejected by S3".to_string());
                }

                error!("S3 listing failed for bucket {}: {}", self.bucket, DisplayErrorContext(&e));
                StoreError::ObjectStore(format!("failed to list bucket {}: {}", self.bucket, e))
            })?;

        let keys: Vec<String> = output
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect();

        Ok(Page::new(
            keys,
            output.next_continuation_token().map(str::to_string),
        ))
    }
}
