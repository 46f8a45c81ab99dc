use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;

use crate::store::{BlobStore, StoreError};

/// S3-backed blob store, pointed at MinIO locally or AWS in production.
/// URLs are static path-style links under the configured endpoint, which
/// both backends serve for public-read buckets.
#[derive(Clone)]
pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
    endpoint: String,
}

impl S3BlobStore {
    pub fn new(client: S3Client, bucket: String, endpoint: String) -> Self {
        Self {
            client,
            bucket,
            endpoint,
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put_blob(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StoreError::Blob(format!("S3 upload failed: {e}")))?;
        Ok(())
    }

    async fn get_blob(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                if err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false)
                {
                    return Ok(None);
                }
                return Err(StoreError::Blob(format!("S3 download failed: {err}")));
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Blob(format!("S3 body read failed: {e}")))?;
        Ok(Some(data.into_bytes()))
    }

    async fn delete_blob(&self, key: &str) -> Result<(), StoreError> {
        // S3 DeleteObject on a missing key succeeds, which matches the
        // trait contract.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::Blob(format!("S3 delete failed: {e}")))?;
        Ok(())
    }

    fn blob_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.bucket,
            key
        )
    }
}
