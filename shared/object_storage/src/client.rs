//! S3 client bound to a single bucket

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::{
    error::SdkError, operation::head_object::HeadObjectError, presigning::PresigningConfig,
    primitives::ByteStream, Client as S3Client,
};
use chrono::{DateTime, Utc};
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{debug, info};

use crate::{ObjectStorageError, ObjectStorageResult, ObjectSummary, PresignedUrl, StorageConfig};

/// Object storage client for a single bucket
pub struct ObjectStorage {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    list_page_size: Option<i32>,
}

impl ObjectStorage {
    /// Creates a new object storage client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - Bucket every operation is issued against
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String) -> Self {
        Self {
            s3_client,
            bucket_name,
            list_page_size: None,
        }
    }

    /// Caps the number of keys requested per `ListObjectsV2` page.
    ///
    /// Without a cap the backend's default applies (1000 for S3).
    #[must_use]
    pub fn with_list_page_size(mut self, page_size: i32) -> Self {
        self.list_page_size = Some(page_size);
        self
    }

    /// Builds the S3 client from `config` and binds it to `config.bucket`
    pub async fn connect(config: &StorageConfig) -> Self {
        let s3_client = Arc::new(S3Client::from_conf(config.s3_client_config().await));

        info!(
            "Initialized S3 client for bucket {} at {}",
            config.bucket,
            config.endpoint_url()
        );

        Self::new(s3_client, config.bucket.clone())
    }

    /// Name of the bucket this client operates on
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Uploads a local file under `key`
    ///
    /// # Errors
    ///
    /// Returns `ObjectStorageError::IoError` if the local file can't be read
    /// Returns `ObjectStorageError::S3Error` for S3 service errors
    pub async fn upload_file(
        &self,
        local_path: impl AsRef<Path>,
        key: &str,
    ) -> ObjectStorageResult<()> {
        let local_path = local_path.as_ref();
        let path_str = local_path.display().to_string();
        debug!("Uploading {} to {}", path_str, key);

        // Surface the real io::ErrorKind; ByteStream wraps it opaquely
        tokio::fs::metadata(local_path)
            .await
            .map_err(|e| ObjectStorageError::io(&path_str, e))?;

        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| ObjectStorageError::io(&path_str, std::io::Error::other(e)))?;

        self.s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .body(body)
            .send()
            .await?;

        Ok(())
    }

    /// Lists every object in the bucket, following continuation tokens
    ///
    /// # Errors
    ///
    /// Returns `ObjectStorageError::S3Error` for S3 service errors
    /// Returns `ObjectStorageError::UpstreamError` for 5xx errors
    pub async fn list_objects(&self) -> ObjectStorageResult<Vec<ObjectSummary>> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let response = self
                .s3_client
                .list_objects_v2()
                .bucket(&self.bucket_name)
                .set_max_keys(self.list_page_size)
                .set_continuation_token(continuation_token.take())
                .send()
                .await?;

            objects.extend(response.contents().iter().map(|object| ObjectSummary {
                key: object.key().unwrap_or_default().to_string(),
                size: object
                    .size()
                    .and_then(|size| u64::try_from(size).ok())
                    .unwrap_or(0),
                last_modified: object.last_modified().and_then(|dt| {
                    DateTime::<Utc>::from_timestamp(dt.secs(), dt.subsec_nanos())
                }),
                e_tag: object.e_tag().map(ToString::to_string),
            }));

            match response.next_continuation_token() {
                Some(token) if response.is_truncated() == Some(true) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!("Listed {} objects in {}", objects.len(), self.bucket_name);
        Ok(objects)
    }

    /// Downloads the object at `key` into `local_path`
    ///
    /// Parent directories are created as needed and an existing file is
    /// truncated. Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `ObjectStorageError::ObjectNotFound` if `key` does not exist
    /// Returns `ObjectStorageError::IoError` if the local file can't be written
    pub async fn download_file(
        &self,
        key: &str,
        local_path: impl AsRef<Path>,
    ) -> ObjectStorageResult<u64> {
        let local_path = local_path.as_ref();
        let path_str = local_path.display().to_string();
        debug!("Downloading {} to {}", key, path_str);

        let response = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|e| match e {
                SdkError::ServiceError(ref service_err) if service_err.err().is_no_such_key() => {
                    ObjectStorageError::ObjectNotFound(key.to_string())
                }
                e => ObjectStorageError::from(e),
            })?;

        if let Some(parent) = local_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ObjectStorageError::io(parent.display().to_string(), e))?;
        }

        let mut file = File::create(local_path)
            .await
            .map_err(|e| ObjectStorageError::io(&path_str, e))?;

        let mut body = response.body;
        let mut written: u64 = 0;
        while let Some(chunk) = body.try_next().await.map_err(|e| {
            ObjectStorageError::AwsError(format!("Failed to read object body: {e}"))
        })? {
            file.write_all(&chunk)
                .await
                .map_err(|e| ObjectStorageError::io(&path_str, e))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| ObjectStorageError::io(&path_str, e))?;

        Ok(written)
    }

    /// Generates a presigned URL for GET operations
    ///
    /// Signing happens locally; the object is not checked for existence.
    ///
    /// # Errors
    ///
    /// Returns `ObjectStorageError::ConfigError` if `expires_in` exceeds one week
    /// Returns `ObjectStorageError::S3Error` if presigned URL generation fails
    pub async fn presigned_get_url(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> ObjectStorageResult<PresignedUrl> {
        let presigned_config = PresigningConfig::expires_in(expires_in).map_err(|e| {
            ObjectStorageError::ConfigError(format!("Failed to create presigning config: {e}"))
        })?;

        let presigned_request = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .presigned(presigned_config)
            .await
            .map_err(|e| {
                ObjectStorageError::S3Error(format!("Failed to generate presigned URL: {e}"))
            })?;

        let expires_at: DateTime<Utc> = Utc::now() + expires_in;

        debug!(
            "Generated presigned URL for object: {} expires at: {}",
            key, expires_at
        );

        Ok(PresignedUrl {
            url: presigned_request.uri().to_string(),
            expires_at,
        })
    }

    /// Checks if an object exists in the bucket
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if object exists
    /// * `Ok(false)` if object does not exist
    /// * `Err(ObjectStorageError)` if S3 operation fails
    ///
    /// # Errors
    ///
    /// Returns `ObjectStorageError::S3Error` for S3 service errors
    /// Returns `ObjectStorageError::UpstreamError` for 5xx errors
    pub async fn object_exists(&self, key: &str) -> ObjectStorageResult<bool> {
        let result = self
            .s3_client
            .head_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(service_err))
                if matches!(service_err.err(), HeadObjectError::NotFound(_)) =>
            {
                Ok(false)
            }
            Err(e) => Err(ObjectStorageError::from(e)),
        }
    }

    /// Deletes the object at `key`
    ///
    /// S3 treats deleting a missing key as success, so existence is checked
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `ObjectStorageError::ObjectNotFound` if `key` does not exist
    /// Returns `ObjectStorageError::S3Error` for S3 service errors
    pub async fn delete_object(&self, key: &str) -> ObjectStorageResult<()> {
        if !self.object_exists(key).await? {
            return Err(ObjectStorageError::ObjectNotFound(key.to_string()));
        }

        self.s3_client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await?;

        debug!("Deleted object {} from {}", key, self.bucket_name);
        Ok(())
    }
}
