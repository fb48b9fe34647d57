// Not every helper is used in every test
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use object_storage::{ObjectStorage, StorageConfig};
use rand::RngCore;
use tempfile::TempDir;
use uuid::Uuid;

/// Test configuration for LocalStack
pub const LOCALSTACK_ENDPOINT: &str = "localhost:4566";
pub const TEST_REGION: &str = "us-east-1";

/// Test context with a fresh bucket and a scratch directory
pub struct TestContext {
    pub storage: ObjectStorage,
    pub config: StorageConfig,
    pub s3_client: Arc<S3Client>,
    pub scratch: TempDir,
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let client = self.s3_client.clone();
        let bucket = self.config.bucket.clone();

        // Buckets must be emptied before they can be deleted
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Ok(listing) = client.list_objects_v2().bucket(&bucket).send().await {
                    for object in listing.contents() {
                        if let Some(key) = object.key() {
                            let _ = client.delete_object().bucket(&bucket).key(key).send().await;
                        }
                    }
                }
                let _ = client.delete_bucket().bucket(&bucket).send().await;
            });
        }
    }
}

/// Static `test`/`test` credentials LocalStack accepts
pub fn localstack_config(bucket: &str) -> StorageConfig {
    StorageConfig {
        endpoint: LOCALSTACK_ENDPOINT.to_string(),
        access_key: "test".to_string(),
        secret_key: "test".to_string(),
        bucket: bucket.to_string(),
        region: TEST_REGION.to_string(),
    }
}

/// Creates a test setup with a unique bucket
pub async fn setup_test() -> TestContext {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();

    let bucket = format!("test-objects-{}", Uuid::new_v4());
    let config = localstack_config(&bucket);

    let s3_client = Arc::new(S3Client::from_conf(config.s3_client_config().await));
    s3_client
        .create_bucket()
        .bucket(&bucket)
        .send()
        .await
        .expect("Failed to create test bucket");

    let storage = ObjectStorage::new(s3_client.clone(), bucket);

    TestContext {
        storage,
        config,
        s3_client,
        scratch: tempfile::tempdir().expect("Failed to create scratch dir"),
    }
}

impl TestContext {
    /// Writes `size` random bytes to a file in the scratch directory
    pub fn write_local_file(&self, name: &str, size: usize) -> (PathBuf, Vec<u8>) {
        let mut data = vec![0u8; size];
        rand::rngs::OsRng.fill_bytes(&mut data);

        let path = self.scratch.path().join(name);
        std::fs::write(&path, &data).expect("Failed to write local file");
        (path, data)
    }

    /// Keys currently in the bucket, sorted
    pub async fn listed_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .storage
            .list_objects()
            .await
            .expect("Failed to list objects")
            .into_iter()
            .map(|object| object.key)
            .collect();
        keys.sort();
        keys
    }
}
