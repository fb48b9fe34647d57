//! Connection settings for the object storage backend

use std::fmt;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_millis(50);
const OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoint, credentials and bucket of an S3-compatible backend
#[derive(Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Backend address as `host:port`, or a full URL
    pub endpoint: String,
    /// Access key ID
    pub access_key: String,
    /// Secret access key
    pub secret_key: String,
    /// Bucket used for every operation
    pub bucket: String,
    /// Signing region
    pub region: String,
}

impl StorageConfig {
    /// Region MinIO signs with unless configured otherwise
    pub const DEFAULT_REGION: &'static str = "us-east-1";

    /// URL the SDK sends requests to.
    ///
    /// A bare `host:port` is reached over plain HTTP.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.contains("://") {
            self.endpoint.clone()
        } else {
            format!("http://{}", self.endpoint)
        }
    }

    /// AWS configuration with static credentials, retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let credentials = Credentials::new(
            self.access_key.clone(),
            self.secret_key.clone(),
            None,
            None,
            "storage-config",
        );

        let retry_config = RetryConfig::standard()
            .with_max_attempts(MAX_ATTEMPTS)
            .with_initial_backoff(INITIAL_BACKOFF);

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(OPERATION_TIMEOUT)
            .build();

        aws_config::defaults(BehaviorVersion::latest())
            .endpoint_url(self.endpoint_url())
            .region(Region::new(self.region.clone()))
            .credentials_provider(credentials)
            .retry_config(retry_config)
            .timeout_config(timeout_config)
            .load()
            .await
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();

        // MinIO and LocalStack don't resolve virtual-hosted bucket names
        s3_config.to_builder().force_path_style(true).build()
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .finish()
    }
}
