//! Environment configuration for the demo run

use std::env;
use std::time::Duration;

use anyhow::Context;
use object_storage::StorageConfig;

/// Presigned URLs stay valid for a day unless overridden
const DEFAULT_PRESIGNED_URL_EXPIRY_SECS: u64 = 24 * 60 * 60;

/// Application environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment (JSON logs)
    Production,
    /// Development environment (human-readable logs)
    Development {
        /// Optional override for presigned URL expiry in seconds
        presign_expiry_override: Option<u64>,
    },
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "development" => {
                let presign_expiry_override = env::var("PRESIGNED_URL_EXPIRY_SECS")
                    .ok()
                    .and_then(|val| val.trim().parse::<u64>().ok());

                Self::Development {
                    presign_expiry_override,
                }
            }
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Whether logs should be emitted as JSON
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Reads the backend connection settings from `MINIO_*` variables
    ///
    /// # Errors
    ///
    /// Returns an error naming the first required variable that is unset or empty
    pub fn storage_config() -> anyhow::Result<StorageConfig> {
        Ok(StorageConfig {
            endpoint: required_var("MINIO_ENDPOINT")?,
            access_key: required_var("MINIO_ACCESS_KEY")?,
            secret_key: required_var("MINIO_SECRET_KEY")?,
            bucket: required_var("MINIO_BUCKET_NAME")?,
            region: env::var("MINIO_REGION")
                .ok()
                .filter(|region| !region.trim().is_empty())
                .unwrap_or_else(|| StorageConfig::DEFAULT_REGION.to_string()),
        })
    }

    /// Presigned URL lifetime
    #[must_use]
    pub const fn presigned_url_expiry(&self) -> Duration {
        match self {
            Self::Production => Duration::from_secs(DEFAULT_PRESIGNED_URL_EXPIRY_SECS),
            Self::Development {
                presign_expiry_override,
            } => {
                // Use override if provided, otherwise the default of one day
                match presign_expiry_override {
                    Some(secs) => Duration::from_secs(*secs),
                    None => Duration::from_secs(DEFAULT_PRESIGNED_URL_EXPIRY_SECS),
                }
            }
        }
    }
}

fn required_var(name: &str) -> anyhow::Result<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("{name} environment variable is not set"))
}
