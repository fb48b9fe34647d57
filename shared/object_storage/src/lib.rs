//! S3-compatible object storage for the storage demo
//!
//! Wraps a single `aws_sdk_s3::Client` bound to one bucket. Works against
//! MinIO, LocalStack and AWS S3 (path-style addressing is always enabled).

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

mod client;
mod config;
mod error;

use chrono::{DateTime, Utc};

pub use client::ObjectStorage;
pub use config::StorageConfig;
pub use error::{ObjectStorageError, ObjectStorageResult};

/// Presigned URL with expiration information
#[derive(Debug, Clone)]
pub struct PresignedUrl {
    /// The presigned URL for GET operations
    pub url: String,
    /// UTC timestamp when the URL expires
    pub expires_at: DateTime<Utc>,
}

/// A single entry of a bucket listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Object key
    pub key: String,
    /// Object size in bytes
    pub size: u64,
    /// Last modification time, if reported by the backend
    pub last_modified: Option<DateTime<Utc>>,
    /// Entity tag, if reported by the backend
    pub e_tag: Option<String>,
}

/// Builds the unsigned URL of an object on a plain-HTTP endpoint.
///
/// No request is made; the URL only resolves if the bucket or object allows
/// anonymous reads.
#[must_use]
pub fn public_url(endpoint: &str, bucket: &str, key: &str) -> String {
    format!("http://{endpoint}/{bucket}/{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url() {
        assert_eq!(
            public_url("localhost:9000", "my-bucket", "public/file.txt"),
            "http://localhost:9000/my-bucket/public/file.txt"
        );
    }

    #[test]
    fn test_public_url_keeps_inputs_verbatim() {
        // No normalization or escaping is applied
        assert_eq!(
            public_url("10.0.0.5:9000", "media", "a b/c.txt"),
            "http://10.0.0.5:9000/media/a b/c.txt"
        );
        assert_eq!(public_url("", "", ""), "http:///");
    }
}
