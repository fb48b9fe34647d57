//! Error types for object storage operations

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Result type for object storage operations
pub type ObjectStorageResult<T> = Result<T, ObjectStorageError>;

/// Errors that can occur during object storage operations
#[derive(Error, Debug)]
pub enum ObjectStorageError {
    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// Object does not exist in the bucket
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// AWS SDK error (dispatch failure, timeout, malformed response)
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Upstream service error (5xx from the backend)
    #[error("Upstream service error: {0}")]
    UpstreamError(String),

    /// Local filesystem error
    #[error("I/O error on {path}: {source}")]
    IoError {
        /// Path of the local file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ObjectStorageError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}

impl<E> From<SdkError<E>> for ObjectStorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    fn from(error: SdkError<E>) -> Self {
        match error {
            SdkError::ServiceError(err) if err.raw().status().as_u16() >= 500 => {
                Self::UpstreamError(service_message(err.err()))
            }
            SdkError::ServiceError(err) => Self::S3Error(service_message(err.err())),
            other => Self::AwsError(DisplayErrorContext(other).to_string()),
        }
    }
}

fn service_message<E: ProvideErrorMetadata>(err: &E) -> String {
    format!(
        "{}: {}",
        err.code().unwrap_or("Unknown"),
        err.message().unwrap_or("no message")
    )
}
