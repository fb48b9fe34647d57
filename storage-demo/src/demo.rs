use std::path::PathBuf;
use std::time::Duration;

use object_storage::{public_url, ObjectStorage, ObjectStorageResult};
use tracing::info;

/// Local file uploaded twice
pub const LOCAL_FILE: &str = "local-file.txt";
/// Key of the private upload, later downloaded, presigned and deleted
pub const UPLOADED_KEY: &str = "uploaded-file.txt";
/// Key of the upload meant for anonymous reads
pub const PUBLIC_KEY: &str = "public/uploaded-file.txt";
/// Where the private upload is downloaded to
pub const DOWNLOADED_FILE: &str = "downloaded-file.txt";

/// Inputs of a demo run
#[derive(Debug, Clone)]
pub struct DemoSettings {
    /// Backend `host:port`, used to build the public URL
    pub endpoint: String,
    /// Bucket the storage client is bound to
    pub bucket: String,
    /// Lifetime of the presigned URL
    pub presigned_url_expiry: Duration,
    /// File to upload
    pub local_file: PathBuf,
    /// Download destination
    pub downloaded_file: PathBuf,
}

impl DemoSettings {
    /// Settings using the fixed file names, relative to the working directory
    #[must_use]
    pub fn new(endpoint: String, bucket: String, presigned_url_expiry: Duration) -> Self {
        Self {
            endpoint,
            bucket,
            presigned_url_expiry,
            local_file: PathBuf::from(LOCAL_FILE),
            downloaded_file: PathBuf::from(DOWNLOADED_FILE),
        }
    }
}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct DemoReport {
    /// Keys listed after both uploads
    pub listed_keys: Vec<String>,
    /// Bytes written by the download
    pub downloaded_bytes: u64,
    /// Signed GET URL for [`UPLOADED_KEY`]
    pub presigned_url: String,
    /// Unsigned URL for [`PUBLIC_KEY`]
    pub public_url: String,
}

/// Runs upload, upload, list, download, presign, public URL and delete in order.
///
/// Stops at the first failing step; earlier steps are not undone.
///
/// # Errors
///
/// Returns the error of the first storage operation that fails
pub async fn run(
    storage: &ObjectStorage,
    settings: &DemoSettings,
) -> ObjectStorageResult<DemoReport> {
    let local_file = settings.local_file.display();

    storage.upload_file(&settings.local_file, UPLOADED_KEY).await?;
    println!("File {local_file} uploaded as {UPLOADED_KEY}");

    storage.upload_file(&settings.local_file, PUBLIC_KEY).await?;
    println!("File {local_file} uploaded as {PUBLIC_KEY}");

    let objects = storage.list_objects().await?;
    for object in &objects {
        println!("{}", object.key);
    }
    let listed_keys = objects.into_iter().map(|object| object.key).collect();

    let downloaded_bytes = storage
        .download_file(UPLOADED_KEY, &settings.downloaded_file)
        .await?;
    println!(
        "File {UPLOADED_KEY} downloaded as {}",
        settings.downloaded_file.display()
    );

    let presigned = storage
        .presigned_get_url(UPLOADED_KEY, settings.presigned_url_expiry)
        .await?;
    println!("Presigned URL: {}", presigned.url);
    info!("Presigned URL expires at {}", presigned.expires_at);

    let public_url = public_url(&settings.endpoint, &settings.bucket, PUBLIC_KEY);
    println!("Public URL: {public_url}");

    storage.delete_object(UPLOADED_KEY).await?;
    println!("File {UPLOADED_KEY} deleted");

    Ok(DemoReport {
        listed_keys,
        downloaded_bytes,
        presigned_url: presigned.url,
        public_url,
    })
}
