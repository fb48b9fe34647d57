use anyhow::Context;
use object_storage::ObjectStorage;
use storage_demo::{
    demo::{self, DemoSettings},
    types::Environment,
};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Must run before Environment::from_env so APP_ENV can come from .env
    let dotenv = dotenvy::dotenv();

    let environment = Environment::from_env();

    // JSON logs for production, regular format for development
    if environment.json_logs() {
        fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        fmt().with_env_filter(EnvFilter::from_default_env()).init();
    }

    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found, using process environment"),
        Err(e) => return Err(e).context("Failed to load .env file"),
    }

    let storage_config = Environment::storage_config()?;
    let storage = ObjectStorage::connect(&storage_config).await;

    let settings = DemoSettings::new(
        storage_config.endpoint,
        storage_config.bucket,
        environment.presigned_url_expiry(),
    );

    if let Err(e) = demo::run(&storage, &settings).await {
        error!("Demo aborted: {e}");
        return Err(e.into());
    }

    info!("Demo finished");
    Ok(())
}
