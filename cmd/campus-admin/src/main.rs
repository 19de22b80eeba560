//! # Campus-Admin Binary
//!
//! The entry point that assembles the backend based on compile-time
//! features and serves the REST surface.

use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api_adapters::state::AppState;
use auth_adapters::SimpleIdentityProvider;
use configs::{AppConfig, CredentialMode};
use domains::traits::{CampusRepo, IdentityProvider, MediaStore};
use services::accounts::{AccountService, CredentialPolicy};
use services::bulletins::BulletinService;
use services::directory::DirectoryService;
use services::media::UploadService;

#[cfg(not(feature = "db-postgres"))]
use storage_adapters::memory::MemoryCampusRepo;
#[cfg(feature = "db-postgres")]
use storage_adapters::postgres::PgCampusRepo;

#[cfg(feature = "media-local")]
use storage_adapters::media::LocalMediaStore;
#[cfg(not(feature = "media-local"))]
use storage_adapters::media::MemoryMediaStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    // 1. Document store
    #[cfg(feature = "db-postgres")]
    let repo: Arc<dyn CampusRepo> = Arc::new(
        PgCampusRepo::connect(
            config.database.url.expose_secret(),
            config.database.max_connections,
        )
        .await
        .context("connecting to the document store")?,
    );
    #[cfg(not(feature = "db-postgres"))]
    let repo: Arc<dyn CampusRepo> = Arc::new(MemoryCampusRepo::new());

    // 2. Object store
    #[cfg(feature = "media-local")]
    let media: Arc<dyn MediaStore> = Arc::new(LocalMediaStore::new(
        config.media.root_dir.clone().into(),
        config.media.public_base_url.clone(),
    ));
    #[cfg(not(feature = "media-local"))]
    let media: Arc<dyn MediaStore> = Arc::new(MemoryMediaStore::new(
        config.media.public_base_url.clone(),
    ));

    // 3. Auth service
    let identities: Arc<dyn IdentityProvider> = Arc::new(SimpleIdentityProvider::new());

    let credentials = match config.auth.credential_policy {
        CredentialMode::Fixed => {
            CredentialPolicy::Fixed(config.auth.initial_password.expose_secret().to_string())
        }
        CredentialMode::Random => CredentialPolicy::RandomToken {
            length: config.auth.random_token_length,
        },
    };

    // 4. Wire the workflow layer and the router.
    let state = AppState {
        directory: DirectoryService::new(Arc::clone(&repo)),
        accounts: AccountService::new(Arc::clone(&repo), identities, credentials),
        bulletins: BulletinService::new(repo),
        uploads: UploadService::new(media),
    };
    let app = api_adapters::router(state);

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(%address, "campus-admin listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
