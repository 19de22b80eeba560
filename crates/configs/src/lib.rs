//! # configs
//!
//! Layered configuration for the campus-admin binaries: built-in defaults,
//! an optional `config/campus-admin.toml`, then environment variables with
//! the `CAMPUS__` prefix (e.g. `CAMPUS__SERVER__PORT=8080`). Secrets stay
//! wrapped in [`secrecy::SecretString`] so they never hit debug output.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigsError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: SecretString,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct MediaConfig {
    /// Root directory for the local media store.
    pub root_dir: String,
    /// Base under which stored objects are publicly reachable.
    pub public_base_url: String,
}

/// How initial passwords are issued for admin-created accounts.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CredentialMode {
    Fixed,
    Random,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    pub credential_policy: CredentialMode,
    /// Starter password handed out in `fixed` mode.
    pub initial_password: SecretString,
    /// Token length used in `random` mode.
    pub random_token_length: usize,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Loads configuration from defaults, the optional file source, and
    /// the environment. A `.env` file is folded into the environment first
    /// when present.
    pub fn load() -> Result<Self, ConfigsError> {
        dotenvy::dotenv().ok();
        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "postgres://localhost/campus_admin")?
            .set_default("database.max_connections", 5)?
            .set_default("media.root_dir", "./data/uploads")?
            .set_default("media.public_base_url", "/static/uploads")?
            .set_default("auth.credential_policy", "fixed")?
            .set_default("auth.initial_password", "campus")?
            .set_default("auth.random_token_length", 24)?
            .add_source(File::with_name("config/campus-admin").required(false))
            .add_source(
                Environment::with_prefix("CAMPUS")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;
        debug!("configuration sources merged");
        Ok(config.try_deserialize()?)
    }
}
