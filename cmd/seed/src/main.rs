//! # Seed
//!
//! Creates a starter college and programme set so a fresh deployment has
//! directory data to point accounts at. Safe to re-run: every run inserts
//! fresh documents, it never mutates existing ones.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use configs::AppConfig;
use domains::models::{CollegeDraft, ProgrammeDraft};
use domains::traits::CampusRepo;
use services::directory::DirectoryService;

#[cfg(not(feature = "db-postgres"))]
use storage_adapters::memory::MemoryCampusRepo;
#[cfg(feature = "db-postgres")]
use storage_adapters::postgres::PgCampusRepo;

const PROGRAMMES: &[(&str, &str, u32)] = &[
    ("CS", "Computer Science", 4),
    ("SE", "Software Engineering", 4),
    ("IT", "Information Technology", 3),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    #[cfg(feature = "db-postgres")]
    let repo: Arc<dyn CampusRepo> = {
        use secrecy::ExposeSecret;
        Arc::new(
            PgCampusRepo::connect(
                config.database.url.expose_secret(),
                config.database.max_connections,
            )
            .await
            .context("connecting to the document store")?,
        )
    };
    #[cfg(not(feature = "db-postgres"))]
    let repo: Arc<dyn CampusRepo> = Arc::new(MemoryCampusRepo::new());

    let directory = DirectoryService::new(repo);

    let college_id = directory
        .create_college(CollegeDraft {
            name: "College of Computing".to_string(),
            abbrv: "COC".to_string(),
        })
        .await
        .context("creating the starter college")?;
    info!(%college_id, "college created");

    for (abbrv, name, years) in PROGRAMMES {
        let programme_id = directory
            .create_programme(
                &college_id,
                ProgrammeDraft {
                    abbrv: (*abbrv).to_string(),
                    name: (*name).to_string(),
                    years: *years,
                    duration: Some(format!("{years} years")),
                    description: None,
                },
            )
            .await
            .with_context(|| format!("creating programme {name}"))?;
        info!(%programme_id, name, "programme created");
    }

    info!("seed complete");
    Ok(())
}
