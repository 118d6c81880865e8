//! Core service façade and bootstrap helpers.
//!
//! This crate wires the catalog database and the song information service
//! into a [`SongCatalog`]. Hosts either assemble [`CoreDependencies`]
//! themselves or call [`bootstrap`] with a [`CoreConfig`]; desktop hosts
//! typically enable the `desktop-shims` feature so the reqwest-backed HTTP
//! client from `bridge-desktop` is injected automatically.
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::from_env()?;
//! core_runtime::logging::init_logging(config.logging.clone())?;
//! let catalog = core_service::bootstrap(&config).await?;
//! let songs = catalog.list_songs(&Default::default()).await?;
//! ```

pub mod catalog;
pub mod error;

pub use catalog::{parse_song_id, SongCatalog};
pub use error::{CoreError, ErrorKind, Result};

pub use core_runtime::config::CoreConfig;

use async_trait::async_trait;
use core_library::db::{create_pool, DatabaseConfig};
use core_library::repositories::SqliteSongRepository;
use core_library::seed::seed_demo_catalog;
use core_metadata::{HttpSongMetadataProvider, MetadataError, SongDetails, SongMetadataProvider};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, warn};

/// Aggregated handle to everything the catalog requires.
pub struct CoreDependencies {
    pub pool: SqlitePool,
    pub metadata: Arc<dyn SongMetadataProvider>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit handles.
    pub fn new(pool: SqlitePool, metadata: Arc<dyn SongMetadataProvider>) -> Self {
        Self { pool, metadata }
    }

    /// Open the database and build the enrichment client described by `config`.
    pub async fn from_config(config: &CoreConfig) -> Result<Self> {
        let pool = create_pool(database_config(config))
            .await
            .map_err(|e| CoreError::InitializationFailed(format!("database: {}", e)))?;

        Ok(Self::new(pool, metadata_provider(config)))
    }
}

/// Build a ready-to-use catalog from configuration.
///
/// Opens (and migrates) the database, wires the enrichment client, and seeds
/// the demo catalog when `seed_demo_data` is set.
pub async fn bootstrap(config: &CoreConfig) -> Result<SongCatalog> {
    let deps = CoreDependencies::from_config(config).await?;

    if config.seed_demo_data {
        let repository = SqliteSongRepository::new(deps.pool.clone());
        let inserted = seed_demo_catalog(&repository).await?;
        info!(inserted, "Demo catalog seeding finished");
    }

    info!(database_url = %config.database_url, "Song catalog ready");
    Ok(SongCatalog::from_pool(deps.pool, deps.metadata))
}

fn database_config(config: &CoreConfig) -> DatabaseConfig {
    if config.database_url.contains(":memory:") {
        return DatabaseConfig::in_memory();
    }

    DatabaseConfig::from_url(config.database_url.clone()).max_connections(config.max_connections)
}

fn metadata_provider(config: &CoreConfig) -> Arc<dyn SongMetadataProvider> {
    match (&config.metadata_api.base_url, &config.http_client) {
        (Some(url), Some(http_client)) => Arc::new(
            HttpSongMetadataProvider::new(Arc::clone(http_client), url.clone())
                .with_timeout(config.metadata_api.timeout),
        ),
        _ => {
            warn!("No metadata API configured, song creation will fail");
            Arc::new(UnconfiguredMetadataProvider)
        }
    }
}

/// Stand-in used when no song information service is configured.
struct UnconfiguredMetadataProvider;

#[async_trait]
impl SongMetadataProvider for UnconfiguredMetadataProvider {
    async fn lookup(&self, _artist: &str, _title: &str) -> core_metadata::Result<SongDetails> {
        Err(MetadataError::NotConfigured(
            "set EXTERNAL_API_URL to enable song creation".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_library::models::NewSong;
    use core_library::query::SongQuery;

    fn memory_config() -> CoreConfig {
        CoreConfig::builder()
            .database_url("sqlite::memory:")
            .build()
            .unwrap()
    }

    #[test]
    fn test_database_config_from_core_config() {
        let config = CoreConfig::builder()
            .database_url("sqlite:catalog.db")
            .max_connections(3)
            .build()
            .unwrap();

        let db = database_config(&config);
        assert_eq!(db.database_url, "sqlite:catalog.db");
        assert_eq!(db.max_connections, 3);

        assert_eq!(database_config(&memory_config()), DatabaseConfig::in_memory());
    }

    #[tokio::test]
    async fn test_bootstrap_without_metadata_api() {
        let catalog = bootstrap(&memory_config()).await.unwrap();

        assert!(catalog.list_songs(&SongQuery::new()).await.unwrap().is_empty());

        let err = catalog.create_song(NewSong::new("Adele", "Hello")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EnrichmentFailure);
    }

    #[tokio::test]
    async fn test_bootstrap_seeds_demo_catalog() {
        let config = CoreConfig::builder()
            .database_url("sqlite::memory:")
            .seed_demo_data(true)
            .build()
            .unwrap();

        let catalog = bootstrap(&config).await.unwrap();
        let page = catalog.list_songs_page(&SongQuery::new()).await.unwrap();

        assert_eq!(page.total, 6);
        assert_eq!(page.items[0].title, "Satisfaction");
    }
}
