//! Artist repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::{Artist, ArtistId};
use async_trait::async_trait;
use sqlx::{query, query_as, SqlitePool};
use tracing::{debug, info, warn};

/// Artist repository interface for data access operations
#[async_trait]
pub trait ArtistRepository: Send + Sync {
    /// Find an artist by its ID
    ///
    /// # Returns
    /// - `Ok(Some(artist))` if found
    /// - `Ok(None)` if not found
    /// - `Err` if database error occurs
    async fn find_by_id(&self, id: ArtistId) -> Result<Option<Artist>>;

    /// Find artist by exact name
    async fn find_by_name(&self, name: &str) -> Result<Option<Artist>>;

    /// Get-or-create: return the id of the artist with this exact name,
    /// inserting a new artist first if none exists.
    ///
    /// Two concurrent calls for the same unseen name converge on one row;
    /// the loser of the insert race re-reads the winner's id.
    ///
    /// # Errors
    /// Any storage failure on lookup or insert.
    async fn resolve_artist(&self, name: &str) -> Result<ArtistId>;

    /// Count total artists
    async fn count(&self) -> Result<i64>;
}

/// SQLite implementation of ArtistRepository
#[derive(Clone)]
pub struct SqliteArtistRepository {
    pool: SqlitePool,
}

impl SqliteArtistRepository {
    /// Create a new SqliteArtistRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArtistRepository for SqliteArtistRepository {
    async fn find_by_id(&self, id: ArtistId) -> Result<Option<Artist>> {
        let artist = query_as::<_, Artist>("SELECT id, name FROM artists WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(artist)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Artist>> {
        let artist = query_as::<_, Artist>("SELECT id, name FROM artists WHERE name = ? LIMIT 1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(artist)
    }

    async fn resolve_artist(&self, name: &str) -> Result<ArtistId> {
        if let Some(artist) = self.find_by_name(name).await? {
            debug!(artist_id = %artist.id, artist = name, "Resolved existing artist");
            return Ok(artist.id);
        }

        let inserted = query("INSERT INTO artists (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await?
            .rows_affected();

        let artist = require_inserted(self.find_by_name(name).await?, name)?;

        if inserted > 0 {
            info!(artist_id = %artist.id, artist = name, "Created artist");
        } else {
            debug!(artist_id = %artist.id, artist = name, "Artist created concurrently");
        }

        Ok(artist.id)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = query_as("SELECT COUNT(*) as count FROM artists")
            .fetch_one(&self.pool)
            .await
            .map(|row: (i64,)| row.0)?;

        Ok(count)
    }
}

/// The row must exist after a conflict-tolerant insert; its absence is a
/// storage fault, not a missing entity.
fn require_inserted(artist: Option<Artist>, name: &str) -> Result<Artist> {
    artist.ok_or_else(|| {
        warn!(artist = name, "Artist row missing after insert");
        LibraryError::Database(sqlx::Error::RowNotFound)
    })
}
