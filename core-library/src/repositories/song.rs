//! Song repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::{Song, SongDraft, SongFields, SongId};
use crate::query::{
    build_song_count_sql, build_song_query_spec, song_by_id_sql, BindValue, Filter, SongQuery,
};
use crate::repositories::{ArtistRepository, Page, SqliteArtistRepository};
use async_trait::async_trait;
use sqlx::query::QueryAs;
use sqlx::sqlite::SqliteArguments;
use sqlx::{query, query_as, Sqlite, SqlitePool};
use tracing::{debug, info, warn};

/// Song repository interface for data access operations
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Insert a new song, resolving (or creating) its artist first
    ///
    /// # Returns
    /// The storage-assigned id of the new song
    async fn add_song(&self, song: &SongDraft) -> Result<SongId>;

    /// List songs matching every filter, ordered by id ascending
    ///
    /// # Arguments
    /// * `query` - Filters (ANDed, exact match) and pagination
    async fn list_songs(&self, query: &SongQuery) -> Result<Vec<Song>>;

    /// List one page of songs together with the total match count
    async fn list_songs_page(&self, query: &SongQuery) -> Result<Page<Song>>;

    /// Count songs matching every filter
    async fn count_songs(&self, filters: &[Filter]) -> Result<i64>;

    /// Find a song by its ID
    ///
    /// # Returns
    /// - `Ok(Some(song))` if found
    /// - `Ok(None)` if not found
    /// - `Err` if database error occurs
    async fn find_song_by_id(&self, id: SongId) -> Result<Option<Song>>;

    /// Get a song by its ID
    ///
    /// # Errors
    /// `LibraryError::NotFound` when no song has this id
    async fn get_song_by_id(&self, id: SongId) -> Result<Song>;

    /// Overwrite title, release date, lyrics and link of an existing song
    ///
    /// # Errors
    /// Returns error if:
    /// - Song does not exist
    /// - Database error occurs
    async fn update_song_by_id(&self, id: SongId, fields: &SongFields) -> Result<()>;

    /// Delete a song by ID
    ///
    /// # Errors
    /// `LibraryError::NotFound` when nothing was deleted
    async fn delete_song_by_id(&self, id: SongId) -> Result<()>;
}

/// SQLite implementation of SongRepository
#[derive(Clone)]
pub struct SqliteSongRepository {
    pool: SqlitePool,
    artists: SqliteArtistRepository,
}

impl SqliteSongRepository {
    /// Create a new SQLite song repository
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            artists: SqliteArtistRepository::new(pool.clone()),
            pool,
        }
    }

    /// The artist repository this repository resolves artists through
    pub fn artists(&self) -> &SqliteArtistRepository {
        &self.artists
    }
}

fn bind_values<'q, O>(
    mut statement: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    values: &'q [BindValue],
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for value in values {
        statement = match value {
            BindValue::Text(text) => statement.bind(text.as_str()),
            BindValue::Integer(number) => statement.bind(*number),
        };
    }
    statement
}

#[async_trait]
impl SongRepository for SqliteSongRepository {
    async fn add_song(&self, song: &SongDraft) -> Result<SongId> {
        let artist_id = self.artists.resolve_artist(&song.artist).await?;

        let result = query(
            r#"
            INSERT INTO songs (artist_id, title, release_date, lyrics, link)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(artist_id)
        .bind(&song.title)
        .bind(song.release_date)
        .bind(&song.lyrics)
        .bind(&song.link)
        .execute(&self.pool)
        .await?;

        let id = SongId(result.last_insert_rowid());
        info!(song_id = %id, artist = %song.artist, title = %song.title, "Added song");

        Ok(id)
    }

    async fn list_songs(&self, query: &SongQuery) -> Result<Vec<Song>> {
        let spec = build_song_query_spec(query);
        debug!(
            filters = query.filters.len(),
            page = query.paginator.page,
            page_size = query.paginator.page_size,
            "Listing songs"
        );

        let songs = bind_values(query_as::<_, Song>(&spec.select_sql), &spec.select_binds)
            .fetch_all(&self.pool)
            .await?;

        Ok(songs)
    }

    async fn list_songs_page(&self, query: &SongQuery) -> Result<Page<Song>> {
        let total = self.count_songs(&query.filters).await?;
        let songs = self.list_songs(query).await?;

        Ok(Page::new(songs, total.max(0) as u64, query.paginator))
    }

    async fn count_songs(&self, filters: &[Filter]) -> Result<i64> {
        let (sql, binds) = build_song_count_sql(filters);

        let count: (i64,) = bind_values(query_as::<_, (i64,)>(&sql), &binds)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    async fn find_song_by_id(&self, id: SongId) -> Result<Option<Song>> {
        let sql = song_by_id_sql();
        let song = query_as::<_, Song>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(song)
    }

    async fn get_song_by_id(&self, id: SongId) -> Result<Song> {
        self.find_song_by_id(id)
            .await?
            .ok_or_else(|| LibraryError::song_not_found(id))
    }

    async fn update_song_by_id(&self, id: SongId, fields: &SongFields) -> Result<()> {
        let result = query(
            r#"
            UPDATE songs SET
                title = ?, release_date = ?, lyrics = ?, link = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.title)
        .bind(fields.release_date)
        .bind(&fields.lyrics)
        .bind(&fields.link)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            warn!(song_id = %id, "Update matched no song");
            return Err(LibraryError::song_not_found(id));
        }

        info!(song_id = %id, "Updated song");
        Ok(())
    }

    async fn delete_song_by_id(&self, id: SongId) -> Result<()> {
        let result = query("DELETE FROM songs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!(song_id = %id, "Delete matched no song");
            return Err(LibraryError::song_not_found(id));
        }

        info!(song_id = %id, "Deleted song");
        Ok(())
    }
}
