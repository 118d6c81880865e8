//! Caller-facing song catalog operations.

use crate::error::{CoreError, Result};
use core_library::models::{NewSong, Song, SongId, SongPatch};
use core_library::query::SongQuery;
use core_library::repositories::{Page, SongRepository, SqliteSongRepository};
use core_metadata::SongMetadataProvider;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Parse a song identifier supplied as text, e.g. a path segment.
///
/// # Errors
/// `InvalidInput` when the text is not an integer
pub fn parse_song_id(raw: &str) -> Result<SongId> {
    raw.parse::<SongId>()
        .map_err(|e| CoreError::invalid_input("id", format!("'{}' is not a song id: {}", raw, e)))
}

/// The song catalog: listing, lookup, verse access, and enriched creation.
#[derive(Clone)]
pub struct SongCatalog {
    songs: Arc<dyn SongRepository>,
    metadata: Arc<dyn SongMetadataProvider>,
}

impl SongCatalog {
    /// Build a catalog over explicit collaborators.
    pub fn new(songs: Arc<dyn SongRepository>, metadata: Arc<dyn SongMetadataProvider>) -> Self {
        Self { songs, metadata }
    }

    /// Build a catalog over a SQLite pool.
    pub fn from_pool(pool: SqlitePool, metadata: Arc<dyn SongMetadataProvider>) -> Self {
        Self::new(Arc::new(SqliteSongRepository::new(pool)), metadata)
    }

    /// Repository the catalog reads and writes through.
    pub fn repository(&self) -> Arc<dyn SongRepository> {
        Arc::clone(&self.songs)
    }

    /// List songs matching every filter in the query, ordered by id.
    #[instrument(skip(self, query), fields(filters = query.filters.len(), page = query.paginator.page))]
    pub async fn list_songs(&self, query: &SongQuery) -> Result<Vec<Song>> {
        Ok(self.songs.list_songs(query).await?)
    }

    /// Like [`list_songs`](Self::list_songs), with the total match count.
    #[instrument(skip(self, query), fields(filters = query.filters.len(), page = query.paginator.page))]
    pub async fn list_songs_page(&self, query: &SongQuery) -> Result<Page<Song>> {
        Ok(self.songs.list_songs_page(query).await?)
    }

    #[instrument(skip(self), fields(song_id = %id))]
    pub async fn get_song(&self, id: SongId) -> Result<Song> {
        Ok(self.songs.get_song_by_id(id).await?)
    }

    /// One verse of a song's lyrics by 1-based index.
    ///
    /// An index outside `1..=verse_count` yields the first verse.
    #[instrument(skip(self), fields(song_id = %id))]
    pub async fn get_verse(&self, id: SongId, index: i64) -> Result<String> {
        let song = self.songs.get_song_by_id(id).await?;
        debug!(verses = song.verse_count(), index, "Selecting verse");
        Ok(song.verse(index).to_string())
    }

    /// Add a song: enrich it, resolve its artist, store it, read it back.
    ///
    /// Nothing is stored when enrichment fails.
    #[instrument(skip(self, request), fields(artist = %request.artist, title = %request.title))]
    pub async fn create_song(&self, request: NewSong) -> Result<Song> {
        request
            .validate()
            .map_err(|message| CoreError::invalid_input("song", message))?;

        let details = self
            .metadata
            .lookup(&request.artist, &request.title)
            .await
            .map_err(|e| {
                warn!(error = %e, "Enrichment failed, song not created");
                CoreError::from(e)
            })?;

        let draft = details.into_draft(request.artist, request.title);
        let id = self.songs.add_song(&draft).await?;
        let song = self.songs.get_song_by_id(id).await?;

        info!(song_id = %song.id, "Song created");
        Ok(song)
    }

    /// Apply a partial update and return the stored result.
    ///
    /// # Errors
    /// - `InvalidInput` if the patch names a different song id
    /// - `NotFound` if the song does not exist
    #[instrument(skip(self, patch), fields(song_id = %id))]
    pub async fn update_song(&self, id: SongId, patch: SongPatch) -> Result<Song> {
        if let Some(patch_id) = patch.id {
            if patch_id != id {
                return Err(CoreError::invalid_input(
                    "id",
                    format!("body id {} does not match song {}", patch_id, id),
                ));
            }
        }

        let current = self.songs.get_song_by_id(id).await?;
        if patch.is_empty() {
            debug!("Empty patch, nothing to update");
            return Ok(current);
        }

        let fields = patch.apply_to(&current);
        self.songs.update_song_by_id(id, &fields).await?;

        Ok(self.songs.get_song_by_id(id).await?)
    }

    #[instrument(skip(self), fields(song_id = %id))]
    pub async fn delete_song(&self, id: SongId) -> Result<()> {
        Ok(self.songs.delete_song_by_id(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use async_trait::async_trait;
    use core_library::db::create_test_pool;
    use core_library::models::{SongDraft, SongFields};
    use core_library::query::Filter;
    use core_metadata::{MetadataError, SongDetails};
    use mockall::mock;

    mock! {
        pub Metadata {}

        #[async_trait]
        impl SongMetadataProvider for Metadata {
            async fn lookup(&self, artist: &str, title: &str) -> core_metadata::Result<SongDetails>;
        }
    }

    mock! {
        pub Songs {}

        #[async_trait]
        impl SongRepository for Songs {
            async fn add_song(&self, song: &SongDraft) -> core_library::Result<SongId>;
            async fn list_songs(&self, query: &SongQuery) -> core_library::Result<Vec<Song>>;
            async fn list_songs_page(&self, query: &SongQuery) -> core_library::Result<Page<Song>>;
            async fn count_songs(&self, filters: &[Filter]) -> core_library::Result<i64>;
            async fn find_song_by_id(&self, id: SongId) -> core_library::Result<Option<Song>>;
            async fn get_song_by_id(&self, id: SongId) -> core_library::Result<Song>;
            async fn update_song_by_id(&self, id: SongId, fields: &SongFields) -> core_library::Result<()>;
            async fn delete_song_by_id(&self, id: SongId) -> core_library::Result<()>;
        }
    }

    fn lyrics_details(lyrics: &str) -> SongDetails {
        SongDetails {
            release_date: None,
            lyrics: lyrics.to_string(),
            link: "https://example.com/song".to_string(),
        }
    }

    async fn catalog_with(metadata: MockMetadata) -> SongCatalog {
        SongCatalog::from_pool(create_test_pool().await.unwrap(), Arc::new(metadata))
    }

    #[test]
    fn test_parse_song_id() {
        assert_eq!(parse_song_id("12").unwrap(), SongId(12));
        assert_eq!(parse_song_id("x").unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_create_song_uses_enrichment() {
        let mut metadata = MockMetadata::new();
        metadata
            .expect_lookup()
            .withf(|artist, title| artist == "Adele" && title == "Hello")
            .times(1)
            .returning(|_, _| Ok(lyrics_details("A\n\nB\n\nC")));

        let catalog = catalog_with(metadata).await;
        let song = catalog.create_song(NewSong::new("Adele", "Hello")).await.unwrap();

        assert_eq!(song.artist, "Adele");
        assert_eq!(song.title, "Hello");
        assert_eq!(song.verse_count(), 3);
        assert_eq!(catalog.get_verse(song.id, 2).await.unwrap(), "B");
    }

    #[tokio::test]
    async fn test_create_song_rejects_blank_request() {
        let mut metadata = MockMetadata::new();
        metadata.expect_lookup().never();

        let catalog = catalog_with(metadata).await;
        let err = catalog.create_song(NewSong::new("", "Hello")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_failed_enrichment_persists_nothing() {
        let mut metadata = MockMetadata::new();
        metadata.expect_lookup().returning(|_, _| {
            Err(MetadataError::LookupFailed {
                status: 503,
                body: "unavailable".to_string(),
            })
        });

        let catalog = catalog_with(metadata).await;
        let err = catalog.create_song(NewSong::new("Muse", "Uprising")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::EnrichmentFailure);
        assert!(catalog.list_songs(&SongQuery::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_verse_index_out_of_range_falls_back() {
        let mut metadata = MockMetadata::new();
        metadata
            .expect_lookup()
            .returning(|_, _| Ok(lyrics_details("first\n\nsecond")));

        let catalog = catalog_with(metadata).await;
        let song = catalog.create_song(NewSong::new("Muse", "Uprising")).await.unwrap();

        assert_eq!(catalog.get_verse(song.id, 0).await.unwrap(), "first");
        assert_eq!(catalog.get_verse(song.id, 3).await.unwrap(), "first");
        assert_eq!(catalog.get_verse(song.id, 2).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_update_song_merges_patch() {
        let mut metadata = MockMetadata::new();
        metadata
            .expect_lookup()
            .returning(|_, _| Ok(lyrics_details("old")));

        let catalog = catalog_with(metadata).await;
        let song = catalog.create_song(NewSong::new("Muse", "Uprising")).await.unwrap();

        let patch = SongPatch {
            lyrics: Some("new\n\nlyrics".to_string()),
            ..SongPatch::default()
        };
        let updated = catalog.update_song(song.id, patch).await.unwrap();

        assert_eq!(updated.lyrics, "new\n\nlyrics");
        assert_eq!(updated.title, "Uprising");
        assert_eq!(updated.link, song.link);
    }

    #[tokio::test]
    async fn test_update_song_rejects_mismatched_id() {
        let mut songs = MockSongs::new();
        songs.expect_get_song_by_id().never();
        songs.expect_update_song_by_id().never();

        let catalog = SongCatalog::new(Arc::new(songs), Arc::new(MockMetadata::new()));
        let patch = SongPatch {
            id: Some(SongId(2)),
            title: Some("Other".to_string()),
            ..SongPatch::default()
        };

        let err = catalog.update_song(SongId(1), patch).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_update_missing_song_is_not_found() {
        let catalog = catalog_with(MockMetadata::new()).await;
        let patch = SongPatch {
            title: Some("Ghost".to_string()),
            ..SongPatch::default()
        };

        let err = catalog.update_song(SongId(77), patch).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_storage_failures_are_classified() {
        let mut songs = MockSongs::new();
        songs
            .expect_get_song_by_id()
            .returning(|_| Err(core_library::LibraryError::Database(sqlx::Error::PoolClosed)));

        let catalog = SongCatalog::new(Arc::new(songs), Arc::new(MockMetadata::new()));
        let err = catalog.get_song(SongId(1)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StorageFailure);
    }

    #[tokio::test]
    async fn test_delete_song() {
        let mut metadata = MockMetadata::new();
        metadata.expect_lookup().returning(|_, _| Ok(lyrics_details("x")));

        let catalog = catalog_with(metadata).await;
        let song = catalog.create_song(NewSong::new("Adele", "Hello")).await.unwrap();

        catalog.delete_song(song.id).await.unwrap();

        assert_eq!(catalog.get_song(song.id).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(catalog.delete_song(song.id).await.unwrap_err().kind(), ErrorKind::NotFound);
    }
}
