//! Demo catalog used by local development setups.

use crate::error::Result;
use crate::models::SongDraft;
use crate::repositories::SongRepository;
use chrono::NaiveDate;
use tracing::{debug, info};

const DEMO_RELEASE: (i32, u32, u32) = (1978, 8, 10);

const DEMO_SONGS: [(&str, &str, &str); 6] = [
    ("The Rolling Stones", "Satisfaction", "Satisfaction_(song)"),
    ("The Rolling Stones", "Paint it black", "Paint_it_black"),
    ("The Rolling Stones", "Shake it off", "Shake_it_off"),
    ("Adele", "Rolling in the deep", "Rolling_in_the_deep"),
    ("Adele", "Someone like you", "Something_Like_You"),
    ("Muse", "Darkshines", "Darkshines"),
];

/// The demo songs, in insertion order.
pub fn demo_songs() -> Vec<SongDraft> {
    let (year, month, day) = DEMO_RELEASE;
    let release_date = NaiveDate::from_ymd_opt(year, month, day);

    DEMO_SONGS
        .iter()
        .map(|(artist, title, page)| SongDraft {
            artist: artist.to_string(),
            title: title.to_string(),
            release_date,
            lyrics: format!("{} by {}", title, artist),
            link: format!("https://en.wikipedia.org/wiki/{}", page),
        })
        .collect()
}

/// Insert the demo songs through the regular add path.
///
/// Does nothing when the catalog already holds songs. Returns the number of
/// songs inserted.
pub async fn seed_demo_catalog<R>(songs: &R) -> Result<usize>
where
    R: SongRepository + ?Sized,
{
    let existing = songs.count_songs(&[]).await?;
    if existing > 0 {
        debug!(existing, "Catalog not empty, skipping demo seed");
        return Ok(0);
    }

    let drafts = demo_songs();
    for draft in &drafts {
        songs.add_song(draft).await?;
    }

    info!(count = drafts.len(), "Seeded demo catalog");
    Ok(drafts.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::query::{FilterField, SongQuery};
    use crate::repositories::{ArtistRepository, SqliteSongRepository};

    #[tokio::test]
    async fn test_seed_inserts_demo_songs_once() {
        let repo = SqliteSongRepository::new(create_test_pool().await.unwrap());

        assert_eq!(seed_demo_catalog(&repo).await.unwrap(), 6);
        assert_eq!(seed_demo_catalog(&repo).await.unwrap(), 0);

        assert_eq!(repo.count_songs(&[]).await.unwrap(), 6);
        assert_eq!(repo.artists().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_seeded_songs_are_queryable() {
        let repo = SqliteSongRepository::new(create_test_pool().await.unwrap());
        seed_demo_catalog(&repo).await.unwrap();

        let query = SongQuery::new().filter(FilterField::Artist, "Adele");
        let songs = repo.list_songs(&query).await.unwrap();

        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].title, "Rolling in the deep");
        assert_eq!(songs[0].lyrics, "Rolling in the deep by Adele");
    }
}
