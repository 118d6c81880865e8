//! Domain models for the song catalog
//!
//! This module contains the song and artist models with database mapping, plus
//! the write-side shapes used to create and update songs.

use crate::verses;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

// =============================================================================
// ID Types
// =============================================================================

/// Storage-assigned identifier of a song
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct SongId(pub i64);

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SongId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Storage-assigned identifier of an artist
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct ArtistId(pub i64);

impl fmt::Display for ArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Domain Models
// =============================================================================

/// A catalogued song as read back from storage.
///
/// `artist` is the artist's name, joined in at read time; the row itself only
/// stores the artist reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Unique identifier
    pub id: SongId,
    /// Artist name
    pub artist: String,
    /// Song title
    pub title: String,
    /// Release date, absent when enrichment did not supply one
    pub release_date: Option<NaiveDate>,
    /// Lyrics, verses separated by a blank line
    pub lyrics: String,
    /// External link
    pub link: String,
}

impl Song {
    /// Lyrics split into verses.
    pub fn verses(&self) -> Vec<&str> {
        verses::split_verses(&self.lyrics)
    }

    /// Number of verses in the lyrics (always at least one).
    pub fn verse_count(&self) -> usize {
        self.verses().len()
    }

    /// Verse by 1-based index, falling back to the first verse.
    pub fn verse(&self, index: i64) -> &str {
        verses::get_verse(&self.lyrics, index)
    }

    /// The mutable part of this song.
    pub fn fields(&self) -> SongFields {
        SongFields {
            title: self.title.clone(),
            release_date: self.release_date,
            lyrics: self.lyrics.clone(),
            link: self.link.clone(),
        }
    }
}

/// Music artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Artist {
    /// Unique identifier
    pub id: ArtistId,
    /// Display name, matched exactly on lookup
    pub name: String,
}

// =============================================================================
// Write Models
// =============================================================================

/// Request to add a song, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSong {
    #[serde(alias = "group")]
    pub artist: String,
    #[serde(alias = "song")]
    pub title: String,
}

impl NewSong {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        if self.artist.trim().is_empty() {
            return Err("Artist name cannot be empty".to_string());
        }
        if self.title.trim().is_empty() {
            return Err("Song title cannot be empty".to_string());
        }
        Ok(())
    }
}

/// A fully populated song ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDraft {
    pub artist: String,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub lyrics: String,
    pub link: String,
}

impl SongDraft {
    /// Split into the artist name and the per-song fields.
    pub fn fields(&self) -> SongFields {
        SongFields {
            title: self.title.clone(),
            release_date: self.release_date,
            lyrics: self.lyrics.clone(),
            link: self.link.clone(),
        }
    }
}

/// Fields an update may change. The artist is never reassigned by an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongFields {
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub lyrics: String,
    pub link: String,
}

/// Partial update as supplied by a caller. Absent fields keep their stored
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongPatch {
    /// Optional identifier; when present it must match the target song
    #[serde(default)]
    pub id: Option<SongId>,
    #[serde(default, alias = "song")]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default, alias = "text")]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl SongPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.release_date.is_none()
            && self.lyrics.is_none()
            && self.link.is_none()
    }

    /// Merge this patch over the stored song.
    pub fn apply_to(&self, song: &Song) -> SongFields {
        SongFields {
            title: self.title.clone().unwrap_or_else(|| song.title.clone()),
            release_date: self.release_date.or(song.release_date),
            lyrics: self.lyrics.clone().unwrap_or_else(|| song.lyrics.clone()),
            link: self.link.clone().unwrap_or_else(|| song.link.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_song() -> Song {
        Song {
            id: SongId(7),
            artist: "Muse".to_string(),
            title: "Darkshines".to_string(),
            release_date: NaiveDate::from_ymd_opt(2006, 7, 16),
            lyrics: "first\n\nsecond".to_string(),
            link: "https://example.com/darkshines".to_string(),
        }
    }

    #[test]
    fn test_song_id_parse() {
        assert_eq!("42".parse::<SongId>().unwrap(), SongId(42));
        assert_eq!(" 3 ".parse::<SongId>().unwrap(), SongId(3));
        assert!("abc".parse::<SongId>().is_err());
        assert_eq!(SongId(5).to_string(), "5");
    }

    #[test]
    fn test_song_verses() {
        let song = sample_song();
        assert_eq!(song.verse_count(), 2);
        assert_eq!(song.verse(2), "second");
        assert_eq!(song.verse(3), "first");
    }

    #[test]
    fn test_new_song_validation() {
        assert!(NewSong::new("Adele", "Hello").validate().is_ok());
        assert!(NewSong::new("  ", "Hello").validate().is_err());
        assert!(NewSong::new("Adele", "").validate().is_err());
    }

    #[test]
    fn test_new_song_accepts_wire_aliases() {
        let song: NewSong = serde_json::from_str(r#"{"group":"Muse","song":"Supermassive Black Hole"}"#)
            .unwrap();
        assert_eq!(song, NewSong::new("Muse", "Supermassive Black Hole"));
    }

    #[test]
    fn test_patch_apply_keeps_absent_fields() {
        let song = sample_song();
        let patch = SongPatch {
            title: Some("Dark Shines".to_string()),
            ..SongPatch::default()
        };

        let fields = patch.apply_to(&song);
        assert_eq!(fields.title, "Dark Shines");
        assert_eq!(fields.release_date, song.release_date);
        assert_eq!(fields.lyrics, song.lyrics);
        assert_eq!(fields.link, song.link);
        assert!(!patch.is_empty());
        assert!(SongPatch::default().is_empty());
    }

    #[test]
    fn test_song_serializes_camel_case() {
        let json = serde_json::to_value(sample_song()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["releaseDate"], "2006-07-16");
        assert_eq!(json["artist"], "Muse");
    }
}
