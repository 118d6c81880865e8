//! Lyric verse segmentation.
//!
//! Verses are separated by a blank line (`"\n\n"`). Segments are returned as-is,
//! without trimming, so a stanza that starts with extra newlines keeps them.

/// Delimiter between two verses.
pub const VERSE_DELIMITER: &str = "\n\n";

/// Index used when a requested verse is out of range or malformed.
pub const FALLBACK_VERSE: i64 = 1;

/// Split lyrics into verses. Always yields at least one (possibly empty) verse.
pub fn split_verses(lyrics: &str) -> Vec<&str> {
    lyrics.split(VERSE_DELIMITER).collect()
}

/// Return the verse at the 1-based `index`.
///
/// A non-positive index or one past the last verse falls back to verse 1.
pub fn get_verse(lyrics: &str, index: i64) -> &str {
    let verses = split_verses(lyrics);
    let position = usize::try_from(index)
        .ok()
        .filter(|i| (1..=verses.len()).contains(i))
        .unwrap_or(FALLBACK_VERSE as usize);

    verses.get(position - 1).copied().unwrap_or_default()
}

/// Parse a raw verse index (e.g. a path segment). Non-numeric input maps to
/// the fallback verse.
pub fn parse_verse_index(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(FALLBACK_VERSE)
}
