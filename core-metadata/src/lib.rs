//! # Song Metadata Enrichment
//!
//! Looks up the attributes of a new song (release date, lyrics, external
//! link) from the external song information service.
//!
//! ## Overview
//!
//! This module handles:
//! - The `SongMetadataProvider` seam the catalog creation path depends on
//! - An HTTP provider built on the `HttpClient` bridge
//! - Normalisation of the release dates the service returns

pub mod enrichment;
pub mod error;

pub use enrichment::{HttpSongMetadataProvider, SongDetails, SongMetadataProvider};
pub use error::{MetadataError, Result};
