//! # Repository Pattern Implementation
//!
//! This module provides repository traits and implementations for data access.
//! Each entity has a corresponding repository; the song repository composes
//! the artist repository so that every stored song references a resolved
//! artist.
//!
//! ## Architecture
//!
//! - Traits define the interface for each repository
//! - SQLite implementations use sqlx for async database access
//! - All operations return `Result<T>` for error handling
//! - Pagination is supported via the `Paginator` request and `Page<T>` wrapper
//!
//! ## Available Repositories
//!
//! - `ArtistRepository` - Artist lookup and get-or-create
//! - `SongRepository` - Song CRUD and filtered listings

pub mod artist;
pub mod pagination;
pub mod song;

pub use artist::{ArtistRepository, SqliteArtistRepository};
pub use pagination::{Page, Paginator};
pub use song::{SongRepository, SqliteSongRepository};
