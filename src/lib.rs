//! Workspace entry crate.
//!
//! Re-exports the song catalog crates behind feature flags so a host (for
//! example an HTTP router) can depend on `music-library` alone and pick the
//! surface it needs:
//!
//! - `desktop-shims` (default): the full [`core_service::SongCatalog`] façade
//!   wired to SQLite and the reqwest-backed enrichment client.
//! - `library-only`: just the persistence and query layer.
//! - `enrichment`: just the metadata enrichment client.

#[cfg(feature = "desktop-shims")]
pub use core_service as service;

#[cfg(feature = "library-only")]
pub use core_library as library;

#[cfg(feature = "enrichment")]
pub use core_metadata as metadata;
