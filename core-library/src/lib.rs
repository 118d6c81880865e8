//! # Song Catalog Library
//!
//! Owns the catalog database and the repositories on top of it.
//!
//! ## Overview
//!
//! This crate manages:
//! - SQLite connection pooling and the embedded schema migrations
//! - Song and artist domain models
//! - Filter and pagination translation into bound SQL clauses
//! - Artist get-or-create and song CRUD repositories
//! - Lyric verse segmentation

pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod repositories;
pub mod seed;
pub mod verses;

pub use error::{LibraryError, Result};
