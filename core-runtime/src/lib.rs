//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the song catalog core:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the other crates depend on. It
//! establishes the logging conventions and the configuration surface a host
//! fills in before bootstrapping the catalog.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
