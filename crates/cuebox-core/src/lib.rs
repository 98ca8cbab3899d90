//! # cuebox-core
//!
//! Core types, track catalogs, configuration, and error handling for the
//! cuebox audio scheduler.

pub mod catalog;
pub mod config;
pub mod error;
pub mod types;

pub use catalog::{CatalogKind, Catalogs, TrackCatalog};
pub use config::AudioConfig;
pub use error::{Error, Result};
pub use types::*;
