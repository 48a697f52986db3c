//! Domain models for license pages.
//!
//! This module contains the parsed manifest, the result of a license lookup,
//! the report assembled from both, and the tool configuration.

mod config;
pub use config::{Config, ConfigError};

/// Dependency manifest model.
pub mod manifest;
pub use manifest::{DependencyKind, Manifest};

mod report;
pub use report::{Entry, License, Report, Section, Summary};
