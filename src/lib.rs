//! Dependency license pages
//!
//! Reads a project's `package.json`, looks up the license file of every
//! dependency installed under `node_modules`, and renders the result as a
//! single static HTML page.

pub mod domain;
pub use domain::{
    Config, ConfigError, DependencyKind, Entry, License, Manifest, Report, Section, Summary,
};

/// Filesystem access: manifest loading, license probing and report output.
pub mod storage;
pub use storage::{Locator, ManifestError};

/// HTML rendering of a [`Report`].
pub mod html;

mod generator;
pub use generator::{Error, Generator};
