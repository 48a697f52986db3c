//! License file discovery
//!
//! The [`Locator`] finds the license file of an installed dependency by
//! probing a fixed list of filenames inside `<modules_dir>/<name>`.

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use tracing::instrument;

use crate::{Config, License};

/// A license file exists but could not be read.
#[derive(Debug, thiserror::Error)]
#[error("failed to read license file {}", path.display())]
pub struct ReadError {
    /// The license file that failed.
    pub path: PathBuf,
    /// The underlying error.
    #[source]
    pub source: io::Error,
}

/// Probes installed dependencies for their license files.
#[derive(Debug, Clone)]
pub struct Locator {
    /// The directory dependencies are installed into.
    modules_dir: PathBuf,
    /// Filenames to probe, in priority order.
    candidates: Vec<String>,
}

impl Locator {
    /// Creates a locator probing `candidates` inside `modules_dir`.
    #[must_use]
    pub fn new(modules_dir: impl Into<PathBuf>, candidates: Vec<String>) -> Self {
        Self {
            modules_dir: modules_dir.into(),
            candidates,
        }
    }

    /// Creates a locator for the project at `root` using the given config.
    #[must_use]
    pub fn from_config(root: &Path, config: &Config) -> Self {
        Self::new(
            root.join(&config.modules_dir),
            config.license_files().to_vec(),
        )
    }

    /// The directory dependencies are installed into.
    #[must_use]
    pub fn modules_dir(&self) -> &Path {
        &self.modules_dir
    }

    /// Looks up the license of the dependency `name`.
    ///
    /// Candidates are probed in order and the first one that exists as a
    /// regular file is read; later candidates are not considered. A file with
    /// no content counts as no license. Names that do not form a relative path
    /// inside the modules directory are never probed.
    ///
    /// A dependency with no license file, or one that is not installed at all,
    /// yields [`License::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns a [`ReadError`] naming the file if a license file exists but
    /// cannot be read.
    #[instrument(level = "debug", skip(self))]
    pub fn locate(&self, name: &str) -> Result<License, ReadError> {
        let Some(package_dir) = self.package_dir(name) else {
            tracing::warn!(dependency = name, "skipping dependency with unsafe name");
            return Ok(License::NotFound);
        };

        for candidate in &self.candidates {
            let path = package_dir.join(candidate);
            if !path.is_file() {
                continue;
            }

            tracing::debug!(path = %path.display(), "found license file");
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(source) => return Err(ReadError { path, source }),
            };
            if bytes.is_empty() {
                tracing::debug!(path = %path.display(), "license file is empty");
                return Ok(License::NotFound);
            }
            return Ok(License::Found(String::from_utf8_lossy(&bytes).into_owned()));
        }

        tracing::debug!(dir = %package_dir.display(), "no license file");
        Ok(License::NotFound)
    }

    /// Returns the install directory of `name`, or `None` if the name would
    /// escape the modules directory.
    fn package_dir(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let mut components = relative.components().peekable();
        components.peek()?;
        components
            .all(|component| matches!(component, Component::Normal(_)))
            .then(|| self.modules_dir.join(relative))
    }
}
