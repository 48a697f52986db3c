use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::domain::Manifest;

/// Errors that can occur when loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The manifest file does not exist.
    #[error("manifest not found at {}", .0.display())]
    NotFound(PathBuf),
    /// The manifest file exists but could not be read.
    #[error("failed to read manifest {}", path.display())]
    Io {
        /// The manifest path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The manifest is not valid JSON, or does not have the expected shape.
    #[error("failed to parse manifest {}", path.display())]
    Parse {
        /// The manifest path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Reads and parses the manifest at `path`.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or not a valid
/// manifest.
pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ManifestError::NotFound(path.to_path_buf()),
        _ => ManifestError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    Manifest::from_json(&content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
