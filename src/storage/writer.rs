use std::{fs, io, path::Path};

/// Writes the rendered page to `path`, replacing any existing file.
///
/// Parent directories are created automatically if they don't exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be
/// written.
pub fn write_report(path: &Path, html: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)
}
