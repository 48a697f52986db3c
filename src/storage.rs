mod locator;
/// Manifest loading.
pub mod manifest;
mod writer;

pub use locator::{Locator, ReadError};
pub use manifest::{ManifestError, load_manifest};
pub use writer::write_report;
