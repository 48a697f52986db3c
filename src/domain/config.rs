use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for license page generation.
///
/// Every path is resolved against the project root unless it is absolute.
/// The defaults reproduce the conventional npm layout: `package.json` and
/// `node_modules` in the root, output written to `licenses.html`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The manifest declaring the dependencies.
    pub manifest: PathBuf,

    /// The directory dependencies are installed into.
    ///
    /// A dependency named `foo` is expected in `<modules_dir>/foo`.
    pub modules_dir: PathBuf,

    /// Where the HTML page is written.
    pub output: PathBuf,

    /// The page title, used for both `<title>` and the top-level heading.
    pub title: String,

    /// License filenames to probe, in priority order.
    ///
    /// The first one that exists wins.
    license_files: Vec<String>,

    /// Whether development dependencies get a section.
    pub include_dev: bool,
}

/// The name of the optional configuration file in the project root.
pub const FILE_NAME: &str = "license-page.toml";

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            modules_dir: default_modules_dir(),
            output: default_output(),
            title: default_title(),
            license_files: default_license_files(),
            include_dev: default_include_dev(),
        }
    }
}

/// Errors that can occur when loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file {}", path.display())]
    Io {
        /// The config file path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid configuration.
    #[error("failed to parse config file {}", path.display())]
    Parse {
        /// The config file path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `license-page.toml` from the project root, falling back to the
    /// defaults if there is no such file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(FILE_NAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::load(&path)
        } else {
            tracing::debug!("no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Returns the license filenames to probe, in priority order.
    #[must_use]
    pub fn license_files(&self) -> &[String] {
        &self.license_files
    }

    /// Replaces the license filenames to probe.
    ///
    /// An empty list restores the defaults.
    pub fn set_license_files(&mut self, files: Vec<String>) {
        self.license_files = if files.is_empty() {
            default_license_files()
        } else {
            files
        };
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from("package.json")
}

fn default_modules_dir() -> PathBuf {
    PathBuf::from("node_modules")
}

fn default_output() -> PathBuf {
    PathBuf::from("licenses.html")
}

fn default_title() -> String {
    "Package Licenses".to_string()
}

fn default_license_files() -> Vec<String> {
    ["LICENSE", "LICENSE.txt", "LICENSE.md"]
        .map(String::from)
        .to_vec()
}

const fn default_include_dev() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_manifest")]
        manifest: PathBuf,

        #[serde(default = "default_modules_dir")]
        modules_dir: PathBuf,

        #[serde(default = "default_output")]
        output: PathBuf,

        #[serde(default = "default_title")]
        title: String,

        /// Probed in order; an empty list means the defaults.
        #[serde(default)]
        license_files: Vec<String>,

        #[serde(default = "default_include_dev")]
        include_dev: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                manifest,
                modules_dir,
                output,
                title,
                license_files,
                include_dev,
            } => {
                let mut config = Self {
                    manifest,
                    modules_dir,
                    output,
                    title,
                    license_files: Vec::new(),
                    include_dev,
                };
                config.set_license_files(license_files);
                config
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            manifest: config.manifest,
            modules_dir: config.modules_dir,
            output: config.output,
            title: config.title,
            license_files: config.license_files,
            include_dev: config.include_dev,
        }
    }
}
