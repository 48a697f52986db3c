//! The load, locate, render, write pipeline.

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::instrument;

use crate::{
    Config, ConfigError, DependencyKind, Locator, Manifest, ManifestError, Report, Summary, html,
    storage::{ReadError, load_manifest, write_report},
};

/// Errors that can occur while generating a license page.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The manifest could not be loaded.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// A license file exists but could not be read.
    #[error("failed to read license file for '{name}' at {}", path.display())]
    License {
        /// The dependency name.
        name: String,
        /// The license file that could not be read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The page could not be written.
    #[error("failed to write {}", path.display())]
    Write {
        /// The output path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

/// Generates the license page for a single project.
///
/// Every path in the [`Config`] is resolved against the project root given
/// here. Nothing is read from the process's working directory.
#[derive(Debug, Clone)]
pub struct Generator {
    root: PathBuf,
    config: Config,
}

impl Generator {
    /// Creates a generator for the project at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Creates a generator for the project at `root`, reading
    /// `license-page.toml` from the root if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but is invalid.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        let config = Config::load_or_default(&root)?;
        Ok(Self::new(root, config))
    }

    /// The project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The effective configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the configuration, for applying overrides.
    pub const fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// The resolved manifest path.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.config.manifest)
    }

    /// The resolved output path.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.config.output)
    }

    /// Loads the manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is missing or invalid.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self) -> Result<Manifest, Error> {
        let path = self.manifest_path();
        tracing::info!(path = %path.display(), "loading manifest");
        Ok(load_manifest(&path)?)
    }

    /// Looks up the license of every dependency in the manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if a license file exists but cannot be read.
    #[instrument(level = "debug", skip_all)]
    pub fn collect(&self, manifest: &Manifest) -> Result<Report, Error> {
        let locator = Locator::from_config(&self.root, &self.config);
        let kinds: &[DependencyKind] = if self.config.include_dev {
            &DependencyKind::ALL
        } else {
            &[DependencyKind::Runtime]
        };

        Report::collect(&self.config.title, manifest, kinds, |name| {
            locator
                .locate(name)
                .map_err(|error| license_error(name, error))
        })
    }

    /// Loads the manifest and builds the report, without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be loaded or a license file
    /// cannot be read.
    pub fn build(&self) -> Result<Report, Error> {
        let manifest = self.load()?;
        self.collect(&manifest)
    }

    /// Builds the report, renders it and writes the page.
    ///
    /// Nothing is written unless every earlier step succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails.
    #[instrument(level = "debug", skip(self), fields(root = %self.root.display()))]
    pub fn generate(&self) -> Result<Summary, Error> {
        let report = self.build()?;
        let summary = report.summary();
        let page = html::render(&report);

        let path = self.output_path();
        write_report(&path, &page).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!(
            path = %path.display(),
            dependencies = summary.dependencies,
            missing = summary.missing,
            "wrote license page"
        );
        Ok(summary)
    }
}

fn license_error(name: &str, error: ReadError) -> Error {
    Error::License {
        name: name.to_string(),
        path: error.path,
        source: error.source,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn project(manifest: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("package.json"), manifest).unwrap();
        tmp
    }

    fn install(root: &Path, name: &str, file: &str, content: &str) {
        let dir = root.join("node_modules").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), content).unwrap();
    }

    fn output(root: &Path) -> String {
        fs::read_to_string(root.join("licenses.html")).unwrap()
    }

    #[test]
    fn single_dependency_with_license() {
        let tmp = project(r#"{"dependencies": {"foo": "1.0.0"}}"#);
        install(tmp.path(), "foo", "LICENSE", "MIT License");

        let summary = Generator::open(tmp.path()).unwrap().generate().unwrap();

        let html = output(tmp.path());
        assert!(html.contains("<h2>Dependencies</h2>"));
        assert!(html.contains("<h3>foo</h3>"));
        assert!(html.contains("<pre>MIT License</pre>"));
        assert_eq!(
            summary,
            Summary {
                dependencies: 1,
                missing: 0,
            }
        );
    }

    #[test]
    fn empty_manifest() {
        let tmp = project("{}");

        let summary = Generator::open(tmp.path()).unwrap().generate().unwrap();

        let html = output(tmp.path());
        assert!(html.contains("<h1>Package Licenses</h1>"));
        assert!(!html.contains("<h2>"));
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn missing_manifest_writes_nothing() {
        let tmp = TempDir::new().unwrap();

        let error = Generator::open(tmp.path()).unwrap().generate().unwrap_err();

        assert!(matches!(
            error,
            Error::Manifest(ManifestError::NotFound(_))
        ));
        assert!(!tmp.path().join("licenses.html").exists());
    }

    #[test]
    fn invalid_manifest_keeps_existing_output() {
        let tmp = project("{ not json");
        fs::write(tmp.path().join("licenses.html"), "previous").unwrap();

        let error = Generator::open(tmp.path()).unwrap().generate().unwrap_err();

        assert!(matches!(
            error,
            Error::Manifest(ManifestError::Parse { .. })
        ));
        assert_eq!(output(tmp.path()), "previous");
    }

    #[test]
    fn both_sections_with_missing_license() {
        let tmp = project(
            r#"{
                "dependencies": {"foo": "^1.0.0", "bar": "^2.0.0"},
                "devDependencies": {"baz": "^3.0.0"}
            }"#,
        );
        install(tmp.path(), "foo", "LICENSE.md", "ISC");
        install(tmp.path(), "baz", "LICENSE.txt", "Apache <2.0>");

        let summary = Generator::open(tmp.path()).unwrap().generate().unwrap();

        let html = output(tmp.path());
        let expected = "<h2>Dependencies</h2>\n\
                        <h3>foo</h3><pre>ISC</pre>\n\
                        <h3>bar</h3><p>License file not found</p>\n\
                        <h2>Dev Dependencies</h2>\n\
                        <h3>baz</h3><pre>Apache &lt;2.0&gt;</pre>\n";
        assert!(html.contains(expected), "{html}");
        assert_eq!(
            summary,
            Summary {
                dependencies: 3,
                missing: 1,
            }
        );
    }

    #[test]
    fn exclude_dev_dependencies() {
        let tmp = project(r#"{"dependencies": {"foo": "1"}, "devDependencies": {"bar": "1"}}"#);

        let mut generator = Generator::open(tmp.path()).unwrap();
        generator.config_mut().include_dev = false;
        generator.generate().unwrap();

        let html = output(tmp.path());
        assert!(html.contains("<h3>foo</h3>"));
        assert!(!html.contains("Dev Dependencies"));
        assert!(!html.contains("<h3>bar</h3>"));
    }

    #[test]
    fn config_file_is_applied() {
        let tmp = project(r#"{"dependencies": {"foo": "1"}}"#);
        fs::write(
            tmp.path().join("license-page.toml"),
            "_version = \"1\"\nmodules_dir = \"vendor\"\noutput = \"out/third-party.html\"\ntitle = \"Third Party\"\n",
        )
        .unwrap();
        fs::create_dir_all(tmp.path().join("vendor/foo")).unwrap();
        fs::write(tmp.path().join("vendor/foo/LICENSE"), "BSD").unwrap();

        Generator::open(tmp.path()).unwrap().generate().unwrap();

        let html = fs::read_to_string(tmp.path().join("out/third-party.html")).unwrap();
        assert!(html.contains("<h1>Third Party</h1>"));
        assert!(html.contains("<pre>BSD</pre>"));
        assert!(!tmp.path().join("licenses.html").exists());
    }

    #[test]
    fn invalid_config_file() {
        let tmp = project("{}");
        fs::write(tmp.path().join("license-page.toml"), "_version = \"99\"").unwrap();

        let error = Generator::open(tmp.path()).unwrap_err();
        assert!(matches!(error, Error::Config(ConfigError::Parse { .. })));
    }

    #[test]
    fn unwritable_output() {
        let tmp = project("{}");
        fs::create_dir(tmp.path().join("licenses.html")).unwrap();

        let error = Generator::open(tmp.path()).unwrap().generate().unwrap_err();
        assert!(matches!(error, Error::Write { .. }));
    }

    #[test]
    fn license_error_names_the_file() {
        let path = PathBuf::from("node_modules/foo/LICENSE.txt");
        let error = license_error(
            "foo",
            ReadError {
                path: path.clone(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
        );

        let Error::License { name, path: file, .. } = &error else {
            panic!("unexpected error: {error}");
        };
        assert_eq!(name, "foo");
        assert_eq!(file, &path);
        assert_eq!(
            error.to_string(),
            "failed to read license file for 'foo' at node_modules/foo/LICENSE.txt"
        );
    }

    #[test]
    fn non_string_versions_are_listed() {
        let tmp = project(r#"{"dependencies": {"foo": 1}, "devDependencies": []}"#);
        install(tmp.path(), "foo", "LICENSE", "MIT");

        let summary = Generator::open(tmp.path()).unwrap().generate().unwrap();

        let html = output(tmp.path());
        assert!(html.contains("<h3>foo</h3><pre>MIT</pre>"));
        assert!(html.contains("<h2>Dev Dependencies</h2>\n</body>"), "{html}");
        assert_eq!(summary.dependencies, 1);
    }

    #[test]
    fn build_does_not_write() {
        let tmp = project(r#"{"dependencies": {"foo": "1"}}"#);

        let report = Generator::open(tmp.path()).unwrap().build().unwrap();

        assert_eq!(report.sections().len(), 1);
        assert!(!tmp.path().join("licenses.html").exists());
    }
}
