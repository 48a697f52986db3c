use crate::domain::{DependencyKind, Manifest};

/// The outcome of looking up a dependency's license file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum License {
    /// The raw text of the first license file found.
    Found(String),
    /// No license file was found for the dependency.
    NotFound,
}

impl License {
    /// Returns the license text, if one was found.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Found(text) => Some(text),
            Self::NotFound => None,
        }
    }

    /// Returns `true` if a license file was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// A single dependency in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The dependency name, as declared in the manifest.
    pub name: String,
    /// The result of the license lookup.
    pub license: License,
}

/// A labelled group of dependencies of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    kind: DependencyKind,
    entries: Vec<Entry>,
}

impl Section {
    /// Creates an empty section.
    #[must_use]
    pub const fn new(kind: DependencyKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// The kind of dependency this section lists.
    #[must_use]
    pub const fn kind(&self) -> DependencyKind {
        self.kind
    }

    /// The section heading.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.kind.label()
    }

    /// The entries, in manifest order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Appends an entry.
    pub fn push(&mut self, name: impl Into<String>, license: License) {
        self.entries.push(Entry {
            name: name.into(),
            license,
        });
    }
}

/// Counts describing a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Number of entries across all sections.
    pub dependencies: usize,
    /// Number of entries without a license file.
    pub missing: usize,
}

/// Everything that goes on the license page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    title: String,
    sections: Vec<Section>,
}

impl Report {
    /// Creates a report with no sections.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Builds a report by looking up the license of every dependency in the
    /// manifest.
    ///
    /// A section is created for every dependency mapping the manifest
    /// declares, even an empty one. Kinds not listed in `kinds` are skipped.
    /// The `lookup` callback is invoked once per entry, in manifest order.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `lookup`.
    pub fn collect<F, E>(
        title: impl Into<String>,
        manifest: &Manifest,
        kinds: &[DependencyKind],
        mut lookup: F,
    ) -> Result<Self, E>
    where
        F: FnMut(&str) -> Result<License, E>,
    {
        let mut report = Self::new(title);

        for kind in DependencyKind::ALL {
            if !kinds.contains(&kind) {
                continue;
            }
            let Some(dependencies) = manifest.dependencies(kind) else {
                continue;
            };

            let mut section = Section::new(kind);
            for name in dependencies.keys() {
                section.push(name.clone(), lookup(name)?);
            }
            report.push(section);
        }

        Ok(report)
    }

    /// The page title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The sections, runtime first.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Appends a section.
    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Counts the entries, and those without a license file.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.sections
            .iter()
            .flat_map(Section::entries)
            .fold(Summary::default(), |mut summary, entry| {
                summary.dependencies += 1;
                if !entry.license.is_found() {
                    summary.missing += 1;
                }
                summary
            })
    }
}
