use std::fmt;

use indexmap::IndexMap;
use serde::{
    Deserialize, Deserializer,
    de::{IgnoredAny, MapAccess, Visitor},
};
use serde_json::Value;

/// The kind of a dependency, which decides the report section it lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    /// Declared under `dependencies`.
    Runtime,
    /// Declared under `devDependencies`.
    Development,
}

impl DependencyKind {
    /// All kinds, in the order their sections appear in a report.
    pub const ALL: [Self; 2] = [Self::Runtime, Self::Development];

    /// The heading used for this kind's section.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Runtime => "Dependencies",
            Self::Development => "Dev Dependencies",
        }
    }

    /// The manifest field that declares dependencies of this kind.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Runtime => "dependencies",
            Self::Development => "devDependencies",
        }
    }
}

/// A parsed `package.json`.
///
/// Only the two dependency mappings are retained. Every other field of the
/// manifest is ignored. Mappings keep the key order of the source file.
///
/// Version values are kept as raw JSON and never inspected, so a mapping
/// whose values are not strings still lists its names. A dependency field
/// that is `null` counts as undeclared; any other non-object value counts as
/// a declared but empty mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    dependencies: Option<IndexMap<String, Value>>,
    dev_dependencies: Option<IndexMap<String, Value>>,
}

impl Manifest {
    /// Parses a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON, or is not a JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns the name → version mapping declared for `kind`, if the manifest
    /// declares one at all.
    ///
    /// A mapping that is declared but empty is returned as `Some`.
    #[must_use]
    pub const fn dependencies(&self, kind: DependencyKind) -> Option<&IndexMap<String, Value>> {
        match kind {
            DependencyKind::Runtime => self.dependencies.as_ref(),
            DependencyKind::Development => self.dev_dependencies.as_ref(),
        }
    }

    /// Inserts a dependency, creating the mapping for `kind` if needed.
    pub fn insert(
        &mut self,
        kind: DependencyKind,
        name: impl Into<String>,
        version: impl Into<String>,
    ) {
        self.mapping_mut(kind)
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), Value::String(version.into()));
    }

    const fn mapping_mut(&mut self, kind: DependencyKind) -> &mut Option<IndexMap<String, Value>> {
        match kind {
            DependencyKind::Runtime => &mut self.dependencies,
            DependencyKind::Development => &mut self.dev_dependencies,
        }
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ManifestVisitor)
    }
}

struct ManifestVisitor;

impl<'de> Visitor<'de> for ManifestVisitor {
    type Value = Manifest;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a manifest object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Manifest, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut manifest = Manifest::default();
        while let Some(key) = map.next_key::<String>()? {
            let Some(kind) = DependencyKind::ALL.into_iter().find(|kind| kind.field() == key)
            else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };
            *manifest.mapping_mut(kind) =
                map.next_value::<Option<Mapping>>()?.map(Mapping::into_dependencies);
        }
        Ok(manifest)
    }
}

/// A dependency field as it appears in the manifest.
#[derive(Deserialize)]
#[serde(untagged)]
enum Mapping {
    Object(IndexMap<String, Value>),
    Other(#[allow(dead_code)] IgnoredAny),
}

impl Mapping {
    fn into_dependencies(self) -> IndexMap<String, Value> {
        match self {
            Self::Object(dependencies) => dependencies,
            Self::Other(_) => IndexMap::new(),
        }
    }
}
