//! Module build specifications
//!
//! A [`ModuleSpec`] is the declarative half of a module's build: an ordered
//! list of scope-qualified dependency declarations plus the convention names
//! the module requests. Conventions contribute their own spec fragments,
//! which are layered underneath the module's spec with [`ModuleSpec::merge`].
//!
//! Merging is deterministic and idempotent: `merge(s, s) == s`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::coordinate::Coordinate;

/// Classpath visibility and packaging tier for a dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Compile-time and runtime classpath (the default)
    #[default]
    Compile,
    /// Runtime classpath only
    Runtime,
    /// Annotation processor path, not packaged
    AnnotationProcessing,
    /// Test compile and runtime classpath only
    TestOnly,
    /// Local development runs only, never packaged
    DevelopmentOnly,
}

impl Scope {
    /// All scopes in classpath evaluation order
    pub const ALL: [Scope; 5] = [
        Scope::Compile,
        Scope::Runtime,
        Scope::AnnotationProcessing,
        Scope::TestOnly,
        Scope::DevelopmentOnly,
    ];

    /// Returns the manifest key for this scope
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Runtime => "runtime",
            Scope::AnnotationProcessing => "annotation_processing",
            Scope::TestOnly => "test_only",
            Scope::DevelopmentOnly => "development_only",
        }
    }

    /// Returns true if the dependency is visible to test compilation
    pub fn on_test_classpath(&self) -> bool {
        !matches!(self, Scope::DevelopmentOnly)
    }

    /// Returns true if the dependency is included in the shipped artifact
    pub fn packaged(&self) -> bool {
        matches!(self, Scope::Compile | Scope::Runtime)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single scope-qualified dependency declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEntry {
    /// The declared coordinate (version optional)
    pub coordinate: Coordinate,
    /// Classpath scope
    #[serde(default)]
    pub scope: Scope,
}

impl DependencyEntry {
    /// Creates a new entry
    pub fn new(coordinate: Coordinate, scope: Scope) -> Self {
        Self { coordinate, scope }
    }

    /// Creates a compile-scoped entry
    pub fn compile(coordinate: Coordinate) -> Self {
        Self::new(coordinate, Scope::Compile)
    }

    /// Creates a test-only entry
    pub fn test_only(coordinate: Coordinate) -> Self {
        Self::new(coordinate, Scope::TestOnly)
    }
}

impl fmt::Display for DependencyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.coordinate, self.scope)
    }
}

/// Language toolchain requested by a convention or module
///
/// Merge semantics are per-field override-wins: a later fragment that sets
/// `version` but not `language` only replaces the version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Toolchain {
    /// Language identifier (e.g., "java", "kotlin")
    pub language: Option<String>,
    /// Toolchain version (e.g., "17")
    pub version: Option<String>,
}

impl Toolchain {
    /// Returns true if neither field is set
    pub fn is_empty(&self) -> bool {
        self.language.is_none() && self.version.is_none()
    }

    /// Layers `override_with` on top of this toolchain, field by field
    pub fn merged_with(&self, override_with: &Toolchain) -> Toolchain {
        Toolchain {
            language: override_with
                .language
                .clone()
                .or_else(|| self.language.clone()),
            version: override_with
                .version
                .clone()
                .or_else(|| self.version.clone()),
        }
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.language, &self.version) {
            (Some(l), Some(v)) => write!(f, "{} {}", l, v),
            (Some(l), None) => f.write_str(l),
            (None, Some(v)) => write!(f, "unspecified {}", v),
            (None, None) => f.write_str("unset"),
        }
    }
}

/// The declarative build spec of a module, before resolution
///
/// Built by layering convention fragments and the module manifest with
/// [`merge`](ModuleSpec::merge). Constraints live in a separate
/// [`ConstraintSet`](super::constraint::ConstraintSet) because their merge
/// has conflict semantics, while spec merges never fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModuleSpec {
    /// Convention names this spec requests or was built from, first-seen order
    pub conventions: Vec<String>,

    /// Artifact repositories in lookup order
    pub repositories: Vec<String>,

    /// Requested toolchain
    pub toolchain: Toolchain,

    /// Scope-qualified dependency declarations, in declaration order
    pub dependencies: Vec<DependencyEntry>,

    /// Test engine identifier, if one has been requested at this layer
    ///
    /// Kept as the raw identifier; validation happens when the test runner
    /// is selected, after all layers are merged.
    pub engine: Option<String>,
}

impl ModuleSpec {
    /// Creates an empty spec
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a dependency entry, collapsing exact duplicates
    ///
    /// Returns false if an identical (coordinate, scope) entry already
    /// exists; the first occurrence keeps its classpath position.
    pub fn add_dependency(&mut self, entry: DependencyEntry) -> bool {
        if self.dependencies.contains(&entry) {
            return false;
        }
        self.dependencies.push(entry);
        true
    }

    /// Appends a repository, collapsing duplicates
    pub fn add_repository(&mut self, repository: impl Into<String>) -> bool {
        let repository = repository.into();
        if self.repositories.contains(&repository) {
            return false;
        }
        self.repositories.push(repository);
        true
    }

    /// Records a convention name, collapsing duplicates
    pub fn add_convention(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.conventions.contains(&name) {
            return false;
        }
        self.conventions.push(name);
        true
    }

    /// Returns the entries declared for a given scope, in declaration order
    pub fn dependencies_in(&self, scope: Scope) -> impl Iterator<Item = &DependencyEntry> {
        self.dependencies.iter().filter(move |e| e.scope == scope)
    }

    /// Layers `override_spec` on top of `base`, producing a new spec
    ///
    /// - dependency entries append in order, exact duplicates collapse to
    ///   the first occurrence (classpath order stays reproducible)
    /// - convention and repository lists union preserving first-seen order
    /// - toolchain merges per field, override wins
    /// - engine: the override's selection wins if present
    pub fn merge(base: &ModuleSpec, override_spec: &ModuleSpec) -> ModuleSpec {
        let mut merged = base.clone();

        for name in &override_spec.conventions {
            merged.add_convention(name.clone());
        }
        for repository in &override_spec.repositories {
            merged.add_repository(repository.clone());
        }
        for entry in &override_spec.dependencies {
            merged.add_dependency(entry.clone());
        }

        merged.toolchain = base.toolchain.merged_with(&override_spec.toolchain);
        merged.engine = override_spec
            .engine
            .clone()
            .or_else(|| base.engine.clone());

        merged
    }
}
