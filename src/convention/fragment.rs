//! Convention fragments
//!
//! A fragment is the pure-data contribution of one named convention:
//! repositories, toolchain, version pins, default dependencies, and a
//! default test engine. Fragments are authored as TOML:
//!
//! ```toml
//! extends = ["base"]
//! repositories = ["https://repo.maven.apache.org/maven2"]
//!
//! [toolchain]
//! language = "java"
//! version = "17"
//!
//! [constraints]
//! "org.apache.commons:commons-text" = "1.10.0"
//!
//! [dependencies]
//! test_only = ["org.junit.jupiter:junit-jupiter:5.9.1"]
//!
//! [test]
//! engine = "junit-platform"
//! ```
//!
//! Loading a fragment registers a capability, nothing more: the registry
//! hands back data and the resolver decides what to do with it.

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::{
    ConstraintError, ConstraintSet, ConventionLayer, Coordinate, CoordinateError,
    DependencyEntry, ModuleSpec, Scope, Toolchain,
};

#[derive(Debug, Error)]
pub enum FragmentError {
    #[error("Invalid coordinate '{coordinate}' in {context}: {source}")]
    Coordinate {
        coordinate: String,
        context: &'static str,
        #[source]
        source: CoordinateError,
    },

    #[error("Constraint key '{0}' must not carry a version; the value supplies it")]
    VersionedConstraintKey(String),

    #[error("Duplicate constraint in fragment: {0}")]
    DuplicatePin(#[from] ConstraintError),

    #[error("Malformed convention fragment: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Dependency arrays keyed by scope, declaration order preserved
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopedDependencies {
    pub compile: Vec<String>,
    pub runtime: Vec<String>,
    pub annotation_processing: Vec<String>,
    pub test_only: Vec<String>,
    pub development_only: Vec<String>,
}

impl ScopedDependencies {
    /// Scope arrays in classpath evaluation order
    fn by_scope(&self) -> [(Scope, &[String]); 5] {
        [
            (Scope::Compile, self.compile.as_slice()),
            (Scope::Runtime, self.runtime.as_slice()),
            (Scope::AnnotationProcessing, self.annotation_processing.as_slice()),
            (Scope::TestOnly, self.test_only.as_slice()),
            (Scope::DevelopmentOnly, self.development_only.as_slice()),
        ]
    }

    /// Parses every declaration into scope-qualified entries
    pub fn entries(&self, context: &'static str) -> Result<Vec<DependencyEntry>, FragmentError> {
        let mut entries = Vec::new();
        for (scope, declarations) in self.by_scope() {
            for declaration in declarations {
                let coordinate = parse_coordinate(declaration, context)?;
                entries.push(DependencyEntry::new(coordinate, scope));
            }
        }
        Ok(entries)
    }
}

/// Test section of a fragment or manifest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestSection {
    /// Engine identifier; validated when the runner is selected
    pub engine: Option<String>,
}

/// The on-disk schema of a convention fragment
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConventionFragment {
    /// Conventions this one layers on top of, applied first
    pub extends: Vec<String>,

    /// Artifact repositories in lookup order
    pub repositories: Vec<String>,

    /// Requested toolchain
    pub toolchain: Toolchain,

    /// Version pins: `"group:artifact" = "version"`
    pub constraints: BTreeMap<String, String>,

    /// Default dependencies contributed to every opted-in module
    pub dependencies: ScopedDependencies,

    /// Default test configuration
    pub test: TestSection,
}

impl ConventionFragment {
    /// Parses a fragment from TOML text
    pub fn parse(text: &str) -> Result<Self, FragmentError> {
        Ok(toml::from_str(text)?)
    }

    /// Converts the fragment into a resolvable layer named `name`
    pub fn to_layer(&self, name: &str) -> Result<ConventionLayer, FragmentError> {
        let mut spec = ModuleSpec::new();

        for repository in &self.repositories {
            spec.add_repository(repository.clone());
        }
        spec.toolchain = self.toolchain.clone();
        for entry in self.dependencies.entries("convention dependencies")? {
            spec.add_dependency(entry);
        }
        spec.engine = self.test.engine.clone();

        let constraints = parse_constraints(&self.constraints)?;

        Ok(ConventionLayer {
            name: name.to_string(),
            spec,
            constraints,
        })
    }
}

fn parse_coordinate(
    s: &str,
    context: &'static str,
) -> Result<Coordinate, FragmentError> {
    s.parse().map_err(|source| FragmentError::Coordinate {
        coordinate: s.to_string(),
        context,
        source,
    })
}

/// Parses a `"group:artifact" = "version"` table into a constraint set
///
/// Shared by convention fragments, module manifests, and BOM files;
/// the same rules apply everywhere: unversioned keys, checked pins.
pub fn parse_constraints(
    map: &BTreeMap<String, String>,
) -> Result<ConstraintSet, FragmentError> {
    let mut constraints = ConstraintSet::new();
    for (key, version) in map {
        let coordinate = parse_coordinate(key, "constraints")?;
        if coordinate.has_version() {
            return Err(FragmentError::VersionedConstraintKey(key.clone()));
        }
        constraints.pin(&coordinate, version.clone())?;
    }
    Ok(constraints)
}
