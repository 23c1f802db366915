//! The resolution pipeline
//!
//! One-shot configuration compile for a single module: convention layers
//! merge first (leaf), the module's own declaration goes on top, every
//! dependency is resolved to exactly one version under the workspace
//! constraint policy, and the test runner is selected last. Pure, no I/O;
//! callers load manifests and conventions before entering.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::constraint::{
    ConstraintError, ConstraintPolicy, ConstraintSet, VersionSource,
};
use super::coordinate::Coordinate;
use super::engine::{EngineError, TestRunnerConfig};
use super::spec::{ModuleSpec, Scope, Toolchain};

#[derive(Debug, Error, PartialEq)]
pub enum ResolveError {
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A convention fragment flattened into resolvable parts
///
/// Produced by the convention registry (extends chains already expanded).
/// Pure data; applying a layer never executes anything.
#[derive(Debug, Clone, Default)]
pub struct ConventionLayer {
    /// Convention name, recorded on the resolved module
    pub name: String,
    /// Spec contribution (repositories, toolchain, default deps, engine)
    pub spec: ModuleSpec,
    /// Version pins contributed by this convention
    pub constraints: ConstraintSet,
}

/// A module's declaration, ready for resolution
///
/// Built by the manifest layer; BOM imports are carried as separate
/// constraint sets so conflicts surface through the same checked merge.
#[derive(Debug, Clone, Default)]
pub struct ModuleDeclaration {
    /// Module name (workspace member name)
    pub name: String,
    /// The module's own spec (dependencies, overrides)
    pub spec: ModuleSpec,
    /// Module-level constraint pins
    pub constraints: ConstraintSet,
    /// Constraint sets imported wholesale from BOM files, in import order
    pub boms: Vec<ConstraintSet>,
    /// Sibling modules this module uses
    pub uses: Vec<String>,
}

/// A dependency with its version fixed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDependency {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub scope: Scope,
    /// Where the version came from (pin, explicit, or both)
    pub source: VersionSource,
}

impl fmt::Display for ResolvedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} ({})",
            self.group, self.artifact, self.version, self.scope
        )
    }
}

/// The fully resolved configuration of one module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedModule {
    pub name: String,
    /// Conventions applied, in application order
    pub conventions: Vec<String>,
    pub toolchain: Toolchain,
    /// Repository lookup order
    pub repositories: Vec<String>,
    /// Sibling modules used, as declared
    pub uses: Vec<String>,
    /// Every dependency pinned to one version, declaration order preserved
    pub dependencies: Vec<ResolvedDependency>,
    /// Test runner, if any layer selected an engine
    pub test: Option<TestRunnerConfig>,
}

/// Merges convention layers and the module declaration into one spec
///
/// Fragments apply in request order; the module's own spec goes on top.
pub fn effective_spec(declaration: &ModuleDeclaration, layers: &[ConventionLayer]) -> ModuleSpec {
    let mut spec = ModuleSpec::new();

    for layer in layers {
        spec = ModuleSpec::merge(&spec, &layer.spec);
        spec.add_convention(layer.name.clone());
    }

    ModuleSpec::merge(&spec, &declaration.spec)
}

/// Merges every constraint source for a module into one checked set
///
/// Order: convention layers, then BOM imports, then module-level pins.
/// The first disagreement aborts with a conflict naming both versions.
pub fn effective_constraints(
    declaration: &ModuleDeclaration,
    layers: &[ConventionLayer],
) -> Result<ConstraintSet, ConstraintError> {
    let mut constraints = ConstraintSet::new();

    for layer in layers {
        constraints.merge(&layer.constraints)?;
    }
    for bom in &declaration.boms {
        constraints.merge(bom)?;
    }
    constraints.merge(&declaration.constraints)?;

    Ok(constraints)
}

/// Resolves one module to a [`ResolvedModule`] or the first typed error
pub fn resolve_module(
    declaration: &ModuleDeclaration,
    layers: &[ConventionLayer],
    policy: ConstraintPolicy,
) -> Result<ResolvedModule, ResolveError> {
    let spec = effective_spec(declaration, layers);
    let constraints = effective_constraints(declaration, layers)?;

    let mut dependencies = Vec::with_capacity(spec.dependencies.len());
    for entry in &spec.dependencies {
        let resolution = constraints.resolve(&entry.coordinate, policy)?;
        dependencies.push(ResolvedDependency {
            group: entry.coordinate.group().to_string(),
            artifact: entry.coordinate.artifact().to_string(),
            version: resolution.version,
            scope: entry.scope,
            source: resolution.source,
        });
    }

    // Selector runs last; an unknown identifier means no test task at all
    let test = match &spec.engine {
        Some(engine) => Some(TestRunnerConfig::select(engine)?),
        None => None,
    };

    Ok(ResolvedModule {
        name: declaration.name.clone(),
        conventions: spec.conventions,
        toolchain: spec.toolchain,
        repositories: spec.repositories,
        uses: declaration.uses.clone(),
        dependencies,
        test,
    })
}

/// Looks up the resolved dependency for a `(group, artifact)` pair
pub fn find_dependency<'a>(
    module: &'a ResolvedModule,
    coordinate: &Coordinate,
) -> Option<&'a ResolvedDependency> {
    module.dependencies.iter().find(|d| {
        d.group == coordinate.group() && d.artifact == coordinate.artifact()
    })
}
