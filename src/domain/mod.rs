//! Domain models for Truss
//!
//! Contains the resolution logic without any I/O concerns.

mod constraint;
mod coordinate;
mod engine;
mod graph;
mod resolve;
mod spec;

pub use constraint::{
    ConstraintError, ConstraintPolicy, ConstraintSet, Resolution, VersionSource,
};
pub use coordinate::{Coordinate, CoordinateError};
pub use engine::{EngineError, TestEngine, TestRunnerConfig};
pub use graph::{GraphError, ModuleGraph};
pub use resolve::{
    effective_constraints, effective_spec, find_dependency, resolve_module, ConventionLayer,
    ModuleDeclaration, ResolveError, ResolvedDependency, ResolvedModule,
};
pub use spec::{DependencyEntry, ModuleSpec, Scope, Toolchain};
