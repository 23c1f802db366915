//! Truss - A declarative build-configuration resolver
//!
//! Truss compiles the configuration of a multi-module workspace: named
//! conventions supply shared toolchains, repositories, and version pins;
//! module manifests layer their own dependencies on top; and the resolver
//! produces a build plan with every dependency pinned to exactly one
//! version and one test engine per module, or a precise error before
//! anything would compile.

pub mod cli;
pub mod convention;
pub mod domain;
pub mod storage;

pub use domain::{Coordinate, ModuleSpec, ResolvedModule, Scope, TestEngine};
