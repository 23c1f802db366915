//! # Convention System
//!
//! Named, reusable bundles of build settings applied to any module that
//! opts in: the shared half of every module's configuration.
//!
//! ## Model
//!
//! A convention is a **fragment**: pure data (repositories, toolchain,
//! version pins, default dependencies, default test engine) parsed from
//! TOML. Applying a convention is capability registration: the registry
//! returns the fragment's contents as a [`ConventionLayer`] and the
//! resolver folds layers together; nothing executes.
//!
//! ## Sources
//!
//! | Source | Location | Precedence |
//! |--------|----------|------------|
//! | Project fragments | `.truss/conventions/*.toml` | high |
//! | Built-ins | compiled into the binary | low |
//!
//! Built-ins: `base` (shared toolchain, repository, pins, test defaults),
//! `application` and `library` (both extend `base`).
//!
//! ## Extends
//!
//! Fragments may extend other fragments. Chains flatten depth-first into
//! application order, diamonds collapse to a single application, and
//! cycles are a [`ConventionError::Cycle`].
//!
//! [`ConventionLayer`]: crate::domain::ConventionLayer

pub mod builtin;
mod fragment;
mod registry;

pub use fragment::{
    parse_constraints, ConventionFragment, FragmentError, ScopedDependencies, TestSection,
};
pub use registry::{ConventionError, ConventionRegistry};
