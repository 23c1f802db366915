//! # Storage Layer
//!
//! Declarative inputs and resolved outputs, all plain files.
//!
//! ## File Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Workspace | TOML | `truss.toml` |
//! | Module manifests | TOML | `<member>/module.toml` |
//! | Conventions | TOML | `.truss/conventions/*.toml` |
//! | BOM files | TOML | anywhere, referenced by manifests |
//! | Resolved plan | JSON | `.truss/plan.json` |
//! | User config | TOML | `~/.config/truss/config.toml` |
//!
//! Everything is read once per invocation; the plan is the only output.
//!
//! ## Workspace Structure
//!
//! ```text
//! truss.toml                # members + [settings]
//! .truss/
//! ├── conventions/          # project convention fragments
//! │   └── company.toml
//! └── plan.json             # resolved plan (regenerated, git-ignored)
//! app/
//! └── module.toml           # member manifest
//! ```
//!
//! ## Key Types
//!
//! - [`Workspace`] - Entry point: root discovery, members, settings
//! - [`ModuleManifest`] / [`BomFile`] - Per-member declarations
//! - [`BuildPlan`] - The resolved output with its fingerprint
//! - [`GlobalConfig`] - User-level defaults

mod config;
mod manifest;
mod plan;
mod workspace;

pub use config::{ConfigError, GlobalConfig, OutputFormat, WorkspaceSettings};
pub use manifest::{BomFile, ManifestError, ModuleManifest, MANIFEST_FILE};
pub use plan::BuildPlan;
pub use workspace::{Workspace, WorkspaceError, WORKSPACE_FILE};
