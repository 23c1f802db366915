//! Workspace management
//!
//! A workspace is a directory with a `truss.toml` at its root listing the
//! member modules. Handles root discovery, scaffolding, and member
//! manifest loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::convention::ConventionRegistry;
use crate::domain::ModuleDeclaration;

use super::config::WorkspaceSettings;
use super::manifest::ModuleManifest;

/// Workspace marker file
pub const WORKSPACE_FILE: &str = "truss.toml";

#[derive(Debug, Error, PartialEq)]
pub enum WorkspaceError {
    #[error("Not in a truss workspace. Run 'truss init' first.")]
    NotInWorkspace,

    #[error("Duplicate workspace member: {0}")]
    DuplicateMember(String),

    #[error("Unknown workspace member: {0}")]
    UnknownMember(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WorkspaceSection {
    members: Vec<String>,
}

/// The on-disk schema of `truss.toml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WorkspaceFile {
    workspace: WorkspaceSection,
    settings: WorkspaceSettings,
}

/// An opened truss workspace
pub struct Workspace {
    root: PathBuf,
    file: WorkspaceFile,
}

impl Workspace {
    /// Opens an existing workspace at the given root
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let path = root.join(WORKSPACE_FILE);

        if !path.is_file() {
            return Err(WorkspaceError::NotInWorkspace.into());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read workspace file: {}", path.display()))?;
        let file: WorkspaceFile = toml::from_str(&text)
            .with_context(|| format!("Failed to parse workspace file: {}", path.display()))?;

        let workspace = Self { root, file };
        workspace.check_members()?;
        Ok(workspace)
    }

    /// Opens the workspace at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Self::find_root().ok_or(WorkspaceError::NotInWorkspace)?;
        Self::open(root)
    }

    /// Finds the workspace root by walking up from the current directory
    pub fn find_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(WORKSPACE_FILE).is_file() {
                return Some(current);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Initializes a workspace at the given path, idempotently
    ///
    /// Scaffolds `truss.toml` with one sample member, the conventions
    /// directory, and a sample manifest. Existing files are left alone.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create workspace root: {}", root.display()))?;

        let workspace_path = root.join(WORKSPACE_FILE);
        let fresh = !workspace_path.exists();
        if fresh {
            let default_workspace = r#"# Truss workspace.
# Members are resolved in declaration order; see 'truss modules'.

[workspace]
members = ["app"]

[settings]
# strict: an explicit version that disagrees with a constraint pin is an
# error. advisory: the explicit version wins.
constraint_policy = "strict"
"#;
            fs::write(&workspace_path, default_workspace).with_context(|| {
                format!("Failed to write workspace file: {}", workspace_path.display())
            })?;
        }

        let truss_dir = root.join(".truss");
        let conventions_dir = truss_dir.join("conventions");
        fs::create_dir_all(&conventions_dir).with_context(|| {
            format!(
                "Failed to create conventions directory: {}",
                conventions_dir.display()
            )
        })?;

        let gitignore_path = truss_dir.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(&gitignore_path, "# Resolved plans are regenerated\nplan.json\n")
                .with_context(|| {
                    format!("Failed to write .gitignore: {}", gitignore_path.display())
                })?;
        }

        // Sample member only for a brand-new workspace; re-running init on
        // an existing one must not invent modules.
        if fresh {
            let app_dir = root.join("app");
            fs::create_dir_all(&app_dir).with_context(|| {
                format!("Failed to create member directory: {}", app_dir.display())
            })?;

            let manifest_path = app_dir.join("module.toml");
            if !manifest_path.exists() {
                let default_manifest = r#"# Sample application module.
conventions = ["base", "application"]

[dependencies]
compile = [
    # Version supplied by the 'base' convention's constraint pin
    "org.apache.commons:commons-text",
]

[test]
engine = "junit-platform"
"#;
                fs::write(&manifest_path, default_manifest).with_context(|| {
                    format!("Failed to write manifest: {}", manifest_path.display())
                })?;
            }
        }

        Self::open(root)
    }

    /// Returns the workspace root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.truss` directory path
    pub fn truss_dir(&self) -> PathBuf {
        self.root.join(".truss")
    }

    /// Returns the project conventions directory
    pub fn conventions_dir(&self) -> PathBuf {
        self.truss_dir().join("conventions")
    }

    /// Returns the default plan output path
    pub fn plan_path(&self) -> PathBuf {
        self.truss_dir().join("plan.json")
    }

    /// Returns the member paths in declaration order
    pub fn members(&self) -> &[String] {
        &self.file.workspace.members
    }

    /// Returns the workspace settings
    pub fn settings(&self) -> &WorkspaceSettings {
        &self.file.settings
    }

    /// Returns the directory of a member
    pub fn member_dir(&self, member: &str) -> PathBuf {
        self.root.join(member)
    }

    /// Returns the module name of a member (last path segment)
    pub fn member_name(member: &str) -> &str {
        member.rsplit('/').next().unwrap_or(member)
    }

    /// Returns a convention registry with project fragments discovered
    pub fn registry(&self) -> ConventionRegistry {
        let mut registry = ConventionRegistry::new();
        registry.add_convention_dir(self.conventions_dir());
        registry.discover();
        registry
    }

    /// Loads one member's declaration, addressed by path or module name
    pub fn declaration(&self, member: &str) -> Result<ModuleDeclaration> {
        let member = self
            .members()
            .iter()
            .find(|m| *m == member || Self::member_name(m) == member)
            .ok_or_else(|| WorkspaceError::UnknownMember(member.to_string()))?
            .clone();

        let dir = self.member_dir(&member);
        let manifest = ModuleManifest::load(&dir)?;
        manifest.declaration(Self::member_name(&member), &dir)
    }

    /// Loads all member declarations in declaration order
    pub fn declarations(&self) -> Result<Vec<ModuleDeclaration>> {
        let mut declarations = Vec::with_capacity(self.members().len());
        for member in self.members() {
            let dir = self.member_dir(member);
            let manifest = ModuleManifest::load(&dir)
                .with_context(|| format!("Failed to load member '{}'", member))?;
            declarations.push(manifest.declaration(Self::member_name(member), &dir)?);
        }
        Ok(declarations)
    }

    fn check_members(&self) -> Result<(), WorkspaceError> {
        let mut seen: Vec<&str> = Vec::new();
        for member in self.members() {
            let name = Self::member_name(member);
            if seen.contains(&name) {
                return Err(WorkspaceError::DuplicateMember(name.to_string()));
            }
            seen.push(name);
        }
        Ok(())
    }
}
