//! Module manifests and BOM files
//!
//! Each workspace member declares its build in `module.toml`:
//!
//! ```toml
//! conventions = ["base", "application"]
//! uses = ["lib"]
//! boms = ["../boms/platform.toml"]
//!
//! [dependencies]
//! compile = ["org.apache.commons:commons-text"]
//!
//! [constraints]
//! "com.acme:widget" = "2.1"
//!
//! [test]
//! engine = "junit-platform"
//! ```
//!
//! A BOM file is a constraint table imported wholesale; its pins go
//! through the same conflict-checked merge as every other source.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::convention::{parse_constraints, FragmentError, ScopedDependencies, TestSection};
use crate::domain::{ConstraintSet, ModuleDeclaration, ModuleSpec, Toolchain};

/// Manifest file name inside each member directory
pub const MANIFEST_FILE: &str = "module.toml";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error(transparent)]
    Fragment(#[from] FragmentError),

    #[error("Malformed manifest: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The on-disk schema of a module manifest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleManifest {
    /// Module name; defaults to the member directory name
    pub name: Option<String>,

    /// Conventions to apply, in order
    pub conventions: Vec<String>,

    /// Sibling modules this module uses
    pub uses: Vec<String>,

    /// BOM files to import, paths relative to the module directory
    pub boms: Vec<String>,

    /// Toolchain override
    pub toolchain: Toolchain,

    /// Scope-keyed dependency declarations
    pub dependencies: ScopedDependencies,

    /// Module-level version pins
    pub constraints: BTreeMap<String, String>,

    /// Test configuration override
    pub test: TestSection,
}

impl ModuleManifest {
    /// Parses a manifest from TOML text
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses `module.toml` from a member directory
    pub fn load(module_dir: &Path) -> Result<Self> {
        let path = module_dir.join(MANIFEST_FILE);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

        Self::parse(&text).with_context(|| format!("Failed to parse manifest: {}", path.display()))
    }

    /// Builds the module's own spec fragment (no conventions applied)
    pub fn spec(&self) -> Result<ModuleSpec, ManifestError> {
        let mut spec = ModuleSpec::new();

        for name in &self.conventions {
            spec.add_convention(name.clone());
        }
        spec.toolchain = self.toolchain.clone();
        for entry in self.dependencies.entries("module dependencies")? {
            spec.add_dependency(entry);
        }
        spec.engine = self.test.engine.clone();

        Ok(spec)
    }

    /// Converts the manifest into a resolvable declaration
    ///
    /// BOM files are read relative to `module_dir`; `fallback_name` is the
    /// member directory name used when the manifest sets none.
    pub fn declaration(&self, fallback_name: &str, module_dir: &Path) -> Result<ModuleDeclaration> {
        let name = self.name.clone().unwrap_or_else(|| fallback_name.to_string());

        let spec = self
            .spec()
            .with_context(|| format!("Invalid manifest for module '{}'", name))?;
        let constraints = parse_constraints(&self.constraints)
            .with_context(|| format!("Invalid constraints in module '{}'", name))?;

        let mut boms = Vec::with_capacity(self.boms.len());
        for bom_path in &self.boms {
            let path = module_dir.join(bom_path);
            boms.push(
                BomFile::load(&path)?
                    .constraint_set()
                    .with_context(|| format!("Invalid BOM: {}", path.display()))?,
            );
        }

        Ok(ModuleDeclaration {
            name,
            spec,
            constraints,
            boms,
            uses: self.uses.clone(),
        })
    }
}

/// A bill of materials: a coordinated list of version pins
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BomFile {
    /// Free-form description of what this BOM coordinates
    pub description: Option<String>,

    /// The pins: `"group:artifact" = "version"`
    pub constraints: BTreeMap<String, String>,
}

impl BomFile {
    /// Parses a BOM from TOML text
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a BOM file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read BOM: {}", path.display()))?;

        Self::parse(&text).with_context(|| format!("Failed to parse BOM: {}", path.display()))
    }

    /// Converts the pin table into a constraint set
    pub fn constraint_set(&self) -> Result<ConstraintSet, ManifestError> {
        Ok(parse_constraints(&self.constraints)?)
    }
}
