//! Resolved build plans
//!
//! The output of one configuration-compile run: every module resolved, in
//! evaluation order, plus a content fingerprint so consumers can tell when
//! re-resolution actually changed anything. Plans serialize as JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ConstraintPolicy, ResolvedModule};

/// A fully resolved workspace configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPlan {
    /// When this plan was generated
    pub generated_at: DateTime<Utc>,

    /// The constraint policy the resolution ran under
    pub policy: ConstraintPolicy,

    /// Resolved modules in evaluation order (used before user)
    pub modules: Vec<ResolvedModule>,

    /// Content fingerprint over policy and modules (not the timestamp)
    pub fingerprint: String,
}

impl BuildPlan {
    /// Builds a plan from resolved modules, computing the fingerprint
    pub fn new(policy: ConstraintPolicy, modules: Vec<ResolvedModule>) -> Self {
        let fingerprint = fingerprint(policy, &modules);
        Self {
            generated_at: Utc::now(),
            policy,
            modules,
            fingerprint,
        }
    }

    /// Looks up a resolved module by name
    pub fn module(&self, name: &str) -> Option<&ResolvedModule> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Writes the plan as pretty-printed JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create plan directory: {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize plan")?;
        fs::write(path, json).with_context(|| format!("Failed to write plan: {}", path.display()))
    }

    /// Reads a previously written plan
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse plan: {}", path.display()))
    }
}

/// Hashes the resolution content, ignoring the generation timestamp
///
/// Module and dependency order is part of the content: classpath order is
/// meaningful, so reordering is a real change.
fn fingerprint(policy: ConstraintPolicy, modules: &[ResolvedModule]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(policy.as_str().as_bytes());
    // Vec-only model: serialization is deterministic
    if let Ok(bytes) = serde_json::to_vec(modules) {
        hasher.update(&bytes);
    }
    let hex = hasher.finalize().to_hex();
    hex[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Scope, Toolchain, VersionSource};
    use tempfile::TempDir;

    fn sample_module(name: &str) -> ResolvedModule {
        ResolvedModule {
            name: name.to_string(),
            conventions: vec!["base".to_string()],
            toolchain: Toolchain {
                language: Some("java".to_string()),
                version: Some("17".to_string()),
            },
            repositories: vec!["https://repo.maven.apache.org/maven2".to_string()],
            uses: vec![],
            dependencies: vec![crate::domain::ResolvedDependency {
                group: "org.apache.commons".to_string(),
                artifact: "commons-text".to_string(),
                version: "1.10.0".to_string(),
                scope: Scope::Compile,
                source: VersionSource::Pinned,
            }],
            test: None,
        }
    }

    #[test]
    fn identical_content_same_fingerprint() {
        let a = BuildPlan::new(ConstraintPolicy::Strict, vec![sample_module("app")]);
        let b = BuildPlan::new(ConstraintPolicy::Strict, vec![sample_module("app")]);

        assert_eq!(a.fingerprint, b.fingerprint);
    }

    #[test]
    fn content_changes_change_fingerprint() {
        let a = BuildPlan::new(ConstraintPolicy::Strict, vec![sample_module("app")]);
        let b = BuildPlan::new(ConstraintPolicy::Strict, vec![sample_module("lib")]);
        let c = BuildPlan::new(ConstraintPolicy::Advisory, vec![sample_module("app")]);

        assert_ne!(a.fingerprint, b.fingerprint);
        assert_ne!(a.fingerprint, c.fingerprint);
    }

    #[test]
    fn module_order_is_content() {
        let a = BuildPlan::new(
            ConstraintPolicy::Strict,
            vec![sample_module("a"), sample_module("b")],
        );
        let b = BuildPlan::new(
            ConstraintPolicy::Strict,
            vec![sample_module("b"), sample_module("a")],
        );

        assert_ne!(a.fingerprint, b.fingerprint);
    }

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".truss").join("plan.json");

        let plan = BuildPlan::new(ConstraintPolicy::Strict, vec![sample_module("app")]);
        plan.write(&path).unwrap();

        let loaded = BuildPlan::read(&path).unwrap();
        assert_eq!(loaded.fingerprint, plan.fingerprint);
        assert_eq!(loaded.modules.len(), 1);
        assert_eq!(loaded.module("app").unwrap().dependencies[0].version, "1.10.0");
    }

    #[test]
    fn missing_plan_read_fails() {
        let dir = TempDir::new().unwrap();
        assert!(BuildPlan::read(&dir.path().join("plan.json")).is_err());
    }
}
