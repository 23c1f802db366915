//! Convention discovery and loading
//!
//! Conventions are resolved from:
//! 1. `.truss/conventions/*.toml` in the workspace (highest precedence)
//! 2. Built-ins compiled into the binary
//!
//! Loading returns pure data; nothing is activated. Extends chains are
//! flattened into application order here so the resolver never sees them.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::ConventionLayer;

use super::builtin;
use super::fragment::{ConventionFragment, FragmentError};

#[derive(Debug, Error)]
pub enum ConventionError {
    #[error("Unknown convention: {0}")]
    Unknown(String),

    #[error("Convention extends cycle: {0}")]
    Cycle(String),

    #[error("Invalid convention '{name}': {source}")]
    Invalid {
        name: String,
        #[source]
        source: FragmentError,
    },

    #[error("Failed to read convention '{name}' from {path}: {message}")]
    Io {
        name: String,
        path: PathBuf,
        message: String,
    },
}

/// Loads convention fragments by name and flattens extends chains
pub struct ConventionRegistry {
    /// Project fragment files discovered on disk, name -> path
    project: HashMap<String, PathBuf>,

    /// Directories scanned by `discover`
    convention_dirs: Vec<PathBuf>,
}

impl ConventionRegistry {
    /// Creates a registry with only the built-in conventions
    pub fn new() -> Self {
        Self {
            project: HashMap::new(),
            convention_dirs: Vec::new(),
        }
    }

    /// Adds a directory to scan for `*.toml` fragments
    pub fn add_convention_dir(&mut self, dir: impl Into<PathBuf>) {
        self.convention_dirs.push(dir.into());
    }

    /// Discovers project fragments in the registered directories
    ///
    /// The fragment name is the file stem. First directory found wins when
    /// the same name appears twice; unreadable directories are skipped.
    pub fn discover(&mut self) {
        self.project.clear();

        for dir in &self.convention_dirs {
            let entries = match fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(_) => continue,
            };

            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().map(|e| e == "toml").unwrap_or(false) {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        self.project.entry(stem.to_string()).or_insert(path);
                    }
                }
            }
        }
    }

    /// Lists every known convention name, project fragments first
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.project.keys().cloned().collect();
        names.sort();
        for name in builtin::names() {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Returns true if the name resolves to a project fragment (not builtin)
    pub fn is_project(&self, name: &str) -> bool {
        self.project.contains_key(name)
    }

    /// Loads a single fragment by name without flattening extends
    pub fn load(&self, name: &str) -> Result<ConventionFragment, ConventionError> {
        if let Some(path) = self.project.get(name) {
            let text = fs::read_to_string(path).map_err(|e| ConventionError::Io {
                name: name.to_string(),
                path: path.clone(),
                message: e.to_string(),
            })?;
            return ConventionFragment::parse(&text).map_err(|source| ConventionError::Invalid {
                name: name.to_string(),
                source,
            });
        }

        match builtin::builtin(name) {
            Some(text) => {
                ConventionFragment::parse(text).map_err(|source| ConventionError::Invalid {
                    name: name.to_string(),
                    source,
                })
            }
            None => Err(ConventionError::Unknown(name.to_string())),
        }
    }

    /// Resolves requested conventions into layers in application order
    ///
    /// Each request expands depth-first: extends first, then the fragment
    /// itself. A name already applied is skipped, so diamonds collapse;
    /// a name currently being expanded is a cycle.
    pub fn layers(&self, requested: &[String]) -> Result<Vec<ConventionLayer>, ConventionError> {
        let mut layers = Vec::new();
        let mut applied = Vec::new();
        let mut expanding = Vec::new();

        for name in requested {
            self.expand(name, &mut layers, &mut applied, &mut expanding)?;
        }

        Ok(layers)
    }

    fn expand(
        &self,
        name: &str,
        layers: &mut Vec<ConventionLayer>,
        applied: &mut Vec<String>,
        expanding: &mut Vec<String>,
    ) -> Result<(), ConventionError> {
        if applied.iter().any(|n| n == name) {
            return Ok(());
        }
        if expanding.iter().any(|n| n == name) {
            let mut chain = expanding.clone();
            chain.push(name.to_string());
            return Err(ConventionError::Cycle(chain.join(" -> ")));
        }

        let fragment = self.load(name)?;

        expanding.push(name.to_string());
        for parent in &fragment.extends {
            self.expand(parent, layers, applied, expanding)?;
        }
        expanding.pop();

        applied.push(name.to_string());
        layers.push(
            fragment
                .to_layer(name)
                .map_err(|source| ConventionError::Invalid {
                    name: name.to_string(),
                    source,
                })?,
        );

        Ok(())
    }
}

impl Default for ConventionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
