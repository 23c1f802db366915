//! Dependency constraint sets
//!
//! A constraint pins a `(group, artifact)` pair to exactly one version
//! without forcing a direct dependency. Constraint sets merge across
//! conventions, BOM imports, and the module manifest; two pins that
//! disagree are a configuration error, never a silent override.
//!
//! Whether an explicit version in a dependency declaration may disagree
//! with a pin is governed by [`ConstraintPolicy`], a single workspace-wide
//! setting. There are no per-module exceptions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::coordinate::Coordinate;

#[derive(Debug, Error, PartialEq)]
pub enum ConstraintError {
    #[error("Conflicting version constraints for {group}:{artifact}: '{existing}' vs '{incoming}'")]
    Conflict {
        group: String,
        artifact: String,
        existing: String,
        incoming: String,
    },

    #[error("No version resolvable for '{0}': no explicit version and no constraint pin")]
    Unresolved(Coordinate),
}

/// How an explicit dependency version interacts with a constraint pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintPolicy {
    /// An explicit version that disagrees with a pin is a conflict
    #[default]
    Strict,
    /// The explicit version wins; pins only fill in missing versions
    Advisory,
}

impl ConstraintPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintPolicy::Strict => "strict",
            ConstraintPolicy::Advisory => "advisory",
        }
    }
}

/// Where a resolved version came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSource {
    /// Declared on the dependency itself; no pin existed
    Explicit,
    /// Supplied by a constraint pin; the declaration was version-less
    Pinned,
    /// Declared explicitly and pinned to the same version
    Both,
    /// Declared explicitly, pin disagreed, advisory policy let it win
    ExplicitOverridesPin,
}

/// A resolved version together with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub version: String,
    pub source: VersionSource,
}

/// A set of version pins keyed by `(group, artifact)`
///
/// Insertion order is irrelevant; lookups key on the coordinate identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    pins: HashMap<(String, String), String>,
}

impl ConstraintSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of pins
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Returns true if no pins exist
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Adds a pin for the coordinate's `(group, artifact)` identity
    ///
    /// A duplicate pin with the same version collapses silently; a
    /// different version is a [`ConstraintError::Conflict`].
    pub fn pin(
        &mut self,
        coordinate: &Coordinate,
        version: impl Into<String>,
    ) -> Result<(), ConstraintError> {
        let version = version.into();
        let key = (
            coordinate.group().to_string(),
            coordinate.artifact().to_string(),
        );

        match self.pins.get(&key) {
            Some(existing) if existing != &version => Err(ConstraintError::Conflict {
                group: key.0,
                artifact: key.1,
                existing: existing.clone(),
                incoming: version,
            }),
            _ => {
                self.pins.insert(key, version);
                Ok(())
            }
        }
    }

    /// Returns the pinned version for a coordinate, if any
    pub fn pinned(&self, coordinate: &Coordinate) -> Option<&str> {
        let key = (
            coordinate.group().to_string(),
            coordinate.artifact().to_string(),
        );
        self.pins.get(&key).map(String::as_str)
    }

    /// Merges another set into this one
    ///
    /// Equal pins collapse; the first disagreement aborts the merge with a
    /// conflict naming both versions. No partial state is observable to the
    /// caller on error because resolution stops there.
    pub fn merge(&mut self, other: &ConstraintSet) -> Result<(), ConstraintError> {
        // Deterministic error selection: report the lexicographically first
        // conflicting coordinate rather than HashMap iteration order.
        let mut entries: Vec<_> = other.pins.iter().collect();
        entries.sort();

        for ((group, artifact), version) in entries {
            let coordinate = Coordinate::new(group.clone(), artifact.clone());
            self.pin(&coordinate, version.clone())?;
        }
        Ok(())
    }

    /// Resolves a coordinate to exactly one version under the given policy
    ///
    /// | declared version | pin      | strict                  | advisory               |
    /// |------------------|----------|-------------------------|------------------------|
    /// | none             | none     | Unresolved              | Unresolved             |
    /// | none             | v        | v (Pinned)              | v (Pinned)             |
    /// | v                | none     | v (Explicit)            | v (Explicit)           |
    /// | v                | v        | v (Both)                | v (Both)               |
    /// | v1               | v2       | Conflict                | v1 (ExplicitOverridesPin) |
    pub fn resolve(
        &self,
        coordinate: &Coordinate,
        policy: ConstraintPolicy,
    ) -> Result<Resolution, ConstraintError> {
        let pinned = self.pinned(coordinate);

        match (coordinate.version(), pinned) {
            (None, None) => Err(ConstraintError::Unresolved(coordinate.clone())),
            (None, Some(pin)) => Ok(Resolution {
                version: pin.to_string(),
                source: VersionSource::Pinned,
            }),
            (Some(explicit), None) => Ok(Resolution {
                version: explicit.to_string(),
                source: VersionSource::Explicit,
            }),
            (Some(explicit), Some(pin)) if explicit == pin => Ok(Resolution {
                version: explicit.to_string(),
                source: VersionSource::Both,
            }),
            (Some(explicit), Some(pin)) => match policy {
                ConstraintPolicy::Strict => Err(ConstraintError::Conflict {
                    group: coordinate.group().to_string(),
                    artifact: coordinate.artifact().to_string(),
                    existing: pin.to_string(),
                    incoming: explicit.to_string(),
                }),
                ConstraintPolicy::Advisory => Ok(Resolution {
                    version: explicit.to_string(),
                    source: VersionSource::ExplicitOverridesPin,
                }),
            },
        }
    }

    /// Iterates over all pins as `(group, artifact, version)`, sorted
    pub fn iter_sorted(&self) -> Vec<(&str, &str, &str)> {
        let mut entries: Vec<_> = self
            .pins
            .iter()
            .map(|((g, a), v)| (g.as_str(), a.as_str(), v.as_str()))
            .collect();
        entries.sort();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(s: &str) -> Coordinate {
        s.parse().unwrap()
    }

    #[test]
    fn pin_and_lookup() {
        let mut set = ConstraintSet::new();
        set.pin(&coord("org.apache.commons:commons-text"), "1.10.0")
            .unwrap();

        assert_eq!(
            set.pinned(&coord("org.apache.commons:commons-text")),
            Some("1.10.0")
        );
        assert_eq!(set.pinned(&coord("com.acme:widget")), None);
    }

    #[test]
    fn pin_ignores_declared_version_in_key() {
        let mut set = ConstraintSet::new();
        set.pin(&coord("com.acme:widget:9.9"), "2.1").unwrap();

        // Lookup keys on (group, artifact) only
        assert_eq!(set.pinned(&coord("com.acme:widget")), Some("2.1"));
    }

    #[test]
    fn equal_pins_collapse() {
        let mut set = ConstraintSet::new();
        set.pin(&coord("com.acme:widget"), "2.1").unwrap();
        set.pin(&coord("com.acme:widget"), "2.1").unwrap();

        assert_eq!(set.len(), 1);
    }

    #[test]
    fn conflicting_pins_name_both_versions() {
        let mut set = ConstraintSet::new();
        set.pin(&coord("org.apache.commons:commons-text"), "1.10.0")
            .unwrap();

        let err = set
            .pin(&coord("org.apache.commons:commons-text"), "1.11.0")
            .unwrap_err();

        assert_eq!(
            err,
            ConstraintError::Conflict {
                group: "org.apache.commons".to_string(),
                artifact: "commons-text".to_string(),
                existing: "1.10.0".to_string(),
                incoming: "1.11.0".to_string(),
            }
        );
        let message = err.to_string();
        assert!(message.contains("1.10.0"));
        assert!(message.contains("1.11.0"));
    }

    #[test]
    fn merge_disjoint_sets() {
        let mut left = ConstraintSet::new();
        left.pin(&coord("a:one"), "1.0").unwrap();

        let mut right = ConstraintSet::new();
        right.pin(&coord("a:two"), "2.0").unwrap();

        left.merge(&right).unwrap();
        assert_eq!(left.len(), 2);
    }

    #[test]
    fn merge_conflict_fails() {
        let mut left = ConstraintSet::new();
        left.pin(&coord("org.apache.commons:commons-text"), "1.10.0")
            .unwrap();

        let mut right = ConstraintSet::new();
        right
            .pin(&coord("org.apache.commons:commons-text"), "1.11.0")
            .unwrap();

        assert!(matches!(
            left.merge(&right),
            Err(ConstraintError::Conflict { .. })
        ));
    }

    #[test]
    fn resolve_versionless_against_pin() {
        let mut set = ConstraintSet::new();
        set.pin(&coord("org.apache.commons:commons-text"), "1.10.0")
            .unwrap();

        let resolution = set
            .resolve(
                &coord("org.apache.commons:commons-text"),
                ConstraintPolicy::Strict,
            )
            .unwrap();

        assert_eq!(resolution.version, "1.10.0");
        assert_eq!(resolution.source, VersionSource::Pinned);
    }

    #[test]
    fn resolve_without_pin_or_version_fails() {
        let set = ConstraintSet::new();
        let err = set
            .resolve(&coord("com.acme:widget"), ConstraintPolicy::Strict)
            .unwrap_err();

        assert_eq!(err, ConstraintError::Unresolved(coord("com.acme:widget")));
    }

    #[test]
    fn resolve_explicit_without_pin() {
        let set = ConstraintSet::new();
        let resolution = set
            .resolve(&coord("com.acme:widget:2.1"), ConstraintPolicy::Strict)
            .unwrap();

        assert_eq!(resolution.version, "2.1");
        assert_eq!(resolution.source, VersionSource::Explicit);
    }

    #[test]
    fn resolve_agreeing_explicit_and_pin() {
        let mut set = ConstraintSet::new();
        set.pin(&coord("com.acme:widget"), "2.1").unwrap();

        let resolution = set
            .resolve(&coord("com.acme:widget:2.1"), ConstraintPolicy::Strict)
            .unwrap();

        assert_eq!(resolution.source, VersionSource::Both);
    }

    #[test]
    fn strict_policy_rejects_disagreement() {
        let mut set = ConstraintSet::new();
        set.pin(&coord("com.acme:widget"), "2.1").unwrap();

        let err = set
            .resolve(&coord("com.acme:widget:3.0"), ConstraintPolicy::Strict)
            .unwrap_err();

        assert!(matches!(err, ConstraintError::Conflict { existing, incoming, .. }
            if existing == "2.1" && incoming == "3.0"));
    }

    #[test]
    fn advisory_policy_lets_explicit_win() {
        let mut set = ConstraintSet::new();
        set.pin(&coord("com.acme:widget"), "2.1").unwrap();

        let resolution = set
            .resolve(&coord("com.acme:widget:3.0"), ConstraintPolicy::Advisory)
            .unwrap();

        assert_eq!(resolution.version, "3.0");
        assert_eq!(resolution.source, VersionSource::ExplicitOverridesPin);
    }

    #[test]
    fn iter_sorted_is_deterministic() {
        let mut set = ConstraintSet::new();
        set.pin(&coord("b:two"), "2.0").unwrap();
        set.pin(&coord("a:one"), "1.0").unwrap();

        assert_eq!(
            set.iter_sorted(),
            vec![("a", "one", "1.0"), ("b", "two", "2.0")]
        );
    }
}
