//! Dependency coordinates
//!
//! Coordinate format:
//! - Unversioned: `group:artifact` (e.g., `org.apache.commons:commons-text`)
//! - Versioned: `group:artifact:version` (e.g., `org.apache.commons:commons-text:1.10.0`)
//!
//! An unversioned coordinate must be resolved against a constraint set
//! before it can appear in a build plan.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Invalid coordinate format: expected 'group:artifact[:version]', got '{0}'")]
    InvalidFormat(String),

    #[error("Coordinate '{0}' has an empty {1} segment")]
    EmptySegment(String, &'static str),

    #[error("Coordinate '{0}' contains whitespace")]
    Whitespace(String),
}

/// A dependency coordinate: group, artifact, and an optional version
///
/// The version is optional at declaration time; a constraint set supplies
/// it during resolution. Serialized as the `group:artifact[:version]` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coordinate {
    group: String,
    artifact: String,
    version: Option<String>,
}

impl Coordinate {
    /// Creates an unversioned coordinate
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: None,
        }
    }

    /// Creates a versioned coordinate
    pub fn versioned(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: Some(version.into()),
        }
    }

    /// Returns the group segment
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Returns the artifact segment
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// Returns the explicit version, if one was declared
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns true if the coordinate carries an explicit version
    pub fn has_version(&self) -> bool {
        self.version.is_some()
    }

    /// Returns the `(group, artifact)` identity, ignoring the version
    ///
    /// Constraint lookup and duplicate detection key on this pair.
    pub fn key(&self) -> (&str, &str) {
        (&self.group, &self.artifact)
    }

    /// Returns the `group:artifact` form without any version
    pub fn unversioned(&self) -> Coordinate {
        Coordinate {
            group: self.group.clone(),
            artifact: self.artifact.clone(),
            version: None,
        }
    }

    /// Returns a copy of this coordinate with the given version
    pub fn with_version(&self, version: impl Into<String>) -> Coordinate {
        Coordinate {
            group: self.group.clone(),
            artifact: self.artifact.clone(),
            version: Some(version.into()),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}:{}:{}", self.group, self.artifact, v),
            None => write!(f, "{}:{}", self.group, self.artifact),
        }
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.chars().any(char::is_whitespace) {
            return Err(CoordinateError::Whitespace(s.to_string()));
        }

        let segments: Vec<&str> = s.split(':').collect();
        let (group, artifact, version) = match segments.as_slice() {
            [group, artifact] => (*group, *artifact, None),
            [group, artifact, version] => (*group, *artifact, Some(*version)),
            _ => return Err(CoordinateError::InvalidFormat(s.to_string())),
        };

        if group.is_empty() {
            return Err(CoordinateError::EmptySegment(s.to_string(), "group"));
        }
        if artifact.is_empty() {
            return Err(CoordinateError::EmptySegment(s.to_string(), "artifact"));
        }
        if version == Some("") {
            return Err(CoordinateError::EmptySegment(s.to_string(), "version"));
        }

        Ok(Self {
            group: group.to_string(),
            artifact: artifact.to_string(),
            version: version.map(str::to_string),
        })
    }
}

impl TryFrom<String> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Coordinate> for String {
    fn from(coordinate: Coordinate) -> Self {
        coordinate.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_unversioned() {
        let coord: Coordinate = "org.apache.commons:commons-text".parse().unwrap();

        assert_eq!(coord.group(), "org.apache.commons");
        assert_eq!(coord.artifact(), "commons-text");
        assert_eq!(coord.version(), None);
    }

    #[test]
    fn parse_versioned() {
        let coord: Coordinate = "org.junit.jupiter:junit-jupiter:5.9.1".parse().unwrap();

        assert_eq!(coord.group(), "org.junit.jupiter");
        assert_eq!(coord.artifact(), "junit-jupiter");
        assert_eq!(coord.version(), Some("5.9.1"));
    }

    #[test]
    fn display_round_trip() {
        for s in [
            "org.apache.commons:commons-text",
            "org.apache.commons:commons-text:1.10.0",
        ] {
            let coord: Coordinate = s.parse().unwrap();
            assert_eq!(coord.to_string(), s);
        }
    }

    #[test]
    fn parse_trims_outer_whitespace() {
        let coord: Coordinate = "  com.acme:widget  ".parse().unwrap();
        assert_eq!(coord.to_string(), "com.acme:widget");
    }

    #[test]
    fn reject_wrong_segment_count() {
        assert!(matches!(
            "commons-text".parse::<Coordinate>(),
            Err(CoordinateError::InvalidFormat(_))
        ));
        assert!(matches!(
            "a:b:c:d".parse::<Coordinate>(),
            Err(CoordinateError::InvalidFormat(_))
        ));
    }

    #[test]
    fn reject_empty_segments() {
        assert!(matches!(
            ":commons-text".parse::<Coordinate>(),
            Err(CoordinateError::EmptySegment(_, "group"))
        ));
        assert!(matches!(
            "org.apache.commons:".parse::<Coordinate>(),
            Err(CoordinateError::EmptySegment(_, "artifact"))
        ));
        assert!(matches!(
            "org.apache.commons:commons-text:".parse::<Coordinate>(),
            Err(CoordinateError::EmptySegment(_, "version"))
        ));
    }

    #[test]
    fn reject_inner_whitespace() {
        assert!(matches!(
            "org.apache commons:commons-text".parse::<Coordinate>(),
            Err(CoordinateError::Whitespace(_))
        ));
    }

    #[test]
    fn key_ignores_version() {
        let pinned = Coordinate::versioned("com.acme", "widget", "2.1");
        let bare = Coordinate::new("com.acme", "widget");

        assert_eq!(pinned.key(), bare.key());
        assert_ne!(pinned, bare);
    }

    #[test]
    fn with_version_replaces() {
        let coord = Coordinate::versioned("com.acme", "widget", "1.0");
        assert_eq!(coord.with_version("2.0").version(), Some("2.0"));
    }

    #[test]
    fn serde_string_form() {
        let coord: Coordinate = serde_json::from_str("\"com.acme:widget:2.1\"").unwrap();
        assert_eq!(coord.version(), Some("2.1"));

        let json = serde_json::to_string(&coord).unwrap();
        assert_eq!(json, "\"com.acme:widget:2.1\"");
    }

    #[test]
    fn serde_rejects_invalid() {
        let result: Result<Coordinate, _> = serde_json::from_str("\"not-a-coordinate\"");
        assert!(result.is_err());
    }
}
