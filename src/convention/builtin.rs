//! Built-in conventions
//!
//! Shipped in the binary so a fresh workspace resolves without authoring
//! any fragment. A project fragment with the same name takes precedence.

/// Shared defaults every module variant builds on
pub const BASE: &str = r#"# Shared build defaults.
repositories = ["https://repo.maven.apache.org/maven2"]

[toolchain]
language = "java"
version = "17"

[constraints]
"org.apache.commons:commons-text" = "1.10.0"

[dependencies]
test_only = [
    "org.junit.jupiter:junit-jupiter:5.9.1",
    "org.assertj:assertj-core:3.11.1",
]

[test]
engine = "junit-platform"
"#;

/// Defaults for runnable application modules
pub const APPLICATION: &str = r#"# Application modules: shared defaults, run from a main class.
extends = ["base"]
"#;

/// Defaults for library modules consumed by other members
pub const LIBRARY: &str = r#"# Library modules: shared defaults, published for other members.
extends = ["base"]
"#;

/// Returns the builtin fragment text for a name, if one exists
pub fn builtin(name: &str) -> Option<&'static str> {
    match name {
        "base" => Some(BASE),
        "application" => Some(APPLICATION),
        "library" => Some(LIBRARY),
        _ => None,
    }
}

/// Names of all builtin conventions
pub fn names() -> &'static [&'static str] {
    &["base", "application", "library"]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convention::fragment::ConventionFragment;

    #[test]
    fn all_builtins_parse() {
        for name in names() {
            let text = builtin(name).unwrap();
            let fragment = ConventionFragment::parse(text).unwrap();
            fragment.to_layer(name).unwrap();
        }
    }

    #[test]
    fn base_carries_the_shared_stack() {
        let fragment = ConventionFragment::parse(BASE).unwrap();

        assert_eq!(
            fragment.constraints.get("org.apache.commons:commons-text"),
            Some(&"1.10.0".to_string())
        );
        assert_eq!(fragment.test.engine.as_deref(), Some("junit-platform"));
        assert_eq!(fragment.repositories.len(), 1);
    }

    #[test]
    fn variants_extend_base() {
        for name in ["application", "library"] {
            let fragment = ConventionFragment::parse(builtin(name).unwrap()).unwrap();
            assert_eq!(fragment.extends, vec!["base"]);
        }
    }

    #[test]
    fn unknown_builtin_is_none() {
        assert!(builtin("nonexistent").is_none());
    }
}
