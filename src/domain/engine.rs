//! Test engine selection
//!
//! Exactly one test-platform engine is active per module's test task.
//! Selection happens last during resolution: an explicit module choice
//! beats convention defaults, and an unrecognized identifier aborts the
//! configuration with no test task generated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("Unsupported test engine '{0}' (supported: {supported})", supported = supported_list())]
    Unsupported(String),
}

/// Test-platform engines recognized by the build tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestEngine {
    /// JUnit Platform (JUnit 5 / Jupiter)
    JunitPlatform,
    /// Legacy JUnit 4 runner
    Junit4,
    /// TestNG
    Testng,
}

impl TestEngine {
    /// All supported engines
    pub const ALL: [TestEngine; 3] =
        [TestEngine::JunitPlatform, TestEngine::Junit4, TestEngine::Testng];

    /// Returns the engine identifier used in manifests
    pub fn as_str(&self) -> &'static str {
        match self {
            TestEngine::JunitPlatform => "junit-platform",
            TestEngine::Junit4 => "junit4",
            TestEngine::Testng => "testng",
        }
    }
}

impl fmt::Display for TestEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestEngine {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "junit-platform" => Ok(TestEngine::JunitPlatform),
            "junit4" => Ok(TestEngine::Junit4),
            "testng" => Ok(TestEngine::Testng),
            other => Err(EngineError::Unsupported(other.to_string())),
        }
    }
}

fn supported_list() -> String {
    TestEngine::ALL
        .iter()
        .map(TestEngine::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Finalized test configuration for one module's test task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunnerConfig {
    /// The selected engine
    pub engine: TestEngine,
}

impl TestRunnerConfig {
    /// Selects an engine, validating the identifier
    pub fn select(engine: &str) -> Result<Self, EngineError> {
        Ok(Self {
            engine: engine.parse()?,
        })
    }
}
