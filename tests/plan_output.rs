//! End-to-end build plan content tests
//!
//! Drives the binary against constructed workspaces and asserts on the
//! resolved plan JSON: layering order, classpath order, constraint
//! provenance, and fingerprint stability.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn truss_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("truss"))
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Resolve the workspace at `dir` and parse the JSON plan
fn resolve_plan(dir: &Path) -> serde_json::Value {
    let output = truss_cmd()
        .current_dir(dir)
        .args(["resolve", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    serde_json::from_str(&stdout).unwrap()
}

/// A two-member workspace: a library and an application that uses it,
/// with a project convention extending base and a BOM import.
fn setup_layered_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();

    write_file(
        &dir.path().join("truss.toml"),
        r#"[workspace]
members = ["app", "lib"]

[settings]
constraint_policy = "strict"
"#,
    );

    write_file(
        &dir.path().join(".truss/conventions/company.toml"),
        r#"extends = ["base"]
repositories = ["https://repo.internal.example/releases"]

[constraints]
"com.acme:widget" = "2.1"

[test]
engine = "testng"
"#,
    );

    write_file(
        &dir.path().join("boms/containers.toml"),
        r#"description = "Container test harness versions"

[constraints]
"org.testcontainers:junit-jupiter" = "1.18.1"
"org.testcontainers:mongodb" = "1.18.1"
"#,
    );

    write_file(
        &dir.path().join("lib").join("module.toml"),
        r#"conventions = ["company"]

[dependencies]
compile = ["com.acme:widget"]
"#,
    );

    write_file(
        &dir.path().join("app").join("module.toml"),
        r#"conventions = ["company"]
uses = ["lib"]
boms = ["../boms/containers.toml"]

[toolchain]
version = "21"

[dependencies]
compile = [
    "com.acme:widget",
    "org.apache.commons:commons-text",
]
test_only = ["org.testcontainers:mongodb"]

[test]
engine = "junit-platform"
"#,
    );

    dir
}

fn module<'a>(plan: &'a serde_json::Value, name: &str) -> &'a serde_json::Value {
    plan["modules"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["name"] == name)
        .unwrap()
}

fn dependency<'a>(module: &'a serde_json::Value, artifact: &str) -> &'a serde_json::Value {
    module["dependencies"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["artifact"] == artifact)
        .unwrap()
}

#[test]
fn modules_come_out_in_evaluation_order() {
    let dir = setup_layered_workspace();
    let plan = resolve_plan(dir.path());

    let names: Vec<&str> = plan["modules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();

    assert_eq!(names, vec!["lib", "app"]);
    assert_eq!(module(&plan, "app")["uses"][0], "lib");
}

#[test]
fn extends_chain_flattens_into_conventions_list() {
    let dir = setup_layered_workspace();
    let plan = resolve_plan(dir.path());

    let conventions: Vec<&str> = module(&plan, "lib")["conventions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();

    assert_eq!(conventions, vec!["base", "company"]);
}

#[test]
fn repositories_append_across_layers() {
    let dir = setup_layered_workspace();
    let plan = resolve_plan(dir.path());

    let repositories: Vec<&str> = module(&plan, "lib")["repositories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r.as_str().unwrap())
        .collect();

    // base first, then the company mirror
    assert_eq!(
        repositories,
        vec![
            "https://repo.maven.apache.org/maven2",
            "https://repo.internal.example/releases",
        ]
    );
}

#[test]
fn toolchain_merges_field_by_field() {
    let dir = setup_layered_workspace();
    let plan = resolve_plan(dir.path());

    // app overrides only the version; language comes from base
    let toolchain = &module(&plan, "app")["toolchain"];
    assert_eq!(toolchain["language"], "java");
    assert_eq!(toolchain["version"], "21");

    assert_eq!(module(&plan, "lib")["toolchain"]["version"], "17");
}

#[test]
fn classpath_order_is_convention_defaults_then_module_entries() {
    let dir = setup_layered_workspace();
    let plan = resolve_plan(dir.path());

    let artifacts: Vec<&str> = module(&plan, "app")["dependencies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["artifact"].as_str().unwrap())
        .collect();

    // base test defaults come first, module declarations follow in order
    assert_eq!(
        artifacts,
        vec![
            "junit-jupiter",
            "assertj-core",
            "widget",
            "commons-text",
            "mongodb",
        ]
    );
}

#[test]
fn version_sources_are_recorded() {
    let dir = setup_layered_workspace();
    let plan = resolve_plan(dir.path());
    let app = module(&plan, "app");

    // Pinned by the company convention
    let widget = dependency(app, "widget");
    assert_eq!(widget["version"], "2.1");
    assert_eq!(widget["source"], "pinned");

    // Pinned by base
    assert_eq!(dependency(app, "commons-text")["version"], "1.10.0");

    // Pinned by the imported BOM
    let mongodb = dependency(app, "mongodb");
    assert_eq!(mongodb["version"], "1.18.1");
    assert_eq!(mongodb["source"], "pinned");
    assert_eq!(mongodb["scope"], "test_only");

    // Declared explicitly by the base convention's defaults
    assert_eq!(dependency(app, "junit-jupiter")["source"], "explicit");
}

#[test]
fn engine_selection_module_beats_convention() {
    let dir = setup_layered_workspace();
    let plan = resolve_plan(dir.path());

    // company sets testng; app overrides back to junit-platform
    assert_eq!(module(&plan, "app")["test"]["engine"], "junit-platform");
    assert_eq!(module(&plan, "lib")["test"]["engine"], "testng");
}

#[test]
fn duplicate_declarations_collapse() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir.path().join("truss.toml"),
        "[workspace]\nmembers = [\"app\"]\n",
    );
    write_file(
        &dir.path().join("app/module.toml"),
        r#"conventions = ["base"]

[dependencies]
test_only = ["org.junit.jupiter:junit-jupiter:5.9.1"]
"#,
    );

    let plan = resolve_plan(dir.path());
    let count = module(&plan, "app")["dependencies"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|d| d["artifact"] == "junit-jupiter")
        .count();

    // Re-declaring base's default identically yields a single entry
    assert_eq!(count, 1);
}

#[test]
fn fingerprint_is_stable_across_runs() {
    let dir = setup_layered_workspace();

    let first = resolve_plan(dir.path());
    let second = resolve_plan(dir.path());

    assert_eq!(first["fingerprint"], second["fingerprint"]);
    assert!(!first["fingerprint"].as_str().unwrap().is_empty());
}

#[test]
fn fingerprint_tracks_content_changes() {
    let dir = setup_layered_workspace();
    let before = resolve_plan(dir.path());

    // Pin a new artifact in the company convention
    write_file(
        &dir.path().join(".truss/conventions/company.toml"),
        r#"extends = ["base"]
repositories = ["https://repo.internal.example/releases"]

[constraints]
"com.acme:widget" = "2.2"

[test]
engine = "testng"
"#,
    );

    let after = resolve_plan(dir.path());
    assert_ne!(before["fingerprint"], after["fingerprint"]);
    assert_eq!(dependency(module(&after, "app"), "widget")["version"], "2.2");
}

#[test]
fn plan_policy_reflects_settings() {
    let dir = setup_layered_workspace();
    let plan = resolve_plan(dir.path());

    assert_eq!(plan["policy"], "strict");
    assert!(plan["generated_at"].as_str().is_some());
}
