//! Query commands (modules, status, explain)

use anyhow::Result;

use super::output::Output;
use super::resolve_cmd;
use crate::domain::{find_dependency, Coordinate, VersionSource};
use crate::storage::Workspace;

/// Lists workspace members in evaluation order
pub fn modules(output: &Output) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let declarations = workspace.declarations()?;
    let order = resolve_cmd::evaluation_order(&declarations)?;
    output.verbose_ctx("modules", &format!("{} members", order.len()));

    if output.is_json() {
        let items: Vec<_> = order
            .iter()
            .filter_map(|name| declarations.iter().find(|d| &d.name == name))
            .map(|d| {
                serde_json::json!({
                    "name": d.name,
                    "conventions": d.spec.conventions,
                    "uses": d.uses,
                })
            })
            .collect();
        output.data(&items);
    } else if order.is_empty() {
        println!("No members declared in truss.toml.");
    } else {
        println!("Modules in evaluation order:");
        println!("{:<20} {:<30} USES", "NAME", "CONVENTIONS");
        println!("{}", "-".repeat(70));
        for name in &order {
            if let Some(d) = declarations.iter().find(|d| &d.name == name) {
                println!(
                    "{:<20} {:<30} {}",
                    d.name,
                    d.spec.conventions.join(", "),
                    d.uses.join(", ")
                );
            }
        }
    }

    Ok(())
}

/// Shows a workspace overview
pub fn status(output: &Output) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let declarations = workspace.declarations()?;
    let registry = workspace.registry();
    let plan = resolve_cmd::resolve_workspace(&workspace)?;

    let dependency_count: usize = plan.modules.iter().map(|m| m.dependencies.len()).sum();
    let engines: Vec<String> = {
        let mut engines: Vec<String> = plan
            .modules
            .iter()
            .filter_map(|m| m.test.map(|t| t.engine.to_string()))
            .collect();
        engines.sort();
        engines.dedup();
        engines
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "root": workspace.root().display().to_string(),
            "policy": workspace.settings().constraint_policy.as_str(),
            "modules": declarations.len(),
            "conventions_known": registry.names(),
            "dependencies_resolved": dependency_count,
            "test_engines": engines,
            "fingerprint": plan.fingerprint,
        }));
    } else {
        println!("Workspace Status");
        println!("{}", "=".repeat(40));
        println!();
        println!("Root:         {}", workspace.root().display());
        println!("Policy:       {}", workspace.settings().constraint_policy.as_str());
        println!("Modules:      {}", declarations.len());
        println!("Dependencies: {} resolved", dependency_count);
        println!("Test engines: {}", if engines.is_empty() { "(none)".to_string() } else { engines.join(", ") });
        println!("Fingerprint:  {}", plan.fingerprint);
        println!();
        println!("Known conventions: {}", registry.names().join(", "));
    }

    Ok(())
}

/// Explains where a module's resolved version came from
pub fn explain(output: &Output, member: &str, coordinate: &str) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let coordinate: Coordinate = coordinate.parse()?;
    let policy = workspace.settings().constraint_policy;

    let resolved = resolve_cmd::resolve_one(&workspace, member)?;
    output.verbose_ctx("explain", &format!("Resolved module '{}'", resolved.name));

    let dependency = find_dependency(&resolved, &coordinate).ok_or_else(|| {
        anyhow::anyhow!(
            "Module '{}' has no dependency on {}:{}",
            resolved.name,
            coordinate.group(),
            coordinate.artifact()
        )
    })?;

    let origin = match dependency.source {
        VersionSource::Explicit => "declared explicitly by the module; no constraint pin exists",
        VersionSource::Pinned => "supplied by a constraint pin; the declaration is version-less",
        VersionSource::Both => "declared explicitly and pinned to the same version",
        VersionSource::ExplicitOverridesPin => {
            "declared explicitly; the advisory policy let it override the pin"
        }
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "module": resolved.name,
            "group": dependency.group,
            "artifact": dependency.artifact,
            "version": dependency.version,
            "scope": dependency.scope.as_str(),
            "source": dependency.source,
            "policy": policy.as_str(),
        }));
    } else {
        println!(
            "{}:{}:{} ({})",
            dependency.group, dependency.artifact, dependency.version, dependency.scope
        );
        println!("  module: {}", resolved.name);
        println!("  origin: {}", origin);
        println!("  policy: {}", policy.as_str());
    }

    Ok(())
}
