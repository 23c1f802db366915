//! The resolve command
//!
//! Runs the full configuration compile: workspace -> module graph ->
//! conventions -> constraint resolution -> build plan. Aborts on the
//! first configuration error, before any plan is emitted.

use std::path::Path;

use anyhow::{Context, Result};

use super::output::Output;
use crate::domain::{resolve_module, ModuleDeclaration, ModuleGraph, ResolvedModule};
use crate::storage::{BuildPlan, Workspace};

/// Resolves every member of a workspace into a build plan
///
/// Modules come out in evaluation order; the first typed error aborts
/// with the offending module named in the context chain.
pub fn resolve_workspace(workspace: &Workspace) -> Result<BuildPlan> {
    let declarations = workspace.declarations()?;
    let order = evaluation_order(&declarations)?;
    let registry = workspace.registry();
    let policy = workspace.settings().constraint_policy;

    let mut modules = Vec::with_capacity(order.len());
    for name in &order {
        let declaration = declarations
            .iter()
            .find(|d| &d.name == name)
            .context("module graph returned an undeclared module")?;

        let layers = registry
            .layers(&declaration.spec.conventions)
            .with_context(|| format!("Failed to load conventions for module '{}'", name))?;

        let resolved = resolve_module(declaration, &layers, policy)
            .with_context(|| format!("Failed to resolve module '{}'", name))?;
        modules.push(resolved);
    }

    Ok(BuildPlan::new(policy, modules))
}

/// Resolves a single member without touching its siblings
pub fn resolve_one(workspace: &Workspace, member: &str) -> Result<ResolvedModule> {
    let declaration = workspace.declaration(member)?;
    let registry = workspace.registry();

    let layers = registry
        .layers(&declaration.spec.conventions)
        .with_context(|| format!("Failed to load conventions for module '{}'", declaration.name))?;

    resolve_module(
        &declaration,
        &layers,
        workspace.settings().constraint_policy,
    )
    .with_context(|| format!("Failed to resolve module '{}'", declaration.name))
}

/// Builds the module graph and returns the evaluation order
pub fn evaluation_order(declarations: &[ModuleDeclaration]) -> Result<Vec<String>> {
    let members: Vec<(&str, &[String])> = declarations
        .iter()
        .map(|d| (d.name.as_str(), d.uses.as_slice()))
        .collect();

    let graph = ModuleGraph::from_members(members).context("Invalid module graph")?;
    Ok(graph.evaluation_order()?)
}

/// Entry point for `truss resolve`
pub fn run(output: &Output, member: Option<&str>, out: Option<&Path>) -> Result<()> {
    let workspace = Workspace::open_current()?;
    output.verbose_ctx(
        "resolve",
        &format!("Opened workspace at: {}", workspace.root().display()),
    );

    match member {
        Some(member) => {
            let resolved = resolve_one(&workspace, member)?;
            output.verbose_ctx(
                "resolve",
                &format!("Resolved {} dependencies", resolved.dependencies.len()),
            );

            if output.is_json() {
                output.data(&resolved);
            } else {
                print_module(&resolved);
            }
        }
        None => {
            let plan = resolve_workspace(&workspace)?;
            output.verbose_ctx(
                "resolve",
                &format!("Resolved {} modules, fingerprint {}", plan.modules.len(), plan.fingerprint),
            );

            if let Some(path) = out {
                plan.write(path)?;
                output.success(&format!("Wrote plan to {}", path.display()));
            } else if output.is_json() {
                output.data(&plan);
            } else {
                print_plan(&plan);
            }
        }
    }

    Ok(())
}

fn print_plan(plan: &BuildPlan) {
    println!("Build plan ({} modules)", plan.modules.len());
    println!("Policy: {}", plan.policy.as_str());
    println!("Fingerprint: {}", plan.fingerprint);

    for module in &plan.modules {
        println!();
        print_module(module);
    }
}

fn print_module(module: &ResolvedModule) {
    println!("module {}", module.name);
    println!("  conventions: {}", module.conventions.join(", "));
    println!("  toolchain:   {}", module.toolchain);

    if !module.uses.is_empty() {
        println!("  uses:        {}", module.uses.join(", "));
    }
    for repository in &module.repositories {
        println!("  repository:  {}", repository);
    }

    match &module.test {
        Some(test) => println!("  test engine: {}", test.engine),
        None => println!("  test engine: (none)"),
    }

    if module.dependencies.is_empty() {
        println!("  dependencies: (none)");
    } else {
        println!("  dependencies:");
        for dep in &module.dependencies {
            println!(
                "    {:<24} {}:{}:{}",
                format!("[{}]", dep.scope),
                dep.group,
                dep.artifact,
                dep.version
            );
        }
    }
}
