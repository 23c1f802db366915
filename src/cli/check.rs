//! The check command
//!
//! Validates the whole workspace and reports every configuration error,
//! not just the first. Exit is nonzero if anything failed; no plan is
//! produced either way.

use anyhow::Result;

use super::output::Output;
use super::resolve_cmd;
use crate::domain::resolve_module;
use crate::storage::Workspace;

/// Entry point for `truss check`
pub fn run(output: &Output) -> Result<()> {
    let workspace = Workspace::open_current()?;
    output.verbose_ctx(
        "check",
        &format!("Checking workspace at: {}", workspace.root().display()),
    );

    let mut findings: Vec<(String, String)> = Vec::new();

    let declarations = match workspace.declarations() {
        Ok(declarations) => declarations,
        Err(e) => {
            report(output, &[("workspace".to_string(), format!("{:#}", e))]);
            anyhow::bail!("1 configuration error(s) found");
        }
    };

    // Module graph first: resolution order is meaningless on a bad graph
    if let Err(e) = resolve_cmd::evaluation_order(&declarations) {
        findings.push(("workspace".to_string(), format!("{:#}", e)));
    }

    let registry = workspace.registry();
    let policy = workspace.settings().constraint_policy;

    for declaration in &declarations {
        let layers = match registry.layers(&declaration.spec.conventions) {
            Ok(layers) => layers,
            Err(e) => {
                findings.push((declaration.name.clone(), e.to_string()));
                continue;
            }
        };

        if let Err(e) = resolve_module(declaration, &layers, policy) {
            findings.push((declaration.name.clone(), e.to_string()));
        }
    }

    if findings.is_empty() {
        output.verbose_ctx("check", &format!("{} modules clean", declarations.len()));
        output.success(&format!(
            "Workspace OK: {} modules, no configuration errors",
            declarations.len()
        ));
        return Ok(());
    }

    report(output, &findings);
    anyhow::bail!("{} configuration error(s) found", findings.len())
}

fn report(output: &Output, findings: &[(String, String)]) {
    if output.is_json() {
        let items: Vec<_> = findings
            .iter()
            .map(|(module, message)| {
                serde_json::json!({
                    "module": module,
                    "error": message,
                })
            })
            .collect();
        output.data(&items);
    } else {
        for (module, message) in findings {
            println!("{}: {}", module, message);
        }
    }
}
