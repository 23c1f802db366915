//! Convention management commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::convention::ConventionRegistry;
use crate::storage::Workspace;

#[derive(Subcommand)]
pub enum ConventionCommands {
    /// List known conventions
    List,

    /// Show a convention's contents
    Show {
        /// Convention name
        name: String,
    },
}

pub fn run(cmd: ConventionCommands, output: &Output) -> Result<()> {
    match cmd {
        ConventionCommands::List => list_conventions(output),
        ConventionCommands::Show { name } => show_convention(output, &name),
    }
}

/// Builds a registry, with project fragments when inside a workspace
fn registry() -> ConventionRegistry {
    match Workspace::open_current() {
        Ok(workspace) => workspace.registry(),
        Err(_) => ConventionRegistry::new(),
    }
}

fn list_conventions(output: &Output) -> Result<()> {
    let registry = registry();
    let names = registry.names();

    if output.is_json() {
        let items: Vec<_> = names
            .iter()
            .map(|name| {
                serde_json::json!({
                    "name": name,
                    "origin": if registry.is_project(name) { "project" } else { "builtin" },
                })
            })
            .collect();
        output.data(&items);
    } else {
        println!("Known conventions:");
        println!("{:<24} ORIGIN", "NAME");
        println!("{}", "-".repeat(40));
        for name in &names {
            let origin = if registry.is_project(name) {
                "project"
            } else {
                "builtin"
            };
            println!("{:<24} {}", name, origin);
        }
    }

    Ok(())
}

fn show_convention(output: &Output, name: &str) -> Result<()> {
    let registry = registry();
    let fragment = registry.load(name)?;
    let layer = fragment.to_layer(name)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "name": name,
            "origin": if registry.is_project(name) { "project" } else { "builtin" },
            "extends": fragment.extends,
            "repositories": layer.spec.repositories,
            "toolchain": layer.spec.toolchain,
            "constraints": layer
                .constraints
                .iter_sorted()
                .iter()
                .map(|(g, a, v)| format!("{}:{}:{}", g, a, v))
                .collect::<Vec<_>>(),
            "dependencies": layer.spec.dependencies,
            "engine": layer.spec.engine,
        }));
    } else {
        println!("convention {}", name);
        if !fragment.extends.is_empty() {
            println!("  extends:     {}", fragment.extends.join(", "));
        }
        println!("  toolchain:   {}", layer.spec.toolchain);
        for repository in &layer.spec.repositories {
            println!("  repository:  {}", repository);
        }
        match &layer.spec.engine {
            Some(engine) => println!("  test engine: {}", engine),
            None => println!("  test engine: (none)"),
        }

        let pins = layer.constraints.iter_sorted();
        if !pins.is_empty() {
            println!("  constraints:");
            for (group, artifact, version) in pins {
                println!("    {}:{} -> {}", group, artifact, version);
            }
        }

        if !layer.spec.dependencies.is_empty() {
            println!("  dependencies:");
            for entry in &layer.spec.dependencies {
                println!("    {:<24} {}", format!("[{}]", entry.scope), entry.coordinate);
            }
        }
    }

    Ok(())
}
