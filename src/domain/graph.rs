//! Module graph for workspaces
//!
//! Tracks `uses` edges between workspace members with cycle detection and
//! a deterministic evaluation (topological) order. Uses petgraph for graph
//! operations.

use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Module dependency would create a cycle: {0} -> {1}")]
    CycleDetected(String, String),

    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Module '{0}' cannot use itself")]
    SelfDependency(String),
}

/// A directed graph of workspace modules
///
/// Edges run from a used module to its user, so topological order yields
/// dependencies before dependents.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl ModuleGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Builds a graph from `(module, uses)` declarations
    ///
    /// All modules are added before any edge so that forward references
    /// between members work regardless of declaration order.
    pub fn from_members<'a>(
        members: impl IntoIterator<Item = (&'a str, &'a [String])>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new();

        let members: Vec<_> = members.into_iter().collect();
        for (name, _) in &members {
            graph.add_module(*name);
        }
        for (name, uses) in &members {
            for used in uses.iter() {
                graph.add_use(name, used)?;
            }
        }

        Ok(graph)
    }

    /// Adds a module node; re-adding is a no-op
    pub fn add_module(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.node_map.contains_key(&name) {
            let idx = self.graph.add_node(name.clone());
            self.node_map.insert(name, idx);
        }
    }

    /// Records that `module` uses `used`
    ///
    /// Both modules must already exist. Self-edges and edges that would
    /// close a cycle are rejected.
    pub fn add_use(&mut self, module: &str, used: &str) -> Result<(), GraphError> {
        if module == used {
            return Err(GraphError::SelfDependency(module.to_string()));
        }

        let module_idx = *self
            .node_map
            .get(module)
            .ok_or_else(|| GraphError::UnknownModule(module.to_string()))?;
        let used_idx = *self
            .node_map
            .get(used)
            .ok_or_else(|| GraphError::UnknownModule(used.to_string()))?;

        let edge = self.graph.add_edge(used_idx, module_idx, ());

        if is_cyclic_directed(&self.graph) {
            self.graph.remove_edge(edge);
            return Err(GraphError::CycleDetected(
                module.to_string(),
                used.to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the modules `module` uses directly
    pub fn uses(&self, module: &str) -> Vec<String> {
        let idx = match self.node_map.get(module) {
            Some(idx) => *idx,
            None => return vec![],
        };

        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .filter_map(|i| self.graph.node_weight(i).cloned())
            .collect()
    }

    /// Returns the modules that use `module` directly
    pub fn used_by(&self, module: &str) -> Vec<String> {
        let idx = match self.node_map.get(module) {
            Some(idx) => *idx,
            None => return vec![],
        };

        self.graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .filter_map(|i| self.graph.node_weight(i).cloned())
            .collect()
    }

    /// Returns all modules in evaluation order (used before user)
    ///
    /// Deterministic for a given insertion order. The graph is kept acyclic
    /// by `add_use`, so this cannot fail in practice; a cycle that somehow
    /// appears is still reported rather than unwrapped away.
    pub fn evaluation_order(&self) -> Result<Vec<String>, GraphError> {
        match toposort(&self.graph, None) {
            Ok(order) => Ok(order
                .into_iter()
                .filter_map(|idx| self.graph.node_weight(idx).cloned())
                .collect()),
            Err(cycle) => {
                let name = self
                    .graph
                    .node_weight(cycle.node_id())
                    .cloned()
                    .unwrap_or_default();
                Err(GraphError::CycleDetected(name.clone(), name))
            }
        }
    }

    /// Returns true if the module exists in the graph
    pub fn contains(&self, module: &str) -> bool {
        self.node_map.contains_key(module)
    }

    /// Returns the number of modules
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Returns true if the graph has no modules
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Returns all module names
    pub fn modules(&self) -> impl Iterator<Item = &String> {
        self.node_map.keys()
    }
}
