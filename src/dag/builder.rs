use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use crate::config::UnresolvedPolicy;
use crate::registry::{ImportRef, Registry};

/// A node in the import graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphNode {
    /// A module declared by some scanned file.
    Module(String),
    /// An imported name nobody declares, drawn only in placeholder mode.
    Placeholder(String),
}

impl GraphNode {
    pub fn name(&self) -> &str {
        match self {
            GraphNode::Module(name) | GraphNode::Placeholder(name) => name,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, GraphNode::Placeholder(_))
    }
}

/// An edge from A -> B means A imports B.
pub type ModuleGraph = DiGraph<GraphNode, ()>;

/// Build the import graph from the registry.
///
/// Declared modules are added in name order, followed by placeholders (also in
/// name order) when `policy` asks for them. Repeated imports of the same
/// module collapse into one edge.
pub fn build_graph(registry: &Registry, policy: UnresolvedPolicy) -> ModuleGraph {
    let mut graph = DiGraph::new();
    let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

    for module in registry {
        let idx = graph.add_node(GraphNode::Module(module.name.clone()));
        node_map.insert(module.name.clone(), idx);
    }

    if policy == UnresolvedPolicy::Placeholder {
        for name in registry.unresolved_imports() {
            let idx = graph.add_node(GraphNode::Placeholder(name.to_string()));
            node_map.insert(name.to_string(), idx);
        }
    }

    for module in registry {
        let from_idx = node_map[&module.name];
        for import in registry.imports_of(module) {
            let target = match import {
                ImportRef::Resolved(dep) => dep.name.as_str(),
                ImportRef::Unresolved(name) => name,
            };
            match node_map.get(target) {
                Some(&to_idx) => {
                    graph.update_edge(from_idx, to_idx, ());
                }
                None => {
                    tracing::debug!(module = %module.name, import = %target, "Omitting edge to undeclared module");
                }
            }
        }
    }

    graph
}

/// Get the node map from module name to node index.
pub fn get_node_map(graph: &ModuleGraph) -> HashMap<String, NodeIndex> {
    graph
        .node_indices()
        .map(|idx| (graph[idx].name().to_string(), idx))
        .collect()
}
