use petgraph::algo::tarjan_scc;

use super::builder::ModuleGraph;

/// Find import cycles.
///
/// Each cycle is the sorted member list of a strongly connected component
/// with more than one node, or a single module that imports itself. Cycles
/// are sorted by their first member.
pub fn find_cycles(graph: &ModuleGraph) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = tarjan_scc(graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .map(|scc| {
            let mut names: Vec<String> = scc
                .into_iter()
                .map(|idx| graph[idx].name().to_string())
                .collect();
            names.sort();
            names
        })
        .collect();
    cycles.sort();

    for cycle in &cycles {
        tracing::warn!(modules = ?cycle, "Import cycle detected; ranks inside it are approximate");
    }
    cycles
}
