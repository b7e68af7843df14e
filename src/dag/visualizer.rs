use std::collections::BTreeMap;

use super::builder::{GraphNode, ModuleGraph};
use super::rank::RankMap;
use crate::config::{AppConfig, Layout};

/// Knobs for DOT output.
#[derive(Debug, Clone, Default)]
pub struct DotOptions {
    pub layout: Layout,
    pub rankdir: Option<String>,
    pub size: Option<String>,
}

impl From<&AppConfig> for DotOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            layout: config.layout,
            rankdir: config.rankdir.clone(),
            size: config.size.clone(),
        }
    }
}

/// Convert the import graph to DOT format for visualization.
pub fn to_dot(graph: &ModuleGraph, ranks: &RankMap, options: &DotOptions) -> String {
    let mut lines = Vec::new();
    lines.push("digraph modules {".to_string());
    if let Some(dir) = &options.rankdir {
        lines.push(format!("    rankdir={};", dir));
    }
    if let Some(size) = &options.size {
        lines.push(format!("    size={};", quote(size)));
    }
    lines.push("    node [shape=box, style=filled, fillcolor=lightblue];".to_string());

    for idx in graph.node_indices() {
        let node = &graph[idx];
        let id = quote(node.name());
        match node {
            GraphNode::Module(_) => lines.push(format!("    {} [label={}];", id, id)),
            GraphNode::Placeholder(_) => lines.push(format!(
                "    {} [label={}, style=\"filled,dashed\", fillcolor=white];",
                id, id
            )),
        }
    }

    match options.layout {
        Layout::Rank => push_rank_groups(&mut lines, ranks),
        Layout::Alphabetic => push_alphabetic_clusters(&mut lines, graph),
    }

    for edge in graph.edge_indices() {
        if let Some((from, to)) = graph.edge_endpoints(edge) {
            lines.push(format!(
                "    {} -> {};",
                quote(graph[from].name()),
                quote(graph[to].name())
            ));
        }
    }

    lines.push("}".to_string());
    let mut dot = lines.join("\n");
    dot.push('\n');
    dot
}

fn push_rank_groups(lines: &mut Vec<String>, ranks: &RankMap) {
    for (_, names) in ranks.levels() {
        let members: Vec<String> = names.iter().map(|n| quote(n)).collect();
        lines.push(format!("    {{ rank=same; {}; }}", members.join("; ")));
    }
}

fn push_alphabetic_clusters(lines: &mut Vec<String>, graph: &ModuleGraph) {
    let mut clusters: BTreeMap<char, Vec<&str>> = BTreeMap::new();
    for idx in graph.node_indices() {
        let name = graph[idx].name();
        if let Some(first) = name.chars().next() {
            clusters.entry(first).or_default().push(name);
        }
    }

    for (key, mut names) in clusters {
        names.sort_unstable();
        let label = key.to_string();
        lines.push(format!("    subgraph {} {{", quote(&format!("cluster_{}", label))));
        lines.push(format!("        label={};", quote(&label)));
        lines.push("        style=filled;".to_string());
        lines.push("        color=lightgrey;".to_string());
        for name in names {
            lines.push(format!("        {};", quote(name)));
        }
        lines.push("    }".to_string());
    }
}

/// Quote a DOT identifier, escaping backslashes and double quotes.
pub fn quote(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 2);
    out.push('"');
    for c in id.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DuplicatePolicy, UnresolvedPolicy};
    use crate::dag::builder::build_graph;
    use crate::registry::{Module, Registry};

    fn render(modules: Vec<Module>, policy: UnresolvedPolicy, options: &DotOptions) -> String {
        let registry = Registry::build(modules, DuplicatePolicy::Reject).unwrap();
        let graph = build_graph(&registry, policy);
        let ranks = RankMap::compute(&graph);
        to_dot(&graph, &ranks, options)
    }

    #[test]
    fn header_hints_are_optional() {
        let plain = render(vec![Module::new("A")], UnresolvedPolicy::Omit, &DotOptions::default());
        assert!(plain.starts_with("digraph modules {\n    node [shape=box, style=filled, fillcolor=lightblue];"));
        assert!(!plain.contains("rankdir"));

        let hinted = render(
            vec![Module::new("A")],
            UnresolvedPolicy::Omit,
            &DotOptions {
                rankdir: Some("LR".to_string()),
                size: Some("10,10".to_string()),
                ..Default::default()
            },
        );
        assert!(hinted.contains("    rankdir=LR;\n"));
        assert!(hinted.contains("    size=\"10,10\";\n"));
        assert!(hinted.ends_with("}\n"));
    }

    #[test]
    fn rank_groups_follow_levels() {
        let dot = render(
            vec![
                Module::with_imports("A", ["B"]),
                Module::with_imports("B", ["C"]),
                Module::new("C"),
                Module::new("D"),
            ],
            UnresolvedPolicy::Omit,
            &DotOptions::default(),
        );
        assert!(dot.contains("    { rank=same; \"C\"; \"D\"; }\n"));
        assert!(dot.contains("    { rank=same; \"B\"; }\n"));
        assert!(dot.contains("    { rank=same; \"A\"; }\n"));
        assert!(!dot.contains("cluster_"));
    }

    #[test]
    fn alphabetic_layout_clusters_by_first_char() {
        let dot = render(
            vec![
                Module::with_imports("Files", ["Kernel"]),
                Module::new("FileDir"),
                Module::new("Kernel"),
            ],
            UnresolvedPolicy::Omit,
            &DotOptions {
                layout: Layout::Alphabetic,
                ..Default::default()
            },
        );
        assert!(dot.contains("    subgraph \"cluster_F\" {\n        label=\"F\";"));
        assert!(dot.contains("        \"FileDir\";\n        \"Files\";\n"));
        assert!(dot.contains("    subgraph \"cluster_K\" {"));
        assert!(!dot.contains("rank=same"));
    }

    #[test]
    fn placeholders_are_dashed_and_linked() {
        let modules = vec![Module::with_imports("App", ["Kernel", "Gone"]), Module::new("Kernel")];

        let omitted = render(modules.clone(), UnresolvedPolicy::Omit, &DotOptions::default());
        assert!(!omitted.contains("\"Gone\""));
        assert!(omitted.contains("    \"App\" -> \"Kernel\";"));

        let drawn = render(modules, UnresolvedPolicy::Placeholder, &DotOptions::default());
        assert!(drawn.contains("    \"Gone\" [label=\"Gone\", style=\"filled,dashed\", fillcolor=white];"));
        assert!(drawn.contains("    \"App\" -> \"Gone\";"));
    }

    #[test]
    fn repeated_imports_draw_one_edge() {
        let dot = render(
            vec![Module::with_imports("A", ["B", "B"]), Module::new("B")],
            UnresolvedPolicy::Omit,
            &DotOptions::default(),
        );
        assert_eq!(dot.matches("\"A\" -> \"B\"").count(), 1);
    }

    #[test]
    fn quote_escapes_specials() {
        assert_eq!(quote("Foo"), "\"Foo\"");
        assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }
}
