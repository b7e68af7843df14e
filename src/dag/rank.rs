use petgraph::graph::NodeIndex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::builder::ModuleGraph;

/// Rank of every graph node, plus the same data grouped by level.
///
/// A node's rank is the length of the longest import chain below it: 0 for a
/// node with no outgoing edges, otherwise `1 + max(rank(dep))`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankMap {
    ranks: BTreeMap<String, usize>,
    levels: BTreeMap<usize, Vec<String>>,
    max_rank: usize,
}

impl RankMap {
    /// Compute ranks with a memoized depth-first walk.
    ///
    /// Roots are taken in name order and edges in insertion order. An edge
    /// back into a node still on the DFS stack contributes 0, so cyclic
    /// graphs get a deterministic, if arbitrary, answer.
    pub fn compute(graph: &ModuleGraph) -> Self {
        let mut roots: Vec<NodeIndex> = graph.node_indices().collect();
        roots.sort_by(|a, b| graph[*a].name().cmp(graph[*b].name()));

        let mut walker = RankWalker {
            graph,
            memo: HashMap::new(),
            on_stack: HashSet::new(),
        };
        for root in roots {
            walker.visit(root);
        }

        let mut map = RankMap::default();
        for (idx, rank) in walker.memo {
            let name = graph[idx].name().to_string();
            map.levels.entry(rank).or_default().push(name.clone());
            map.ranks.insert(name, rank);
            map.max_rank = map.max_rank.max(rank);
        }
        for names in map.levels.values_mut() {
            names.sort();
        }
        map
    }

    pub fn rank(&self, name: &str) -> Option<usize> {
        self.ranks.get(name).copied()
    }

    pub fn max_rank(&self) -> usize {
        self.max_rank
    }

    /// Names at `rank`, sorted. Empty when no node has that rank.
    pub fn level(&self, rank: usize) -> &[String] {
        self.levels.get(&rank).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty levels from rank 0 upwards.
    pub fn levels(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.levels.iter().map(|(rank, names)| (*rank, names.as_slice()))
    }
}

struct RankWalker<'g> {
    graph: &'g ModuleGraph,
    memo: HashMap<NodeIndex, usize>,
    on_stack: HashSet<NodeIndex>,
}

impl RankWalker<'_> {
    fn visit(&mut self, node: NodeIndex) -> usize {
        if let Some(&rank) = self.memo.get(&node) {
            return rank;
        }
        if !self.on_stack.insert(node) {
            tracing::debug!(module = %self.graph[node].name(), "Breaking import cycle");
            return 0;
        }

        // petgraph yields neighbors newest-first.
        let mut deps: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        deps.reverse();

        let mut deepest: Option<usize> = None;
        for dep in deps {
            let rank = self.visit(dep);
            deepest = Some(deepest.map_or(rank, |d| d.max(rank)));
        }
        let rank = deepest.map_or(0, |d| d + 1);

        self.on_stack.remove(&node);
        self.memo.insert(node, rank);
        rank
    }
}
