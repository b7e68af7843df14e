use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{AppConfig, ErrorPolicy};
use crate::dag::{build_graph, find_cycles, to_dot, DotOptions, ModuleGraph, RankMap};
use crate::output::report;
use crate::registry::Registry;
use crate::scan::{scan_directory, ScanFailure};

/// Everything derived from one scan of the source tree.
#[derive(Debug)]
pub struct Analysis {
    pub registry: Registry,
    pub graph: ModuleGraph,
    pub ranks: RankMap,
    pub cycles: Vec<Vec<String>>,
    /// Files skipped under [`ErrorPolicy::Collect`]. Always empty under `Abort`.
    pub failures: Vec<ScanFailure>,
}

impl Analysis {
    pub fn dot(&self, options: &DotOptions) -> String {
        to_dot(&self.graph, &self.ranks, options)
    }

    pub fn report(&self) -> String {
        report::render_report(&self.registry)
    }
}

/// Scan, register, and rank using the policies in `config`.
pub fn analyze(config: &AppConfig) -> Result<Analysis> {
    analyze_with(config, config.on_error)
}

/// Like [`analyze`] but with an explicit error policy.
pub fn analyze_with(config: &AppConfig, policy: ErrorPolicy) -> Result<Analysis> {
    let summary = scan_directory(&config.test_dir, policy)?;
    let registry = Registry::build(summary.modules, config.duplicates)?;
    let graph = build_graph(&registry, config.unresolved);
    let ranks = RankMap::compute(&graph);
    let cycles = find_cycles(&graph);

    tracing::debug!(
        modules = registry.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        max_rank = ranks.max_rank(),
        "Analysis complete"
    );

    Ok(Analysis {
        registry,
        graph,
        ranks,
        cycles,
        failures: summary.failures,
    })
}

/// Write the text report and the DOT graph to their configured paths.
pub fn write_outputs(analysis: &Analysis, config: &AppConfig) -> Result<()> {
    report::write_report(&analysis.registry, &config.output_txt)?;
    write_dot(analysis, &DotOptions::from(config), &config.output_dot)
}

fn write_dot(analysis: &Analysis, options: &DotOptions, path: &Path) -> Result<()> {
    fs::write(path, analysis.dot(options))
        .with_context(|| format!("Error creating DOT file: {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote DOT graph");
    Ok(())
}
