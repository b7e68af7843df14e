use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::registry::{Module, Registry};

/// Line closing each module block.
pub const SEPARATOR: &str = "===============================================";

/// Render one module block: name, tab-indented imports, separator.
pub fn render_module(module: &Module) -> String {
    let mut lines = Vec::with_capacity(module.imports.len() + 2);
    lines.push(format!("{}:", module.name));
    for import in &module.imports {
        lines.push(format!("\t{}", import));
    }
    lines.push(SEPARATOR.to_string());
    let mut block = lines.join("\n");
    block.push('\n');
    block
}

/// Render the whole registry in name order.
pub fn render_report(registry: &Registry) -> String {
    registry.iter().map(render_module).collect()
}

/// Write the report to `path`.
pub fn write_report(registry: &Registry, path: &Path) -> Result<()> {
    fs::write(path, render_report(registry))
        .with_context(|| format!("Error creating output file: {}", path.display()))?;
    tracing::info!(path = %path.display(), modules = registry.len(), "Wrote report");
    Ok(())
}
