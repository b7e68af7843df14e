use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::extractor::{extract_file, ExtractError};
use super::ScanError;
use crate::config::ErrorPolicy;
use crate::registry::Module;

/// A file that could not be turned into a module.
#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: ExtractError,
}

/// Per-file outcome of one walk.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Parsed modules in walk order.
    pub modules: Vec<Module>,
    pub failures: Vec<ScanFailure>,
}

impl ScanSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total candidate files seen.
    pub fn files_seen(&self) -> usize {
        self.modules.len() + self.failures.len()
    }
}

/// True for file names ending in `.Mod` or `.mod`.
pub fn is_module_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(".Mod") || n.ends_with(".mod"))
        .unwrap_or(false)
}

/// Walk `root` recursively and extract every module source.
///
/// Entries are visited in file-name order so results do not depend on the
/// file system. Symlinks are followed, and a link loop is a walk error. Under
/// [`ErrorPolicy::Abort`] the first bad file ends the walk with an error;
/// under [`ErrorPolicy::Collect`] it is recorded and skipped.
pub fn scan_directory(root: &Path, policy: ErrorPolicy) -> Result<ScanSummary, ScanError> {
    tracing::info!(root = %root.display(), policy = ?policy, "Scanning for module files");

    let mut summary = ScanSummary::default();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| ScanError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || !is_module_file(entry.path()) {
            continue;
        }

        match extract_file(entry.path()) {
            Ok(module) => summary.modules.push(module),
            Err(error) => match policy {
                ErrorPolicy::Abort => {
                    return Err(ScanError::Module {
                        path: entry.path().to_path_buf(),
                        source: error,
                    });
                }
                ErrorPolicy::Collect => {
                    tracing::warn!(
                        path = %entry.path().display(),
                        error = %error,
                        "Skipping module file"
                    );
                    summary.failures.push(ScanFailure {
                        path: entry.path().to_path_buf(),
                        error,
                    });
                }
            },
        }
    }

    tracing::info!(
        modules = summary.modules.len(),
        failures = summary.failures.len(),
        "Scan finished"
    );
    Ok(summary)
}
