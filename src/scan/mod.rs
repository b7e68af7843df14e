pub mod extractor;
pub mod walker;

use std::path::PathBuf;

use thiserror::Error;

pub use extractor::{extract_file, extract_module, ExtractError};
pub use walker::{is_module_file, scan_directory, ScanFailure, ScanSummary};

/// Errors that end a walk.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("error walking the path {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("error parsing module file {}: {source}", .path.display())]
    Module {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },
}
