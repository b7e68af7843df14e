use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ─── Top-Level Config ───────────────────────────────────────────────────────

/// Root of `config.yaml`. Everything lives under the `app` key.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub app: AppConfig,
}

/// Settings for one run. Loaded once and passed down explicitly.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AppConfig {
    /// Root directory scanned for module sources.
    pub test_dir: PathBuf,

    /// Plain-text report destination.
    #[serde(default = "default_output_txt")]
    pub output_txt: PathBuf,

    /// DOT graph destination.
    #[serde(default = "default_output_dot")]
    pub output_dot: PathBuf,

    #[serde(default)]
    pub layout: Layout,

    /// Graphviz `rankdir` hint, e.g. `LR`.
    #[serde(default)]
    pub rankdir: Option<String>,

    /// Graphviz `size` hint, e.g. `10,10`.
    #[serde(default)]
    pub size: Option<String>,

    #[serde(default)]
    pub unresolved: UnresolvedPolicy,

    #[serde(default)]
    pub duplicates: DuplicatePolicy,

    #[serde(default)]
    pub on_error: ErrorPolicy,
}

fn default_output_txt() -> PathBuf {
    PathBuf::from("output-txt")
}

fn default_output_dot() -> PathBuf {
    PathBuf::from("modules_graph.dot")
}

impl AppConfig {
    /// Config with every optional key at its default.
    pub fn new(test_dir: impl Into<PathBuf>) -> Self {
        Self {
            test_dir: test_dir.into(),
            output_txt: default_output_txt(),
            output_dot: default_output_dot(),
            layout: Layout::default(),
            rankdir: None,
            size: None,
            unresolved: UnresolvedPolicy::default(),
            duplicates: DuplicatePolicy::default(),
            on_error: ErrorPolicy::default(),
        }
    }
}

// ─── Policies ───────────────────────────────────────────────────────────────

/// How the DOT renderer groups nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `{ rank=same; ... }` per computed rank level.
    #[default]
    Rank,
    /// One cluster per first character of the module name.
    Alphabetic,
}

/// What to do with imports naming a module no scanned file declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Drop edges to undeclared modules.
    #[default]
    Omit,
    /// Draw a placeholder node for each undeclared module and keep the edges.
    Placeholder,
}

/// What to do when two files declare the same module name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Fail the run.
    #[default]
    Reject,
    /// The declaration seen last in walk order wins.
    Overwrite,
    /// Append the later declaration's imports that are not already present.
    Merge,
}

/// What the scanner does when a single file cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the walk at the first bad file and produce nothing.
    #[default]
    Abort,
    /// Record the failure, keep walking, build from what parsed.
    Collect,
}

impl fmt::Display for UnresolvedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedPolicy::Omit => write!(f, "omit"),
            UnresolvedPolicy::Placeholder => write!(f, "placeholder"),
        }
    }
}
