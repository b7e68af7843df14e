use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use super::types::{AppConfig, ConfigFile};

/// File name looked up when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Load the run configuration.
///
/// - If `explicit` is set, load exactly that file.
/// - Otherwise look for `config.yaml` in `cwd`, then in its parent.
///
/// Relative paths inside the file are resolved against the directory that
/// holds it.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<AppConfig> {
    let path = match explicit {
        Some(p) => {
            if !p.is_file() {
                bail!("Config not found: '{}'", p.display());
            }
            p.to_path_buf()
        }
        None => discover_config(cwd)?,
    };

    tracing::info!(path = %path.display(), "Loading config");

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(cwd);
    Ok(resolve_paths(config, base))
}

/// Find `config.yaml` in `dir` or its parent.
pub fn discover_config(dir: &Path) -> Result<PathBuf> {
    let mut candidates = vec![dir.join(CONFIG_FILE_NAME)];
    if let Some(parent) = dir.parent() {
        candidates.push(parent.join(CONFIG_FILE_NAME));
    }

    match candidates.iter().find(|p| p.is_file()) {
        Some(found) => Ok(found.clone()),
        None => bail!(
            "Config not found: no {} in '{}' or its parent. Create one or pass --config",
            CONFIG_FILE_NAME,
            dir.display()
        ),
    }
}

/// Parse YAML content into an AppConfig.
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let file: ConfigFile =
        serde_yaml::from_str(content).context("Failed to parse YAML configuration")?;

    if file.app.test_dir.as_os_str().is_empty() {
        bail!("app.test-dir must not be empty");
    }
    Ok(file.app)
}

fn resolve_paths(mut config: AppConfig, base: &Path) -> AppConfig {
    config.test_dir = base.join(&config.test_dir);
    config.output_txt = base.join(&config.output_txt);
    config.output_dot = base.join(&config.output_dot);
    config
}
