use std::fs;
use std::path::PathBuf;

use modgraph::config::loader::{discover_config, load_config, parse_config};
use modgraph::config::{DuplicatePolicy, ErrorPolicy, Layout, UnresolvedPolicy};
use tempfile::TempDir;

#[test]
fn test_parse_full_config() {
    let yaml = r#"
app:
  test-dir: "./source"
  output-txt: "out/modules.txt"
  output-dot: "out/graph.dot"
  layout: alphabetic
  rankdir: LR
  size: "10,10"
  unresolved: placeholder
  duplicates: merge
  on-error: collect
"#;

    let config = parse_config(yaml).expect("Should parse valid config");
    assert_eq!(config.test_dir, PathBuf::from("./source"));
    assert_eq!(config.output_txt, PathBuf::from("out/modules.txt"));
    assert_eq!(config.output_dot, PathBuf::from("out/graph.dot"));
    assert_eq!(config.layout, Layout::Alphabetic);
    assert_eq!(config.rankdir.as_deref(), Some("LR"));
    assert_eq!(config.size.as_deref(), Some("10,10"));
    assert_eq!(config.unresolved, UnresolvedPolicy::Placeholder);
    assert_eq!(config.duplicates, DuplicatePolicy::Merge);
    assert_eq!(config.on_error, ErrorPolicy::Collect);
}

#[test]
fn test_parse_minimal_config() {
    let yaml = r#"
app:
  test-dir: src
"#;

    let config = parse_config(yaml).expect("Should parse minimal config");
    // Defaults should be applied
    assert_eq!(config.output_txt, PathBuf::from("output-txt"));
    assert_eq!(config.output_dot, PathBuf::from("modules_graph.dot"));
    assert_eq!(config.layout, Layout::Rank);
    assert_eq!(config.rankdir, None);
    assert_eq!(config.unresolved, UnresolvedPolicy::Omit);
    assert_eq!(config.duplicates, DuplicatePolicy::Reject);
    assert_eq!(config.on_error, ErrorPolicy::Abort);
}

#[test]
fn test_parse_invalid_yaml() {
    assert!(parse_config("not: valid: yaml: [").is_err());
}

#[test]
fn test_missing_test_dir_is_error() {
    assert!(parse_config("app:\n  output-txt: x.txt\n").is_err());
    assert!(parse_config("app:\n  test-dir: \"\"\n").is_err());
}

#[test]
fn test_unknown_keys_are_rejected() {
    let yaml = "app:\n  test-dir: src\n  ouput-txt: typo.txt\n";
    assert!(parse_config(yaml).is_err());
}

#[test]
fn test_unknown_policy_value_is_rejected() {
    let yaml = "app:\n  test-dir: src\n  layout: circular\n";
    assert!(parse_config(yaml).is_err());
}

#[test]
fn test_discovery_falls_back_to_parent() {
    let root = TempDir::new().unwrap();
    let child = root.path().join("child");
    fs::create_dir(&child).unwrap();
    fs::write(root.path().join("config.yaml"), "app:\n  test-dir: sources\n").unwrap();

    assert_eq!(discover_config(&child).unwrap(), root.path().join("config.yaml"));

    // A config in the working directory wins over the parent's.
    fs::write(child.join("config.yaml"), "app:\n  test-dir: here\n").unwrap();
    assert_eq!(discover_config(&child).unwrap(), child.join("config.yaml"));
}

#[test]
fn test_missing_config_is_error() {
    let root = TempDir::new().unwrap();
    let child = root.path().join("child");
    fs::create_dir(&child).unwrap();

    let err = discover_config(&child).unwrap_err();
    assert!(err.to_string().contains("Config not found"));
    assert!(load_config(Some(&root.path().join("absent.yaml")), &child).is_err());
}

#[test]
fn test_paths_resolve_against_config_dir() {
    let root = TempDir::new().unwrap();
    let child = root.path().join("child");
    fs::create_dir(&child).unwrap();
    fs::write(
        root.path().join("config.yaml"),
        "app:\n  test-dir: sources\n  output-txt: /tmp/abs.txt\n",
    )
    .unwrap();

    let config = load_config(None, &child).unwrap();
    assert_eq!(config.test_dir, root.path().join("sources"));
    assert_eq!(config.output_txt, PathBuf::from("/tmp/abs.txt"));
    assert_eq!(config.output_dot, root.path().join("modules_graph.dot"));
}
