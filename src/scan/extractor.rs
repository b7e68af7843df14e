use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::registry::Module;

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\(\*.*?\*\)").unwrap());

// Name token admits qualifiers such as `Foo.Bar`, `Dir/Foo` or `Foo(Bar)`.
static MODULE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\bMODULE\s+([/.\w\s()*]+?)\s*;").unwrap());

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)\bIMPORT\s+([^;]+?);").unwrap());

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("module name not found")]
    ModuleNameNotFound,

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read one file and extract its module declaration.
pub fn extract_file(path: &Path) -> Result<Module, ExtractError> {
    tracing::debug!(path = %path.display(), "Parsing module file");

    let bytes = fs::read(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);

    let mut module = extract_module(&text)?;
    module.source = Some(path.to_path_buf());
    Ok(module)
}

/// Extract the module name and import list from source text.
pub fn extract_module(text: &str) -> Result<Module, ExtractError> {
    let text = strip_comments(text);

    let name = MODULE_RE
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
        .ok_or(ExtractError::ModuleNameNotFound)?;

    let mut module = Module::new(name);
    if let Some(body) = IMPORT_RE.captures(&text).and_then(|caps| caps.get(1)) {
        for import in parse_import_list(body.as_str()) {
            module.add_import(import);
        }
    }
    Ok(module)
}

/// Remove every `(* ... *)` span.
pub fn strip_comments(text: &str) -> std::borrow::Cow<'_, str> {
    COMMENT_RE.replace_all(text, "")
}

/// Split an import clause body into module names.
///
/// `Alias := Name` yields `Name`. Empty entries are dropped.
pub fn parse_import_list(body: &str) -> Vec<String> {
    body.split(',')
        .map(|token| {
            let token = token.trim();
            match token.split_once(":=") {
                Some((_, target)) => target.trim(),
                None => token,
            }
        })
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_keeps_right_hand_side() {
        let module = extract_module("MODULE Foo; IMPORT Bar, Baz := Quux; BEGIN END Foo.").unwrap();
        assert_eq!(module.name, "Foo");
        assert_eq!(module.imports, vec!["Bar", "Quux"]);
    }

    #[test]
    fn missing_import_clause_is_empty() {
        let module = extract_module("MODULE Lonely;\nBEGIN\nEND Lonely.").unwrap();
        assert_eq!(module.name, "Lonely");
        assert!(module.is_bare());
    }

    #[test]
    fn missing_module_declaration_errors() {
        let err = extract_module("IMPORT Bar;").unwrap_err();
        assert!(matches!(err, ExtractError::ModuleNameNotFound));
        assert_eq!(err.to_string(), "module name not found");
    }

    #[test]
    fn comments_do_not_leak_into_name() {
        let module = extract_module("MODULE Foo(*comment with ; inside*); IMPORT Bar;").unwrap();
        assert_eq!(module.name, "Foo");
        assert_eq!(module.imports, vec!["Bar"]);
    }

    #[test]
    fn multiline_comments_hide_imports() {
        let src = "(* header\n   MODULE Fake; IMPORT Nope;\n*)\nMODULE Real;\nIMPORT\n  (* old: Gone, *)\n  Kernel,\n  Files;\nEND Real.";
        let module = extract_module(src).unwrap();
        assert_eq!(module.name, "Real");
        assert_eq!(module.imports, vec!["Kernel", "Files"]);
    }

    #[test]
    fn duplicates_and_order_are_preserved() {
        let module = extract_module("MODULE M; IMPORT C, A, C, B; END M.").unwrap();
        assert_eq!(module.imports, vec!["C", "A", "C", "B"]);
    }

    #[test]
    fn only_first_import_clause_counts() {
        let module = extract_module("MODULE M; IMPORT A; PROCEDURE P; IMPORT B; END M.").unwrap();
        assert_eq!(module.imports, vec!["A"]);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let module = extract_module("module lower; import a, b; end lower.").unwrap();
        assert_eq!(module.name, "lower");
        assert_eq!(module.imports, vec!["a", "b"]);
    }

    #[test]
    fn qualified_names_are_kept() {
        let module = extract_module("MODULE Win32.Kernel32 ;\nIMPORT SYSTEM;").unwrap();
        assert_eq!(module.name, "Win32.Kernel32");
        assert_eq!(module.imports, vec!["SYSTEM"]);
    }

    #[test]
    fn keyword_inside_identifier_is_ignored() {
        let err = extract_module("VAR SubMODULE x;").unwrap_err();
        assert!(matches!(err, ExtractError::ModuleNameNotFound));
    }

    #[test]
    fn stray_commas_and_blank_tokens_are_dropped() {
        assert_eq!(parse_import_list(" A ,, B , ,C"), vec!["A", "B", "C"]);
        assert_eq!(parse_import_list("S := SYSTEM,  K:=Kernel"), vec!["SYSTEM", "Kernel"]);
        assert!(parse_import_list("   ").is_empty());
    }
}
