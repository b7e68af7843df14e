use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use thiserror::Error;

use crate::config::DuplicatePolicy;

/// One parsed source module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    /// Imported module names in declaration order. Duplicates are kept.
    pub imports: Vec<String>,
    /// File the module was read from, if any.
    pub source: Option<PathBuf>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            imports: Vec::new(),
            source: None,
        }
    }

    pub fn with_imports<I, S>(name: impl Into<String>, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            imports: imports.into_iter().map(Into::into).collect(),
            source: None,
        }
    }

    pub fn add_import(&mut self, name: impl Into<String>) {
        self.imports.push(name.into());
    }

    /// True when the module imports nothing.
    pub fn is_bare(&self) -> bool {
        self.imports.is_empty()
    }
}

/// An import name looked up in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportRef<'a> {
    Resolved(&'a Module),
    Unresolved(&'a str),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(
        "duplicate module '{}' declared in {} and {}",
        .name,
        display_source(.first),
        display_source(.second)
    )]
    Duplicate {
        name: String,
        first: Option<PathBuf>,
        second: Option<PathBuf>,
    },
}

fn display_source(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!("'{}'", p.display()))
        .unwrap_or_else(|| "<memory>".to_string())
}

/// All declared modules of one run, keyed and ordered by name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    modules: BTreeMap<String, Module>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry, applying `policy` to repeated names.
    pub fn build<I>(modules: I, policy: DuplicatePolicy) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = Module>,
    {
        let mut registry = Self::new();
        for module in modules {
            registry.insert(module, policy)?;
        }
        Ok(registry)
    }

    pub fn insert(&mut self, module: Module, policy: DuplicatePolicy) -> Result<(), RegistryError> {
        match self.modules.entry(module.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(module);
            }
            Entry::Occupied(mut slot) => match policy {
                DuplicatePolicy::Reject => {
                    return Err(RegistryError::Duplicate {
                        name: module.name,
                        first: slot.get().source.clone(),
                        second: module.source,
                    });
                }
                DuplicatePolicy::Overwrite => {
                    tracing::warn!(module = %module.name, "Duplicate module declaration replaces earlier one");
                    slot.insert(module);
                }
                DuplicatePolicy::Merge => {
                    tracing::warn!(module = %module.name, "Merging duplicate module declaration");
                    let existing = slot.get_mut();
                    for import in module.imports {
                        if !existing.imports.contains(&import) {
                            existing.imports.push(import);
                        }
                    }
                }
            },
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Modules in case-sensitive lexicographic name order.
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn resolve<'a>(&'a self, import: &'a str) -> ImportRef<'a> {
        match self.modules.get(import) {
            Some(module) => ImportRef::Resolved(module),
            None => ImportRef::Unresolved(import),
        }
    }

    /// Imports of `module`, each resolved against this registry.
    pub fn imports_of<'a>(&'a self, module: &'a Module) -> impl Iterator<Item = ImportRef<'a>> {
        module.imports.iter().map(move |i| self.resolve(i))
    }

    /// Every imported name that no module in the registry declares, sorted.
    pub fn unresolved_imports(&self) -> BTreeSet<&str> {
        self.iter()
            .flat_map(|m| self.imports_of(m))
            .filter_map(|r| match r {
                ImportRef::Unresolved(name) => Some(name),
                ImportRef::Resolved(_) => None,
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Module;
    type IntoIter = std::collections::btree_map::Values<'a, String, Module>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.values()
    }
}
