//! Command alias table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Maps invoked command names to canonical command names.
///
/// The table performs no cycle detection; dispatchers must resolve at
/// most once per attempt so an alias chain `a → b → c` never fully
/// collapses in a single dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliasTable {
    #[serde(default)]
    aliases: HashMap<String, String>,
}

impl AliasTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or overwrite) an alias.
    pub fn set(&mut self, alias: impl Into<String>, canonical: impl Into<String>) {
        let alias = alias.into();
        let canonical = canonical.into();
        debug!(%alias, %canonical, "Setting alias");
        self.aliases.insert(alias, canonical);
    }

    /// Resolve an alias to its canonical name, if registered.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Remove an alias. Returns true if one was removed.
    pub fn remove(&mut self, alias: &str) -> bool {
        self.aliases.remove(alias).is_some()
    }

    /// All aliases pointing at `canonical` (reverse scan).
    pub fn aliases_for(&self, canonical: &str) -> Vec<&str> {
        let mut found: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, c)| c.as_str() == canonical)
            .map(|(a, _)| a.as_str())
            .collect();
        found.sort_unstable();
        found
    }

    /// Remove every alias pointing at `canonical`.
    pub fn remove_for_command(&mut self, canonical: &str) {
        self.aliases.retain(|_, c| c != canonical);
    }

    /// Number of registered aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// True when no aliases are registered.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Iterate `(alias, canonical)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }
}
