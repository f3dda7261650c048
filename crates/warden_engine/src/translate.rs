//! Translation tables and template filling.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Substitute positional `{1}`, `{2}`, … placeholders in a template.
///
/// Placeholders beyond the supplied arguments are left in place so a
/// thin template never panics on a short argument list.
pub fn fill(template: &str, args: &[&str]) -> String {
    let mut filled = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        filled = filled.replace(&format!("{{{}}}", i + 1), arg);
    }
    filled
}

/// Global per-language translation table.
///
/// Maps language code → key → template string. Guild-level overrides
/// are layered on top of this table by [`crate::GuildState`]; the table
/// itself knows nothing about guilds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationTable {
    tables: HashMap<String, HashMap<String, String>>,
}

impl TranslationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a template for a language and key.
    pub fn get(&self, lang: &str, key: &str) -> Option<&str> {
        self.tables
            .get(lang)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }

    /// Register a template.
    pub fn set(&mut self, lang: &str, key: &str, template: impl Into<String>) {
        self.tables
            .entry(lang.to_string())
            .or_default()
            .insert(key.to_string(), template.into());
    }

    /// Language codes with at least one template.
    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        langs.sort_unstable();
        langs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_positional() {
        assert_eq!(fill("use {1}{2}", &["!", "ping"]), "use !ping");
    }

    #[test]
    fn test_fill_leaves_unfilled_placeholders() {
        assert_eq!(fill("{1} and {2}", &["a"]), "a and {2}");
    }

    #[test]
    fn test_table_lookup() {
        let mut table = TranslationTable::new();
        table.set("en", "command.not_found", "No such command: {1}");
        table.set("de", "command.not_found", "Unbekannter Befehl: {1}");
        assert_eq!(
            table.get("de", "command.not_found"),
            Some("Unbekannter Befehl: {1}")
        );
        assert_eq!(table.get("fr", "command.not_found"), None);
        assert_eq!(table.languages(), vec!["de", "en"]);
    }

    #[test]
    fn test_table_deserializes_from_plain_maps() {
        let json = r#"{"en":{"general.deactivated":"This command is deactivated."}}"#;
        let table: TranslationTable = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            table.get("en", "general.deactivated"),
            Some("This command is deactivated.")
        );
    }
}
