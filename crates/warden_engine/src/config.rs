//! Engine configuration.

use crate::TranslationTable;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Global (cross-guild) engine configuration.
///
/// Operators listed here bypass every permission and throttle check.
/// The translation table is the global fallback behind each guild's
/// override layer.
#[derive(
    Debug, Clone, Serialize, Deserialize, Getters, derive_setters::Setters, derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct BotConfig {
    /// Command prefix, e.g. `"!"`.
    #[serde(default = "default_prefix")]
    #[builder(default = "default_prefix()")]
    command_prefix: String,

    /// Default language for guilds that configure none.
    #[serde(default = "default_language")]
    #[builder(default = "default_language()")]
    language: String,

    /// User ids with global operator status.
    #[serde(default)]
    #[builder(default)]
    operators: HashSet<String>,

    /// Global per-language translation table.
    #[serde(default)]
    #[builder(default)]
    translations: TranslationTable,
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_prefix(),
            language: default_language(),
            operators: HashSet::new(),
            translations: TranslationTable::new(),
        }
    }
}

impl BotConfig {
    /// True if `user_id` is a configured global operator.
    pub fn is_operator(&self, user_id: &str) -> bool {
        self.operators.contains(user_id)
    }

    /// Register a global operator.
    pub fn add_operator(&mut self, user_id: impl Into<String>) {
        self.operators.insert(user_id.into());
    }

    /// Mutable access to the translation table.
    pub fn translations_mut(&mut self) -> &mut TranslationTable {
        &mut self.translations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BotConfig::default();
        assert_eq!(config.command_prefix(), "!");
        assert_eq!(config.language(), "en");
        assert!(!config.is_operator("1"));
    }

    #[test]
    fn test_builder() {
        let config = BotConfigBuilder::default()
            .command_prefix("?".to_string())
            .build()
            .expect("build config");
        assert_eq!(config.command_prefix(), "?");
        assert_eq!(config.language(), "en");
    }

    #[test]
    fn test_operator_registration() {
        let mut config = BotConfig::default();
        config.add_operator("42");
        assert!(config.is_operator("42"));
        assert!(!config.is_operator("43"));
    }

    #[test]
    fn test_missing_fields_default_on_load() {
        let config: BotConfig = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config.command_prefix(), "!");
    }
}
