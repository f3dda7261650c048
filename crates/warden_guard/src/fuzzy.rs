//! Typo-tolerant autorespond matching.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Normalize message text for trigger comparison: trim, strip spaces
/// and `,?!.` punctuation, lowercase.
pub fn normalize(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | ',' | '?' | '!' | '.'))
        .collect::<String>()
        .to_lowercase()
}

/// Classic dynamic-programming Levenshtein edit distance.
///
/// Single-character inserts, deletes and substitutions each cost 1.
/// When either input is empty the distance is the other's length.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=a.len()).collect();
    let mut current = vec![0usize; a.len() + 1];

    for (i, bc) in b.iter().enumerate() {
        current[0] = i + 1;
        for (j, ac) in a.iter().enumerate() {
            let substitution = prev[j] + usize::from(ac != bc);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }

    prev[a.len()]
}

/// Normalized-trigger to canned-response mapping with typo tolerance.
///
/// Triggers are stored under their normalized form. Matching tolerates
/// one edit for the cheap presence check and two edits for the actual
/// lookup. The lookup is a linear scan that returns the first qualifying
/// key; when several keys are equally close, which one wins depends on
/// map iteration order. That looseness is deliberate and documented
/// rather than nearest-match semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AutorespondTable {
    responds: HashMap<String, String>,
}

impl AutorespondTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger → response pair. The trigger is normalized and
    /// the response trimmed before storage.
    pub fn add(&mut self, trigger: &str, response: &str) {
        let key = normalize(trigger);
        debug!(trigger = %key, "Adding autorespond");
        self.responds.insert(key, response.trim().to_string());
    }

    /// Remove a trigger. Returns true if one was removed.
    pub fn remove(&mut self, trigger: &str) -> bool {
        self.responds.remove(&normalize(trigger)).is_some()
    }

    /// Cheap presence check: exact normalized match, or some stored key
    /// within edit distance 1.
    ///
    /// Before computing the distance the two strings are ordered so the
    /// longer one is compared as-is. The ordering does not change the
    /// distance value; it is part of the documented contract.
    pub fn has_match(&self, text: &str) -> bool {
        let content = normalize(text);

        for key in self.responds.keys() {
            let (longer, shorter) = if key.len() > content.len() {
                (key.as_str(), content.as_str())
            } else {
                (content.as_str(), key.as_str())
            };

            if content == *key || levenshtein(longer, shorter) <= 1 {
                return true;
            }
        }

        false
    }

    /// Resolve a response for `text`.
    ///
    /// Prefers an exact normalized key; otherwise scans all keys and
    /// returns the response for the first key within edit distance 2.
    pub fn lookup(&self, text: &str) -> Option<&str> {
        let content = normalize(text);

        if let Some(response) = self.responds.get(&content) {
            return Some(response);
        }

        self.responds
            .iter()
            .find(|(key, _)| levenshtein(&content, key) <= 2)
            .map(|(_, response)| response.as_str())
    }

    /// Number of registered triggers.
    pub fn len(&self) -> usize {
        self.responds.len()
    }

    /// True when no triggers are registered.
    pub fn is_empty(&self) -> bool {
        self.responds.is_empty()
    }

    /// Iterate `(normalized trigger, response)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.responds.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
