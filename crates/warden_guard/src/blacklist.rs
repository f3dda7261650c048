//! Content blacklist evaluation.

use crate::{GuardError, GuardErrorKind, GuardResult};
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

/// One compiled blacklist pattern.
#[derive(Debug, Clone)]
enum Pattern {
    /// Case-insensitive substring match against the trimmed message.
    Substring { raw: String, lowered: String },
    /// Case-insensitive regex tested against the full message.
    Regex { raw: String, regex: Regex },
}

impl Pattern {
    fn compile(entry: &str) -> GuardResult<Self> {
        let inner = entry
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
            .filter(|inner| !inner.is_empty());

        if let Some(inner) = inner {
            let regex = RegexBuilder::new(inner)
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    GuardError::new(GuardErrorKind::InvalidPattern {
                        pattern: entry.to_string(),
                        reason: e.to_string(),
                    })
                })?;
            Ok(Self::Regex {
                raw: entry.to_string(),
                regex,
            })
        } else {
            Ok(Self::Substring {
                raw: entry.to_string(),
                lowered: entry.to_lowercase(),
            })
        }
    }

    fn raw(&self) -> &str {
        match self {
            Self::Substring { raw, .. } | Self::Regex { raw, .. } => raw,
        }
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Substring { lowered, .. } => text.trim().to_lowercase().contains(lowered),
            Self::Regex { regex, .. } => regex.is_match(text),
        }
    }
}

/// Guild-configured content blacklist.
///
/// Entries wrapped in `/…/` are compiled as case-insensitive regular
/// expressions over the full message; everything else is matched as a
/// case-insensitive substring against the trimmed message. Evaluation
/// stops at the first matching pattern.
///
/// The compiled form is transient: guild state persists the raw entries
/// and rebuilds the blacklist on every load.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    patterns: Vec<Pattern>,
}

impl Blacklist {
    /// Create an empty blacklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a stored entry list.
    ///
    /// Entries that fail to compile are logged and skipped so a bad
    /// stored pattern cannot take down guild loading; [`Self::add`] is
    /// the strict path for interactive configuration.
    pub fn compile(entries: &[String]) -> Self {
        let mut blacklist = Self::new();
        for entry in entries {
            match Pattern::compile(entry) {
                Ok(pattern) => blacklist.patterns.push(pattern),
                Err(e) => warn!(entry = %entry, error = %e, "Skipping invalid blacklist pattern"),
            }
        }
        blacklist
    }

    /// Add a pattern, failing on invalid regex.
    pub fn add(&mut self, entry: &str) -> GuardResult<()> {
        let pattern = Pattern::compile(entry)?;
        debug!(entry, "Adding blacklist pattern");
        self.patterns.push(pattern);
        Ok(())
    }

    /// Remove every pattern whose configured text equals `entry`.
    /// Returns true if at least one was removed.
    pub fn remove(&mut self, entry: &str) -> bool {
        let before = self.patterns.len();
        self.patterns.retain(|p| p.raw() != entry);
        self.patterns.len() != before
    }

    /// True if any pattern matches `text`. First match wins.
    pub fn is_match(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// The configured text of the first matching pattern, if any.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.is_match(text))
            .map(Pattern::raw)
    }

    /// The configured entries, in evaluation order.
    pub fn entries(&self) -> Vec<&str> {
        self.patterns.iter().map(Pattern::raw).collect()
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when no patterns are configured.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
