//! Blacklist gate and mute-escalation state machine.

use crate::Blacklist;
use tracing::{debug, info, instrument};
use warden_core::User;

/// Escalation decision after a blacklist hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// Log and delete only.
    None,
    /// Apply the configured mute role to the author.
    Mute,
}

/// Blacklist evaluation plus per-user mute escalation.
///
/// The gate screens message text against the guild blacklist and, on a
/// hit, advances the author's escalation state: the cumulative hit
/// counter increments and every third hit requests the mute role,
/// provided the guild has one configured. The counter never decays; an
/// explicit admin reset is the only way down.
#[derive(Debug, Clone, Default)]
pub struct ModerationGate {
    blacklist: Blacklist,
}

impl ModerationGate {
    /// Create a gate over a compiled blacklist.
    pub fn new(blacklist: Blacklist) -> Self {
        Self { blacklist }
    }

    /// True if `text` matches the blacklist.
    pub fn is_blacklisted(&self, text: &str) -> bool {
        self.blacklist.is_match(text)
    }

    /// The configured pattern that matched `text`, for audit logging.
    pub fn matched_pattern(&self, text: &str) -> Option<&str> {
        self.blacklist.first_match(text)
    }

    /// Record a confirmed hit against `user` and decide escalation.
    ///
    /// Callers must have already filtered out operators and bot authors;
    /// the gate itself only advances the counter. A mute is requested on
    /// every hit count that is a positive multiple of three, and only
    /// when `mute_role_configured` is set.
    #[instrument(skip(self, user), fields(user = %user.id, hits))]
    pub fn register_hit(&self, user: &mut User, mute_role_configured: bool) -> Escalation {
        let hits = user.record_blacklist_hit();
        tracing::Span::current().record("hits", hits);
        debug!("Recorded blacklist hit");

        if hits % 3 == 0 && mute_role_configured {
            info!(user = %user.id, hits, "Escalating to mute");
            Escalation::Mute
        } else {
            Escalation::None
        }
    }

    /// Access the underlying blacklist.
    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    /// Mutable access to the underlying blacklist.
    pub fn blacklist_mut(&mut self) -> &mut Blacklist {
        &mut self.blacklist
    }
}
