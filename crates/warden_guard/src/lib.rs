//! Governance algorithms and state machines for the Warden engine.
//!
//! This crate hosts the non-trivial moving parts of per-guild message
//! governance:
//!
//! - **Blacklist** - substring and `/regex/` content screening
//! - **ModerationGate** - blacklist evaluation plus the mute-escalation
//!   state machine
//! - **ThrottleCache** - per-command frequency limiting with lazy expiry
//! - **AutorespondTable** - typo-tolerant trigger matching built on
//!   Levenshtein distance
//! - **MuteVotes** - cross-user dedup for mute votes

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod blacklist;
mod error;
mod fuzzy;
mod gate;
mod throttle;
mod votes;

pub use blacklist::Blacklist;
pub use error::{GuardError, GuardErrorKind, GuardResult};
pub use fuzzy::{levenshtein, normalize, AutorespondTable};
pub use gate::{Escalation, ModerationGate};
pub use throttle::{FrequencyLimit, ThrottleCache};
pub use votes::MuteVotes;
