//! JSON entity persistence for Warden guild state.
//!
//! Guild state persists as one directory per guild holding a root record
//! plus one JSON file per entity in `users/`, `roles/` and `channels/`
//! subdirectories. The engine treats this crate as "save/load an entity
//! by id": loads replace whole in-memory collections, never merge, and
//! absent fields take their documented defaults through `serde`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod filesystem;

pub use error::{StorageError, StorageErrorKind, StorageResult};
pub use filesystem::GuildStorage;
