//! Filesystem-backed guild persistence.

use crate::{StorageError, StorageErrorKind, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Filesystem storage for guild state.
///
/// Layout:
///
/// ```text
/// {base_path}/
/// ├── {guild_id}/
/// │   ├── guild.json        (root record)
/// │   ├── users/{id}.json
/// │   ├── roles/{id}.json
/// │   └── channels/{id}.json
/// ```
///
/// Writes go through a temp file plus rename for atomicity, so a crash
/// mid-save never leaves a half-written record behind.
pub struct GuildStorage {
    base_path: PathBuf,
}

impl GuildStorage {
    /// Create a storage root, creating the base directory if needed.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Opened guild storage");
        Ok(Self { base_path })
    }

    /// Directory holding one guild's records.
    fn guild_dir(&self, guild_id: &str) -> PathBuf {
        self.base_path.join(guild_id)
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let json = serde_json::to_string_pretty(value).map_err(|e| {
            StorageError::new(StorageErrorKind::Json {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| {
            StorageError::new(StorageErrorKind::Io {
                path: tmp.display().to_string(),
                reason: e.to_string(),
            })
        })?;
        std::fs::rename(&tmp, path).map_err(|e| {
            StorageError::new(StorageErrorKind::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;

        Ok(())
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<T> {
        if !path.exists() {
            return Err(StorageError::new(StorageErrorKind::NotFound(
                path.display().to_string(),
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            StorageError::new(StorageErrorKind::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;

        serde_json::from_str(&content).map_err(|e| {
            StorageError::new(StorageErrorKind::Json {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })
    }

    /// Save the guild root record.
    #[tracing::instrument(skip(self, record), fields(guild_id))]
    pub fn save_record<T: Serialize>(&self, guild_id: &str, record: &T) -> StorageResult<()> {
        let path = self.guild_dir(guild_id).join("guild.json");
        Self::write_json(&path, record)?;
        tracing::debug!(guild_id, "Saved guild record");
        Ok(())
    }

    /// Load the guild root record.
    pub fn load_record<T: DeserializeOwned>(&self, guild_id: &str) -> StorageResult<T> {
        Self::read_json(&self.guild_dir(guild_id).join("guild.json"))
    }

    /// Save one entity under `collection` (e.g. `"users"`) by id.
    #[tracing::instrument(skip(self, entity), fields(guild_id, collection, id))]
    pub fn save_entity<T: Serialize>(
        &self,
        guild_id: &str,
        collection: &str,
        id: &str,
        entity: &T,
    ) -> StorageResult<()> {
        let path = self
            .guild_dir(guild_id)
            .join(collection)
            .join(format!("{id}.json"));
        Self::write_json(&path, entity)
    }

    /// Load one entity from `collection` by id.
    pub fn load_entity<T: DeserializeOwned>(
        &self,
        guild_id: &str,
        collection: &str,
        id: &str,
    ) -> StorageResult<T> {
        let path = self
            .guild_dir(guild_id)
            .join(collection)
            .join(format!("{id}.json"));
        Self::read_json(&path)
    }

    /// Delete one entity. Returns true if a record existed.
    pub fn delete_entity(&self, guild_id: &str, collection: &str, id: &str) -> StorageResult<bool> {
        let path = self
            .guild_dir(guild_id)
            .join(collection)
            .join(format!("{id}.json"));
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path).map_err(|e| {
            StorageError::new(StorageErrorKind::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;
        Ok(true)
    }

    /// Load every entity in `collection`.
    ///
    /// An absent directory yields an empty list; a load always replaces
    /// the caller's whole in-memory collection.
    #[tracing::instrument(skip(self), fields(guild_id, collection, loaded))]
    pub fn load_collection<T: DeserializeOwned>(
        &self,
        guild_id: &str,
        collection: &str,
    ) -> StorageResult<Vec<T>> {
        let dir = self.guild_dir(guild_id).join(collection);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| {
            StorageError::new(StorageErrorKind::Io {
                path: dir.display().to_string(),
                reason: e.to_string(),
            })
        })?;

        let mut loaded = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                StorageError::new(StorageErrorKind::Io {
                    path: dir.display().to_string(),
                    reason: e.to_string(),
                })
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            loaded.push(Self::read_json(&path)?);
        }

        tracing::Span::current().record("loaded", loaded.len());
        Ok(loaded)
    }

    /// Ids of every guild with a stored record.
    pub fn guild_ids(&self) -> StorageResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::Io {
                path: self.base_path.display().to_string(),
                reason: e.to_string(),
            })
        })?;

        let mut ids = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() && path.join("guild.json").exists() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    ids.push(name.to_string());
                }
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    /// The storage root path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
