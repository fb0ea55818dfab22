//! Persistence for the card store.
//!
//! The whole state is written as a single JSON blob named by [`STORAGE_KEY`].
//! The key embeds the schema version: bumping it makes old blobs invisible,
//! so incompatible data is discarded rather than migrated.

use crate::{seed, Card, RecollectResult};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

pub const STORAGE_KEY: &str = "recollect-storage-v2";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedState {
    pub cards: Vec<Card>,
    pub collections: Vec<String>,
}

impl PersistedState {
    /// State with no cards and only the `"All"` collection.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            cards: Vec::new(),
            collections: vec![crate::ALL_COLLECTION.to_string()],
        }
    }

    /// State a brand new installation starts with: sample cards and the
    /// default collection list.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            cards: seed::sample_cards(),
            collections: seed::default_collections(),
        }
    }
}

pub trait StateStorage: Send {
    /// Load the persisted blob. `Ok(None)` means nothing usable was stored.
    fn load(&self) -> RecollectResult<Option<PersistedState>>;
    fn save(&mut self, state: &PersistedState) -> RecollectResult<()>;
}

/// Keeps the blob in memory only; used when no storage directory is
/// configured and in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blob: Option<String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last blob written, if any.
    #[must_use]
    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> RecollectResult<Option<PersistedState>> {
        Ok(self.blob.as_deref().and_then(decode_blob))
    }

    fn save(&mut self, state: &PersistedState) -> RecollectResult<()> {
        self.blob = Some(serde_json::to_string(state)?);
        Ok(())
    }
}

/// Stores the blob as `<dir>/<STORAGE_KEY>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStorage for JsonFileStorage {
    fn load(&self) -> RecollectResult<Option<PersistedState>> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(decode_blob(&blob)),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted state found");
                Ok(None)
            }
            Err(error) => Err(error.into()),
        }
    }

    fn save(&mut self, state: &PersistedState) -> RecollectResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec(state)?)?;
        Ok(())
    }
}

fn decode_blob(blob: &str) -> Option<PersistedState> {
    match serde_json::from_str(blob) {
        Ok(state) => Some(state),
        Err(error) => {
            warn!(%error, "discarding unreadable persisted state");
            None
        }
    }
}
