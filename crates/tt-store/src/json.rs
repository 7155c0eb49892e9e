//! JSON-file-backed store.
//!
//! [`JsonStore`] keeps all entries and credential rows in one JSON
//! document on disk and implements every collaborator trait. It backs
//! the CLI; real deployments substitute their own database-backed
//! implementations.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::credential::Credential;
use crate::entry::Entry;
use crate::error::StoreError;
use crate::traits::{CredentialStore, EntryAccess, EntryStore};

/// On-disk document shape.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    entries: Vec<Entry>,
    #[serde(default)]
    credentials: Vec<CredentialRow>,
}

/// One credential row with its pairing key.
#[derive(Debug, Serialize, Deserialize)]
struct CredentialRow {
    user: String,
    tracker: String,
    #[serde(flatten)]
    credential: Credential,
}

/// File-backed store holding entries and credentials.
///
/// Every mutation rewrites the whole document atomically (write to a
/// temp file in the same directory, then rename), so a crash never
/// leaves a half-written store behind.
pub struct JsonStore {
    path: PathBuf,
    state: RwLock<Document>,
}

impl JsonStore {
    /// Open a store at `path`, creating an empty one if the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or
    /// parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Document::default()
        };
        debug!(path = %path.display(), "opened entry store");
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    /// Insert or replace an entry by id (test/demo seeding helper).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the document cannot be written.
    pub fn put_entry(&self, entry: Entry) -> Result<(), StoreError> {
        {
            let mut state = self.state.write().expect("store lock poisoned");
            match state.entries.iter_mut().find(|e| e.id == entry.id) {
                Some(existing) => *existing = entry,
                None => state.entries.push(entry),
            }
        }
        self.flush()
    }

    /// Write the current document to disk.
    fn flush(&self) -> Result<(), StoreError> {
        let state = self.state.read().expect("store lock poisoned");
        let json = serde_json::to_string_pretty(&*state)?;
        let dir = self.path.parent().unwrap_or(Path::new("."));
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(json.as_bytes())?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl EntryAccess for JsonStore {
    fn find_pending(
        &self,
        user: &str,
        tracker: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Entry>, StoreError> {
        let state = self.state.read().expect("store lock poisoned");
        let mut pending: Vec<Entry> = state
            .entries
            .iter()
            .filter(|e| e.user == user && e.tracker == tracker && e.has_ticket() && !e.synced)
            .cloned()
            .collect();
        // Most recent first; a cut-off batch keeps the entries still
        // most likely to be edited upstream.
        pending.sort_by(|a, b| b.day.cmp(&a.day).then(b.start.cmp(&a.start)));
        if let Some(limit) = limit {
            pending.truncate(limit);
        }
        Ok(pending)
    }
}

impl EntryStore for JsonStore {
    fn save(&self, entry: &Entry) -> Result<(), StoreError> {
        {
            let mut state = self.state.write().expect("store lock poisoned");
            let existing = state
                .entries
                .iter_mut()
                .find(|e| e.id == entry.id)
                .ok_or(StoreError::EntryNotFound(entry.id))?;
            *existing = entry.clone();
        }
        self.flush()
    }
}

impl CredentialStore for JsonStore {
    fn find(&self, user: &str, tracker: &str) -> Result<Option<Credential>, StoreError> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(state
            .credentials
            .iter()
            .find(|row| row.user == user && row.tracker == tracker)
            .map(|row| row.credential.clone()))
    }

    fn upsert(
        &self,
        user: &str,
        tracker: &str,
        credential: &Credential,
    ) -> Result<(), StoreError> {
        {
            let mut state = self.state.write().expect("store lock poisoned");
            match state
                .credentials
                .iter_mut()
                .find(|row| row.user == user && row.tracker == tracker)
            {
                Some(row) => row.credential = credential.clone(),
                None => state.credentials.push(CredentialRow {
                    user: user.to_owned(),
                    tracker: tracker.to_owned(),
                    credential: credential.clone(),
                }),
            }
        }
        self.flush()
    }
}

/// Group credential rows for diagnostics (used by `Debug`).
impl std::fmt::Debug for JsonStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().expect("store lock poisoned");
        let pairings: HashMap<(&str, &str), bool> = state
            .credentials
            .iter()
            .map(|row| {
                (
                    (row.user.as_str(), row.tracker.as_str()),
                    row.credential.avoid_connection,
                )
            })
            .collect();
        f.debug_struct("JsonStore")
            .field("path", &self.path)
            .field("entries", &state.entries.len())
            .field("pairings", &pairings)
            .finish()
    }
}
