//! In-memory store for testing.
//!
//! Provides [`MemoryStore`] for unit testing the synchronizer without
//! touching the filesystem.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::credential::Credential;
use crate::entry::Entry;
use crate::error::StoreError;
use crate::traits::{CredentialStore, EntryAccess, EntryStore};

/// In-memory store for testing.
///
/// Use the builder methods to seed the store with test data.
///
/// # Example
///
/// ```ignore
/// use tt_store::{Credential, MemoryStore};
///
/// let store = MemoryStore::new()
///     .with_credential("jdoe", "jira", Credential::granted("tok", "sec"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<Vec<Entry>>,
    credentials: RwLock<HashMap<(String, String), Credential>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_entry(self, entry: Entry) -> Self {
        self.entries.write().unwrap().push(entry);
        self
    }

    /// Seed a credential row.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_credential(
        self,
        user: impl Into<String>,
        tracker: impl Into<String>,
        credential: Credential,
    ) -> Self {
        self.credentials
            .write()
            .unwrap()
            .insert((user.into(), tracker.into()), credential);
        self
    }

    /// Snapshot an entry by id.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn entry(&self, id: u64) -> Option<Entry> {
        self.entries.read().unwrap().iter().find(|e| e.id == id).cloned()
    }

    /// Snapshot a credential row.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn credential(&self, user: &str, tracker: &str) -> Option<Credential> {
        self.credentials
            .read()
            .unwrap()
            .get(&(user.to_owned(), tracker.to_owned()))
            .cloned()
    }
}

impl EntryAccess for MemoryStore {
    fn find_pending(
        &self,
        user: &str,
        tracker: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Entry>, StoreError> {
        let mut pending: Vec<Entry> = self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.user == user && e.tracker == tracker && e.has_ticket() && !e.synced)
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.day.cmp(&a.day).then(b.start.cmp(&a.start)));
        if let Some(limit) = limit {
            pending.truncate(limit);
        }
        Ok(pending)
    }
}

impl EntryStore for MemoryStore {
    fn save(&self, entry: &Entry) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap();
        let existing = entries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or(StoreError::EntryNotFound(entry.id))?;
        *existing = entry.clone();
        Ok(())
    }
}

impl CredentialStore for MemoryStore {
    fn find(&self, user: &str, tracker: &str) -> Result<Option<Credential>, StoreError> {
        Ok(self
            .credentials
            .read()
            .unwrap()
            .get(&(user.to_owned(), tracker.to_owned()))
            .cloned())
    }

    fn upsert(
        &self,
        user: &str,
        tracker: &str,
        credential: &Credential,
    ) -> Result<(), StoreError> {
        self.credentials
            .write()
            .unwrap()
            .insert((user.to_owned(), tracker.to_owned()), credential.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn assert_send_sync<T: Send + Sync>() {}

    fn entry(id: u64, day: NaiveDate) -> Entry {
        Entry {
            id,
            user: "jdoe".to_owned(),
            tracker: "jira".to_owned(),
            ticket: "ABC-1".to_owned(),
            day,
            start: "09:00:00".parse().unwrap(),
            end: "10:00:00".parse().unwrap(),
            description: String::new(),
            activity: None,
            worklog_id: None,
            synced: false,
        }
    }

    #[test]
    fn test_memory_store_is_send_sync() {
        assert_send_sync::<MemoryStore>();
    }

    #[test]
    fn test_find_pending_filters_pairing() {
        let mut other = entry(2, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
        other.tracker = "other".to_owned();
        let store = MemoryStore::new()
            .with_entry(entry(1, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()))
            .with_entry(other);

        let pending = store.find_pending("jdoe", "jira", None).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, 1);
    }

    #[test]
    fn test_find_pending_most_recent_first() {
        let store = MemoryStore::new()
            .with_entry(entry(1, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()))
            .with_entry(entry(2, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()))
            .with_entry(entry(3, NaiveDate::from_ymd_opt(2024, 3, 19).unwrap()));

        let pending = store.find_pending("jdoe", "jira", None).unwrap();
        let ids: Vec<u64> = pending.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_save_round_trip() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
        let store = MemoryStore::new().with_entry(entry(1, day));

        let mut updated = entry(1, day);
        updated.worklog_id = Some(7);
        updated.synced = true;
        store.save(&updated).unwrap();

        assert_eq!(store.entry(1).unwrap().worklog_id, Some(7));
        assert!(store.entry(1).unwrap().synced);
    }

    #[test]
    fn test_save_missing_entry() {
        let store = MemoryStore::new();
        let err = store
            .save(&entry(1, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()))
            .unwrap_err();
        assert!(matches!(err, StoreError::EntryNotFound(1)));
    }

    #[test]
    fn test_credential_upsert_replaces() {
        let store =
            MemoryStore::new().with_credential("jdoe", "jira", Credential::granted("a", "1"));

        store
            .upsert("jdoe", "jira", &Credential::granted("b", "2"))
            .unwrap();

        assert_eq!(
            store.find("jdoe", "jira").unwrap().unwrap().access_token,
            "b"
        );
    }
}
