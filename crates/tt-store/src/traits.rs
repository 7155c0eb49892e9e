//! Collaborator contracts between the synchronization core and the
//! surrounding application.

use crate::credential::Credential;
use crate::entry::Entry;
use crate::error::StoreError;

/// Read access to entries pending synchronization.
pub trait EntryAccess: Send + Sync {
    /// Entries pending synchronization for one `(user, tracker)`
    /// pairing: non-empty ticket and not yet synced, ordered day
    /// descending then start descending (most recent first), truncated
    /// to `limit` when given.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be read.
    fn find_pending(
        &self,
        user: &str,
        tracker: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Entry>, StoreError>;
}

/// Write access for persisting synchronization outcomes.
pub trait EntryStore: Send + Sync {
    /// Persist the mutated `worklog_id`/`synced` fields of one entry.
    ///
    /// Must be callable once per entry without a surrounding transaction
    /// spanning the whole batch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the entry is unknown or the write fails.
    fn save(&self, entry: &Entry) -> Result<(), StoreError>;
}

/// Durable mapping of `(user, tracker)` to OAuth credentials.
pub trait CredentialStore: Send + Sync {
    /// Look up the credential row for a pairing, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be read.
    fn find(&self, user: &str, tracker: &str) -> Result<Option<Credential>, StoreError>;

    /// Create or replace the credential row for a pairing
    /// (last-write-wins).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    fn upsert(
        &self,
        user: &str,
        tracker: &str,
        credential: &Credential,
    ) -> Result<(), StoreError>;
}
