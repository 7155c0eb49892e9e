//! Work-log synchronizer implementation.

use tracing::{debug, warn};

use tt_config::TrackerConfig;
use tt_store::{CredentialStore, Entry, EntryAccess, EntryStore};

use super::WorklogGateway;
use super::result::{SkipReason, SyncFailure, SyncOutcome, SyncReport};
use crate::error::JiraError;
use crate::types::WorklogRequest;

/// Drives tracker-side worklog state into agreement with local entries
/// for one `(user, tracker)` pairing.
///
/// Runs are strictly sequential; overlapping runs for the same pairing
/// must be prevented by the caller (two racing runs could create
/// duplicate remote worklogs for one entry).
pub struct WorklogSyncer<'a> {
    gateway: &'a dyn WorklogGateway,
    entries: &'a dyn EntryAccess,
    entry_store: &'a dyn EntryStore,
    credentials: &'a dyn CredentialStore,
    tracker: &'a TrackerConfig,
    user: &'a str,
}

impl<'a> WorklogSyncer<'a> {
    /// Create a synchronizer over the given collaborators.
    #[must_use]
    pub fn new(
        gateway: &'a dyn WorklogGateway,
        entries: &'a dyn EntryAccess,
        entry_store: &'a dyn EntryStore,
        credentials: &'a dyn CredentialStore,
        tracker: &'a TrackerConfig,
        user: &'a str,
    ) -> Self {
        Self {
            gateway,
            entries,
            entry_store,
            credentials,
            tracker,
            user,
        }
    }

    /// The single authorization gate: booking must be enabled for the
    /// tracker, and the user must not have opted out or been denied.
    /// A pairing without a credential row is allowed (the first request
    /// will come back 401 with an authorization URL).
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Store`] if the credential row cannot be read.
    pub fn sync_allowed(&self) -> Result<bool, JiraError> {
        if !self.tracker.book_time {
            return Ok(false);
        }
        let credential = self.credentials.find(self.user, &self.tracker.name)?;
        Ok(credential.is_none_or(|c| !c.avoid_connection))
    }

    /// Reconcile one entry with the tracker.
    ///
    /// On success the entry's `worklog_id`/`synced` fields are updated
    /// and persisted. A zero-duration entry deletes its remote worklog:
    /// Jira rejects zero-duration worklogs, so "no time" is represented
    /// as "no worklog". A remembered worklog that vanished remotely is
    /// forgotten first, so a fresh one is created instead of updating a
    /// ghost.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] on connector failures; batch callers
    /// isolate these per entry.
    pub fn sync_one(&self, entry: &mut Entry) -> Result<SyncOutcome, JiraError> {
        if !entry.has_ticket() {
            return Ok(SyncOutcome::Skipped(SkipReason::NoTicket));
        }
        if !self.sync_allowed()? {
            return Ok(SyncOutcome::Skipped(SkipReason::SyncDisabled));
        }
        if !self.gateway.issue_exists(&entry.ticket)? {
            debug!(entry = entry.id, ticket = %entry.ticket, "remote issue missing, skipping");
            return Ok(SyncOutcome::Skipped(SkipReason::IssueMissing));
        }

        if entry.duration_minutes() <= 0 {
            return self.delete_one(entry);
        }

        // Self-heal: the remembered worklog may have been deleted
        // out-of-band.
        if let Some(worklog_id) = entry.worklog_id
            && !self.gateway.worklog_exists(&entry.ticket, worklog_id)?
        {
            debug!(entry = entry.id, worklog_id, "remembered worklog vanished remotely");
            entry.worklog_id = None;
        }

        let request = WorklogRequest::for_entry(entry);
        let outcome = match entry.worklog_id {
            Some(worklog_id) => {
                self.gateway
                    .update_worklog(&entry.ticket, worklog_id, &request)?;
                SyncOutcome::Updated(worklog_id)
            }
            None => {
                let created = self.gateway.create_worklog(&entry.ticket, &request)?;
                entry.worklog_id = Some(created.id);
                SyncOutcome::Created(created.id)
            }
        };

        entry.synced = true;
        self.entry_store.save(entry)?;
        Ok(outcome)
    }

    /// Delete the remote worklog remembered by an entry, if any.
    ///
    /// An already-deleted remote worklog counts as success. On success
    /// `worklog_id` is cleared and persisted; the `synced` flag is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] on connector failures.
    pub fn delete_one(&self, entry: &mut Entry) -> Result<SyncOutcome, JiraError> {
        if !entry.has_ticket() {
            return Ok(SyncOutcome::Skipped(SkipReason::NoTicket));
        }
        let Some(worklog_id) = entry.worklog_id.filter(|id| *id > 0) else {
            return Ok(SyncOutcome::Skipped(SkipReason::NothingToDelete));
        };
        if !self.sync_allowed()? {
            return Ok(SyncOutcome::Skipped(SkipReason::SyncDisabled));
        }

        self.gateway.delete_worklog(&entry.ticket, worklog_id)?;
        entry.worklog_id = None;
        self.entry_store.save(entry)?;
        Ok(SyncOutcome::Deleted)
    }

    /// Synchronize pending entries, most recent first.
    ///
    /// Each entry's failure is caught individually and recorded in the
    /// report; one bad entry never blocks the rest of the batch. Every
    /// outcome is persisted immediately inside [`WorklogSyncer::sync_one`],
    /// never batched, so a mid-batch crash loses at most one entry.
    ///
    /// `limit` caps the batch; `None` synchronizes everything pending.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Store`] only for batch-level failures
    /// (gate lookup, fetching the pending list).
    pub fn sync_pending(&self, limit: Option<usize>) -> Result<SyncReport, JiraError> {
        if !self.sync_allowed()? {
            debug!(tracker = %self.tracker.name, user = self.user, "sync disabled for pairing");
            return Ok(SyncReport::disabled());
        }

        let pending = self
            .entries
            .find_pending(self.user, &self.tracker.name, limit)?;
        debug!(tracker = %self.tracker.name, count = pending.len(), "synchronizing pending entries");

        let mut report = SyncReport::default();
        for mut entry in pending {
            match self.sync_one(&mut entry) {
                Ok(outcome) => report.outcomes.push((entry.id, outcome)),
                Err(error) => {
                    warn!(
                        entry = entry.id,
                        ticket = %entry.ticket,
                        tracker = %self.tracker.name,
                        %error,
                        "entry synchronization failed"
                    );
                    report.failures.push(SyncFailure {
                        entry_id: entry.id,
                        ticket: entry.ticket.clone(),
                        error,
                    });
                }
            }
        }
        Ok(report)
    }
}
