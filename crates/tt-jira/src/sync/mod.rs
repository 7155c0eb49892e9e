//! Work-log synchronizer.
//!
//! This module provides the [`WorklogSyncer`] that drives tracker-side
//! worklog state into agreement with local entries for one
//! `(user, tracker)` pairing:
//!
//! 1. Fetch pending entries (most recent first)
//! 2. Per entry: create, update or delete the remote worklog
//! 3. Persist the outcome immediately, entry by entry
//!
//! Any single entry may fail without aborting the batch; failures are
//! collected into the returned [`SyncReport`].
//!
//! # Example
//!
//! ```ignore
//! use tt_jira::{JiraClient, WorklogSyncer};
//!
//! let client = JiraClient::new(&tracker, "jdoe", store.clone())?;
//! let syncer = WorklogSyncer::new(&client, &*store, &*store, &*store, &tracker, "jdoe");
//!
//! let report = syncer.sync_pending(Some(50))?;
//! println!("{} synced, {} failed", report.synced(), report.failures.len());
//! ```

mod executor;
mod result;

pub use executor::WorklogSyncer;
pub use result::{SkipReason, SyncFailure, SyncOutcome, SyncReport};

use crate::error::JiraError;
use crate::types::{CreatedWorklog, WorklogRequest};

/// Tracker-side worklog operations the synchronizer drives.
///
/// Implemented by [`JiraClient`](crate::JiraClient); tests substitute a
/// scripted gateway.
pub trait WorklogGateway {
    /// Whether an issue exists; a 404 answers "no" instead of erroring.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] for failures other than a 404.
    fn issue_exists(&self, key: &str) -> Result<bool, JiraError>;

    /// Whether a worklog still exists under an issue.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] for failures other than a 404.
    fn worklog_exists(&self, key: &str, worklog_id: u64) -> Result<bool, JiraError>;

    /// Create a worklog and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] if the call fails.
    fn create_worklog(
        &self,
        key: &str,
        request: &WorklogRequest,
    ) -> Result<CreatedWorklog, JiraError>;

    /// Replace an existing worklog (idempotent).
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] if the call fails.
    fn update_worklog(
        &self,
        key: &str,
        worklog_id: u64,
        request: &WorklogRequest,
    ) -> Result<(), JiraError>;

    /// Delete a worklog; an already-deleted worklog counts as success.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] for failures other than a 404.
    fn delete_worklog(&self, key: &str, worklog_id: u64) -> Result<(), JiraError>;
}
