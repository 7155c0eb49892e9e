//! Synchronization outcome types.

use crate::error::JiraError;

/// Why an entry was skipped without touching the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry references no external ticket.
    NoTicket,
    /// Booking is disabled for the tracker or the user opted out.
    SyncDisabled,
    /// The remote issue does not exist.
    IssueMissing,
    /// Zero duration and no remembered worklog to delete.
    NothingToDelete,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::NoTicket => "no ticket",
            Self::SyncDisabled => "sync disabled",
            Self::IssueMissing => "issue missing",
            Self::NothingToDelete => "nothing to delete",
        };
        f.write_str(reason)
    }
}

/// What happened to one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A new remote worklog was created with this id.
    Created(u64),
    /// The remembered remote worklog was updated.
    Updated(u64),
    /// The remote worklog was deleted (zero-duration entry).
    Deleted,
    /// Nothing was done.
    Skipped(SkipReason),
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created(id) => write!(f, "created worklog {id}"),
            Self::Updated(id) => write!(f, "updated worklog {id}"),
            Self::Deleted => f.write_str("deleted worklog"),
            Self::Skipped(reason) => write!(f, "skipped ({reason})"),
        }
    }
}

/// One entry that failed during a batch.
#[derive(Debug)]
pub struct SyncFailure {
    pub entry_id: u64,
    pub ticket: String,
    pub error: JiraError,
}

/// Result of one `sync_pending` batch.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// `(entry id, outcome)` per processed entry, in processing order.
    pub outcomes: Vec<(u64, SyncOutcome)>,
    /// Entries whose synchronization failed; the rest of the batch ran
    /// regardless.
    pub failures: Vec<SyncFailure>,
    /// True when the gate rejected the whole pairing and nothing ran.
    pub sync_disabled: bool,
}

impl SyncReport {
    /// A report recording that the pairing is gated off.
    #[must_use]
    pub(crate) fn disabled() -> Self {
        Self {
            sync_disabled: true,
            ..Self::default()
        }
    }

    /// Number of entries whose remote state changed.
    #[must_use]
    pub fn synced(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| {
                matches!(
                    outcome,
                    SyncOutcome::Created(_) | SyncOutcome::Updated(_) | SyncOutcome::Deleted
                )
            })
            .count()
    }

    /// Number of entries skipped without tracker contact.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, SyncOutcome::Skipped(_)))
            .count()
    }

    /// Whether every entry in the batch succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// First authorization URL found among the failures, if any entry
    /// ran into a 401.
    #[must_use]
    pub fn authorize_url(&self) -> Option<&str> {
        self.failures.iter().find_map(|failure| match &failure.error {
            JiraError::Unauthorized { authorize_url } => Some(authorize_url.as_str()),
            _ => None,
        })
    }
}
