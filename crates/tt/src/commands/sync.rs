//! `tt sync` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tt_jira::{JiraClient, WorklogSyncer};
use tt_store::CredentialStore;

use super::load_config_and_store;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sync command.
#[derive(Args)]
pub(crate) struct SyncArgs {
    /// Tracker name from the configuration.
    tracker: String,

    /// Maximum number of entries to synchronize (default: all pending).
    #[arg(short, long)]
    limit: Option<usize>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,

    /// Path to configuration file (default: auto-discover tt.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SyncArgs {
    /// Execute the sync command.
    ///
    /// Per-entry failures are reported but not fatal; only batch-level
    /// errors exit non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, store access or the batch as
    /// a whole fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let (config, store) = load_config_and_store(self.config.as_deref())?;
        let user = config.require_user()?;
        let tracker = config.require_tracker(&self.tracker)?;

        let credentials: Arc<dyn CredentialStore> = store.clone();
        let client = JiraClient::new(tracker, user, credentials)?;
        let syncer = WorklogSyncer::new(&client, &*store, &*store, &*store, tracker, user);

        let report = syncer.sync_pending(self.limit)?;

        if report.sync_disabled {
            output.warning(&format!(
                "Synchronization is disabled for \"{}\" (booking off or connection avoided).",
                tracker.name
            ));
            return Ok(());
        }

        for (entry_id, outcome) in &report.outcomes {
            output.info(&format!("entry {entry_id}: {outcome}"));
        }
        for failure in &report.failures {
            output.error(&format!(
                "entry {} ({}): {}",
                failure.entry_id, failure.ticket, failure.error
            ));
        }

        output.separator();
        output.success(&format!(
            "{} synced, {} skipped, {} failed",
            report.synced(),
            report.skipped(),
            report.failures.len()
        ));

        if let Some(url) = report.authorize_url() {
            output.warning("\nThe tracker rejected the stored credentials.");
            output.info("Authorize again by opening this URL in your browser:");
            output.highlight(&format!("\n{url}\n"));
            output.info(&format!(
                "then finish with `tt authorize {}`.",
                tracker.name
            ));
        }

        Ok(())
    }
}
