//! `tt revoke` command implementation.

use std::path::PathBuf;

use clap::Args;
use tt_store::{Credential, CredentialStore};

use super::load_config_and_store;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the revoke command.
#[derive(Args)]
pub(crate) struct RevokeArgs {
    /// Tracker name from the configuration.
    tracker: String,

    /// Path to configuration file (default: auto-discover tt.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RevokeArgs {
    /// Execute the revoke command.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential row cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let (config, store) = load_config_and_store(self.config.as_deref())?;
        let user = config.require_user()?;
        let tracker = config.require_tracker(&self.tracker)?;

        store.upsert(user, &tracker.name, &Credential::declined())?;

        output.success(&format!(
            "Synchronization for \"{}\" is now disabled for user \"{user}\".",
            tracker.name
        ));
        output.info(&format!(
            "Run `tt authorize {}` to re-enable it.",
            tracker.name
        ));
        Ok(())
    }
}
