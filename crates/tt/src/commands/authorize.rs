//! `tt authorize` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tt_jira::oauth::{AccessOutcome, DENIED_VERIFIER, OAuthHandshake};
use tt_store::CredentialStore;

use super::load_config_and_store;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the authorize command.
#[derive(Args)]
pub(crate) struct AuthorizeArgs {
    /// Tracker name from the configuration.
    tracker: String,

    /// Path to configuration file (default: auto-discover tt.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl AuthorizeArgs {
    /// Execute the authorize command.
    ///
    /// # Errors
    ///
    /// Returns an error if the handshake fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let (config, store) = load_config_and_store(self.config.as_deref())?;
        let user = config.require_user()?;
        let tracker = config.require_tracker(&self.tracker)?;

        let credentials: Arc<dyn CredentialStore> = store.clone();
        let handshake = OAuthHandshake::new(tracker, user, credentials)?;

        // Step 1: Get request token
        output.info("\nStep 1: Requesting temporary credentials...");
        let (request_token, auth_url) = handshake.fetch_request_token()?;
        output.success("Temporary token received");

        // Step 2: User authorization
        output.separator();
        output.highlight("Step 2: Authorization Required");
        output.separator();
        output.info("\nPlease open this URL in your browser:");
        output.highlight(&format!("\n{auth_url}\n"));

        // Read verifier from stdin; empty input counts as a decline
        write!(io::stdout(), "Enter the verification code: ")?;
        io::stdout().flush()?;
        let mut verifier = String::new();
        io::stdin().read_line(&mut verifier)?;
        let verifier = verifier.trim();
        let verifier = if verifier.is_empty() {
            DENIED_VERIFIER
        } else {
            verifier
        };

        // Step 3: Exchange for access token
        output.info("\nStep 3: Exchanging for access token...");
        match handshake.fetch_access_token(&request_token.oauth_token, verifier)? {
            AccessOutcome::Granted(_) => {
                output.separator();
                output.success("OAuth authorization successful!");
                output.info(&format!(
                    "Access credentials for \"{}\" were stored; `tt sync {}` is ready to run.",
                    tracker.name, tracker.name
                ));
            }
            AccessOutcome::Denied => {
                output.separator();
                output.warning(&format!(
                    "Authorization declined; synchronization for \"{}\" is now disabled.",
                    tracker.name
                ));
                output.info("Run `tt authorize` again to restart the flow.");
            }
        }

        Ok(())
    }
}
