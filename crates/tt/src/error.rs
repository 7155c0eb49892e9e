//! CLI error types.

use tt_config::ConfigError;
use tt_jira::JiraError;
use tt_store::StoreError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Jira(#[from] JiraError),

    #[error("{0}")]
    Store(#[from] StoreError),
}
