//! CLI command implementations.

mod authorize;
mod revoke;
mod sync;

pub(crate) use authorize::AuthorizeArgs;
pub(crate) use revoke::RevokeArgs;
pub(crate) use sync::SyncArgs;

use std::path::Path;
use std::sync::Arc;

use tt_config::Config;
use tt_store::JsonStore;

use crate::error::CliError;

/// Load the configuration and open the JSON data store it points at.
pub(crate) fn load_config_and_store(
    config_path: Option<&Path>,
) -> Result<(Config, Arc<JsonStore>), CliError> {
    let config = Config::load(config_path)?;
    let store = JsonStore::open(&config.data_file_resolved)?;
    Ok((config, Arc::new(store)))
}
