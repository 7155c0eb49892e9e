//! Configuration management for the TimeTracker sync tools.
//!
//! Parses `tt.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `sync.user`
//! - `trackers[].base_url`
//! - `trackers[].consumer_key`
//! - `trackers[].consumer_secret`
//! - `trackers[].oauth_callback`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "tt.toml";

/// Application configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Synchronization settings (acting user, data file location).
    pub sync: SyncConfig,
    /// Ticket-system definitions.
    pub trackers: Vec<TrackerConfig>,

    /// Resolved data file path (set after loading).
    #[serde(skip)]
    pub data_file_resolved: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Synchronization settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Local user id the CLI acts as.
    pub user: String,
    /// Path to the JSON data file (entries + credentials), relative
    /// to the config file.
    pub data_file: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            data_file: "tt-data.json".to_owned(),
        }
    }
}

/// A ticket-system (tracker) definition.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Tracker name, used as the credential key and on the CLI.
    pub name: String,
    /// Tracker server base URL.
    pub base_url: String,
    /// OAuth consumer key.
    #[serde(default = "default_consumer_key")]
    pub consumer_key: String,
    /// OAuth consumer secret: inline PEM private key or a path to a
    /// PEM file.
    pub consumer_secret: String,
    /// Whether time booking is enabled for this tracker at all.
    #[serde(default)]
    pub book_time: bool,
    /// Ticket display URL template with a `%s` placeholder for the key.
    #[serde(default)]
    pub ticket_url: Option<String>,
    /// Application OAuth callback URL. When absent the out-of-band
    /// (`oob`) flow is used.
    #[serde(default)]
    pub oauth_callback: Option<String>,
}

impl TrackerConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has
    /// invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.name, "trackers.name")?;
        require_non_empty(&self.base_url, "trackers.base_url")?;
        require_http_url(&self.base_url, "trackers.base_url")?;
        require_non_empty(&self.consumer_key, "trackers.consumer_key")?;
        require_non_empty(&self.consumer_secret, "trackers.consumer_secret")?;
        if let Some(callback) = &self.oauth_callback {
            require_http_url(callback, "trackers.oauth_callback")?;
        }
        Ok(())
    }

    /// Expand the ticket display URL template for an issue key.
    ///
    /// Returns `None` when no template is configured.
    #[must_use]
    pub fn ticket_url_for(&self, key: &str) -> Option<String> {
        self.ticket_url
            .as_ref()
            .map(|template| template.replace("%s", key))
    }
}

fn default_consumer_key() -> String {
    "tt".to_owned()
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`trackers.consumer_secret`").
        field: String,
        /// Error message (e.g., "${`TT_CONSUMER_SECRET`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `tt.toml` in the current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing
    /// fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)
        } else {
            Ok(Self::default_with_cwd())
        }
    }

    /// Get a validated tracker definition by name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no tracker with that name
    /// is configured or its definition is invalid.
    pub fn require_tracker(&self, name: &str) -> Result<&TrackerConfig, ConfigError> {
        let tracker = self
            .trackers
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| {
                ConfigError::Validation(format!("no [[trackers]] entry named \"{name}\""))
            })?;
        tracker.validate()?;
        Ok(tracker)
    }

    /// Get the acting user, validated to be non-empty.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `sync.user` is not set.
    pub fn require_user(&self) -> Result<&str, ConfigError> {
        require_non_empty(&self.sync.user, "sync.user")?;
        Ok(&self.sync.user)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to the working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        let mut config = Self::default();
        config.data_file_resolved = cwd.join(&config.sync.data_file);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.data_file_resolved = config_dir.join(&config.sync.data_file);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Tracker definitions are validated lazily via [`Config::require_tracker`];
    /// here only cross-cutting constraints are checked.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = Vec::new();
        for tracker in &self.trackers {
            require_non_empty(&tracker.name, "trackers.name")?;
            if seen.contains(&tracker.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate [[trackers]] entry \"{}\"",
                    tracker.name
                )));
            }
            seen.push(tracker.name.as_str());
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.sync.user = expand::expand_env(&self.sync.user, "sync.user")?;

        for tracker in &mut self.trackers {
            tracker.base_url = expand::expand_env(&tracker.base_url, "trackers.base_url")?;
            tracker.consumer_key =
                expand::expand_env(&tracker.consumer_key, "trackers.consumer_key")?;
            tracker.consumer_secret =
                expand::expand_env(&tracker.consumer_secret, "trackers.consumer_secret")?;
            if let Some(callback) = &tracker.oauth_callback {
                tracker.oauth_callback =
                    Some(expand::expand_env(callback, "trackers.oauth_callback")?);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_tracker() -> TrackerConfig {
        TrackerConfig {
            name: "jira".to_owned(),
            base_url: "https://jira.example.com".to_owned(),
            consumer_key: "tt".to_owned(),
            consumer_secret: "private_key.pem".to_owned(),
            book_time: true,
            ticket_url: Some("https://jira.example.com/browse/%s".to_owned()),
            oauth_callback: None,
        }
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.sync.user, "");
        assert_eq!(config.sync.data_file, "tt-data.json");
        assert!(config.trackers.is_empty());
    }

    #[test]
    fn test_parse_tracker_config() {
        let toml = r#"
[sync]
user = "jdoe"

[[trackers]]
name = "jira"
base_url = "https://jira.example.com"
consumer_key = "timetracker"
consumer_secret = "keys/jira.pem"
book_time = true
ticket_url = "https://jira.example.com/browse/%s"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sync.user, "jdoe");
        assert_eq!(config.trackers.len(), 1);
        let tracker = &config.trackers[0];
        assert_eq!(tracker.name, "jira");
        assert_eq!(tracker.consumer_key, "timetracker");
        assert!(tracker.book_time);
    }

    #[test]
    fn test_consumer_key_default() {
        let toml = r#"
[[trackers]]
name = "jira"
base_url = "https://jira.example.com"
consumer_secret = "key.pem"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.trackers[0].consumer_key, "tt");
        assert!(!config.trackers[0].book_time);
    }

    #[test]
    fn test_ticket_url_for() {
        let tracker = valid_tracker();
        assert_eq!(
            tracker.ticket_url_for("ABC-1"),
            Some("https://jira.example.com/browse/ABC-1".to_owned())
        );
    }

    #[test]
    fn test_ticket_url_for_unconfigured() {
        let tracker = TrackerConfig {
            ticket_url: None,
            ..valid_tracker()
        };
        assert_eq!(tracker.ticket_url_for("ABC-1"), None);
    }

    #[test]
    fn test_tracker_validate_valid() {
        assert!(valid_tracker().validate().is_ok());
    }

    #[test]
    fn test_tracker_validate_bad_base_url() {
        let tracker = TrackerConfig {
            base_url: "jira.example.com".to_owned(),
            ..valid_tracker()
        };
        let err = tracker.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_tracker_validate_empty_secret() {
        let tracker = TrackerConfig {
            consumer_secret: String::new(),
            ..valid_tracker()
        };
        let err = tracker.validate().unwrap_err();
        assert!(err.to_string().contains("consumer_secret"));
    }

    #[test]
    fn test_tracker_validate_bad_callback() {
        let tracker = TrackerConfig {
            oauth_callback: Some("not-a-url".to_owned()),
            ..valid_tracker()
        };
        let err = tracker.validate().unwrap_err();
        assert!(err.to_string().contains("oauth_callback"));
    }

    #[test]
    fn test_require_tracker_found() {
        let config = Config {
            trackers: vec![valid_tracker()],
            ..Config::default()
        };
        assert!(config.require_tracker("jira").is_ok());
    }

    #[test]
    fn test_require_tracker_missing() {
        let config = Config::default();
        let err = config.require_tracker("jira").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("jira"));
    }

    #[test]
    fn test_validate_duplicate_trackers() {
        let config = Config {
            trackers: vec![valid_tracker(), valid_tracker()],
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_require_user_empty() {
        let config = Config::default();
        let err = config.require_user().unwrap_err();
        assert!(err.to_string().contains("sync.user"));
    }

    #[test]
    fn test_expand_env_vars_tracker() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TT_TEST_BASE_URL", "https://jira.test.com");
            std::env::set_var("TT_TEST_SECRET", "inline-secret");
        }

        let toml = r#"
[[trackers]]
name = "jira"
base_url = "${TT_TEST_BASE_URL}"
consumer_secret = "${TT_TEST_SECRET}"
consumer_key = "${TT_TEST_CONSUMER:-tt}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        let tracker = &config.trackers[0];
        assert_eq!(tracker.base_url, "https://jira.test.com");
        assert_eq!(tracker.consumer_secret, "inline-secret");
        assert_eq!(tracker.consumer_key, "tt");

        unsafe {
            std::env::remove_var("TT_TEST_BASE_URL");
            std::env::remove_var("TT_TEST_SECRET");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TT_MISSING_VAR_TEST");
        }

        let toml = r#"
[[trackers]]
name = "jira"
base_url = "${TT_MISSING_VAR_TEST}"
consumer_secret = "key.pem"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("TT_MISSING_VAR_TEST"));
        assert!(err.to_string().contains("trackers.base_url"));
    }

    #[test]
    fn test_expand_env_vars_literal_unchanged() {
        let toml = r#"
[sync]
user = "jdoe"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        assert_eq!(config.sync.user, "jdoe");
    }
}
