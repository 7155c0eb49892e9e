//! Decoded API results and request bodies.

mod issue;
mod worklog;

pub use issue::{CreatedIssue, IssueRef, SearchResult};
pub use worklog::{CreatedWorklog, WorklogRequest};

use serde::{Deserialize, Deserializer};

/// Jira emits resource ids sometimes as JSON strings, sometimes as
/// numbers; accept both.
pub(crate) fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(id) => Ok(id),
        Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}
