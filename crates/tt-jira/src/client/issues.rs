//! Issue operations.

use serde_json::json;
use tracing::info;

use super::JiraClient;
use crate::error::JiraError;
use crate::types::{CreatedIssue, SearchResult};

impl JiraClient {
    /// Whether an issue exists on the tracker.
    ///
    /// A 404 is a legitimate answer ("no"), not an error; anything else
    /// that goes wrong propagates.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`JiraError`] for any failure other than
    /// a 404.
    pub fn issue_exists(&self, key: &str) -> Result<bool, JiraError> {
        match self.get(&format!("issue/{key}")) {
            Ok(_) => Ok(true),
            Err(JiraError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Create a Task issue in a project.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] if the call or response decoding fails.
    pub fn create_issue(
        &self,
        project: &str,
        summary: &str,
        description: &str,
    ) -> Result<CreatedIssue, JiraError> {
        let payload = json!({
            "fields": {
                "project": {"key": project},
                "summary": summary,
                "description": description,
                "issuetype": {"name": "Task"}
            }
        });

        info!(project, summary, "creating issue");
        let value = self.post("issue/", &payload)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Run a JQL search.
    ///
    /// Always issued as POST: JQL strings can exceed URL length limits.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] if the call or response decoding fails.
    pub fn search(
        &self,
        jql: &str,
        fields: &[&str],
        max_results: u32,
    ) -> Result<SearchResult, JiraError> {
        let payload = json!({
            "jql": jql,
            "fields": fields,
            "maxResults": max_results
        });

        let value = self.post("search/", &payload)?;
        Ok(serde_json::from_value(value)?)
    }
}
