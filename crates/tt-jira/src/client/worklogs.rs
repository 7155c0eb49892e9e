//! Worklog operations.

use tracing::info;

use super::JiraClient;
use crate::error::JiraError;
use crate::sync::WorklogGateway;
use crate::types::{CreatedWorklog, WorklogRequest};

impl JiraClient {
    /// Whether a worklog still exists under an issue.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`JiraError`] for any failure other than
    /// a 404.
    pub fn worklog_exists(&self, key: &str, worklog_id: u64) -> Result<bool, JiraError> {
        match self.get(&format!("issue/{key}/worklog/{worklog_id}")) {
            Ok(_) => Ok(true),
            Err(JiraError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Create a worklog under an issue and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] if the call or response decoding fails.
    pub fn create_worklog(
        &self,
        key: &str,
        request: &WorklogRequest,
    ) -> Result<CreatedWorklog, JiraError> {
        info!(issue = key, seconds = request.time_spent_seconds, "creating worklog");
        let value = self.post(&format!("issue/{key}/worklog"), &serde_json::to_value(request)?)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Replace an existing worklog's comment, start and duration.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] if the call fails; a 404 means the worklog
    /// vanished and surfaces as [`JiraError::NotFound`].
    pub fn update_worklog(
        &self,
        key: &str,
        worklog_id: u64,
        request: &WorklogRequest,
    ) -> Result<(), JiraError> {
        info!(issue = key, worklog_id, "updating worklog");
        self.put(
            &format!("issue/{key}/worklog/{worklog_id}"),
            &serde_json::to_value(request)?,
        )
    }

    /// Delete a worklog. An already-deleted worklog (404) counts as
    /// success.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] for failures other than a 404.
    pub fn delete_worklog(&self, key: &str, worklog_id: u64) -> Result<(), JiraError> {
        info!(issue = key, worklog_id, "deleting worklog");
        match self.delete(&format!("issue/{key}/worklog/{worklog_id}")) {
            Err(JiraError::NotFound(_)) => Ok(()),
            other => other,
        }
    }
}

impl WorklogGateway for JiraClient {
    fn issue_exists(&self, key: &str) -> Result<bool, JiraError> {
        Self::issue_exists(self, key)
    }

    fn worklog_exists(&self, key: &str, worklog_id: u64) -> Result<bool, JiraError> {
        Self::worklog_exists(self, key, worklog_id)
    }

    fn create_worklog(
        &self,
        key: &str,
        request: &WorklogRequest,
    ) -> Result<CreatedWorklog, JiraError> {
        Self::create_worklog(self, key, request)
    }

    fn update_worklog(
        &self,
        key: &str,
        worklog_id: u64,
        request: &WorklogRequest,
    ) -> Result<(), JiraError> {
        Self::update_worklog(self, key, worklog_id, request)
    }

    fn delete_worklog(&self, key: &str, worklog_id: u64) -> Result<(), JiraError> {
        Self::delete_worklog(self, key, worklog_id)
    }
}
