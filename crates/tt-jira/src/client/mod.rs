//! Jira REST API client.
//!
//! Sync HTTP client for the Jira Server/Data Center REST API with
//! OAuth 1.0 RSA-SHA1 authentication. One client is bound to one
//! `(user, tracker)` pairing and signs with whatever token pair the
//! credential store currently holds for it.

mod issues;
mod worklogs;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use ureq::Agent;

use tt_config::TrackerConfig;
use tt_store::CredentialStore;

use crate::error::JiraError;
use crate::oauth::{OAuthHandshake, SignerCache};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Jira REST API client for one `(user, tracker)` pairing.
pub struct JiraClient {
    agent: Agent,
    tracker: TrackerConfig,
    user: String,
    credentials: Arc<dyn CredentialStore>,
    signers: Mutex<SignerCache>,
    handshake: OAuthHandshake,
}

impl std::fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraClient")
            .field("tracker", &self.tracker)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl JiraClient {
    /// Create a client from a tracker definition.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Config`] if the tracker's consumer secret
    /// cannot be loaded as an RSA private key.
    pub fn new(
        tracker: &TrackerConfig,
        user: &str,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, JiraError> {
        let private_key = crate::oauth::key::load_consumer_secret(&tracker.consumer_secret)?;

        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        let handshake = OAuthHandshake::new(tracker, user, Arc::clone(&credentials))?;

        Ok(Self {
            agent,
            tracker: tracker.clone(),
            user: user.to_owned(),
            credentials,
            signers: Mutex::new(SignerCache::new(&tracker.consumer_key, private_key)),
            handshake,
        })
    }

    /// The tracker this client talks to.
    #[must_use]
    pub fn tracker_name(&self) -> &str {
        &self.tracker.name
    }

    /// Display URL for an issue key, when the tracker configures one.
    #[must_use]
    pub fn ticket_url(&self, key: &str) -> Option<String> {
        self.tracker.ticket_url_for(key)
    }

    /// GET a REST resource and decode the JSON body.
    ///
    /// # Errors
    ///
    /// [`JiraError::NotFound`] on 404, [`JiraError::Unauthorized`] on
    /// 401 (carrying a fresh authorization URL), [`JiraError::Api`] on
    /// other error statuses, [`JiraError::Transport`] on network
    /// failure.
    pub fn get(&self, path: &str) -> Result<Value, JiraError> {
        Ok(self.request("GET", path, None)?.unwrap_or(Value::Null))
    }

    /// POST a JSON body to a REST resource and decode the response.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`JiraClient::get`].
    pub fn post(&self, path: &str, body: &Value) -> Result<Value, JiraError> {
        Ok(self.request("POST", path, Some(body))?.unwrap_or(Value::Null))
    }

    /// PUT a JSON body to a REST resource. The response body carries
    /// nothing meaningful and is discarded.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`JiraClient::get`].
    pub fn put(&self, path: &str, body: &Value) -> Result<(), JiraError> {
        self.request("PUT", path, Some(body)).map(|_| ())
    }

    /// DELETE a REST resource.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`JiraClient::get`]; a 404 is reported as
    /// [`JiraError::NotFound`] and left to the caller to interpret.
    pub fn delete(&self, path: &str) -> Result<(), JiraError> {
        self.request("DELETE", path, None).map(|_| ())
    }

    /// The REST API root for this tracker.
    fn api_url(&self) -> String {
        format!(
            "{}/rest/api/latest",
            self.tracker.base_url.trim_end_matches('/')
        )
    }

    /// Signer for the currently stored token pair.
    ///
    /// A pairing without a credential row signs with an empty token;
    /// the server answers 401 and the caller is handed an
    /// authorization URL.
    fn signer(&self) -> Result<Arc<crate::oauth::OAuth1Signer>, JiraError> {
        let credential = self
            .credentials
            .find(&self.user, &self.tracker.name)?
            .unwrap_or_default();
        let mut signers = self.signers.lock().expect("signer cache poisoned");
        Ok(signers.get(&credential.access_token, &credential.token_secret))
    }

    /// Sign and send one request, mapping the response status into the
    /// error taxonomy. Returns the decoded JSON body, or `None` when
    /// the response has no body.
    fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, JiraError> {
        let url = format!("{}/{}", self.api_url(), path);
        let uri: ureq::http::Uri = url
            .parse()
            .map_err(|_| JiraError::Config(format!("invalid request URL: {url}")))?;
        let auth_header = self.signer()?.sign(method, &uri);
        let payload = body.map(serde_json::to_vec).transpose()?;

        let response = self.dispatch(method, &url, &auth_header, payload)?;
        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        match status {
            401 => Err(self.unauthorized()),
            404 => Err(JiraError::NotFound(path.to_owned())),
            status if status >= 400 => {
                let error_body = body_reader
                    .read_to_string()
                    .unwrap_or_else(|_| "(unable to read error body)".to_owned());
                Err(JiraError::Api {
                    status,
                    body: error_body,
                })
            }
            _ => {
                let text = body_reader.read_to_string()?;
                if text.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(serde_json::from_str(&text)?))
                }
            }
        }
    }

    /// Perform the HTTP call. Only ever invoked with GET, POST, PUT or
    /// DELETE; anything else falls through to GET.
    fn dispatch(
        &self,
        method: &str,
        url: &str,
        auth_header: &str,
        payload: Option<Vec<u8>>,
    ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        let payload = payload.unwrap_or_default();
        match method {
            "POST" => self
                .agent
                .post(url)
                .header("Authorization", auth_header)
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .send(&payload[..]),
            "PUT" => self
                .agent
                .put(url)
                .header("Authorization", auth_header)
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .send(&payload[..]),
            "DELETE" => self
                .agent
                .delete(url)
                .header("Authorization", auth_header)
                .header("Accept", "application/json")
                .call(),
            _ => self
                .agent
                .get(url)
                .header("Authorization", auth_header)
                .header("Accept", "application/json")
                .call(),
        }
    }

    /// Turn a 401 into an actionable error: mint a fresh request token
    /// and hand back the authorization URL the user must visit.
    fn unauthorized(&self) -> JiraError {
        match self.handshake.fetch_request_token() {
            Ok((_token, authorize_url)) => JiraError::Unauthorized { authorize_url },
            Err(err) => err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_store::MemoryStore;

    fn tracker() -> TrackerConfig {
        TrackerConfig {
            name: "jira".to_owned(),
            base_url: "https://jira.example.com/".to_owned(),
            consumer_key: "consumer".to_owned(),
            consumer_secret: crate::oauth::key::tests::TEST_PKCS8_KEY.to_owned(),
            book_time: true,
            ticket_url: Some("https://jira.example.com/browse/%s".to_owned()),
            oauth_callback: None,
        }
    }

    fn client() -> JiraClient {
        JiraClient::new(&tracker(), "jdoe", Arc::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_api_url_strips_trailing_slash() {
        assert_eq!(client().api_url(), "https://jira.example.com/rest/api/latest");
    }

    #[test]
    fn test_ticket_url() {
        assert_eq!(
            client().ticket_url("ABC-1"),
            Some("https://jira.example.com/browse/ABC-1".to_owned())
        );
    }

    #[test]
    fn test_new_rejects_bad_consumer_secret() {
        let bad = TrackerConfig {
            consumer_secret: "/nonexistent/key.pem".to_owned(),
            ..tracker()
        };
        let err = JiraClient::new(&bad, "jdoe", Arc::new(MemoryStore::new())).unwrap_err();
        assert!(matches!(err, JiraError::Config(_)));
    }

    #[test]
    fn test_signer_without_credential_row_uses_empty_token() {
        let client = client();
        // No credential row: the signer is built for the empty pair
        // rather than failing, so the server can answer 401.
        client.signer().unwrap();
    }
}
