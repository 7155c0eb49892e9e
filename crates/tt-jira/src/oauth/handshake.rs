//! Three-legged OAuth 1.0 token flow.
//!
//! `NoToken -> RequestTokenIssued -> AccessTokenIssued`, with the side
//! branch `RequestTokenIssued -> Denied` when the user declines on the
//! consent screen. The resulting state lives in the [`CredentialStore`];
//! this coordinator itself is stateless.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use rsa::RsaPrivateKey;
use tracing::info;
use ureq::Agent;

use tt_config::TrackerConfig;
use tt_store::{Credential, CredentialStore};

use super::key::load_consumer_secret;
use super::signature::{OAuthParams, authorization_header, oauth_encode};
use crate::error::JiraError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Verifier value signalling that the user declined authorization.
pub const DENIED_VERIFIER: &str = "denied";

/// Temporary credentials from the request-token phase.
#[derive(Debug, Clone)]
pub struct RequestToken {
    pub oauth_token: String,
    pub oauth_token_secret: String,
}

/// Final access credentials.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub oauth_token: String,
    pub oauth_token_secret: String,
}

/// Result of the access-token exchange.
#[derive(Debug)]
pub enum AccessOutcome {
    /// The user authorized; the pair is persisted as the steady state.
    Granted(AccessToken),
    /// The user declined; the credential row was cleared and marked
    /// avoid-connection.
    Denied,
}

/// OAuth 1.0 handshake coordinator for one `(user, tracker)` pairing.
///
/// 1. Request temporary credentials (request token)
/// 2. Hand the authorization URL to the user
/// 3. Exchange the verifier for access credentials
///
/// Both steps persist their outcome through the credential store, so an
/// interrupted flow can be resumed or restarted at any point.
pub struct OAuthHandshake {
    agent: Agent,
    consumer_key: String,
    private_key: RsaPrivateKey,
    user: String,
    tracker: String,
    callback: Option<String>,
    request_token_url: String,
    authorize_url: String,
    access_token_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl OAuthHandshake {
    /// Create a handshake coordinator from a tracker definition.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Config`] if the tracker's consumer secret is
    /// neither a readable key file nor inline PEM.
    pub fn new(
        tracker: &TrackerConfig,
        user: &str,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, JiraError> {
        let private_key = load_consumer_secret(&tracker.consumer_secret)?;
        let base_url = tracker.base_url.trim_end_matches('/');

        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self {
            agent,
            consumer_key: tracker.consumer_key.clone(),
            private_key,
            user: user.to_owned(),
            tracker: tracker.name.clone(),
            callback: tracker.oauth_callback.clone(),
            request_token_url: format!("{base_url}/plugins/servlet/oauth/request-token"),
            authorize_url: format!("{base_url}/plugins/servlet/oauth/authorize"),
            access_token_url: format!("{base_url}/plugins/servlet/oauth/access-token"),
            credentials,
        })
    }

    /// Step 1: request temporary credentials.
    ///
    /// Persists the request-token secret (with the placeholder access
    /// token) and returns the token together with the authorization URL
    /// to show the user.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Handshake`] if the HTTP request fails or the
    /// response is missing the token pair, [`JiraError::Store`] if the
    /// credential row cannot be written.
    pub fn fetch_request_token(&self) -> Result<(RequestToken, String), JiraError> {
        let callback = self.callback_value();
        let url = format!(
            "{}?oauth_callback={}",
            self.request_token_url,
            oauth_encode(&callback)
        );
        let header = authorization_header(
            "POST",
            &self.request_token_url,
            &[("oauth_callback".to_owned(), callback)],
            &OAuthParams {
                consumer_key: &self.consumer_key,
                token: None,
            },
            &self.private_key,
        );

        let body = self.post_form(&url, &header, "request token")?;
        let (oauth_token, oauth_token_secret) = parse_token_pair(&body)?;

        self.credentials.upsert(
            &self.user,
            &self.tracker,
            &Credential::unfinished(oauth_token_secret.clone()),
        )?;
        info!(tracker = %self.tracker, user = %self.user, "issued OAuth request token");

        let authorize = format!("{}?oauth_token={}", self.authorize_url, oauth_token);
        Ok((
            RequestToken {
                oauth_token,
                oauth_token_secret,
            },
            authorize,
        ))
    }

    /// Step 3: exchange the verifier for an access token.
    ///
    /// A [`DENIED_VERIFIER`] verifier records the user's decline: the
    /// credential row is cleared and marked avoid-connection without any
    /// network call.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Handshake`] if the HTTP request fails or the
    /// response is missing the token pair, [`JiraError::Store`] if the
    /// credential row cannot be written.
    pub fn fetch_access_token(
        &self,
        request_token: &str,
        verifier: &str,
    ) -> Result<AccessOutcome, JiraError> {
        if verifier == DENIED_VERIFIER {
            self.credentials
                .upsert(&self.user, &self.tracker, &Credential::declined())?;
            info!(tracker = %self.tracker, user = %self.user, "user declined OAuth authorization");
            return Ok(AccessOutcome::Denied);
        }

        let url = format!(
            "{}?oauth_verifier={}",
            self.access_token_url,
            oauth_encode(verifier)
        );
        let header = authorization_header(
            "POST",
            &self.access_token_url,
            &[("oauth_verifier".to_owned(), verifier.to_owned())],
            &OAuthParams {
                consumer_key: &self.consumer_key,
                token: Some(request_token),
            },
            &self.private_key,
        );

        let body = self.post_form(&url, &header, "access token exchange")?;
        let (oauth_token, oauth_token_secret) = parse_token_pair(&body)?;

        self.credentials.upsert(
            &self.user,
            &self.tracker,
            &Credential::granted(oauth_token.clone(), oauth_token_secret.clone()),
        )?;
        info!(tracker = %self.tracker, user = %self.user, "issued OAuth access token");

        Ok(AccessOutcome::Granted(AccessToken {
            oauth_token,
            oauth_token_secret,
        }))
    }

    /// Effective `oauth_callback` value: the configured application
    /// callback with the tracker name appended (so several trackers can
    /// share one callback route), or out-of-band.
    fn callback_value(&self) -> String {
        match &self.callback {
            Some(callback) => {
                let separator = if callback.contains('?') { '&' } else { '?' };
                format!(
                    "{callback}{separator}tracker={}",
                    oauth_encode(&self.tracker)
                )
            }
            None => "oob".to_owned(),
        }
    }

    /// POST to a token endpoint and return the raw response body.
    ///
    /// No retries: the handshake is interactive and retried by the
    /// human, not the machine.
    fn post_form(&self, url: &str, auth_header: &str, context: &str) -> Result<String, JiraError> {
        let response = self
            .agent
            .post(url)
            .header("Authorization", auth_header)
            .send(&[] as &[u8])
            .map_err(|e| JiraError::handshake(format!("{context} failed: {e}")))?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();
        let body = body_reader
            .read_to_string()
            .map_err(|e| JiraError::handshake(format!("failed to read response: {e}")))?;

        if status >= 400 {
            return Err(JiraError::Handshake {
                status: Some(status),
                message: format!("{context} failed: {body}"),
            });
        }

        Ok(body)
    }
}

/// Parse the form-encoded token pair out of a token-endpoint response.
fn parse_token_pair(body: &str) -> Result<(String, String), JiraError> {
    let params = form_decode(body);
    let token = required_param(&params, "oauth_token")?;
    let secret = required_param(&params, "oauth_token_secret")?;
    Ok((token, secret))
}

/// Decode an `application/x-www-form-urlencoded` body.
fn form_decode(body: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in body.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            params.insert(
                percent_decode_str(key).decode_utf8_lossy().into_owned(),
                percent_decode_str(value).decode_utf8_lossy().into_owned(),
            );
        }
    }
    params
}

fn required_param(params: &HashMap<String, String>, key: &str) -> Result<String, JiraError> {
    params
        .get(key)
        .cloned()
        .ok_or_else(|| JiraError::handshake(format!("missing parameter: {key}")))
}
