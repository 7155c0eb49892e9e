//! Per-user-per-tracker OAuth credential row.

use serde::{Deserialize, Serialize};

/// Placeholder access token stored between the request-token and
/// access-token steps of the OAuth handshake.
pub const REQUEST_TOKEN_PLACEHOLDER: &str = "token_request_unfinished";

/// OAuth access credentials for one `(user, tracker)` pairing.
///
/// Lifecycle: created on the request-token step with
/// [`REQUEST_TOKEN_PLACEHOLDER`] as the access token, replaced by the
/// real pair on the access-token step, and cleared (empty pair,
/// `avoid_connection = true`) when the user denies authorization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// OAuth access token.
    pub access_token: String,
    /// OAuth token secret.
    pub token_secret: String,
    /// "Do not attempt to sync for this pairing"; set when the user
    /// declines authorization or opts out.
    #[serde(default)]
    pub avoid_connection: bool,
}

impl Credential {
    /// Credentials as stored after a completed handshake.
    #[must_use]
    pub fn granted(access_token: impl Into<String>, token_secret: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_secret: token_secret.into(),
            avoid_connection: false,
        }
    }

    /// Credentials as stored while a request token awaits authorization.
    #[must_use]
    pub fn unfinished(token_secret: impl Into<String>) -> Self {
        Self {
            access_token: REQUEST_TOKEN_PLACEHOLDER.to_owned(),
            token_secret: token_secret.into(),
            avoid_connection: false,
        }
    }

    /// Cleared credentials recording a declined authorization.
    #[must_use]
    pub fn declined() -> Self {
        Self {
            access_token: String::new(),
            token_secret: String::new(),
            avoid_connection: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_granted() {
        let credential = Credential::granted("tok", "sec");
        assert_eq!(credential.access_token, "tok");
        assert_eq!(credential.token_secret, "sec");
        assert!(!credential.avoid_connection);
    }

    #[test]
    fn test_unfinished_uses_placeholder() {
        let credential = Credential::unfinished("request-secret");
        assert_eq!(credential.access_token, REQUEST_TOKEN_PLACEHOLDER);
        assert_eq!(credential.token_secret, "request-secret");
    }

    #[test]
    fn test_declined_clears_pair() {
        let credential = Credential::declined();
        assert_eq!(credential.access_token, "");
        assert_eq!(credential.token_secret, "");
        assert!(credential.avoid_connection);
    }
}
