//! OAuth 1.0 RSA-SHA1 authentication for Jira Server/Data Center.
//!
//! On-prem Jira only speaks the legacy three-legged OAuth 1.0 flow with
//! RSA-SHA1 request signing. This module provides the signing primitives,
//! a per-token-pair signer cache, and the interactive handshake.

mod handshake;
pub(crate) mod key;
mod signature;

pub use handshake::{AccessOutcome, AccessToken, DENIED_VERIFIER, OAuthHandshake, RequestToken};

use std::collections::HashMap;
use std::sync::Arc;

use rsa::RsaPrivateKey;
use ureq::http::Uri;

use signature::{OAuthParams, authorization_header};

/// Signers kept per cache before wholesale eviction. Each pairing only
/// ever sees a couple of token pairs (placeholder, access token), so a
/// tiny cap is plenty.
const CACHE_CAP: usize = 8;

/// Signs requests for one `(token, token_secret)` pair (internal use only).
pub(crate) struct OAuth1Signer {
    consumer_key: String,
    private_key: RsaPrivateKey,
    token: String,
}

impl OAuth1Signer {
    fn new(consumer_key: &str, private_key: RsaPrivateKey, token: &str) -> Self {
        Self {
            consumer_key: consumer_key.to_owned(),
            private_key,
            token: token.to_owned(),
        }
    }

    /// Compute the OAuth Authorization header for a request.
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, PUT, DELETE)
    /// * `uri` - Full request URI (including query string)
    pub(crate) fn sign(&self, method: &str, uri: &Uri) -> String {
        // Base URL excludes query string (RFC 5849 Section 3.4.1.2)
        let base_url = format!(
            "{}://{}{}",
            uri.scheme_str().unwrap_or("https"),
            uri.authority().map(ureq::http::uri::Authority::as_str).unwrap_or(""),
            uri.path()
        );

        authorization_header(
            method,
            &base_url,
            &split_query(uri),
            &OAuthParams {
                consumer_key: &self.consumer_key,
                token: Some(&self.token),
            },
            &self.private_key,
        )
    }
}

/// Parse query parameters for inclusion in the signature
/// (RFC 5849 Section 3.4.1.3).
fn split_query(uri: &Uri) -> Vec<(String, String)> {
    uri.query()
        .map(|q| {
            q.split('&')
                .filter_map(|param| {
                    let mut parts = param.splitn(2, '=');
                    let key = parts.next()?;
                    let value = parts.next().unwrap_or("");
                    Some((key.to_owned(), value.to_owned()))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Per-token-pair signer cache, owned by one client instance.
///
/// Avoids rebuilding the signing stack on every request. The cache key
/// is the full `(token, token_secret)` pair even though RSA-SHA1 never
/// feeds the secret into the signature: a secret rotation must not
/// reuse a stale signer.
pub(crate) struct SignerCache {
    consumer_key: String,
    private_key: RsaPrivateKey,
    signers: HashMap<(String, String), Arc<OAuth1Signer>>,
}

impl SignerCache {
    pub(crate) fn new(consumer_key: &str, private_key: RsaPrivateKey) -> Self {
        Self {
            consumer_key: consumer_key.to_owned(),
            private_key,
            signers: HashMap::new(),
        }
    }

    /// Get or build the signer for a token pair.
    pub(crate) fn get(&mut self, token: &str, token_secret: &str) -> Arc<OAuth1Signer> {
        let cache_key = (token.to_owned(), token_secret.to_owned());
        if let Some(signer) = self.signers.get(&cache_key) {
            return Arc::clone(signer);
        }
        if self.signers.len() >= CACHE_CAP {
            self.signers.clear();
        }
        let signer = Arc::new(OAuth1Signer::new(
            &self.consumer_key,
            self.private_key.clone(),
            token,
        ));
        self.signers.insert(cache_key, Arc::clone(&signer));
        signer
    }
}
