//! Request signing for the private endpoints.
//!
//! Every private call carries a [`SignedEnvelope`]: the API key, a nonce and
//! the lowercase hex HMAC-SHA256 of `nonce ‖ client id ‖ api key`, keyed by
//! the API secret.

pub mod nonce;

use std::fmt;
use std::sync::Arc;

use hmac::{Hmac, Mac as _};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Serialize;
use sha2::Sha256;

pub use nonce::{Clock, MonotonicNonce, NonceSource, SystemClock};

type HmacSha256 = Hmac<Sha256>;

/// Account credentials issued by the exchange.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    key: String,
    secret: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(client_id: String, key: String, secret: SecretString) -> Self {
        Self {
            client_id,
            key,
            secret,
        }
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("key", &self.key)
            .field("secret", &"***REDACTED***")
            .finish()
    }
}

/// Authentication fields merged into the body of a private request.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignedEnvelope {
    pub key: String,
    pub signature: String,
    pub nonce: String,
}

/// Hex-encoded HMAC-SHA256 of `nonce ‖ client_id ‖ key` under `secret`.
#[must_use]
pub fn sign_message(secret: &str, nonce: &str, client_id: &str, key: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(nonce.as_bytes());
    mac.update(client_id.as_bytes());
    mac.update(key.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Produces a fresh [`SignedEnvelope`] for each private request.
#[derive(Clone)]
pub struct Signer {
    credentials: Credentials,
    nonces: Arc<dyn NonceSource>,
}

impl Signer {
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self::with_nonce_source(credentials, Arc::new(MonotonicNonce::new()))
    }

    #[must_use]
    pub fn with_nonce_source(credentials: Credentials, nonces: Arc<dyn NonceSource>) -> Self {
        Self {
            credentials,
            nonces,
        }
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub fn sign(&self) -> SignedEnvelope {
        let nonce = self.nonces.next_nonce().to_string();
        let signature = sign_message(
            self.credentials.secret.expose_secret(),
            &nonce,
            &self.credentials.client_id,
            &self.credentials.key,
        );

        SignedEnvelope {
            key: self.credentials.key.clone(),
            signature,
            nonce,
        }
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
