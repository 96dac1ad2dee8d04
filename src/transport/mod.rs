//! How request bytes reach the exchange and response bytes come back.
//!
//! [`LiveTransport`] talks HTTP. [`SimulatedTransport`] answers from a fixed
//! table of canned payloads so the whole client can run offline. Both hand
//! back raw bytes; classification and decoding never know which one ran.

mod live;
mod simulated;

use async_trait::async_trait;
use url::Url;

use crate::Result;

pub use live::LiveTransport;
pub use simulated::{RecordedRequest, SimulatedTransport};

#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and returns the full response body.
    async fn get(&self, url: &Url) -> Result<Vec<u8>>;

    /// Posts a JSON `body` to `url` and returns the full response body.
    async fn post(&self, url: &Url, body: Vec<u8>) -> Result<Vec<u8>>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get(&self, url: &Url) -> Result<Vec<u8>> {
        (**self).get(url).await
    }

    async fn post(&self, url: &Url, body: Vec<u8>) -> Result<Vec<u8>> {
        (**self).post(url, body).await
    }
}
