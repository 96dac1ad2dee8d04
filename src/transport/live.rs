use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client as ReqwestClient, Request};
use url::Url;

use crate::Result;
use crate::config::Config;
use crate::transport::Transport;

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// HTTP transport backed by a pooled [`reqwest::Client`].
#[derive(Clone, Debug)]
pub struct LiveTransport {
    client: ReqwestClient,
}

impl LiveTransport {
    /// Builds a transport whose requests honour the configured timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = ReqwestClient::builder().timeout(config.timeout);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        Ok(Self::with_client(builder.build()?))
    }

    /// Wraps an existing client, e.g. one with custom TLS or proxy settings.
    ///
    /// The caller is responsible for configuring a timeout on `client`.
    #[must_use]
    pub fn with_client(client: ReqwestClient) -> Self {
        Self { client }
    }

    async fn execute(&self, request: Request) -> Result<Vec<u8>> {
        #[cfg(feature = "tracing")]
        let (method, path) = (request.method().clone(), request.url().path().to_owned());

        let response = self.client.execute(request).await?;

        #[cfg(feature = "tracing")]
        {
            let status = response.status();
            if status.is_success() {
                tracing::debug!(%method, %path, %status, "response received");
            } else {
                tracing::warn!(%method, %path, %status, "non-success status");
            }
        }

        // Returned whatever the status: an embedded error envelope, not the
        // status line, marks a failed call.
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl Transport for LiveTransport {
    async fn get(&self, url: &Url) -> Result<Vec<u8>> {
        let request = self.client.get(url.clone()).build()?;
        self.execute(request).await
    }

    async fn post(&self, url: &Url, body: Vec<u8>) -> Result<Vec<u8>> {
        let request = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))
            .body(body)
            .build()?;

        self.execute(request).await
    }
}
