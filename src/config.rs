use std::time::Duration;

use bon::Builder;
use url::Url;

use crate::{Result, V2_URL};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn default_host() -> Url {
    Url::parse(V2_URL).expect("V2_URL is a valid URL")
}

/// Connection settings shared by every request a client makes.
#[non_exhaustive]
#[derive(Clone, Debug, Builder)]
pub struct Config {
    /// Base URL every endpoint path is resolved against.
    #[builder(default = default_host())]
    pub host: Url,
    /// Upper bound on a whole request, connect to last body byte.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
    #[builder(into)]
    pub user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    /// Parses a string host, keeping every other setting at its default.
    pub fn from_raw(host: &str, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self::builder()
            .host(Url::parse(host)?)
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build())
    }

    /// The host with a trailing `/`, so joining `ticker` onto `.../v2`
    /// yields `.../v2/ticker` rather than replacing `v2`.
    #[must_use]
    pub(crate) fn base_url(&self) -> Url {
        let mut base = self.host.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base
    }
}
