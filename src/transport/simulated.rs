use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use url::Url;

use crate::Result;
use crate::transport::{Method, Transport};

const TICKER: &str = r#"{"high":"12000.00","last":"11905.50","timestamp":"1521612778","volume":"400.13676232","vwap":"11529.43609206","low":"11701.00","ask":"11979.99","bid":"11905.50"}"#;

const ORDER_BOOK: &str = r#"{"timestamp":"1521612857","bids":[["11905.50","0.09024660"],["11905.00","0.31609072"],["11902.00","0.00102796"],["11780.01","3.52077000"],["11780.00","0.25000000"]],"asks":[["11979.99","0.11000000"],["12498.00","0.20000000"],["12499.00","0.39610642"],["12499.99","0.35055000"],["12500.00","1.55585603"]]}"#;

const TRANSACTIONS: &str = r#"[{"amount":"0.01000000","date":"1521612700","price":"11905.50","tid":2918324,"side":"buy"},{"amount":"0.25000000","date":"1521612650","price":"11900.00","tid":2918323,"side":"sell"}]"#;

const BALANCE: &str = r#"{"btc_available":"0.00947078","btc_reserved":"0.00000000","btc_balance":"0.00947078","bch_available":"0.00000000","bch_reserved":"0.00000000","bch_balance":"0.00000000","eth_available":"0.00000000","eth_reserved":"0.00000000","eth_balance":"0.00000000","ltc_available":"0.00000000","ltc_reserved":"0.00000000","ltc_balance":"0.00000000","cad_available":"0.00","cad_reserved":"0.00","cad_balance":"0.00","usd_available":"486.42","usd_reserved":"0.00","usd_balance":"486.42","fee":"0.5000","fees":{"btc_cad":"0.5000","btc_usd":"0.5000","eth_cad":"0.5000","eth_btc":"0.2000","ltc_cad":"0.5000","ltc_btc":"0.2000","bch_cad":"0.5000","bch_btc":"0.2000"}}"#;

const OPEN_ORDERS: &str = r#"[{"amount":"0.10000000","datetime":"2018-03-19 10:58:02","id":"r6gtvvd7m4cpaqd4yajkbn5gumksv81ku5iiwi9mg7ocssqx5vh0ycqr2vcmhphp","price":"11000.00","status":"0","type":"0"}]"#;

const LOOKUP_ORDER: &str = r#"[{"amount":"0.10000000","book":"btc_usd","created":"2018-03-19 10:58:02","updated":"2018-03-19 10:58:02","id":"r6gtvvd7m4cpaqd4yajkbn5gumksv81ku5iiwi9mg7ocssqx5vh0ycqr2vcmhphp","price":"11000.00","status":"0","type":"0"}]"#;

const CANCEL_ORDER: &str = r#""true""#;

const BUY: &str = r#"{"amount":"0.00200000","book":"btc_usd","datetime":"2018-03-19 11:12:00","id":"kbcbc1o4gj0bedrc13jclstsw1wqy2b05yqsewzn0hhixy36zttvebx5j70ovlxz","price":"0.00","status":"0","type":"0"}"#;

/// A request seen by [`SimulatedTransport`].
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Vec<u8>>,
}

/// Offline transport answering from a table of canned payloads.
///
/// Payloads are keyed by method and the final path segment of the URL, so
/// `https://api.quadrigacx.com/v2/ticker?book=btc_usd` is served by the
/// `(GET, "ticker")` entry. Unmapped requests get an empty body.
///
/// Requests are only kept when built with [`SimulatedTransport::recording`].
#[derive(Debug)]
pub struct SimulatedTransport {
    responses: HashMap<(Method, String), Vec<u8>>,
    recorded: Option<Mutex<Vec<RecordedRequest>>>,
}

impl Default for SimulatedTransport {
    /// Canned responses for every endpoint the client knows about.
    fn default() -> Self {
        Self::empty()
            .with_response(Method::Get, "ticker", TICKER)
            .with_response(Method::Get, "order_book", ORDER_BOOK)
            .with_response(Method::Get, "transactions", TRANSACTIONS)
            .with_response(Method::Post, "balance", BALANCE)
            .with_response(Method::Post, "open_orders", OPEN_ORDERS)
            .with_response(Method::Post, "lookup_order", LOOKUP_ORDER)
            .with_response(Method::Post, "cancel_order", CANCEL_ORDER)
            .with_response(Method::Post, "buy", BUY)
    }
}

impl SimulatedTransport {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            responses: HashMap::new(),
            recorded: None,
        }
    }

    /// Keeps every request served from now on, until drained with
    /// [`SimulatedTransport::take_requests`].
    #[must_use]
    pub fn recording(mut self) -> Self {
        self.recorded.get_or_insert_with(Mutex::default);
        self
    }

    /// Serves `body` for `method` requests whose last path segment is `endpoint`.
    #[must_use]
    pub fn with_response<B: Into<Vec<u8>>>(mut self, method: Method, endpoint: &str, body: B) -> Self {
        self.responses
            .insert((method, endpoint.to_owned()), body.into());
        self
    }

    /// Requests recorded and not yet taken, oldest first. Always empty unless
    /// built with [`SimulatedTransport::recording`].
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.as_ref().map_or_else(Vec::new, |recorded| {
            recorded
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        })
    }

    /// Drains the recorded requests, oldest first.
    pub fn take_requests(&self) -> Vec<RecordedRequest> {
        self.recorded.as_ref().map_or_else(Vec::new, |recorded| {
            std::mem::take(&mut *recorded.lock().unwrap_or_else(PoisonError::into_inner))
        })
    }

    fn respond(&self, method: Method, url: &Url, body: Option<Vec<u8>>) -> Vec<u8> {
        let endpoint = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();

        let response = self
            .responses
            .get(&(method, endpoint.to_owned()))
            .cloned()
            .unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::debug!(%method, endpoint, mapped = !response.is_empty(), "simulated response");

        if let Some(recorded) = &self.recorded {
            recorded
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(RecordedRequest {
                    method,
                    url: url.clone(),
                    body,
                });
        }

        response
    }
}

#[async_trait]
impl Transport for SimulatedTransport {
    async fn get(&self, url: &Url) -> Result<Vec<u8>> {
        Ok(self.respond(Method::Get, url, None))
    }

    async fn post(&self, url: &Url, body: Vec<u8>) -> Result<Vec<u8>> {
        Ok(self.respond(Method::Post, url, Some(body)))
    }
}
