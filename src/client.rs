use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use url::Url;

use crate::Result;
use crate::auth::{Credentials, NonceSource, SignedEnvelope, Signer};
use crate::classify::{classify, decode, parse_bool_body};
use crate::config::Config;
use crate::error::{Error, Kind};
use crate::transport::{LiveTransport, SimulatedTransport, Transport};
use crate::types::{
    AccountBalance, Book, BuyOrderResponse, BuyOrderResult, CurrentTrade, MarketBuyRequest,
    OpenOrder, OrderBook, OrderDetails, OrderIdRequest, Transaction,
};

/// Envelope and endpoint fields as siblings of one JSON object.
#[derive(Serialize)]
struct Signed<'a, B: ?Sized> {
    #[serde(flatten)]
    envelope: &'a SignedEnvelope,
    #[serde(flatten)]
    body: &'a B,
}

/// QuadrigaCX v2 API client.
///
/// Every call is one stateless request: public endpoints are fetched with
/// `GET`, private ones are signed, posted, checked for an embedded error
/// envelope and decoded. Nothing is retried.
///
/// The transport is fixed at construction: [`Client::new`] talks to the
/// exchange, [`Client::simulated`] answers from canned payloads.
#[derive(Debug)]
pub struct Client<T = LiveTransport> {
    base: Url,
    signer: Signer,
    transport: T,
}

impl Client<LiveTransport> {
    pub fn new(config: &Config, credentials: Credentials) -> Result<Self> {
        let transport = LiveTransport::new(config)?;
        Ok(Self::with_transport(config, credentials, transport))
    }
}

impl Client<SimulatedTransport> {
    /// A client that never touches the network.
    #[must_use]
    pub fn simulated(credentials: Credentials) -> Self {
        Self::with_transport(&Config::default(), credentials, SimulatedTransport::default())
    }
}

impl<T: Transport> Client<T> {
    #[must_use]
    pub fn with_transport(config: &Config, credentials: Credentials, transport: T) -> Self {
        Self {
            base: config.base_url(),
            signer: Signer::new(credentials),
            transport,
        }
    }

    /// Replaces the nonce source, e.g. to share one across clients that use
    /// the same credentials.
    #[must_use]
    pub fn with_nonce_source(mut self, nonces: Arc<dyn NonceSource>) -> Self {
        self.signer = Signer::with_nonce_source(self.signer.credentials().clone(), nonces);
        self
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        self.signer.credentials()
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current trading information for `book`, or for the exchange's default
    /// book when `book` is `None` or empty.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), level = "debug"))]
    pub async fn ticker(&self, book: Option<&str>) -> Result<CurrentTrade> {
        self.public(self.ticker_url(book)?).await
    }

    pub async fn order_book(&self) -> Result<OrderBook> {
        self.public(self.endpoint("order_book")?).await
    }

    /// Recent trades, in the order the exchange returned them.
    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.public(self.endpoint("transactions")?).await
    }

    pub async fn balance(&self) -> Result<AccountBalance> {
        self.private("balance", &Map::new()).await
    }

    pub async fn open_orders(&self) -> Result<Vec<OpenOrder>> {
        self.private("open_orders", &Map::new()).await
    }

    /// Looks up a single order by id.
    ///
    /// The exchange answers with a one-element array; an empty array is a
    /// [`Kind::Decoding`] error.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), level = "debug"))]
    pub async fn lookup_order(&self, id: &str) -> Result<OrderDetails> {
        let id = non_empty_id(id)?;
        let orders: Vec<OrderDetails> = self.private("lookup_order", &OrderIdRequest { id }).await?;

        orders
            .into_iter()
            .next()
            .ok_or_else(|| Error::decoding(format!("lookup_order returned no order for `{id}`")))
    }

    /// Cancels an order, returning whether the exchange accepted the cancellation.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), level = "debug"))]
    pub async fn cancel_order(&self, id: &str) -> Result<bool> {
        let id = non_empty_id(id)?;
        let body = self
            .private_raw("cancel_order", &OrderIdRequest { id })
            .await?;

        parse_bool_body(&body)
    }

    /// Buys `amount` of the base currency of `book` at market price.
    ///
    /// See [`BuyOrderResult::amount`]: the result carries the requested
    /// amount, not the one the exchange reported.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), level = "debug"))]
    pub async fn place_market_buy(&self, amount: Decimal, book: &Book) -> Result<BuyOrderResult> {
        if amount < Decimal::ZERO {
            return Err(Error::validation(format!(
                "buy amount must not be negative, got {amount}"
            )));
        }

        let response: BuyOrderResponse = self
            .private("buy", &MarketBuyRequest { amount, book })
            .await?;

        Ok(BuyOrderResult::normalized(response, amount))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    fn ticker_url(&self, book: Option<&str>) -> Result<Url> {
        let mut url = self.endpoint("ticker")?;
        if let Some(book) = book.filter(|b| !b.trim().is_empty()) {
            url.query_pairs_mut().append_pair("book", book);
        }
        Ok(url)
    }

    async fn public<R: DeserializeOwned>(&self, url: Url) -> Result<R> {
        #[cfg(feature = "tracing")]
        tracing::debug!(path = url.path(), "public request");

        let body = self.transport.get(&url).await?;
        classify(&body)?;
        decode(&body)
    }

    async fn private<B, R>(&self, endpoint: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.private_raw(endpoint, body).await?;
        decode(&response)
    }

    /// Signs, posts and classifies; the caller decodes the returned body.
    async fn private_raw<B>(&self, endpoint: &str, body: &B) -> Result<Vec<u8>>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.endpoint(endpoint)?;
        let envelope = self.signer.sign();
        let payload = serde_json::to_vec(&Signed {
            envelope: &envelope,
            body,
        })
        .map_err(|e| Error::with_source(Kind::Internal, e))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(endpoint, nonce = %envelope.nonce, "signed request");

        let response = self.transport.post(&url, payload).await?;
        classify(&response)?;
        Ok(response)
    }
}

/// Rejects blank ids; anything else is sent exactly as given.
fn non_empty_id(id: &str) -> Result<&str> {
    if id.trim().is_empty() {
        return Err(Error::validation("order id must not be empty"));
    }
    Ok(id)
}
