//! Client for the QuadrigaCX v2 trading API.
//!
//! Public market data (ticker, order book, recent trades) is fetched
//! unauthenticated. Private commands (balance, open orders, order lookup,
//! cancellation, market buys) are signed with an HMAC-SHA256 over a
//! strictly increasing nonce, the client id and the API key.
//!
//! The exchange signals failure by embedding an `error` object in its
//! responses, whether the endpoint normally returns an object, an array or a
//! bare string. Every response goes through [`classify::classify`] before it
//! is decoded, so such failures surface uniformly as [`error::Kind::Remote`].
//!
//! ```no_run
//! use quadriga_client_sdk::{Client, Config, Credentials};
//! use quadriga_client_sdk::types::{Book, Decimal};
//! use secrecy::SecretString;
//!
//! # async fn run() -> quadriga_client_sdk::Result<()> {
//! let credentials = Credentials::new(
//!     "123456".to_owned(),
//!     "api-key".to_owned(),
//!     SecretString::from("api-secret"),
//! );
//! let client = Client::new(&Config::default(), credentials)?;
//!
//! let ticker = client.ticker(Some("btc_cad")).await?;
//! let order = client
//!     .place_market_buy(Decimal::new(2, 3), &Book::BTC_CAD)
//!     .await?;
//! # let _ = (ticker, order);
//! # Ok(())
//! # }
//! ```
//!
//! Enable the `tracing` feature to get `tracing` events for dispatch,
//! remote errors and decoding problems. Secrets are never logged.

pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
mod serde_helpers;
pub mod transport;
pub mod types;

pub use auth::Credentials;
pub use client::Client;
pub use config::Config;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Unix seconds.
pub type Timestamp = i64;

/// Base URL of the v2 REST API.
pub const V2_URL: &str = "https://api.quadrigacx.com/v2/";
