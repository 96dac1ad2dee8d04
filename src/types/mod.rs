//! Request and response shapes of the QuadrigaCX v2 API.
//!
//! Monetary values are [`Decimal`]s decoded from the quoted strings the
//! exchange sends.

mod account;
mod market;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

pub use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use account::{
    AccountBalance, BuyOrderResult, CurrencyBalance, OpenOrder, OrderDetails, OrderSide,
    OrderStatus,
};
pub(crate) use account::{BuyOrderResponse, MarketBuyRequest, OrderIdRequest};
pub use market::{CurrentTrade, OrderBook, PriceLevel, Transaction};

/// Identifier of a tradable currency pair, e.g. `btc_cad`.
///
/// Lowercase `base_quote` with ASCII alphanumeric currency codes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Book(Cow<'static, str>);

impl Book {
    pub const BTC_CAD: Book = Book(Cow::Borrowed("btc_cad"));
    pub const BTC_USD: Book = Book(Cow::Borrowed("btc_usd"));
    pub const ETH_BTC: Book = Book(Cow::Borrowed("eth_btc"));
    pub const ETH_CAD: Book = Book(Cow::Borrowed("eth_cad"));
    pub const LTC_CAD: Book = Book(Cow::Borrowed("ltc_cad"));
    pub const LTC_BTC: Book = Book(Cow::Borrowed("ltc_btc"));
    pub const BCH_CAD: Book = Book(Cow::Borrowed("bch_cad"));
    pub const BCH_BTC: Book = Book(Cow::Borrowed("bch_btc"));

    pub fn parse(value: &str) -> Result<Book, Error> {
        let normalized = value.trim().to_ascii_lowercase();
        let valid = normalized.split_once('_').is_some_and(|(base, quote)| {
            let code = |c: &str| !c.is_empty() && c.bytes().all(|b| b.is_ascii_alphanumeric());
            code(base) && code(quote)
        });

        if valid {
            Ok(Book(Cow::Owned(normalized)))
        } else {
            Err(Error::validation(format!(
                "invalid book `{value}`; expected `base_quote`, e.g. btc_cad"
            )))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Book {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Book::parse(s)
    }
}

impl TryFrom<String> for Book {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Book::parse(&value)
    }
}

impl From<Book> for String {
    fn from(book: Book) -> Self {
        book.0.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    #[test]
    fn book_accepts_pairs() {
        assert_eq!(Book::parse("btc_usd").unwrap(), Book::BTC_USD, "plain");
        assert_eq!(Book::parse(" ETH_CAD ").unwrap(), Book::ETH_CAD, "normalized");
    }

    #[test]
    fn book_rejects_malformed_identifiers() {
        for raw in ["", "btc", "btc_", "_usd", "btc-usd", "btc_u$d", "btc_usd_cad"] {
            let err = Book::parse(raw).unwrap_err();
            assert_eq!(err.kind(), Kind::Validation, "`{raw}` should be rejected");
        }
    }

    #[test]
    fn book_serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_string(&Book::BTC_CAD).unwrap(),
            r#""btc_cad""#,
            "wire form"
        );
        let book: Book = serde_json::from_str(r#""ltc_btc""#).unwrap();
        assert_eq!(book, Book::LTC_BTC, "decoded");
    }
}
