use rust_decimal::Decimal;
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::Timestamp;

/// Trading summary for the last 24 hours, from `GET ticker`.
#[non_exhaustive]
#[serde_as]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CurrentTrade {
    pub high: Decimal,
    pub last: Decimal,
    #[serde_as(as = "DisplayFromStr")]
    pub timestamp: Timestamp,
    pub volume: Decimal,
    pub vwap: Decimal,
    pub low: Decimal,
    pub ask: Decimal,
    pub bid: Decimal,
}

/// One `[price, amount]` row of an order book side.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct PriceLevel(pub Decimal, pub Decimal);

impl PriceLevel {
    #[must_use]
    pub fn price(&self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.1
    }
}

/// Open bids and asks, from `GET order_book`.
#[non_exhaustive]
#[serde_as]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct OrderBook {
    #[serde_as(as = "DisplayFromStr")]
    pub timestamp: Timestamp,
    /// Best (highest) bid first.
    pub bids: Vec<PriceLevel>,
    /// Best (lowest) ask first.
    pub asks: Vec<PriceLevel>,
}

impl OrderBook {
    #[must_use]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    #[must_use]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }
}

/// A completed trade, from `GET transactions`.
#[non_exhaustive]
#[serde_as]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Transaction {
    pub amount: Decimal,
    #[serde_as(as = "DisplayFromStr")]
    pub date: Timestamp,
    pub price: Decimal,
    pub tid: u64,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn order_book_levels_decode_from_string_pairs() {
        let book: OrderBook = serde_json::from_str(
            r#"{"timestamp":"1521612857","bids":[["11905.50","0.09024660"]],"asks":[["11979.99","0.11000000"],["12498.00","0.2"]]}"#,
        )
        .unwrap();

        assert_eq!(book.timestamp, 1_521_612_857, "timestamp");
        let bid = book.best_bid().unwrap();
        assert_eq!(bid.price(), dec!(11905.50), "bid price");
        assert_eq!(bid.amount(), dec!(0.0902466), "bid amount");
        assert_eq!(book.asks.len(), 2, "asks");
        assert_eq!(book.best_ask().unwrap().price(), dec!(11979.99), "best ask");
    }

    #[test]
    fn transaction_keeps_numeric_tid() {
        let tx: Transaction = serde_json::from_str(
            r#"{"amount":"0.01000000","date":"1521612700","price":"11905.50","tid":2918324}"#,
        )
        .unwrap();

        assert_eq!(tx.tid, 2_918_324, "tid");
        assert_eq!(tx.date, 1_521_612_700, "date");
        assert_eq!(tx.amount, dec!(0.01), "amount");
    }
}
