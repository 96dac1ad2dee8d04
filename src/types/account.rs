use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::serde_helpers::{decimal_from_value, exchange_datetime, optional_decimal};
use crate::types::Book;

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, strum_macros::Display)]
pub enum OrderSide {
    #[serde(rename = "0")]
    Buy,
    #[serde(rename = "1")]
    Sell,
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, strum_macros::Display)]
pub enum OrderStatus {
    #[serde(rename = "-1")]
    Cancelled,
    #[serde(rename = "0")]
    Active,
    #[serde(rename = "1")]
    PartiallyFilled,
    #[serde(rename = "2")]
    Completed,
}

/// Available, reserved and total holdings of one currency.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CurrencyBalance {
    pub available: Decimal,
    pub reserved: Decimal,
    pub balance: Decimal,
}

/// Account holdings and fees, from `POST balance`.
///
/// The exchange reports holdings as flat `<currency>_available`,
/// `<currency>_reserved` and `<currency>_balance` fields; they are grouped
/// per lowercase currency code here.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(try_from = "RawAccountBalance")]
pub struct AccountBalance {
    pub currencies: BTreeMap<String, CurrencyBalance>,
    /// Default trading fee, in percent.
    pub fee: Decimal,
    /// Trading fee per book, in percent.
    pub fees: BTreeMap<String, Decimal>,
}

impl AccountBalance {
    #[must_use]
    pub fn currency(&self, code: &str) -> Option<&CurrencyBalance> {
        self.currencies.get(&code.to_ascii_lowercase())
    }

    #[must_use]
    pub fn fee_for(&self, book: &Book) -> Decimal {
        self.fees.get(book.as_str()).copied().unwrap_or(self.fee)
    }
}

#[derive(Deserialize)]
struct RawAccountBalance {
    fee: Decimal,
    #[serde(default)]
    fees: BTreeMap<String, Decimal>,
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

impl TryFrom<RawAccountBalance> for AccountBalance {
    type Error = String;

    fn try_from(raw: RawAccountBalance) -> Result<Self, Self::Error> {
        let mut currencies = BTreeMap::<String, CurrencyBalance>::new();

        for (field, value) in &raw.rest {
            let Some((code, part)) = field.rsplit_once('_') else {
                continue;
            };
            if !matches!(part, "available" | "reserved" | "balance") {
                continue;
            }
            let amount = decimal_from_value(value)
                .ok_or_else(|| format!("invalid decimal in `{field}`: {value}"))?;

            let entry = currencies.entry(code.to_owned()).or_default();
            match part {
                "available" => entry.available = amount,
                "reserved" => entry.reserved = amount,
                _ => entry.balance = amount,
            }
        }

        Ok(Self {
            currencies,
            fee: raw.fee,
            fees: raw.fees,
        })
    }
}

/// An order still on the book, from `POST open_orders`.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct OpenOrder {
    pub amount: Decimal,
    #[serde(with = "exchange_datetime")]
    pub datetime: NaiveDateTime,
    pub id: String,
    pub price: Decimal,
    pub status: OrderStatus,
    #[serde(rename = "type")]
    pub side: OrderSide,
}

/// Full state of one order, from `POST lookup_order`.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct OrderDetails {
    pub amount: Decimal,
    pub book: String,
    #[serde(with = "exchange_datetime")]
    pub created: NaiveDateTime,
    #[serde(with = "exchange_datetime")]
    pub updated: NaiveDateTime,
    pub id: String,
    pub price: Decimal,
    pub status: OrderStatus,
    #[serde(rename = "type")]
    pub side: OrderSide,
}

/// Outcome of a market buy, from `POST buy`.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct BuyOrderResult {
    /// The amount that was requested, not the amount the exchange reported.
    ///
    /// The exchange's figure is not reliable for market orders, so the
    /// client overwrites it. This hides partial fills; consult
    /// [`reported_amount`](Self::reported_amount) or look the order up when
    /// the filled quantity matters.
    pub amount: Decimal,
    /// The amount as reported by the exchange, if it sent a usable one.
    pub reported_amount: Option<Decimal>,
    pub orders_matched: Option<Value>,
    pub book: String,
    pub id: String,
}

impl BuyOrderResult {
    pub(crate) fn normalized(response: BuyOrderResponse, requested: Decimal) -> Self {
        Self {
            amount: requested,
            reported_amount: response.amount,
            orders_matched: response.orders_matched,
            book: response.book,
            id: response.id,
        }
    }
}

/// Wire shape of the `buy` response before normalization.
#[derive(Debug, Deserialize)]
pub(crate) struct BuyOrderResponse {
    #[serde(default, deserialize_with = "optional_decimal")]
    amount: Option<Decimal>,
    #[serde(default)]
    orders_matched: Option<Value>,
    book: String,
    id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderIdRequest<'a> {
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct MarketBuyRequest<'a> {
    pub amount: Decimal,
    pub book: &'a Book,
}
