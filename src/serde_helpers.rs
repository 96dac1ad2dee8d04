//! Deserializers for encodings the exchange uses that serde does not cover.

use std::str::FromStr as _;

use rust_decimal::Decimal;
use serde::de::{Deserializer, Error as _};
use serde::Deserialize as _;
use serde_json::Value;

/// `YYYY-MM-DD HH:MM:SS`, always in exchange-local wall time without offset.
pub(crate) mod exchange_datetime {
    use chrono::NaiveDateTime;
    use serde::de::{Deserializer, Error as _};

    pub(crate) const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map_err(|e| D::Error::custom(format!("invalid datetime `{raw}`: {e}")))
    }
}

/// Accepts a decimal as a JSON string or number.
pub(crate) fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

/// Optional decimal that tolerates an empty string as absent.
pub(crate) fn optional_decimal<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Decimal>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => decimal_from_value(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid decimal `{value}`"))),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "optional_decimal")]
        amount: Option<Decimal>,
    }

    #[test]
    fn optional_decimal_accepts_strings_numbers_and_blanks() {
        let parse = |json: &str| serde_json::from_str::<Holder>(json).unwrap().amount;

        assert_eq!(parse(r#"{"amount":"0.00200000"}"#), Some(dec!(0.002)), "string");
        assert_eq!(parse(r#"{"amount":0.5}"#), Some(dec!(0.5)), "number");
        assert_eq!(parse(r#"{"amount":""}"#), None, "blank");
        assert_eq!(parse(r#"{"amount":null}"#), None, "null");
        assert_eq!(parse("{}"), None, "missing");
        assert!(
            serde_json::from_str::<Holder>(r#"{"amount":"abc"}"#).is_err(),
            "garbage is rejected"
        );
    }
}
