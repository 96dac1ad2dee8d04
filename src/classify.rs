//! Error-envelope detection and shape decoding for response bodies.
//!
//! The exchange reports failures by embedding `{"error": {"message", "code"}}`
//! in the body, whatever the endpoint's normal shape is. [`classify`] looks
//! for that fragment in a generic [`Value`] first; only bodies that pass are
//! decoded into the endpoint's own type.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Result;
use crate::error::{Error, Remote};

/// The `error` member the exchange embeds in failed responses.
#[non_exhaustive]
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<Value>,
}

impl ErrorEnvelope {
    fn into_remote(self) -> Option<Remote> {
        if self.message.is_empty() {
            return None;
        }

        let code = match self.code {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };

        Some(Remote {
            message: self.message,
            code,
        })
    }
}

/// Fails with [`Kind::Remote`](crate::error::Kind::Remote) when `body` carries
/// an error envelope with a non-empty message.
///
/// The envelope is found on a top-level object, on any object element of a
/// top-level array, or inside a quoted scalar. Bodies that are not JSON pass;
/// decoding reports them.
pub fn classify(body: &[u8]) -> Result<()> {
    let Some(value) = generic_value(body) else {
        return Ok(());
    };

    match probe(&value) {
        Some(remote) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(message = %remote.message, code = ?remote.code, "exchange reported an error");

            Err(remote.into())
        }
        None => Ok(()),
    }
}

fn generic_value(body: &[u8]) -> Option<Value> {
    let value = serde_json::from_slice::<Value>(body).ok().or_else(|| {
        let text = std::str::from_utf8(body).ok()?;
        serde_json::from_str::<Value>(strip_quotes(text)).ok()
    })?;

    if let Value::String(inner) = &value
        && let Ok(nested) = serde_json::from_str::<Value>(inner)
    {
        return Some(nested);
    }

    Some(value)
}

fn probe(value: &Value) -> Option<Remote> {
    match value {
        Value::Object(_) => envelope_of(value),
        Value::Array(items) => items.iter().find_map(envelope_of),
        _ => None,
    }
}

fn envelope_of(value: &Value) -> Option<Remote> {
    match value.get("error")? {
        Value::String(message) => ErrorEnvelope {
            message: message.clone(),
            code: None,
        }
        .into_remote(),
        error @ Value::Object(_) => ErrorEnvelope::deserialize(error).ok()?.into_remote(),
        _ => None,
    }
}

fn strip_quotes(text: &str) -> &str {
    text.trim().trim_matches('"')
}

/// Parses a bare boolean body such as `"true"` or `false`.
pub fn parse_bool_body(body: &[u8]) -> Result<bool> {
    let text = std::str::from_utf8(body)
        .map_err(|e| Error::decoding(format!("boolean response is not utf-8: {e}")))?;

    match strip_quotes(text) {
        "1" | "t" | "T" | "true" | "True" | "TRUE" => Ok(true),
        "0" | "f" | "F" | "false" | "False" | "FALSE" => Ok(false),
        other => Err(Error::decoding(format!("expected a boolean, got `{other}`"))),
    }
}

/// Decodes an already classified body into the endpoint's shape.
#[cfg(not(feature = "tracing"))]
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

/// Decodes an already classified body into the endpoint's shape, logging
/// fields the target type does not know about and the path of any mismatch.
#[cfg(feature = "tracing")]
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    use crate::error::Kind;

    let mut ignored = Vec::new();
    let mut de = serde_json::Deserializer::from_slice(body);

    let decoded: T = {
        let mut on_ignored = |path: serde_ignored::Path<'_>| ignored.push(path.to_string());
        let tracked = serde_ignored::Deserializer::new(&mut de, &mut on_ignored);
        serde_path_to_error::deserialize(tracked).map_err(|e| {
            tracing::warn!(
                path = %e.path(),
                target_type = std::any::type_name::<T>(),
                error = %e.inner(),
                "failed to decode response"
            );
            Error::with_source(Kind::Decoding, e)
        })?
    };
    de.end()?;

    if !ignored.is_empty() {
        tracing::debug!(
            target_type = std::any::type_name::<T>(),
            fields = ?ignored,
            "response carried fields that were not decoded"
        );
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use crate::error::Kind;

    use super::*;

    const ENVELOPE: &str = r#"{"error":{"message":"X","code":1}}"#;

    fn remote_of(body: &[u8]) -> Remote {
        let err = classify(body).unwrap_err();
        assert_eq!(err.kind(), Kind::Remote, "kind for {body:?}");
        err.downcast_ref::<Remote>().unwrap().clone()
    }

    #[test]
    fn object_envelope_is_remote() {
        let remote = remote_of(ENVELOPE.as_bytes());

        assert_eq!(remote.message, "X", "message");
        assert_eq!(remote.code, Some(1), "code");
    }

    #[test]
    fn array_envelope_is_remote() {
        let body = format!("[{ENVELOPE}]");

        assert_eq!(remote_of(body.as_bytes()).message, "X", "message");
    }

    #[test]
    fn envelope_beside_normal_fields_is_remote() {
        let body = r#"[{"id":"abc","status":"0"},{"error":{"message":"Order not found","code":"106"}}]"#;

        let remote = remote_of(body.as_bytes());
        assert_eq!(remote.message, "Order not found", "message");
        assert_eq!(remote.code, Some(106), "string code");
    }

    #[test]
    fn naively_quoted_envelope_is_remote() {
        let body = format!("\"{ENVELOPE}\"");

        assert_eq!(remote_of(body.as_bytes()).message, "X", "message");
    }

    #[test]
    fn escaped_string_envelope_is_remote() {
        let body = serde_json::to_string(ENVELOPE).unwrap();

        assert_eq!(remote_of(body.as_bytes()).message, "X", "message");
    }

    #[test]
    fn string_error_member_is_remote() {
        let remote = remote_of(br#"{"error":"API key is disabled"}"#);

        assert_eq!(remote.message, "API key is disabled", "message");
        assert_eq!(remote.code, None, "no code");
    }

    #[test]
    fn bodies_without_a_message_pass() {
        for body in [
            &br#"{"high":"12000.00"}"#[..],
            br#"{"error":{"message":"","code":1}}"#,
            br#"{"error":{"code":1}}"#,
            br#"{"error":null}"#,
            br"[]",
            br#""true""#,
            b"not json at all",
            b"",
        ] {
            assert!(classify(body).is_ok(), "{:?} should pass", String::from_utf8_lossy(body));
        }
    }

    #[test]
    fn bool_bodies() {
        assert!(parse_bool_body(br#""true""#).unwrap(), "quoted true");
        assert!(!parse_bool_body(br#""false""#).unwrap(), "quoted false");
        assert!(parse_bool_body(b"true\n").unwrap(), "bare true");
        assert!(!parse_bool_body(b"0").unwrap(), "numeric false");
    }

    #[test]
    fn malformed_bool_is_decoding_error() {
        let err = parse_bool_body(b"not-a-bool").unwrap_err();

        assert_eq!(err.kind(), Kind::Decoding, "kind");
    }

    #[test]
    fn decode_failure_is_decoding_error() {
        let err = decode::<Vec<u64>>(br#"{"a":1}"#).unwrap_err();

        assert_eq!(err.kind(), Kind::Decoding, "kind");
    }

    #[cfg(feature = "tracing")]
    #[derive(Debug, Deserialize, PartialEq)]
    struct Tick {
        tid: u64,
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn traced_decode_tolerates_unknown_fields() {
        let tick: Tick = decode(br#"{"tid":7,"side":"buy","extra":{"nested":[1]}}"#).unwrap();

        assert_eq!(tick, Tick { tid: 7 }, "known fields decoded");
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn traced_decode_mismatch_is_decoding_error() {
        let err = decode::<Vec<Tick>>(br#"[{"tid":7},{"tid":"eight"}]"#).unwrap_err();

        assert_eq!(err.kind(), Kind::Decoding, "kind");
        assert!(err.to_string().contains("[1].tid"), "path in {err}");
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn traced_decode_rejects_trailing_bytes() {
        let err = decode::<Tick>(br#"{"tid":7} {"tid":8}"#).unwrap_err();

        assert_eq!(err.kind(), Kind::Decoding, "kind");
    }
}
