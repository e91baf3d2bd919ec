//! Built-in field transformers for common conversions
//!
//! Each constructor returns a boxed field transformer ready to register in
//! a [`FieldMap`](super::FieldMap) or on a
//! [`Transformer`](super::Transformer). Built-ins fail with
//! [`Error::Transformer`] on input they cannot convert; like any
//! transformer failure, that aborts the whole call.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat};
use serde_json::Value;

use crate::{Error, Result};

use super::registry::FieldFn;

/// Parse a datetime string into integer epoch milliseconds
///
/// Accepts RFC 3339 timestamps, the numeric-offset variant without a colon
/// (`2018-10-04T00:00:00+0200`), and naive `YYYY-MM-DDTHH:MM:SS` values,
/// which are taken as UTC.
pub fn date_to_epoch_millis() -> Box<FieldFn> {
    Box::new(|value, _| {
        let input = value
            .as_str()
            .ok_or_else(|| expected("a datetime string", value))?;
        let parsed = parse_datetime(input)?;
        Ok(Value::Number(parsed.timestamp_millis().into()))
    })
}

/// Render integer epoch milliseconds as an RFC 3339 UTC timestamp string
pub fn epoch_millis_to_rfc3339() -> Box<FieldFn> {
    Box::new(|value, _| {
        let millis = value
            .as_i64()
            .ok_or_else(|| expected("an integer epoch-milliseconds value", value))?;
        let datetime = DateTime::from_timestamp_millis(millis).ok_or_else(|| fail(format!(
            "epoch value {millis} is out of the representable datetime range"
        )))?;
        Ok(Value::String(
            datetime.to_rfc3339_opts(SecondsFormat::Secs, true),
        ))
    })
}

/// Percent-decode a string (`"Hello%20World"` becomes `"Hello World"`)
pub fn url_decode() -> Box<FieldFn> {
    Box::new(|value, _| {
        let input = value.as_str().ok_or_else(|| expected("a string", value))?;
        percent_decode(input).map(Value::String)
    })
}

/// Parse a numeric string into a JSON number
pub fn string_to_number() -> Box<FieldFn> {
    Box::new(|value, _| {
        let input = value.as_str().ok_or_else(|| expected("a string", value))?;
        if let Ok(n) = input.parse::<i64>() {
            return Ok(Value::Number(n.into()));
        }
        let n = input
            .parse::<f64>()
            .map_err(|_| fail(format!("cannot parse '{input}' as a number")))?;
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .ok_or_else(|| fail(format!("'{input}' is not a finite number")))
    })
}

/// Render a JSON number as a string
pub fn number_to_string() -> Box<FieldFn> {
    Box::new(|value, _| {
        if let Some(n) = value.as_i64() {
            Ok(Value::String(n.to_string()))
        } else if let Some(n) = value.as_u64() {
            Ok(Value::String(n.to_string()))
        } else if let Some(n) = value.as_f64() {
            Ok(Value::String(n.to_string()))
        } else {
            Err(expected("a number", value))
        }
    })
}

/// Uppercase a string field
pub fn uppercase() -> Box<FieldFn> {
    Box::new(|value, _| {
        let input = value.as_str().ok_or_else(|| expected("a string", value))?;
        Ok(Value::String(input.to_uppercase()))
    })
}

/// Lowercase a string field
pub fn lowercase() -> Box<FieldFn> {
    Box::new(|value, _| {
        let input = value.as_str().ok_or_else(|| expected("a string", value))?;
        Ok(Value::String(input.to_lowercase()))
    })
}

fn parse_datetime(input: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(parsed) = DateTime::parse_from_str(input, format) {
            return Ok(parsed);
        }
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc().fixed_offset());
    }
    Err(fail(format!("unparseable datetime '{input}'")))
}

fn percent_decode(input: &str) -> Result<String> {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes
                .get(i + 1..i + 3)
                .and_then(|hex| std::str::from_utf8(hex).ok())
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| fail(format!("malformed percent escape in '{input}'")))?;
            decoded.push(escape);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded)
        .map_err(|_| fail(format!("percent escapes in '{input}' do not decode to UTF-8")))
}

fn expected(what: &str, value: &Value) -> Error {
    fail(format!("expected {what}, got {value}"))
}

fn fail(message: String) -> Error {
    Error::Transformer {
        message,
        source: None,
    }
}
