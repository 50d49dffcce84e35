//! Configuration payload decoding and tag helpers

use super::fetcher::Tag;
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a configuration payload into a typed per-kind configuration.
///
/// The payload may be an object, a JSON string (possibly encoded twice),
/// or missing. Missing or blank payloads decode to `C::default()`. A string
/// that is not JSON, or a payload that is not an object, is an error.
/// Fields declared with [`lenient`] fall back to `None` on a type mismatch.
pub fn decode_configuration<C>(payload: &Value) -> Result<C>
where
    C: DeserializeOwned + Default,
{
    let mut value = payload.clone();

    // Unwrap up to two layers of string encoding
    for _ in 0..2 {
        let decoded: Value = match &value {
            Value::String(s) if s.trim().is_empty() => return Ok(C::default()),
            Value::String(s) => {
                serde_json::from_str(s).context("configuration is not valid JSON")?
            }
            _ => break,
        };
        value = decoded;
    }

    match value {
        Value::Null => Ok(C::default()),
        Value::Object(_) => serde_json::from_value(value).context("unexpected configuration shape"),
        other => Err(anyhow!(
            "configuration is not an object: {}",
            json_type_name(&other)
        )),
    }
}

/// Display name from the tag keyed `name` (case-insensitive)
pub fn name_tag(tags: Option<&[Tag]>) -> String {
    tags.unwrap_or_default()
        .iter()
        .find(|t| {
            t.key
                .as_deref()
                .map(|k| k.eq_ignore_ascii_case("name"))
                .unwrap_or(false)
        })
        .and_then(|t| t.value.clone())
        .unwrap_or_default()
}

/// Field deserializer: a value of an unexpected type reads as `None`
/// instead of failing the whole configuration
pub fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// First non-empty identifier, or an empty string
pub fn first_non_empty<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
