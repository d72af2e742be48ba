use std::fmt::Display;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Row id of every table (SQLite `INTEGER PRIMARY KEY`).
pub type Id = i64;

/// A field of a partial update: `None` when absent from the body,
/// `Some(None)` when explicitly set to `null`.
pub type Patch<T> = Option<Option<T>>;

/// Deserializer for [`Patch`] fields. Use together with `#[serde(default)]`
/// so that a missing key stays `None` while `null` becomes `Some(None)`.
pub fn patch<'de, T, D>(deserializer: D) -> Result<Patch<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFilter<T> {
    Text(String),
    Value(T),
}

/// Deserializer for optional query filters: `?caseId=` and `?status=  `
/// mean "no filter". Text values are parsed with [`FromStr`], so query
/// strings and JSON bodies are both accepted. Use with `#[serde(default)]`.
pub fn blank_as_none<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
    D: Deserializer<'de>,
{
    match Option::<RawFilter<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawFilter::Value(value)) => Ok(Some(value)),
        Some(RawFilter::Text(text)) if is_blank(&text) => Ok(None),
        Some(RawFilter::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid value '{}': {}", text.trim(), e))),
    }
}

/// Treats empty or whitespace-only strings the same as a missing value.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
