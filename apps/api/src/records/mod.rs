//! Typed access to the backend resources.
//!
//! Each submodule owns one resource and turns raw rows into models. Lookups by
//! id return `Option` so pages can tell "absent" apart from transport failure.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::rest::RestError;

pub mod answers;
pub mod applicants;
pub mod interviews;
pub mod questions;

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, RestError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(RestError::Decode))
        .collect()
}

fn first_row<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Option<T>, RestError> {
    Ok(decode_rows(rows)?.into_iter().next())
}

/// The row a POST or PATCH echoed back. An empty echo is a backend contract breach.
fn echoed_row<T: DeserializeOwned>(rows: Vec<Value>, action: &str) -> Result<T, RestError> {
    first_row(rows)?.ok_or_else(|| RestError::Shape(format!("{action} returned no row")))
}

fn to_body<T: Serialize>(value: &T) -> Result<Value, RestError> {
    serde_json::to_value(value).map_err(RestError::Decode)
}
