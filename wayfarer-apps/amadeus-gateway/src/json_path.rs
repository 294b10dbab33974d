//!  Wayfarer Amadeus Gateway
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # JSON accessors
//!
//! Total lookups over raw responses. Paths are JSON pointers (`/price/total`).
//! A missing key, an out of range index or an explicit `null` all read as
//! `None`; nothing here panics.

use serde_json::{Map, Value};

use crate::error::{GatewayError, Result};

pub fn at<'a>(value: &'a Value, pointer: &str) -> Option<&'a Value> {
    value.pointer(pointer).filter(|v| !v.is_null())
}

/// Strings as-is, numbers and booleans rendered. Amadeus sends prices as
/// strings and some codes as numbers, callers want text either way.
pub fn text_at(value: &Value, pointer: &str) -> Option<String> {
    match at(value, pointer)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn f64_at(value: &Value, pointer: &str) -> Option<f64> {
    match at(value, pointer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn u64_at(value: &Value, pointer: &str) -> Option<u64> {
    match at(value, pointer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Array at `pointer`, empty when absent.
pub fn array_at<'a>(value: &'a Value, pointer: &str) -> &'a [Value] {
    at(value, pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// The top-level `data` list. Only an explicit `"data": []` means zero
/// matches; an absent or `null` list is a shape mismatch like any non-array.
pub fn data_array(raw: &Value) -> Result<&[Value]> {
    match raw.get("data") {
        None | Some(Value::Null) => Err(GatewayError::normalization("/data", "missing")),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(GatewayError::normalization(
            "/data",
            format!("expected an array, found {}", kind(other)),
        )),
    }
}

/// The top-level `data` record of single-resource responses.
pub fn data_object(raw: &Value) -> Result<&Map<String, Value>> {
    match raw.get("data") {
        Some(Value::Object(record)) => Ok(record),
        Some(other) => Err(GatewayError::normalization(
            "/data",
            format!("expected an object, found {}", kind(other)),
        )),
        None => Err(GatewayError::normalization("/data", "missing")),
    }
}

/// First-occurrence order, duplicates dropped.
pub fn distinct<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = Vec::new();
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
