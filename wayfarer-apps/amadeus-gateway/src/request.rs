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

//! # Request Specs
//!
//! Side-effect free description of one outbound call, plus the input checks
//! every request builder shares.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{GatewayError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// One remote call. Built per invocation and never shared.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestSpec {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::new(Method::Post, path)
        }
    }

    /// POST without a body (e.g. cancellation endpoints driven by the path).
    pub fn post_empty(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn query_opt<V: ToString>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(name, v),
            None => self,
        }
    }

    /// List parameters travel as one comma-separated value.
    pub fn query_list(self, name: &str, values: &[String]) -> Self {
        let joined = values
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        self.query(name, joined)
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Full URL under `base_url`, query values percent-encoded.
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        if !self.query.is_empty() {
            let query = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }
}

static RESOURCE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\-_.=~%+]{1,512}$").expect("valid resource id regex"));
static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{2,8}$").expect("valid location code regex"));

/// Checks an identifier before it is interpolated into a path.
///
/// Amadeus ids are alphanumeric with a little punctuation; order ids arrive
/// already percent-encoded (`...%3D`), so `%` passes and nothing is re-encoded.
pub fn validate_resource_id(field: &str, id: &str) -> Result<()> {
    if !RESOURCE_ID_RE.is_match(id) || id.chars().all(|c| c == '.') {
        return Err(GatewayError::InvalidInput(format!(
            "{field} {id:?} contains characters not allowed in an identifier"
        )));
    }
    Ok(())
}

/// Interpolates validated identifiers into `template`, replacing each `{}`
/// in order.
pub fn resource_path(template: &str, ids: &[(&str, &str)]) -> Result<String> {
    let mut path = String::with_capacity(template.len() + 32);
    let mut rest = template;
    for (field, id) in ids {
        validate_resource_id(field, id)?;
        let Some(pos) = rest.find("{}") else {
            return Err(GatewayError::InvalidInput(format!(
                "path template {template:?} has no slot for {field}"
            )));
        };
        path.push_str(&rest[..pos]);
        path.push_str(id);
        rest = &rest[pos + 2..];
    }
    path.push_str(rest);
    Ok(path)
}

/// IATA airline/airport/city codes and similar short codes.
pub fn validate_code(field: &str, code: &str) -> Result<String> {
    let code = code.trim();
    if !CODE_RE.is_match(code) {
        return Err(GatewayError::InvalidInput(format!(
            "{field} must be a 2-8 character alphanumeric code, got {code:?}"
        )));
    }
    Ok(code.to_ascii_uppercase())
}

pub fn validate_date(field: &str, date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        GatewayError::InvalidInput(format!("{field} must be a YYYY-MM-DD date, got {date:?}"))
    })
}

pub fn require_non_empty(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GatewayError::InvalidInput(format!("{field} is required")));
    }
    Ok(value.to_string())
}

pub fn require_list(field: &str, values: &[String]) -> Result<Vec<String>> {
    let values: Vec<String> = values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    if values.is_empty() {
        return Err(GatewayError::InvalidInput(format!("{field} needs at least one value")));
    }
    Ok(values)
}

pub fn validate_latitude(field: &str, value: f64) -> Result<f64> {
    if !(-90.0..=90.0).contains(&value) {
        return Err(GatewayError::InvalidInput(format!("{field} {value} is out of range")));
    }
    Ok(value)
}

pub fn validate_longitude(field: &str, value: f64) -> Result<f64> {
    if !(-180.0..=180.0).contains(&value) {
        return Err(GatewayError::InvalidInput(format!("{field} {value} is out of range")));
    }
    Ok(value)
}
