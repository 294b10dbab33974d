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

//! # Market Insights Query Builder
//!
//! Air-traffic analytics: most traveled, most booked, busiest period.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};
use crate::request::{RequestSpec, validate_code};

pub const TRAVELED_PATH: &str = "/v1/travel/analytics/air-traffic/traveled";
pub const BOOKED_PATH: &str = "/v1/travel/analytics/air-traffic/booked";
pub const BUSIEST_PERIOD_PATH: &str = "/v1/travel/analytics/air-traffic/busiest-period";

static MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").expect("valid month regex"));
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").expect("valid year regex"));

fn default_month() -> String {
    "2023-01".to_string()
}

fn default_year() -> String {
    "2023".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct AirTrafficParams {
    /// IATA city code, e.g. MAD
    pub origin_city_code: String,
    /// Month, YYYY-MM
    #[serde(default = "default_month")]
    pub period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct BusiestPeriodParams {
    pub origin_city_code: String,
    pub destination_city_code: String,
    /// Year, YYYY
    #[serde(default = "default_year")]
    pub period: String,
    /// ARRIVING or DEPARTING
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

fn air_traffic_request(path: &str, params: &AirTrafficParams) -> Result<RequestSpec> {
    let period = params.period.trim();
    if !MONTH_RE.is_match(period) {
        return Err(GatewayError::InvalidInput(format!(
            "period must be a YYYY-MM month, got {:?}",
            params.period
        )));
    }
    Ok(RequestSpec::get(path)
        .query("originCityCode", validate_code("origin_city_code", &params.origin_city_code)?)
        .query("period", period)
        .query_opt("max", params.max))
}

pub fn most_traveled_request(params: &AirTrafficParams) -> Result<RequestSpec> {
    air_traffic_request(TRAVELED_PATH, params)
}

pub fn most_booked_request(params: &AirTrafficParams) -> Result<RequestSpec> {
    air_traffic_request(BOOKED_PATH, params)
}

pub fn busiest_period_request(params: &BusiestPeriodParams) -> Result<RequestSpec> {
    let period = params.period.trim();
    if !YEAR_RE.is_match(period) {
        return Err(GatewayError::InvalidInput(format!(
            "period must be a YYYY year, got {:?}",
            params.period
        )));
    }
    let direction = match params.direction.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(d) if d.eq_ignore_ascii_case("ARRIVING") => Some("ARRIVING"),
        Some(d) if d.eq_ignore_ascii_case("DEPARTING") => Some("DEPARTING"),
        Some(d) => {
            return Err(GatewayError::InvalidInput(format!(
                "direction must be ARRIVING or DEPARTING, got {d:?}"
            )));
        }
    };
    Ok(RequestSpec::get(BUSIEST_PERIOD_PATH)
        .query("originCityCode", validate_code("origin_city_code", &params.origin_city_code)?)
        .query(
            "destinationCityCode",
            validate_code("destination_city_code", &params.destination_city_code)?,
        )
        .query("period", period)
        .query_opt("direction", direction))
}
