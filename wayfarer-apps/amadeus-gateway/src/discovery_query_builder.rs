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

//! # Discovery Query Builder
//!
//! Tours and activities, and city autocomplete.

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};
use crate::request::{
    RequestSpec, require_non_empty, resource_path, validate_latitude, validate_longitude,
};

pub const ACTIVITIES_PATH: &str = "/v1/shopping/activities";
pub const ACTIVITIES_BY_SQUARE_PATH: &str = "/v1/shopping/activities/by-square";
pub const CITIES_PATH: &str = "/v1/reference-data/locations/cities";

pub const MAX_ACTIVITY_RADIUS_KM: u32 = 20;

fn default_radius_km() -> u32 {
    5
}

fn default_max_results() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct ActivitiesNearbyParams {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in km (0 to 20)
    #[serde(default = "default_radius_km")]
    pub radius_km: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct ActivitiesBySquareParams {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct ActivityIdParams {
    pub activity_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct CitySearchParams {
    /// Start of a city name, e.g. "Dub"
    pub keyword: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

pub fn activities_nearby_request(params: &ActivitiesNearbyParams) -> Result<RequestSpec> {
    if params.radius_km > MAX_ACTIVITY_RADIUS_KM {
        return Err(GatewayError::InvalidInput(format!(
            "radius_km must be at most {MAX_ACTIVITY_RADIUS_KM}, got {}",
            params.radius_km
        )));
    }
    Ok(RequestSpec::get(ACTIVITIES_PATH)
        .query("latitude", validate_latitude("latitude", params.latitude)?)
        .query("longitude", validate_longitude("longitude", params.longitude)?)
        .query("radius", params.radius_km))
}

pub fn activities_by_square_request(params: &ActivitiesBySquareParams) -> Result<RequestSpec> {
    let north = validate_latitude("north", params.north)?;
    let south = validate_latitude("south", params.south)?;
    if south > north {
        return Err(GatewayError::InvalidInput(format!(
            "south ({south}) must not be above north ({north})"
        )));
    }
    Ok(RequestSpec::get(ACTIVITIES_BY_SQUARE_PATH)
        .query("north", north)
        .query("south", south)
        .query("east", validate_longitude("east", params.east)?)
        .query("west", validate_longitude("west", params.west)?))
}

pub fn activity_request(params: &ActivityIdParams) -> Result<RequestSpec> {
    let path = resource_path("/v1/shopping/activities/{}", &[("activity_id", &params.activity_id)])?;
    Ok(RequestSpec::get(path))
}

pub fn city_search_request(params: &CitySearchParams) -> Result<RequestSpec> {
    if params.max_results == 0 {
        return Err(GatewayError::InvalidInput("max_results must be at least 1".into()));
    }
    Ok(RequestSpec::get(CITIES_PATH)
        .query("keyword", require_non_empty("keyword", &params.keyword)?)
        .query("max", params.max_results))
}
