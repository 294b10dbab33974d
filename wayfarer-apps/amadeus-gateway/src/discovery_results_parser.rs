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

//! # Discovery Results Parser

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::json_path::{array_at, data_array, data_object, f64_at, text_at};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub short_description: Option<String>,
    pub rating: Option<f64>,
    pub price: Option<String>,
    pub currency: Option<String>,
    pub booking_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDetails {
    pub id: Option<String>,
    pub name: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub price: Option<String>,
    pub currency: Option<String>,
    pub minimum_duration: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub pictures: Vec<String>,
    pub booking_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityResult {
    pub name: Option<String>,
    pub city_code: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub timezone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub nearest_airport: Option<String>,
}

fn activity_summary(act: &Value) -> ActivitySummary {
    ActivitySummary {
        id: text_at(act, "/id"),
        name: text_at(act, "/name"),
        short_description: text_at(act, "/shortDescription"),
        rating: f64_at(act, "/rating"),
        price: text_at(act, "/price/amount"),
        currency: text_at(act, "/price/currencyCode"),
        booking_link: text_at(act, "/bookingLink"),
    }
}

pub fn parse_activities(raw: &Value) -> Result<Vec<ActivitySummary>> {
    Ok(data_array(raw)?.iter().map(activity_summary).collect())
}

pub fn parse_activity(raw: &Value) -> Result<ActivityDetails> {
    let act = Value::Object(data_object(raw)?.clone());
    let summary = activity_summary(&act);
    Ok(ActivityDetails {
        id: summary.id,
        name: summary.name,
        short_description: summary.short_description,
        description: text_at(&act, "/description"),
        rating: summary.rating,
        price: summary.price,
        currency: summary.currency,
        minimum_duration: text_at(&act, "/minimumDuration"),
        latitude: f64_at(&act, "/geoCode/latitude"),
        longitude: f64_at(&act, "/geoCode/longitude"),
        pictures: array_at(&act, "/pictures")
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        booking_link: summary.booking_link,
    })
}

pub fn parse_cities(raw: &Value) -> Result<Vec<CityResult>> {
    Ok(data_array(raw)?
        .iter()
        .map(|city| CityResult {
            name: text_at(city, "/name"),
            city_code: text_at(city, "/iataCode"),
            country: text_at(city, "/address/countryName"),
            country_code: text_at(city, "/address/countryCode"),
            timezone: text_at(city, "/timeZone"),
            latitude: f64_at(city, "/geoCode/latitude"),
            longitude: f64_at(city, "/geoCode/longitude"),
            nearest_airport: text_at(city, "/relatedLocations/0/iataCode"),
        })
        .collect())
}
