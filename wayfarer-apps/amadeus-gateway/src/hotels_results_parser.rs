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

//! # Hotels Results Parser
//!
//! Side-effect free projection of hotel list, offer, booking and sentiment
//! responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GatewayError, Result};
use crate::json_path::{array_at, at, data_array, data_object, f64_at, text_at, u64_at};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelListing {
    pub hotel_id: Option<String>,
    pub name: Option<String>,
    pub iata_code: Option<String>,
    pub country_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOffer {
    pub hotel_id: Option<String>,
    pub hotel_name: Option<String>,
    pub city_code: Option<String>,
    pub offer_id: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub room_type: Option<String>,
    pub room_description: Option<String>,
    pub board_type: Option<String>,
    pub total_price: Option<String>,
    pub currency: Option<String>,
    pub cancellation_deadline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOfferDetails {
    pub hotel_id: Option<String>,
    pub hotel_name: Option<String>,
    pub available: Option<bool>,
    pub offer_id: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub room_description: Option<String>,
    pub base_price: Option<String>,
    pub total_price: Option<String>,
    pub currency: Option<String>,
    pub cancellation_policies: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelBooking {
    pub order_id: Option<String>,
    pub booking_status: Option<String>,
    pub confirmation_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRating {
    pub hotel_id: Option<String>,
    pub overall_rating: Option<f64>,
    pub number_of_reviews: Option<u64>,
    pub number_of_ratings: Option<u64>,
    #[serde(default)]
    pub sentiments: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelSuggestion {
    pub hotel_id: Option<String>,
    pub name: Option<String>,
    pub iata_code: Option<String>,
    pub country_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

pub fn parse_hotel_list(raw: &Value) -> Result<Vec<HotelListing>> {
    Ok(data_array(raw)?
        .iter()
        .map(|hotel| HotelListing {
            hotel_id: text_at(hotel, "/hotelId"),
            name: text_at(hotel, "/name"),
            iata_code: text_at(hotel, "/iataCode"),
            country_code: text_at(hotel, "/address/countryCode"),
            latitude: f64_at(hotel, "/geoCode/latitude"),
            longitude: f64_at(hotel, "/geoCode/longitude"),
            distance_km: f64_at(hotel, "/distance/value"),
        })
        .collect())
}

/// One row per priced offer across all returned hotels.
pub fn parse_hotel_offers(raw: &Value) -> Result<Vec<HotelOffer>> {
    let mut rows = Vec::new();
    for entry in data_array(raw)? {
        for offer in array_at(entry, "/offers") {
            if at(offer, "/price").is_none() {
                tracing::warn!(
                    "Skipping hotel offer {:?} without price",
                    text_at(offer, "/id")
                );
                continue;
            }
            rows.push(HotelOffer {
                hotel_id: text_at(entry, "/hotel/hotelId"),
                hotel_name: text_at(entry, "/hotel/name"),
                city_code: text_at(entry, "/hotel/cityCode"),
                offer_id: text_at(offer, "/id"),
                check_in_date: text_at(offer, "/checkInDate"),
                check_out_date: text_at(offer, "/checkOutDate"),
                room_type: text_at(offer, "/room/typeEstimated/category"),
                room_description: text_at(offer, "/room/description/text"),
                board_type: text_at(offer, "/boardType"),
                total_price: text_at(offer, "/price/total"),
                currency: text_at(offer, "/price/currency"),
                cancellation_deadline: text_at(offer, "/policies/cancellations/0/deadline"),
            });
        }
    }
    Ok(rows)
}

pub fn parse_hotel_offer(raw: &Value) -> Result<HotelOfferDetails> {
    let entry = Value::Object(data_object(raw)?.clone());
    // Single-offer lookups answer with `offers: [offer]`.
    let Some(offer) = at(&entry, "/offers/0") else {
        return Err(GatewayError::normalization(
            "/data/offers/0",
            "hotel offer response holds no offer",
        ));
    };
    Ok(HotelOfferDetails {
        hotel_id: text_at(&entry, "/hotel/hotelId"),
        hotel_name: text_at(&entry, "/hotel/name"),
        available: at(&entry, "/available").and_then(Value::as_bool),
        offer_id: text_at(offer, "/id"),
        check_in_date: text_at(offer, "/checkInDate"),
        check_out_date: text_at(offer, "/checkOutDate"),
        room_description: text_at(offer, "/room/description/text"),
        base_price: text_at(offer, "/price/base"),
        total_price: text_at(offer, "/price/total"),
        currency: text_at(offer, "/price/currency"),
        cancellation_policies: at(offer, "/policies/cancellations").cloned(),
    })
}

pub fn parse_hotel_booking(raw: &Value) -> Result<HotelBooking> {
    let order = Value::Object(data_object(raw)?.clone());
    Ok(HotelBooking {
        order_id: text_at(&order, "/id"),
        booking_status: text_at(&order, "/hotelBookings/0/bookingStatus"),
        confirmation_number: text_at(
            &order,
            "/hotelBookings/0/hotelProviderInformation/0/confirmationNumber",
        ),
    })
}

pub fn parse_hotel_ratings(raw: &Value) -> Result<Vec<HotelRating>> {
    Ok(data_array(raw)?
        .iter()
        .map(|hotel| HotelRating {
            hotel_id: text_at(hotel, "/hotelId"),
            overall_rating: f64_at(hotel, "/overallRating"),
            number_of_reviews: u64_at(hotel, "/numberOfReviews"),
            number_of_ratings: u64_at(hotel, "/numberOfRatings"),
            sentiments: at(hotel, "/sentiments")
                .and_then(Value::as_object)
                .map(|scores| {
                    scores
                        .iter()
                        .filter_map(|(k, v)| v.as_f64().map(|s| (k.clone(), s)))
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect())
}

pub fn parse_hotel_suggestions(raw: &Value) -> Result<Vec<HotelSuggestion>> {
    Ok(data_array(raw)?
        .iter()
        .map(|hotel| HotelSuggestion {
            hotel_id: text_at(hotel, "/hotelIds/0").or_else(|| text_at(hotel, "/id")),
            name: text_at(hotel, "/name"),
            iata_code: text_at(hotel, "/iataCode"),
            country_code: text_at(hotel, "/address/countryCode"),
            latitude: f64_at(hotel, "/geoCode/latitude"),
            longitude: f64_at(hotel, "/geoCode/longitude"),
        })
        .collect())
}
