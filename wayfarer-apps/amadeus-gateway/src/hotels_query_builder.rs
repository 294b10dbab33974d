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

//! # Hotels Query Builder
//!
//! Side-effect free request building for hotel lists, offers, bookings,
//! sentiments and name autocomplete.

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};
use crate::flights_query_builder::{default_one, to_body};
use crate::request::{
    RequestSpec, require_list, require_non_empty, resource_path, validate_code, validate_date,
    validate_latitude, validate_longitude, validate_resource_id,
};

pub const HOTELS_BY_CITY_PATH: &str = "/v1/reference-data/locations/hotels/by-city";
pub const HOTELS_BY_GEOCODE_PATH: &str = "/v1/reference-data/locations/hotels/by-geocode";
pub const HOTELS_BY_IDS_PATH: &str = "/v1/reference-data/locations/hotels/by-hotels";
pub const HOTEL_OFFERS_PATH: &str = "/v3/shopping/hotel-offers";
pub const HOTEL_ORDERS_PATH: &str = "/v2/booking/hotel-orders";
pub const HOTEL_SENTIMENTS_PATH: &str = "/v2/e-reputation/hotel-sentiments";
pub const HOTEL_AUTOCOMPLETE_PATH: &str = "/v1/reference-data/locations/hotel";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct HotelsByCityParams {
    /// IATA city code, e.g. PAR
    pub city_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct HotelsByGeocodeParams {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct HotelIdsParams {
    /// Amadeus property codes, e.g. ["MCLONGHM"]
    pub hotel_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct HotelOffersParams {
    pub hotel_ids: Vec<String>,
    /// YYYY-MM-DD, today when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_date: Option<String>,
    /// YYYY-MM-DD, the day after check-in when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<String>,
    #[serde(default = "default_one")]
    pub adults: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct HotelOfferIdParams {
    /// Offer id from hotel_offers
    pub offer_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct HotelBookingParams {
    pub offer_id: String,
    pub guest_first_name: String,
    pub guest_last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct HotelAutocompleteParams {
    /// Part of the hotel name, at least 4 characters
    pub keyword: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GuestName {
    first_name: String,
    last_name: String,
}

#[derive(Serialize)]
struct GuestContact {
    email: String,
}

#[derive(Serialize)]
struct Guest {
    name: GuestName,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact: Option<GuestContact>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HotelOrderData {
    offer_id: String,
    guests: Vec<Guest>,
}

#[derive(Serialize)]
struct HotelOrderBody {
    data: HotelOrderData,
}

fn hotel_ids(params: &HotelIdsParams) -> Result<Vec<String>> {
    let ids = require_list("hotel_ids", &params.hotel_ids)?;
    for id in &ids {
        validate_resource_id("hotel_ids", id)?;
    }
    Ok(ids.into_iter().map(|id| id.to_ascii_uppercase()).collect())
}

pub fn hotels_by_city_request(params: &HotelsByCityParams) -> Result<RequestSpec> {
    Ok(RequestSpec::get(HOTELS_BY_CITY_PATH)
        .query("cityCode", validate_code("city_code", &params.city_code)?))
}

pub fn hotels_by_geocode_request(params: &HotelsByGeocodeParams) -> Result<RequestSpec> {
    Ok(RequestSpec::get(HOTELS_BY_GEOCODE_PATH)
        .query("latitude", validate_latitude("latitude", params.latitude)?)
        .query("longitude", validate_longitude("longitude", params.longitude)?))
}

pub fn hotels_by_ids_request(params: &HotelIdsParams) -> Result<RequestSpec> {
    Ok(RequestSpec::get(HOTELS_BY_IDS_PATH).query_list("hotelIds", &hotel_ids(params)?))
}

pub fn hotel_offers_request(params: &HotelOffersParams) -> Result<RequestSpec> {
    let ids = hotel_ids(&HotelIdsParams {
        hotel_ids: params.hotel_ids.clone(),
    })?;
    let check_in = params
        .check_in_date
        .as_deref()
        .map(|d| validate_date("check_in_date", d))
        .transpose()?;
    let check_out = params
        .check_out_date
        .as_deref()
        .map(|d| validate_date("check_out_date", d))
        .transpose()?;
    if let (Some(check_in), Some(check_out)) = (check_in, check_out) {
        if check_out <= check_in {
            return Err(GatewayError::InvalidInput(format!(
                "check_out_date {check_out} must be after check_in_date {check_in}"
            )));
        }
    }
    if !(1..=9).contains(&params.adults) {
        return Err(GatewayError::InvalidInput(format!(
            "adults must be between 1 and 9, got {}",
            params.adults
        )));
    }
    let currency = params
        .currency
        .as_deref()
        .map(|c| validate_code("currency", c))
        .transpose()?;

    Ok(RequestSpec::get(HOTEL_OFFERS_PATH)
        .query_list("hotelIds", &ids)
        .query("adults", params.adults)
        .query_opt("checkInDate", check_in)
        .query_opt("checkOutDate", check_out)
        .query_opt("currency", currency))
}

pub fn hotel_offer_request(params: &HotelOfferIdParams) -> Result<RequestSpec> {
    let path = resource_path("/v3/shopping/hotel-offers/{}", &[("offer_id", &params.offer_id)])?;
    Ok(RequestSpec::get(path))
}

pub fn hotel_booking_request(params: &HotelBookingParams) -> Result<RequestSpec> {
    validate_resource_id("offer_id", &params.offer_id)?;
    let contact = params
        .guest_email
        .as_deref()
        .filter(|e| !e.trim().is_empty())
        .map(|e| GuestContact {
            email: e.trim().to_string(),
        });
    let body = HotelOrderBody {
        data: HotelOrderData {
            offer_id: params.offer_id.clone(),
            guests: vec![Guest {
                name: GuestName {
                    first_name: require_non_empty("guest_first_name", &params.guest_first_name)?,
                    last_name: require_non_empty("guest_last_name", &params.guest_last_name)?,
                },
                contact,
            }],
        },
    };
    Ok(RequestSpec::post(HOTEL_ORDERS_PATH, to_body(&body)?))
}

pub fn hotel_ratings_request(params: &HotelIdsParams) -> Result<RequestSpec> {
    Ok(RequestSpec::get(HOTEL_SENTIMENTS_PATH).query_list("hotelIds", &hotel_ids(params)?))
}

pub fn hotel_autocomplete_request(params: &HotelAutocompleteParams) -> Result<RequestSpec> {
    Ok(RequestSpec::get(HOTEL_AUTOCOMPLETE_PATH)
        .query("keyword", require_non_empty("keyword", &params.keyword)?)
        .query("subType", "HOTEL_LEISURE"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_offers_query() {
        let params: HotelOffersParams = serde_json::from_value(json!({
            "hotel_ids": ["mclonghm", "ADPAR001"],
            "check_in_date": "2026-11-01",
            "check_out_date": "2026-11-03"
        }))
        .unwrap();
        let spec = hotel_offers_request(&params).unwrap();
        assert_eq!(spec.query_value("hotelIds"), Some("MCLONGHM,ADPAR001"));
        assert_eq!(spec.query_value("adults"), Some("1"));
        assert_eq!(spec.query_value("checkOutDate"), Some("2026-11-03"));
        assert_eq!(spec.query_value("currency"), None);
    }

    #[test]
    fn test_offers_rejects_reversed_dates() {
        let params = HotelOffersParams {
            hotel_ids: vec!["MCLONGHM".into()],
            check_in_date: Some("2026-11-03".into()),
            check_out_date: Some("2026-11-01".into()),
            adults: 1,
            currency: None,
        };
        assert!(matches!(
            hotel_offers_request(&params),
            Err(GatewayError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_booking_body() {
        let spec = hotel_booking_request(&HotelBookingParams {
            offer_id: "NRPQNQBOJM".into(),
            guest_first_name: "Bob".into(),
            guest_last_name: "Smith".into(),
            guest_email: None,
        })
        .unwrap();
        assert_eq!(
            spec.body.unwrap(),
            json!({"data": {"offerId": "NRPQNQBOJM",
                            "guests": [{"name": {"firstName": "Bob", "lastName": "Smith"}}]}})
        );

        assert!(
            hotel_booking_request(&HotelBookingParams {
                offer_id: "NRPQNQBOJM".into(),
                guest_first_name: " ".into(),
                guest_last_name: "Smith".into(),
                guest_email: None,
            })
            .is_err()
        );
    }

    #[test]
    fn test_list_requests() {
        let spec = hotels_by_city_request(&HotelsByCityParams {
            city_code: "par".into(),
        })
        .unwrap();
        assert_eq!(spec.query_value("cityCode"), Some("PAR"));

        assert!(
            hotels_by_geocode_request(&HotelsByGeocodeParams {
                latitude: 123.0,
                longitude: 2.0,
            })
            .is_err()
        );
        assert!(hotel_ratings_request(&HotelIdsParams { hotel_ids: vec![] }).is_err());

        let spec = hotel_autocomplete_request(&HotelAutocompleteParams {
            keyword: "PARI".into(),
        })
        .unwrap();
        assert_eq!(spec.query_value("subType"), Some("HOTEL_LEISURE"));
        assert_eq!(
            hotel_offer_request(&HotelOfferIdParams {
                offer_id: "TSXOJ6LFQ2".into()
            })
            .unwrap()
            .path,
            "/v3/shopping/hotel-offers/TSXOJ6LFQ2"
        );
    }
}
