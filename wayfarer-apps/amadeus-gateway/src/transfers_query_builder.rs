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

//! # Transfers Query Builder
//!
//! Side-effect free request building for transfer search, booking and
//! cancellation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};
use crate::flights_query_builder::{default_one, to_body};
use crate::request::{
    RequestSpec, require_non_empty, resource_path, validate_latitude, validate_longitude,
    validate_resource_id,
};

pub const TRANSFER_OFFERS_PATH: &str = "/v1/shopping/transfer-offers";
pub const TRANSFER_ORDERS_PATH: &str = "/v1/ordering/transfer-orders";

pub const TRANSFER_TYPES: &[&str] = &[
    "PRIVATE",
    "SHARED",
    "TAXI",
    "HOURLY",
    "AIRPORT_EXPRESS",
    "AIRPORT_BUS",
];

fn default_transfer_type() -> String {
    "PRIVATE".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct TransferSearchParams {
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub end_latitude: f64,
    pub end_longitude: f64,
    /// Local pickup time, YYYY-MM-DDTHH:MM:SS
    pub start_date_time: String,
    #[serde(default = "default_one")]
    pub passengers: u32,
    /// PRIVATE, SHARED, TAXI, HOURLY, AIRPORT_EXPRESS or AIRPORT_BUS
    #[serde(default = "default_transfer_type")]
    pub transfer_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct TransferBookingParams {
    /// Offer id from transfer_search
    pub offer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct TransferCancelParams {
    pub order_id: String,
    /// confirmNbr of the transfer, as returned by transfer_booking
    pub confirmation_number: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransferSearchBody {
    start_geo_code: String,
    end_geo_code: String,
    transfer_type: String,
    start_date_time: String,
    passengers: u32,
}

#[derive(Serialize)]
struct PassengerContacts {
    email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Passenger {
    first_name: String,
    last_name: String,
    contacts: PassengerContacts,
}

#[derive(Serialize)]
struct TransferOrderData {
    passengers: Vec<Passenger>,
}

#[derive(Serialize)]
struct TransferOrderBody {
    data: TransferOrderData,
}

fn geo_code(lat_field: &str, lat: f64, lon_field: &str, lon: f64) -> Result<String> {
    Ok(format!(
        "{},{}",
        validate_latitude(lat_field, lat)?,
        validate_longitude(lon_field, lon)?
    ))
}

pub fn transfer_search_request(params: &TransferSearchParams) -> Result<RequestSpec> {
    let transfer_type = params.transfer_type.trim().to_ascii_uppercase();
    if !TRANSFER_TYPES.contains(&transfer_type.as_str()) {
        return Err(GatewayError::InvalidInput(format!(
            "transfer_type must be one of {}, got {:?}",
            TRANSFER_TYPES.join(", "),
            params.transfer_type
        )));
    }
    let start_date_time =
        NaiveDateTime::parse_from_str(params.start_date_time.trim(), "%Y-%m-%dT%H:%M:%S")
            .map_err(|_| {
                GatewayError::InvalidInput(format!(
                    "start_date_time must look like 2026-11-10T10:30:00, got {:?}",
                    params.start_date_time
                ))
            })?;
    if params.passengers == 0 {
        return Err(GatewayError::InvalidInput("passengers must be at least 1".into()));
    }

    let body = TransferSearchBody {
        start_geo_code: geo_code(
            "start_latitude",
            params.start_latitude,
            "start_longitude",
            params.start_longitude,
        )?,
        end_geo_code: geo_code(
            "end_latitude",
            params.end_latitude,
            "end_longitude",
            params.end_longitude,
        )?,
        transfer_type,
        start_date_time: start_date_time.format("%Y-%m-%dT%H:%M:%S").to_string(),
        passengers: params.passengers,
    };
    Ok(RequestSpec::post(TRANSFER_OFFERS_PATH, to_body(&body)?))
}

pub fn transfer_booking_request(params: &TransferBookingParams) -> Result<RequestSpec> {
    validate_resource_id("offer_id", &params.offer_id)?;
    let email = require_non_empty("email", &params.email)?;
    if !email.contains('@') {
        return Err(GatewayError::InvalidInput(format!("email {email:?} is not an address")));
    }
    let body = TransferOrderBody {
        data: TransferOrderData {
            passengers: vec![Passenger {
                first_name: require_non_empty("first_name", &params.first_name)?,
                last_name: require_non_empty("last_name", &params.last_name)?,
                contacts: PassengerContacts { email },
            }],
        },
    };
    Ok(RequestSpec::post(TRANSFER_ORDERS_PATH, to_body(&body)?).query("offerId", &params.offer_id))
}

pub fn transfer_cancel_request(params: &TransferCancelParams) -> Result<RequestSpec> {
    let path = resource_path(
        "/v1/ordering/transfer-orders/{}/transfers/cancellation",
        &[("order_id", &params.order_id)],
    )?;
    validate_resource_id("confirmation_number", &params.confirmation_number)?;
    Ok(RequestSpec::post_empty(path).query("confirmNbr", &params.confirmation_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search_params() -> TransferSearchParams {
        serde_json::from_value(json!({
            "start_latitude": 48.8566,
            "start_longitude": 2.3522,
            "end_latitude": 49.0097,
            "end_longitude": 2.5479,
            "start_date_time": "2026-11-10T10:30:00"
        }))
        .unwrap()
    }

    #[test]
    fn test_search_body() {
        let spec = transfer_search_request(&search_params()).unwrap();
        assert_eq!(
            spec.body.unwrap(),
            json!({
                "startGeoCode": "48.8566,2.3522",
                "endGeoCode": "49.0097,2.5479",
                "transferType": "PRIVATE",
                "startDateTime": "2026-11-10T10:30:00",
                "passengers": 1
            })
        );
    }

    #[test]
    fn test_search_validation() {
        let mut params = search_params();
        params.transfer_type = "rocket".into();
        assert!(transfer_search_request(&params).is_err());

        let mut params = search_params();
        params.start_date_time = "tomorrow".into();
        assert!(transfer_search_request(&params).is_err());

        let mut params = search_params();
        params.end_longitude = 200.0;
        assert!(transfer_search_request(&params).is_err());
    }

    #[test]
    fn test_booking_puts_offer_in_query() {
        let spec = transfer_booking_request(&TransferBookingParams {
            offer_id: "5976726751".into(),
            first_name: "Ana".into(),
            last_name: "Diaz".into(),
            email: "ana@example.com".into(),
        })
        .unwrap();
        assert_eq!(spec.path, TRANSFER_ORDERS_PATH);
        assert_eq!(spec.query_value("offerId"), Some("5976726751"));
        assert_eq!(
            spec.body.unwrap(),
            json!({"data": {"passengers": [
                {"firstName": "Ana", "lastName": "Diaz", "contacts": {"email": "ana@example.com"}}
            ]}})
        );
    }

    #[test]
    fn test_cancel_path() {
        let spec = transfer_cancel_request(&TransferCancelParams {
            order_id: "VEg0Wk43fDIwMjEtMTE".into(),
            confirmation_number: "12029761".into(),
        })
        .unwrap();
        assert_eq!(
            spec.path,
            "/v1/ordering/transfer-orders/VEg0Wk43fDIwMjEtMTE/transfers/cancellation"
        );
        assert_eq!(spec.query_value("confirmNbr"), Some("12029761"));
        assert!(spec.body.is_none());

        assert!(
            transfer_cancel_request(&TransferCancelParams {
                order_id: "a/b".into(),
                confirmation_number: "1".into(),
            })
            .is_err()
        );
    }
}
