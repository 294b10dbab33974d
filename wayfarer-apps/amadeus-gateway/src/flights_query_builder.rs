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

//! # Flights Query Builder
//!
//! Side-effect free request building for the flight APIs: shopping, pricing,
//! seatmaps, orders, schedules and airline reference data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GatewayError, Result};
use crate::request::{
    RequestSpec, require_list, require_non_empty, resource_path, validate_code, validate_date,
    validate_resource_id,
};

pub const FLIGHT_OFFERS_PATH: &str = "/v2/shopping/flight-offers";
pub const FLIGHT_PRICING_PATH: &str = "/v1/shopping/flight-offers/pricing";
pub const SEATMAPS_PATH: &str = "/v1/shopping/seatmaps";
pub const FLIGHT_ORDERS_PATH: &str = "/v1/booking/flight-orders";
pub const FLIGHT_DESTINATIONS_PATH: &str = "/v1/shopping/flight-destinations";
pub const FLIGHT_DATES_PATH: &str = "/v1/shopping/flight-dates";
pub const FLIGHT_AVAILABILITY_PATH: &str = "/v1/shopping/availability/flight-availabilities";
pub const FLIGHT_SCHEDULE_PATH: &str = "/v2/schedule/flights";
pub const CHECKIN_LINKS_PATH: &str = "/v2/reference-data/urls/checkin-links";
pub const AIRLINES_PATH: &str = "/v1/reference-data/airlines";
pub const AIRLINE_DESTINATIONS_PATH: &str = "/v1/airline/destinations";

/// The flight-offers API accepts at most six origin/destination pairs.
pub const MAX_LEGS: usize = 6;

pub(crate) fn default_currency() -> String {
    "INR".to_string()
}

pub(crate) fn default_one() -> u32 {
    1
}

fn default_max_offers() -> u32 {
    5
}

fn default_max_price() -> u32 {
    10_000
}

fn default_language() -> String {
    "EN".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct FlightLeg {
    /// Origin IATA code (airport or city)
    pub origin: String,
    /// Destination IATA code (airport or city)
    pub destination: String,
    /// Departure date, YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct MultiCitySearchParams {
    /// One entry per leg, in travel order
    pub legs: Vec<FlightLeg>,
    #[serde(default = "default_one")]
    pub adults: u32,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_max_offers")]
    pub max_offers: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct FlightOfferInput {
    /// A flight offer exactly as returned by a search or pricing tool
    pub flight_offer: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct TravelerInput {
    pub first_name: String,
    pub last_name: String,
    /// YYYY-MM-DD
    pub date_of_birth: String,
    /// MALE or FEMALE
    pub gender: String,
    pub email: String,
    /// Country calling code without '+', e.g. 91
    pub phone_country_code: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct FlightOrderParams {
    /// Offer as returned by price_selected_flight
    pub priced_flight_offer: Value,
    pub traveler: TravelerInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct FlightOrderIdParams {
    /// Flight order id as returned by create_flight_booking
    pub order_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct FlightInspirationParams {
    pub origin: String,
    #[serde(default = "default_max_price")]
    pub max_price: u32,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// YYYY-MM-DD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct CheapestDatesParams {
    pub origin: String,
    pub destination: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct AvailabilityParams {
    pub origin: String,
    pub destination: String,
    /// YYYY-MM-DD
    pub departure_date: String,
    /// Restrict to one carrier (IATA code)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct FlightStatusParams {
    /// e.g. AI
    pub carrier_code: String,
    /// e.g. 101
    pub flight_number: String,
    /// Scheduled departure date, YYYY-MM-DD
    pub departure_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct CheckinLinksParams {
    pub airline_code: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct AirlineLookupParams {
    /// IATA or ICAO airline codes, e.g. ["EK", "AI"]
    pub codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct AirlineRoutesParams {
    pub airline_code: String,
}

// Remote request bodies

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DateSpec {
    date: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OriginDestination {
    id: String,
    origin_location_code: String,
    destination_location_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    departure_date_time_range: Option<DateSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    departure_date_time: Option<DateSpec>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TravelerSlot {
    id: String,
    traveler_type: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CarrierRestrictions {
    included_carrier_codes: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlightFilters {
    carrier_restrictions: CarrierRestrictions,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct SearchCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_flight_offers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flight_filters: Option<FlightFilters>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlightSearchBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    currency_code: Option<String>,
    origin_destinations: Vec<OriginDestination>,
    travelers: Vec<TravelerSlot>,
    sources: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_criteria: Option<SearchCriteria>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PricingData {
    #[serde(rename = "type")]
    kind: &'static str,
    flight_offers: Vec<Value>,
}

#[derive(Serialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TravelerName {
    first_name: String,
    last_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Phone {
    device_type: &'static str,
    country_calling_code: String,
    number: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Contact {
    email_address: String,
    phones: Vec<Phone>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderTraveler {
    id: String,
    date_of_birth: String,
    name: TravelerName,
    gender: String,
    contact: Contact,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlightOrderData {
    #[serde(rename = "type")]
    kind: &'static str,
    flight_offers: Vec<Value>,
    travelers: Vec<OrderTraveler>,
}

pub(crate) fn to_body<T: Serialize>(body: &T) -> Result<Value> {
    serde_json::to_value(body)
        .map_err(|e| GatewayError::InvalidInput(format!("cannot encode request body: {e}")))
}

fn adult_slots(adults: u32) -> Result<Vec<TravelerSlot>> {
    if !(1..=9).contains(&adults) {
        return Err(GatewayError::InvalidInput(format!(
            "adults must be between 1 and 9, got {adults}"
        )));
    }
    Ok((1..=adults)
        .map(|i| TravelerSlot {
            id: i.to_string(),
            traveler_type: "ADULT",
        })
        .collect())
}

fn require_offer(field: &str, offer: &Value) -> Result<Value> {
    match offer {
        Value::Object(map) if !map.is_empty() => Ok(offer.clone()),
        _ => Err(GatewayError::InvalidInput(format!(
            "{field} must be a flight offer object"
        ))),
    }
}

pub fn multicity_search_request(params: &MultiCitySearchParams) -> Result<RequestSpec> {
    if params.legs.is_empty() || params.legs.len() > MAX_LEGS {
        return Err(GatewayError::InvalidInput(format!(
            "legs must hold 1 to {MAX_LEGS} entries, got {}",
            params.legs.len()
        )));
    }
    if params.max_offers == 0 || params.max_offers > 250 {
        return Err(GatewayError::InvalidInput(
            "max_offers must be between 1 and 250".into(),
        ));
    }

    let mut origin_destinations = Vec::with_capacity(params.legs.len());
    for (i, leg) in params.legs.iter().enumerate() {
        origin_destinations.push(OriginDestination {
            id: (i + 1).to_string(),
            origin_location_code: validate_code("origin", &leg.origin)?,
            destination_location_code: validate_code("destination", &leg.destination)?,
            departure_date_time_range: Some(DateSpec {
                date: validate_date("date", &leg.date)?.to_string(),
            }),
            departure_date_time: None,
        });
    }

    let body = FlightSearchBody {
        currency_code: Some(validate_code("currency", &params.currency)?),
        origin_destinations,
        travelers: adult_slots(params.adults)?,
        sources: vec!["GDS"],
        search_criteria: Some(SearchCriteria {
            max_flight_offers: Some(params.max_offers),
            ..Default::default()
        }),
    };
    Ok(RequestSpec::post(FLIGHT_OFFERS_PATH, to_body(&body)?))
}

pub fn pricing_request(flight_offer: &Value) -> Result<RequestSpec> {
    let body = Envelope {
        data: PricingData {
            kind: "flight-offers-pricing",
            flight_offers: vec![require_offer("flight_offer", flight_offer)?],
        },
    };
    Ok(RequestSpec::post(FLIGHT_PRICING_PATH, to_body(&body)?))
}

pub fn seatmap_from_offer_request(flight_offer: &Value) -> Result<RequestSpec> {
    let body = Envelope {
        data: vec![require_offer("flight_offer", flight_offer)?],
    };
    Ok(RequestSpec::post(SEATMAPS_PATH, to_body(&body)?))
}

pub fn seatmap_from_order_request(params: &FlightOrderIdParams) -> Result<RequestSpec> {
    validate_resource_id("order_id", &params.order_id)?;
    Ok(RequestSpec::get(SEATMAPS_PATH).query("flightOrderId", &params.order_id))
}

pub fn create_order_request(params: &FlightOrderParams) -> Result<RequestSpec> {
    let t = &params.traveler;
    let gender = t.gender.trim().to_ascii_uppercase();
    if gender != "MALE" && gender != "FEMALE" {
        return Err(GatewayError::InvalidInput(format!(
            "gender must be MALE or FEMALE, got {:?}",
            t.gender
        )));
    }
    let email = require_non_empty("email", &t.email)?;
    if !email.contains('@') {
        return Err(GatewayError::InvalidInput(format!("email {email:?} is not an address")));
    }

    let traveler = OrderTraveler {
        id: "1".to_string(),
        date_of_birth: validate_date("date_of_birth", &t.date_of_birth)?.to_string(),
        name: TravelerName {
            first_name: require_non_empty("first_name", &t.first_name)?,
            last_name: require_non_empty("last_name", &t.last_name)?,
        },
        gender,
        contact: Contact {
            email_address: email,
            phones: vec![Phone {
                device_type: "MOBILE",
                country_calling_code: require_non_empty(
                    "phone_country_code",
                    t.phone_country_code.trim_start_matches('+'),
                )?,
                number: require_non_empty("phone_number", &t.phone_number)?,
            }],
        },
    };
    let body = Envelope {
        data: FlightOrderData {
            kind: "flight-order",
            flight_offers: vec![require_offer("priced_flight_offer", &params.priced_flight_offer)?],
            travelers: vec![traveler],
        },
    };
    Ok(RequestSpec::post(FLIGHT_ORDERS_PATH, to_body(&body)?))
}

pub fn retrieve_order_request(params: &FlightOrderIdParams) -> Result<RequestSpec> {
    let path = resource_path("/v1/booking/flight-orders/{}", &[("order_id", &params.order_id)])?;
    Ok(RequestSpec::get(path))
}

pub fn cancel_order_request(params: &FlightOrderIdParams) -> Result<RequestSpec> {
    let path = resource_path("/v1/booking/flight-orders/{}", &[("order_id", &params.order_id)])?;
    Ok(RequestSpec::delete(path))
}

pub fn inspiration_request(params: &FlightInspirationParams) -> Result<RequestSpec> {
    let departure_date = params
        .departure_date
        .as_deref()
        .map(|d| validate_date("departure_date", d))
        .transpose()?;
    Ok(RequestSpec::get(FLIGHT_DESTINATIONS_PATH)
        .query("origin", validate_code("origin", &params.origin)?)
        .query("maxPrice", params.max_price)
        .query("currency", validate_code("currency", &params.currency)?)
        .query_opt("departureDate", departure_date))
}

pub fn cheapest_dates_request(params: &CheapestDatesParams) -> Result<RequestSpec> {
    Ok(RequestSpec::get(FLIGHT_DATES_PATH)
        .query("origin", validate_code("origin", &params.origin)?)
        .query("destination", validate_code("destination", &params.destination)?)
        .query("currency", validate_code("currency", &params.currency)?))
}

pub fn availability_request(params: &AvailabilityParams) -> Result<RequestSpec> {
    let carriers = params
        .airline
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .map(|a| validate_code("airline", a))
        .transpose()?;

    let body = FlightSearchBody {
        currency_code: None,
        origin_destinations: vec![OriginDestination {
            id: "1".to_string(),
            origin_location_code: validate_code("origin", &params.origin)?,
            destination_location_code: validate_code("destination", &params.destination)?,
            departure_date_time_range: None,
            departure_date_time: Some(DateSpec {
                date: validate_date("departure_date", &params.departure_date)?.to_string(),
            }),
        }],
        travelers: adult_slots(1)?,
        sources: vec!["GDS"],
        search_criteria: carriers.map(|code| SearchCriteria {
            flight_filters: Some(FlightFilters {
                carrier_restrictions: CarrierRestrictions {
                    included_carrier_codes: vec![code],
                },
            }),
            ..Default::default()
        }),
    };
    Ok(RequestSpec::post(FLIGHT_AVAILABILITY_PATH, to_body(&body)?))
}

pub fn flight_status_request(params: &FlightStatusParams) -> Result<RequestSpec> {
    let number = params.flight_number.trim();
    if number.is_empty() || number.len() > 4 || !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(GatewayError::InvalidInput(format!(
            "flight_number must be 1 to 4 digits, got {:?}",
            params.flight_number
        )));
    }
    Ok(RequestSpec::get(FLIGHT_SCHEDULE_PATH)
        .query("carrierCode", validate_code("carrier_code", &params.carrier_code)?)
        .query("flightNumber", number)
        .query(
            "scheduledDepartureDate",
            validate_date("departure_date", &params.departure_date)?,
        ))
}

pub fn checkin_links_request(params: &CheckinLinksParams) -> Result<RequestSpec> {
    Ok(RequestSpec::get(CHECKIN_LINKS_PATH)
        .query("airlineCode", validate_code("airline_code", &params.airline_code)?)
        .query("language", require_non_empty("language", &params.language)?))
}

pub fn airline_lookup_request(params: &AirlineLookupParams) -> Result<RequestSpec> {
    let codes = require_list("codes", &params.codes)?
        .iter()
        .map(|c| validate_code("codes", c))
        .collect::<Result<Vec<_>>>()?;
    Ok(RequestSpec::get(AIRLINES_PATH).query_list("airlineCodes", &codes))
}

pub fn airline_routes_request(params: &AirlineRoutesParams) -> Result<RequestSpec> {
    Ok(RequestSpec::get(AIRLINE_DESTINATIONS_PATH)
        .query("airlineCode", validate_code("airline_code", &params.airline_code)?))
}
