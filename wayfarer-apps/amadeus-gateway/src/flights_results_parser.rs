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

//! # Flights Results Parser
//!
//! Side-effect free projection of flight API responses into flat records.
//! Optional fields come back as `None`; only missing structural blocks are
//! errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GatewayError, Result};
use crate::json_path::{array_at, at, data_array, data_object, distinct, text_at, u64_at};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferSummary {
    pub price: Option<String>,
    pub currency: Option<String>,
    pub airlines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOfferResult {
    pub summary: OfferSummary,
    pub flight_offer: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspirationResult {
    pub destination: Option<String>,
    pub price: Option<String>,
    pub currency: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheapestDateResult {
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub price: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySegment {
    pub airline: Option<String>,
    pub flight_number: Option<String>,
    pub aircraft: Option<String>,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub cabin: Option<String>,
    pub fare_class: Option<String>,
    pub seats_available: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedFlight {
    pub priced_flight_offer: Value,
    pub currency: Option<String>,
    pub total_price: Option<String>,
    pub base_price: Option<String>,
    pub last_ticketing_date: Option<String>,
    pub bookable_seats: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatmapSummary {
    pub carrier_code: Option<String>,
    pub flight_number: Option<String>,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub aircraft: Option<String>,
    pub total_seats: usize,
    pub available_seats: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOrderSummary {
    pub order_id: Option<String>,
    pub status: Option<String>,
    pub pnr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOrderDetails {
    pub order_id: Option<String>,
    pub status: Option<String>,
    pub pnr: Option<String>,
    pub travelers: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOrderCancellation {
    pub order_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPoint {
    pub airport: Option<String>,
    pub terminal: Option<String>,
    pub gate: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightStatusResult {
    pub flight: Option<String>,
    pub status: Option<String>,
    pub departure: FlightPoint,
    pub arrival: FlightPoint,
    pub aircraft: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckinLink {
    pub airline: Option<String>,
    pub url: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlineInfo {
    pub name: Option<String>,
    pub iata_code: Option<String>,
    pub icao_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDestination {
    pub city_name: Option<String>,
    pub iata_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlineRoutes {
    pub airline_code: String,
    pub destinations: Vec<RouteDestination>,
}

static NULL: Value = Value::Null;

fn first_text(value: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().find_map(|p| text_at(value, p))
}

/// Carrier codes across every segment of every itinerary.
fn offer_airlines(offer: &Value) -> Vec<String> {
    distinct(
        array_at(offer, "/itineraries")
            .iter()
            .flat_map(|itinerary| array_at(itinerary, "/segments"))
            .filter_map(|segment| text_at(segment, "/carrierCode")),
    )
}

/// Offers without a `price` block cannot be compared and are dropped.
pub fn parse_flight_offers(raw: &Value) -> Result<Vec<FlightOfferResult>> {
    let offers = data_array(raw)?;
    let mut results = Vec::with_capacity(offers.len());
    for (i, offer) in offers.iter().enumerate() {
        if at(offer, "/price").is_none() {
            tracing::warn!("Skipping flight offer #{} without price", i);
            continue;
        }
        results.push(FlightOfferResult {
            summary: OfferSummary {
                price: first_text(offer, &["/price/grandTotal", "/price/total"]),
                currency: text_at(offer, "/price/currency"),
                airlines: offer_airlines(offer),
            },
            flight_offer: offer.clone(),
        });
    }
    Ok(results)
}

pub fn parse_inspiration(raw: &Value) -> Result<Vec<InspirationResult>> {
    let currency = text_at(raw, "/meta/currency");
    Ok(data_array(raw)?
        .iter()
        .map(|item| InspirationResult {
            destination: text_at(item, "/destination"),
            price: text_at(item, "/price/total"),
            currency: text_at(item, "/price/currency").or_else(|| currency.clone()),
            departure_date: text_at(item, "/departureDate"),
            return_date: text_at(item, "/returnDate"),
        })
        .collect())
}

pub fn parse_cheapest_dates(raw: &Value) -> Result<Vec<CheapestDateResult>> {
    let currency = text_at(raw, "/meta/currency");
    Ok(data_array(raw)?
        .iter()
        .map(|item| CheapestDateResult {
            departure_date: text_at(item, "/departureDate"),
            return_date: text_at(item, "/returnDate"),
            price: text_at(item, "/price/total"),
            currency: text_at(item, "/price/currency").or_else(|| currency.clone()),
        })
        .collect())
}

/// One row per segment. Booking class data lives in `availabilityClasses`;
/// older payloads carry it flat on the segment.
pub fn parse_availability(raw: &Value) -> Result<Vec<AvailabilitySegment>> {
    let mut rows = Vec::new();
    for item in data_array(raw)? {
        for segment in array_at(item, "/segments") {
            rows.push(AvailabilitySegment {
                airline: text_at(segment, "/carrierCode"),
                flight_number: text_at(segment, "/number"),
                aircraft: text_at(segment, "/aircraft/code"),
                departure: text_at(segment, "/departure/iataCode"),
                arrival: text_at(segment, "/arrival/iataCode"),
                cabin: first_text(segment, &["/availabilityClasses/0/cabin", "/cabin"]),
                fare_class: first_text(segment, &["/availabilityClasses/0/class", "/class"]),
                seats_available: u64_at(segment, "/availabilityClasses/0/numberOfBookableSeats")
                    .or_else(|| u64_at(segment, "/availability/seats")),
            });
        }
    }
    Ok(rows)
}

pub fn parse_pricing(raw: &Value) -> Result<PricedFlight> {
    let Some(priced) = at(raw, "/data/flightOffers/0") else {
        return Err(GatewayError::normalization(
            "/data/flightOffers/0",
            "pricing response holds no flight offer",
        ));
    };
    if at(priced, "/price").is_none() {
        return Err(GatewayError::normalization(
            "/data/flightOffers/0/price",
            "priced offer has no price",
        ));
    }
    Ok(PricedFlight {
        priced_flight_offer: priced.clone(),
        currency: text_at(priced, "/price/currency"),
        total_price: first_text(priced, &["/price/grandTotal", "/price/total"]),
        base_price: text_at(priced, "/price/base"),
        last_ticketing_date: text_at(priced, "/lastTicketingDate"),
        bookable_seats: u64_at(priced, "/numberOfBookableSeats"),
    })
}

pub fn parse_seatmaps(raw: &Value) -> Result<Vec<SeatmapSummary>> {
    Ok(data_array(raw)?
        .iter()
        .map(|seatmap| {
            let seats: Vec<&Value> = array_at(seatmap, "/decks")
                .iter()
                .flat_map(|deck| array_at(deck, "/seats"))
                .collect();
            let available_seats = seats
                .iter()
                .filter(|seat| {
                    text_at(seat, "/travelerPricing/0/seatAvailabilityStatus").as_deref()
                        == Some("AVAILABLE")
                })
                .filter_map(|seat| text_at(seat, "/number"))
                .collect();
            SeatmapSummary {
                carrier_code: text_at(seatmap, "/carrierCode"),
                flight_number: text_at(seatmap, "/number"),
                departure: text_at(seatmap, "/departure/iataCode"),
                arrival: text_at(seatmap, "/arrival/iataCode"),
                aircraft: text_at(seatmap, "/aircraft/code"),
                total_seats: seats.len(),
                available_seats,
            }
        })
        .collect())
}

pub fn parse_order_created(raw: &Value) -> Result<FlightOrderSummary> {
    let order = Value::Object(data_object(raw)?.clone());
    Ok(FlightOrderSummary {
        order_id: text_at(&order, "/id"),
        status: text_at(&order, "/status"),
        pnr: text_at(&order, "/associatedRecords/0/reference"),
    })
}

pub fn parse_order(raw: &Value) -> Result<FlightOrderDetails> {
    let order = Value::Object(data_object(raw)?.clone());
    Ok(FlightOrderDetails {
        order_id: text_at(&order, "/id"),
        status: text_at(&order, "/status"),
        pnr: text_at(&order, "/associatedRecords/0/reference"),
        travelers: at(&order, "/travelers").cloned(),
    })
}

/// A 2xx without body is how the remote confirms a deletion. A missing
/// `status` in a returned record also reads as cancelled.
pub fn parse_order_cancellation(order_id: &str, raw: &Value) -> Result<FlightOrderCancellation> {
    if raw.is_null() {
        return Ok(FlightOrderCancellation {
            order_id: Some(order_id.to_string()),
            status: Some("CANCELLED".to_string()),
        });
    }
    let order = Value::Object(data_object(raw)?.clone());
    Ok(FlightOrderCancellation {
        order_id: text_at(&order, "/id").or_else(|| Some(order_id.to_string())),
        status: text_at(&order, "/status").or_else(|| Some("CANCELLED".to_string())),
    })
}

fn flight_point(flight: &Value, flat: &str, point: &Value, timing: &str) -> FlightPoint {
    FlightPoint {
        airport: text_at(flight, &format!("/{flat}/iataCode"))
            .or_else(|| text_at(point, "/iataCode")),
        terminal: text_at(flight, &format!("/{flat}/terminal"))
            .or_else(|| text_at(point, &format!("/{timing}/terminal/code"))),
        gate: text_at(flight, &format!("/{flat}/gate"))
            .or_else(|| text_at(point, &format!("/{timing}/gate/mainGate"))),
        time: text_at(flight, &format!("/{flat}/scheduledTimeLocal"))
            .or_else(|| text_at(point, &format!("/{timing}/timings/0/value"))),
    }
}

/// Accepts both the flat schedule shape and the `flightPoints` one the v2
/// schedule API sends.
pub fn parse_flight_status(raw: &Value) -> Result<Vec<FlightStatusResult>> {
    Ok(data_array(raw)?
        .iter()
        .map(|flight| {
            let carrier = first_text(flight, &["/carrierCode", "/flightDesignator/carrierCode"]);
            let number = first_text(flight, &["/flightNumber", "/flightDesignator/flightNumber"]);
            let points = array_at(flight, "/flightPoints");
            let first = points.first().unwrap_or(&NULL);
            let last = points.last().unwrap_or(&NULL);
            FlightStatusResult {
                flight: carrier.zip(number).map(|(c, n)| format!("{c}{n}")),
                status: text_at(flight, "/status"),
                departure: flight_point(flight, "departure", first, "departure"),
                arrival: flight_point(flight, "arrival", last, "arrival"),
                aircraft: first_text(
                    flight,
                    &["/aircraft/code", "/legs/0/aircraftEquipment/aircraftType"],
                ),
            }
        })
        .collect())
}

pub fn parse_checkin_links(raw: &Value) -> Result<Vec<CheckinLink>> {
    Ok(data_array(raw)?
        .iter()
        .map(|item| CheckinLink {
            airline: text_at(item, "/airlineCode"),
            url: first_text(item, &["/url", "/href"]),
            language: text_at(item, "/language"),
        })
        .collect())
}

pub fn parse_airlines(raw: &Value) -> Result<Vec<AirlineInfo>> {
    Ok(data_array(raw)?
        .iter()
        .map(|airline| AirlineInfo {
            name: first_text(airline, &["/businessName", "/commonName"]),
            iata_code: text_at(airline, "/iataCode"),
            icao_code: text_at(airline, "/icaoCode"),
        })
        .collect())
}

pub fn parse_airline_routes(airline_code: &str, raw: &Value) -> Result<AirlineRoutes> {
    let destinations = data_array(raw)?
        .iter()
        .map(|item| RouteDestination {
            city_name: text_at(item, "/name"),
            iata_code: text_at(item, "/iataCode"),
            country: text_at(item, "/address/countryName"),
        })
        .collect();
    Ok(AirlineRoutes {
        airline_code: airline_code.trim().to_ascii_uppercase(),
        destinations,
    })
}
