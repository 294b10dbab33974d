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

//! Flight tools end to end: request shape sent, remote answer normalized.


use mock_helpers::*;
use mockito::{Matcher, Server};
use serde_json::{Value, json};
use wayfarer_amadeus_gateway::GatewayError;
use wayfarer_amadeus_gateway::flights_query_builder::*;

const OFFERS_FIXTURE: &str = include_str!("fixtures/flight_offers_del_bom.json");

fn leg(origin: &str, destination: &str, date: &str) -> FlightLeg {
    FlightLeg {
        origin: origin.to_string(),
        destination: destination.to_string(),
        date: date.to_string(),
    }
}

fn sample_offer() -> Value {
    let fixture: Value = serde_json::from_str(OFFERS_FIXTURE).unwrap();
    fixture["data"][0].clone()
}

#[tokio::test]
async fn test_multicity_search_summarizes_offers() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server, "tok", 1).await;
    let search = server
        .mock("POST", "/v2/shopping/flight-offers")
        .match_header("authorization", bearer("tok").as_str())
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "currencyCode": "INR",
            "sources": ["GDS"],
            "travelers": [{"id": "1", "travelerType": "ADULT"}],
            "searchCriteria": {"maxFlightOffers": 5}
        })))
        .with_status(200)
        .with_body(OFFERS_FIXTURE)
        .expect(1)
        .create_async()
        .await;

    let tools = tools_for(&server);
    let params = MultiCitySearchParams {
        legs: vec![
            leg("DEL", "BOM", "2026-12-01"),
            leg("bom", "del", "2026-12-05"),
        ],
        adults: 1,
        currency: "INR".to_string(),
        max_offers: 5,
    };
    let offers = tools.search_multicity_flights(&params).await.unwrap();

    // The third offer carries no price and is left out.
    assert_eq!(offers.len(), 2);
    assert_eq!(offers[0].summary.price.as_deref(), Some("45000"));
    assert_eq!(offers[0].summary.currency.as_deref(), Some("INR"));
    assert_eq!(offers[0].summary.airlines, vec!["AI", "6E"]);
    assert_eq!(offers[1].summary.airlines, vec!["AI"]);
    assert_eq!(offers[0].flight_offer["id"], "1");
    search.assert_async().await;
}

#[tokio::test]
async fn test_pricing_rejection_is_a_remote_error() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server, "tok", 1).await;
    let pricing = server
        .mock("POST", "/v1/shopping/flight-offers/pricing")
        .match_body(Matcher::PartialJson(json!({
            "data": {"type": "flight-offers-pricing"}
        })))
        .with_status(400)
        .with_body(r#"{"errors":[{"code":"NO AVAILABILITY"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let tools = tools_for(&server);
    let input = FlightOfferInput {
        flight_offer: sample_offer(),
    };
    let err = tools.price_selected_flight(&input).await.unwrap_err();
    match err {
        GatewayError::RemoteApi { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("NO AVAILABILITY"));
        }
        other => panic!("expected remote rejection, got {other:?}"),
    }
    pricing.assert_async().await;
}

#[tokio::test]
async fn test_pricing_without_offer_is_a_shape_error() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server, "tok", 1).await;
    let _pricing = server
        .mock("POST", "/v1/shopping/flight-offers/pricing")
        .with_status(200)
        .with_body(r#"{"data":{"type":"flight-offers-pricing","flightOffers":[]}}"#)
        .create_async()
        .await;

    let tools = tools_for(&server);
    let input = FlightOfferInput {
        flight_offer: sample_offer(),
    };
    let err = tools.price_selected_flight(&input).await.unwrap_err();
    assert!(
        matches!(err, GatewayError::Normalization { ref path, .. } if path == "/data/flightOffers/0"),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_cancel_twice() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server, "tok", 1).await;
    let order_path = "/v1/booking/flight-orders/eJzTd9f3NjIJdjUGAAtfAi4";
    let first = server
        .mock("DELETE", order_path)
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("DELETE", order_path)
        .with_status(404)
        .with_body(r#"{"errors":[{"status":404,"code":1797,"title":"NOT FOUND"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let tools = tools_for(&server);
    let params = FlightOrderIdParams {
        order_id: "eJzTd9f3NjIJdjUGAAtfAi4".to_string(),
    };
    let cancelled = tools.cancel_flight_booking(&params).await.unwrap();
    assert_eq!(cancelled.status.as_deref(), Some("CANCELLED"));
    assert_eq!(cancelled.order_id.as_deref(), Some("eJzTd9f3NjIJdjUGAAtfAi4"));

    let err = tools.cancel_flight_booking(&params).await.unwrap_err();
    assert!(matches!(err, GatewayError::RemoteApi { status: 404, .. }), "{err:?}");

    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_create_order_sends_traveler() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server, "tok", 1).await;
    let create = server
        .mock("POST", "/v1/booking/flight-orders")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"data": {"type": "flight-order"}})),
            Matcher::Regex(r#""firstName":"ASHA""#.into()),
            Matcher::Regex(r#""dateOfBirth":"1990-04-12""#.into()),
            Matcher::Regex(r#""gender":"FEMALE""#.into()),
            Matcher::Regex(r#""countryCallingCode":"91""#.into()),
        ]))
        .with_status(201)
        .with_body(
            json!({"data": {"type": "flight-order", "id": "eJzTd9f3NjIJdjUGAAtfAi4",
                            "associatedRecords": [{"reference": "KDW5RG", "originSystemCode": "GDS"}]}})
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let tools = tools_for(&server);
    let params = FlightOrderParams {
        priced_flight_offer: sample_offer(),
        traveler: TravelerInput {
            first_name: "ASHA".to_string(),
            last_name: "RAO".to_string(),
            date_of_birth: "1990-04-12".to_string(),
            gender: "female".to_string(),
            email: "asha@example.com".to_string(),
            phone_country_code: "+91".to_string(),
            phone_number: "9876543210".to_string(),
        },
    };
    let order = tools.create_flight_booking(&params).await.unwrap();
    assert_eq!(order.pnr.as_deref(), Some("KDW5RG"));
    assert_eq!(order.status, None);
    create.assert_async().await;
}

#[tokio::test]
async fn test_availability_filters_by_carrier() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server, "tok", 1).await;
    let availability = server
        .mock("POST", "/v1/shopping/availability/flight-availabilities")
        .match_body(Matcher::PartialJson(json!({
            "searchCriteria": {"flightFilters": {"carrierRestrictions": {"includedCarrierCodes": ["AI"]}}}
        })))
        .with_status(200)
        .with_body(
            json!({"data": [{"segments": [{
                "carrierCode": "AI", "number": "887",
                "departure": {"iataCode": "DEL", "at": "2026-12-01T06:00:00"},
                "arrival": {"iataCode": "BOM", "at": "2026-12-01T08:10:00"},
                "aircraft": {"code": "32N"},
                "availabilityClasses": [{"numberOfBookableSeats": 9, "class": "Y"}]
            }]}]})
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let tools = tools_for(&server);
    let params = AvailabilityParams {
        origin: "DEL".to_string(),
        destination: "BOM".to_string(),
        departure_date: "2026-12-01".to_string(),
        airline: Some("ai".to_string()),
    };
    let segments = tools.check_flight_availability(&params).await.unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].seats_available, Some(9));
    assert_eq!(segments[0].fare_class.as_deref(), Some("Y"));
    availability.assert_async().await;
}

#[tokio::test]
async fn test_flight_status_query() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server, "tok", 1).await;
    let schedule = server
        .mock("GET", "/v2/schedule/flights")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("carrierCode".into(), "AI".into()),
            Matcher::UrlEncoded("flightNumber".into(), "101".into()),
            Matcher::UrlEncoded("scheduledDepartureDate".into(), "2026-12-01".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"data":[]}"#)
        .expect(1)
        .create_async()
        .await;

    let tools = tools_for(&server);
    let params = FlightStatusParams {
        carrier_code: "AI".to_string(),
        flight_number: "101".to_string(),
        departure_date: "2026-12-01".to_string(),
    };
    assert!(tools.flight_status(&params).await.unwrap().is_empty());
    schedule.assert_async().await;
}

#[tokio::test]
async fn test_airline_lookup_joins_codes() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server, "tok", 1).await;
    let airlines = server
        .mock("GET", "/v1/reference-data/airlines")
        .match_query(Matcher::UrlEncoded("airlineCodes".into(), "AI,6E".into()))
        .with_status(200)
        .with_body(
            json!({"data": [
                {"iataCode": "AI", "icaoCode": "AIC", "businessName": "AIR INDIA"},
                {"iataCode": "6E", "icaoCode": "IGO", "commonName": "INDIGO"}
            ]})
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let tools = tools_for(&server);
    let params = AirlineLookupParams {
        codes: vec!["ai".to_string(), "6E".to_string()],
    };
    let found = tools.airline_code_lookup(&params).await.unwrap();
    assert_eq!(found[1].name.as_deref(), Some("INDIGO"));
    airlines.assert_async().await;
}
