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

//! # MCP Tool Registry
//!
//! Exposes every [`TravelTools`] method as an MCP tool. Tool results are the
//! normalized records serialized to JSON; failures are tool errors carrying
//! the gateway error message.

use std::sync::Arc;

use rmcp::handler::server::{ServerHandler, tool::ToolRouter, wrapper::Parameters};
use rmcp::tool;
use rmcp::tool_router;
use serde::Serialize;

use crate::discovery_query_builder::*;
use crate::flights_query_builder::*;
use crate::hotels_query_builder::*;
use crate::insights_query_builder::*;
use crate::tools::{SeatmapBookingParams, TravelTools};
use crate::transfers_query_builder::*;

fn respond<T: Serialize>(tool: &str, result: crate::error::Result<T>) -> Result<String, String> {
    match result {
        Ok(value) => serde_json::to_string(&value).map_err(|e| e.to_string()),
        Err(e) => {
            tracing::warn!("Tool {} failed: {}", tool, e);
            Err(format!("{tool} failed: {e}"))
        }
    }
}

#[derive(Clone)]
pub struct AmadeusMcpServer {
    tools: Arc<TravelTools>,
    tool_router: ToolRouter<Self>,
}

impl AmadeusMcpServer {
    pub fn new(tools: Arc<TravelTools>) -> Self {
        Self {
            tools,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl AmadeusMcpServer {
    // Flights
    // ------------------------------------------------------------------

    #[tool(
        name = "search_multicity_flights",
        description = "Search multi-city flight offers. Parameters: legs (list of {origin (IATA), destination (IATA), date (YYYY-MM-DD)}, up to 6), adults (default 1), currency (default INR), max_offers (default 5). Returns offers with a price summary and the raw flight_offer to pass to pricing or seatmap tools."
    )]
    async fn search_multicity_flights(
        &self,
        params: Parameters<MultiCitySearchParams>,
    ) -> Result<String, String> {
        let tool = "search_multicity_flights";
        respond(tool, self.tools.search_multicity_flights(&params.0).await)
    }

    #[tool(
        name = "flight_inspiration_search",
        description = "Find the cheapest destinations from an origin. Parameters: origin (IATA), max_price (default 10000), currency (default INR), departure_date (YYYY-MM-DD, optional)."
    )]
    async fn flight_inspiration_search(
        &self,
        params: Parameters<FlightInspirationParams>,
    ) -> Result<String, String> {
        let tool = "flight_inspiration_search";
        respond(tool, self.tools.flight_inspiration_search(&params.0).await)
    }

    #[tool(
        name = "flight_cheapest_date_search",
        description = "Find the cheapest travel dates for a route. Parameters: origin (IATA), destination (IATA), currency (default INR)."
    )]
    async fn flight_cheapest_date_search(
        &self,
        params: Parameters<CheapestDatesParams>,
    ) -> Result<String, String> {
        let tool = "flight_cheapest_date_search";
        respond(tool, self.tools.flight_cheapest_date_search(&params.0).await)
    }

    #[tool(
        name = "check_flight_availability",
        description = "List seat availability per segment for a one-way route. Parameters: origin (IATA), destination (IATA), departure_date (YYYY-MM-DD), airline (2-letter carrier code, optional)."
    )]
    async fn check_flight_availability(
        &self,
        params: Parameters<AvailabilityParams>,
    ) -> Result<String, String> {
        let tool = "check_flight_availability";
        respond(tool, self.tools.check_flight_availability(&params.0).await)
    }

    #[tool(
        name = "price_selected_flight",
        description = "Confirm the live price of a flight offer. Parameters: flight_offer (an offer object as returned by search_multicity_flights). Returns the priced_flight_offer needed by create_flight_booking."
    )]
    async fn price_selected_flight(
        &self,
        params: Parameters<FlightOfferInput>,
    ) -> Result<String, String> {
        let tool = "price_selected_flight";
        respond(tool, self.tools.price_selected_flight(&params.0).await)
    }

    #[tool(
        name = "show_seatmap_for_flight",
        description = "Show the seat map of a flight offer. Parameters: flight_offer (an offer object as returned by search or pricing)."
    )]
    async fn show_seatmap_for_flight(
        &self,
        params: Parameters<FlightOfferInput>,
    ) -> Result<String, String> {
        let tool = "show_seatmap_for_flight";
        respond(tool, self.tools.show_seatmap_for_flight(&params.0).await)
    }

    #[tool(
        name = "show_seatmap_for_booking",
        description = "Show the seat map of an existing flight order. Parameters: order_id."
    )]
    async fn show_seatmap_for_booking(
        &self,
        params: Parameters<SeatmapBookingParams>,
    ) -> Result<String, String> {
        let tool = "show_seatmap_for_booking";
        respond(tool, self.tools.show_seatmap_for_booking(&params.0).await)
    }

    #[tool(
        name = "create_flight_booking",
        description = "MUTATING: creates a flight order (books the flight). Parameters: priced_flight_offer (from price_selected_flight), traveler {first_name, last_name, date_of_birth (YYYY-MM-DD), gender (MALE/FEMALE), email, phone_country_code, phone_number}."
    )]
    async fn create_flight_booking(
        &self,
        params: Parameters<FlightOrderParams>,
    ) -> Result<String, String> {
        let tool = "create_flight_booking";
        respond(tool, self.tools.create_flight_booking(&params.0).await)
    }

    #[tool(
        name = "retrieve_flight_booking",
        description = "Retrieve an existing flight order. Parameters: order_id."
    )]
    async fn retrieve_flight_booking(
        &self,
        params: Parameters<FlightOrderIdParams>,
    ) -> Result<String, String> {
        let tool = "retrieve_flight_booking";
        respond(tool, self.tools.retrieve_flight_booking(&params.0).await)
    }

    #[tool(
        name = "cancel_flight_booking",
        description = "MUTATING: cancels a flight order. Parameters: order_id."
    )]
    async fn cancel_flight_booking(
        &self,
        params: Parameters<FlightOrderIdParams>,
    ) -> Result<String, String> {
        let tool = "cancel_flight_booking";
        respond(tool, self.tools.cancel_flight_booking(&params.0).await)
    }

    #[tool(
        name = "flight_status",
        description = "Scheduled times, terminals and gates of a flight. Parameters: carrier_code (e.g. AI), flight_number (digits), departure_date (YYYY-MM-DD)."
    )]
    async fn flight_status(&self, params: Parameters<FlightStatusParams>) -> Result<String, String> {
        respond("flight_status", self.tools.flight_status(&params.0).await)
    }

    #[tool(
        name = "get_airline_checkin_link",
        description = "Online check-in links of an airline. Parameters: airline_code, language (default EN)."
    )]
    async fn get_airline_checkin_link(
        &self,
        params: Parameters<CheckinLinksParams>,
    ) -> Result<String, String> {
        let tool = "get_airline_checkin_link";
        respond(tool, self.tools.get_airline_checkin_link(&params.0).await)
    }

    #[tool(
        name = "airline_code_lookup",
        description = "Resolve airline codes to names. Parameters: codes (list of IATA or ICAO airline codes)."
    )]
    async fn airline_code_lookup(
        &self,
        params: Parameters<AirlineLookupParams>,
    ) -> Result<String, String> {
        respond("airline_code_lookup", self.tools.airline_code_lookup(&params.0).await)
    }

    #[tool(
        name = "airline_routes",
        description = "Destinations served by an airline. Parameters: airline_code."
    )]
    async fn airline_routes(&self, params: Parameters<AirlineRoutesParams>) -> Result<String, String> {
        respond("airline_routes", self.tools.airline_routes(&params.0).await)
    }

    // Discovery
    // ------------------------------------------------------------------

    #[tool(
        name = "find_activities_nearby",
        description = "Tours and activities around a point. Parameters: latitude, longitude, radius_km (default 5, max 20)."
    )]
    async fn find_activities_nearby(
        &self,
        params: Parameters<ActivitiesNearbyParams>,
    ) -> Result<String, String> {
        let tool = "find_activities_nearby";
        respond(tool, self.tools.find_activities_nearby(&params.0).await)
    }

    #[tool(
        name = "find_activities_by_area",
        description = "Tours and activities inside a bounding box. Parameters: north, south, east, west (degrees)."
    )]
    async fn find_activities_by_area(
        &self,
        params: Parameters<ActivitiesBySquareParams>,
    ) -> Result<String, String> {
        let tool = "find_activities_by_area";
        respond(tool, self.tools.find_activities_by_area(&params.0).await)
    }

    #[tool(
        name = "get_activity_details",
        description = "Full details of one activity. Parameters: activity_id."
    )]
    async fn get_activity_details(
        &self,
        params: Parameters<ActivityIdParams>,
    ) -> Result<String, String> {
        respond("get_activity_details", self.tools.get_activity_details(&params.0).await)
    }

    #[tool(
        name = "city_search",
        description = "Find cities by keyword with their country, timezone, coordinates and nearest airport. Parameters: keyword, max_results (default 10)."
    )]
    async fn city_search(&self, params: Parameters<CitySearchParams>) -> Result<String, String> {
        respond("city_search", self.tools.city_search(&params.0).await)
    }

    // Hotels
    // ------------------------------------------------------------------

    #[tool(
        name = "hotels_by_city",
        description = "List hotels in a city. Parameters: city_code (IATA city code, e.g. PAR)."
    )]
    async fn hotels_by_city(&self, params: Parameters<HotelsByCityParams>) -> Result<String, String> {
        respond("hotels_by_city", self.tools.hotels_by_city(&params.0).await)
    }

    #[tool(
        name = "hotels_by_geocode",
        description = "List hotels around coordinates. Parameters: latitude, longitude."
    )]
    async fn hotels_by_geocode(
        &self,
        params: Parameters<HotelsByGeocodeParams>,
    ) -> Result<String, String> {
        respond("hotels_by_geocode", self.tools.hotels_by_geocode(&params.0).await)
    }

    #[tool(
        name = "hotels_by_ids",
        description = "Look up hotels by Amadeus property code. Parameters: hotel_ids (list of 8-character codes)."
    )]
    async fn hotels_by_ids(&self, params: Parameters<HotelIdsParams>) -> Result<String, String> {
        respond("hotels_by_ids", self.tools.hotels_by_ids(&params.0).await)
    }

    #[tool(
        name = "hotel_offers",
        description = "Room offers for hotels. Parameters: hotel_ids (list), check_in_date (YYYY-MM-DD, optional), check_out_date (YYYY-MM-DD, optional), adults (default 1), currency (optional)."
    )]
    async fn hotel_offers(&self, params: Parameters<HotelOffersParams>) -> Result<String, String> {
        respond("hotel_offers", self.tools.hotel_offers(&params.0).await)
    }

    #[tool(
        name = "hotel_offer_pricing",
        description = "Confirm price and policies of a hotel offer before booking. Parameters: offer_id."
    )]
    async fn hotel_offer_pricing(
        &self,
        params: Parameters<HotelOfferIdParams>,
    ) -> Result<String, String> {
        respond("hotel_offer_pricing", self.tools.hotel_offer_pricing(&params.0).await)
    }

    #[tool(
        name = "book_hotel",
        description = "MUTATING: books a hotel offer. Parameters: offer_id, guest_first_name, guest_last_name, guest_email (optional)."
    )]
    async fn book_hotel(&self, params: Parameters<HotelBookingParams>) -> Result<String, String> {
        respond("book_hotel", self.tools.book_hotel(&params.0).await)
    }

    #[tool(
        name = "hotel_ratings",
        description = "Guest sentiment scores for hotels. Parameters: hotel_ids (list)."
    )]
    async fn hotel_ratings(&self, params: Parameters<HotelIdsParams>) -> Result<String, String> {
        respond("hotel_ratings", self.tools.hotel_ratings(&params.0).await)
    }

    #[tool(
        name = "hotel_name_autocomplete",
        description = "Suggest hotels from a partial name. Parameters: keyword (partial hotel name)."
    )]
    async fn hotel_name_autocomplete(
        &self,
        params: Parameters<HotelAutocompleteParams>,
    ) -> Result<String, String> {
        let tool = "hotel_name_autocomplete";
        respond(tool, self.tools.hotel_name_autocomplete(&params.0).await)
    }

    // Transfers
    // ------------------------------------------------------------------

    #[tool(
        name = "transfer_search",
        description = "Priced ground transfer offers between two points. Parameters: start_latitude, start_longitude, end_latitude, end_longitude, start_date_time (YYYY-MM-DDTHH:MM:SS), passengers (default 1), transfer_type (PRIVATE/SHARED/TAXI/HOURLY/AIRPORT_EXPRESS/AIRPORT_BUS, default PRIVATE)."
    )]
    async fn transfer_search(
        &self,
        params: Parameters<TransferSearchParams>,
    ) -> Result<String, String> {
        respond("transfer_search", self.tools.transfer_search(&params.0).await)
    }

    #[tool(
        name = "transfer_booking",
        description = "MUTATING: books a transfer offer. Parameters: offer_id, first_name, last_name, email."
    )]
    async fn transfer_booking(
        &self,
        params: Parameters<TransferBookingParams>,
    ) -> Result<String, String> {
        respond("transfer_booking", self.tools.transfer_booking(&params.0).await)
    }

    #[tool(
        name = "cancel_transfer",
        description = "MUTATING: cancels a transfer order. Parameters: order_id, confirmation_number."
    )]
    async fn cancel_transfer(
        &self,
        params: Parameters<TransferCancelParams>,
    ) -> Result<String, String> {
        respond("cancel_transfer", self.tools.cancel_transfer(&params.0).await)
    }

    // Market insights
    // ------------------------------------------------------------------

    #[tool(
        name = "flight_most_traveled_destinations",
        description = "Most traveled destinations from a city for a month. Parameters: origin_city_code, period (YYYY-MM, default 2023-01), max (optional)."
    )]
    async fn flight_most_traveled_destinations(
        &self,
        params: Parameters<AirTrafficParams>,
    ) -> Result<String, String> {
        let tool = "flight_most_traveled_destinations";
        respond(tool, self.tools.flight_most_traveled_destinations(&params.0).await)
    }

    #[tool(
        name = "flight_most_booked_destinations",
        description = "Most booked destinations from a city for a month. Parameters: origin_city_code, period (YYYY-MM, default 2023-01), max (optional)."
    )]
    async fn flight_most_booked_destinations(
        &self,
        params: Parameters<AirTrafficParams>,
    ) -> Result<String, String> {
        let tool = "flight_most_booked_destinations";
        respond(tool, self.tools.flight_most_booked_destinations(&params.0).await)
    }

    #[tool(
        name = "flight_busiest_traveling_period",
        description = "Busiest months of a year between two cities. Parameters: origin_city_code, destination_city_code, period (YYYY, default 2023), direction (ARRIVING/DEPARTING, optional)."
    )]
    async fn flight_busiest_traveling_period(
        &self,
        params: Parameters<BusiestPeriodParams>,
    ) -> Result<String, String> {
        let tool = "flight_busiest_traveling_period";
        respond(tool, self.tools.flight_busiest_traveling_period(&params.0).await)
    }
}

impl ServerHandler for AmadeusMcpServer {
    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl Future<Output = Result<rmcp::model::ListToolsResult, rmcp::ErrorData>> + Send + '_
    {
        Box::pin(async move {
            let tools = self.tool_router.list_all();
            tracing::debug!("Returning {} tools", tools.len());
            Ok(rmcp::model::ListToolsResult::with_all_items(tools))
        })
    }

    fn call_tool(
        &self,
        request: rmcp::model::CallToolRequestParam,
        context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl Future<Output = Result<rmcp::model::CallToolResult, rmcp::ErrorData>> + Send + '_
    {
        tracing::debug!("call_tool {}", request.name);
        let router = self.tool_router.clone();
        let self_clone = self.clone();
        Box::pin(async move {
            let context =
                rmcp::handler::server::tool::ToolCallContext::new(&self_clone, request, context);
            router.call(context).await
        })
    }

    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::V_2025_03_26,
            capabilities: rmcp::model::ServerCapabilities {
                tools: Some(rmcp::model::ToolsCapability::default()),
                ..Default::default()
            },
            server_info: rmcp::model::Implementation::from_build_env(),
            instructions: Some(
                "Amadeus travel tools: flights, hotels, transfers, activities and market insights. \
                 Tools marked MUTATING create or cancel real reservations."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;

    const MUTATING: [&str; 5] = [
        "create_flight_booking",
        "cancel_flight_booking",
        "book_hotel",
        "transfer_booking",
        "cancel_transfer",
    ];

    #[test]
    fn test_registry_lists_every_tool() {
        let tools = AmadeusMcpServer::tool_router().list_all();
        assert_eq!(tools.len(), 32);

        for tool in &tools {
            let description = tool.description.as_deref().unwrap_or_default();
            assert_eq!(
                description.starts_with("MUTATING"),
                MUTATING.contains(&tool.name.as_ref()),
                "{} description: {}",
                tool.name,
                description
            );
        }
    }

    #[test]
    fn test_respond_carries_remote_body() {
        let err: crate::error::Result<()> = Err(GatewayError::remote_api(
            400,
            br#"{"errors":[{"code":"NO AVAILABILITY"}]}"#,
        ));
        let msg = respond("price_selected_flight", err).unwrap_err();
        assert!(msg.starts_with("price_selected_flight failed"));
        assert!(msg.contains("400"));
        assert!(msg.contains("NO AVAILABILITY"));

        let ok = respond("city_search", Ok(vec!["DXB"])).unwrap();
        assert_eq!(ok, r#"["DXB"]"#);
    }
}
