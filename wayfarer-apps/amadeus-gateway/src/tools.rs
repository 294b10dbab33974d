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

//! # Travel Tools
//!
//! One method per agent-facing tool: run the domain operation, then project
//! the raw remote body into its normalized record(s). The MCP server only
//! serializes what these return.

use crate::discovery_query_builder::*;
use crate::discovery_results_parser::*;
use crate::error::Result;
use crate::flights_query_builder::*;
use crate::flights_results_parser::*;
use crate::gateway::AmadeusGateway;
use crate::hotels_query_builder::*;
use crate::hotels_results_parser::*;
use crate::insights_query_builder::*;
use crate::insights_results_parser::*;
use crate::transfers_query_builder::*;
use crate::transfers_results_parser::*;

/// Seatmap lookups keyed by an existing flight order.
pub type SeatmapBookingParams = FlightOrderIdParams;

#[derive(Clone)]
pub struct TravelTools {
    gateway: AmadeusGateway,
}

impl TravelTools {
    pub fn new(gateway: AmadeusGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &AmadeusGateway {
        &self.gateway
    }

    // Flights
    // ------------------------------------------------------------------

    pub async fn search_multicity_flights(
        &self,
        params: &MultiCitySearchParams,
    ) -> Result<Vec<FlightOfferResult>> {
        let raw = self.gateway.search_multicity_flights(params).await?;
        parse_flight_offers(&raw)
    }

    pub async fn flight_inspiration_search(
        &self,
        params: &FlightInspirationParams,
    ) -> Result<Vec<InspirationResult>> {
        let raw = self.gateway.flight_inspiration(params).await?;
        parse_inspiration(&raw)
    }

    pub async fn flight_cheapest_date_search(
        &self,
        params: &CheapestDatesParams,
    ) -> Result<Vec<CheapestDateResult>> {
        let raw = self.gateway.cheapest_flight_dates(params).await?;
        parse_cheapest_dates(&raw)
    }

    pub async fn check_flight_availability(
        &self,
        params: &AvailabilityParams,
    ) -> Result<Vec<AvailabilitySegment>> {
        let raw = self.gateway.flight_availability(params).await?;
        parse_availability(&raw)
    }

    pub async fn price_selected_flight(&self, params: &FlightOfferInput) -> Result<PricedFlight> {
        let raw = self.gateway.price_flight_offer(&params.flight_offer).await?;
        parse_pricing(&raw)
    }

    pub async fn show_seatmap_for_flight(
        &self,
        params: &FlightOfferInput,
    ) -> Result<Vec<SeatmapSummary>> {
        let raw = self.gateway.seatmap_from_offer(&params.flight_offer).await?;
        parse_seatmaps(&raw)
    }

    pub async fn show_seatmap_for_booking(
        &self,
        params: &SeatmapBookingParams,
    ) -> Result<Vec<SeatmapSummary>> {
        let raw = self.gateway.seatmap_from_order(params).await?;
        parse_seatmaps(&raw)
    }

    pub async fn create_flight_booking(
        &self,
        params: &FlightOrderParams,
    ) -> Result<FlightOrderSummary> {
        let raw = self.gateway.create_flight_order(params).await?;
        parse_order_created(&raw)
    }

    pub async fn retrieve_flight_booking(
        &self,
        params: &FlightOrderIdParams,
    ) -> Result<FlightOrderDetails> {
        let raw = self.gateway.retrieve_flight_order(params).await?;
        parse_order(&raw)
    }

    pub async fn cancel_flight_booking(
        &self,
        params: &FlightOrderIdParams,
    ) -> Result<FlightOrderCancellation> {
        let raw = self.gateway.cancel_flight_order(params).await?;
        parse_order_cancellation(&params.order_id, &raw)
    }

    pub async fn flight_status(&self, params: &FlightStatusParams) -> Result<Vec<FlightStatusResult>> {
        let raw = self.gateway.flight_status(params).await?;
        parse_flight_status(&raw)
    }

    pub async fn get_airline_checkin_link(
        &self,
        params: &CheckinLinksParams,
    ) -> Result<Vec<CheckinLink>> {
        let raw = self.gateway.checkin_links(params).await?;
        parse_checkin_links(&raw)
    }

    pub async fn airline_code_lookup(&self, params: &AirlineLookupParams) -> Result<Vec<AirlineInfo>> {
        let raw = self.gateway.airline_lookup(params).await?;
        parse_airlines(&raw)
    }

    pub async fn airline_routes(&self, params: &AirlineRoutesParams) -> Result<AirlineRoutes> {
        let raw = self.gateway.airline_routes(params).await?;
        parse_airline_routes(&params.airline_code, &raw)
    }

    // Discovery
    // ------------------------------------------------------------------

    pub async fn find_activities_nearby(
        &self,
        params: &ActivitiesNearbyParams,
    ) -> Result<Vec<ActivitySummary>> {
        let raw = self.gateway.activities_nearby(params).await?;
        parse_activities(&raw)
    }

    pub async fn find_activities_by_area(
        &self,
        params: &ActivitiesBySquareParams,
    ) -> Result<Vec<ActivitySummary>> {
        let raw = self.gateway.activities_by_square(params).await?;
        parse_activities(&raw)
    }

    pub async fn get_activity_details(&self, params: &ActivityIdParams) -> Result<ActivityDetails> {
        let raw = self.gateway.activity_by_id(params).await?;
        parse_activity(&raw)
    }

    pub async fn city_search(&self, params: &CitySearchParams) -> Result<Vec<CityResult>> {
        let raw = self.gateway.city_search(params).await?;
        parse_cities(&raw)
    }

    // Hotels
    // ------------------------------------------------------------------

    pub async fn hotels_by_city(&self, params: &HotelsByCityParams) -> Result<Vec<HotelListing>> {
        let raw = self.gateway.hotels_by_city(params).await?;
        parse_hotel_list(&raw)
    }

    pub async fn hotels_by_geocode(
        &self,
        params: &HotelsByGeocodeParams,
    ) -> Result<Vec<HotelListing>> {
        let raw = self.gateway.hotels_by_geocode(params).await?;
        parse_hotel_list(&raw)
    }

    pub async fn hotels_by_ids(&self, params: &HotelIdsParams) -> Result<Vec<HotelListing>> {
        let raw = self.gateway.hotels_by_ids(params).await?;
        parse_hotel_list(&raw)
    }

    pub async fn hotel_offers(&self, params: &HotelOffersParams) -> Result<Vec<HotelOffer>> {
        let raw = self.gateway.hotel_offers(params).await?;
        parse_hotel_offers(&raw)
    }

    pub async fn hotel_offer_pricing(&self, params: &HotelOfferIdParams) -> Result<HotelOfferDetails> {
        let raw = self.gateway.hotel_offer_by_id(params).await?;
        parse_hotel_offer(&raw)
    }

    pub async fn book_hotel(&self, params: &HotelBookingParams) -> Result<HotelBooking> {
        let raw = self.gateway.book_hotel(params).await?;
        parse_hotel_booking(&raw)
    }

    pub async fn hotel_ratings(&self, params: &HotelIdsParams) -> Result<Vec<HotelRating>> {
        let raw = self.gateway.hotel_ratings(params).await?;
        parse_hotel_ratings(&raw)
    }

    pub async fn hotel_name_autocomplete(
        &self,
        params: &HotelAutocompleteParams,
    ) -> Result<Vec<HotelSuggestion>> {
        let raw = self.gateway.hotel_name_autocomplete(params).await?;
        parse_hotel_suggestions(&raw)
    }

    // Transfers
    // ------------------------------------------------------------------

    pub async fn transfer_search(&self, params: &TransferSearchParams) -> Result<Vec<TransferOffer>> {
        let raw = self.gateway.transfer_search(params).await?;
        parse_transfer_offers(&raw)
    }

    pub async fn transfer_booking(&self, params: &TransferBookingParams) -> Result<TransferOrder> {
        let raw = self.gateway.transfer_booking(params).await?;
        parse_transfer_order(&raw)
    }

    pub async fn cancel_transfer(
        &self,
        params: &TransferCancelParams,
    ) -> Result<TransferCancellation> {
        let raw = self.gateway.cancel_transfer(params).await?;
        parse_transfer_cancellation(&params.confirmation_number, &raw)
    }

    // Market insights
    // ------------------------------------------------------------------

    pub async fn flight_most_traveled_destinations(
        &self,
        params: &AirTrafficParams,
    ) -> Result<Vec<DestinationScore>> {
        let raw = self.gateway.most_traveled_destinations(params).await?;
        parse_destination_scores(&raw)
    }

    pub async fn flight_most_booked_destinations(
        &self,
        params: &AirTrafficParams,
    ) -> Result<Vec<DestinationScore>> {
        let raw = self.gateway.most_booked_destinations(params).await?;
        parse_destination_scores(&raw)
    }

    pub async fn flight_busiest_traveling_period(
        &self,
        params: &BusiestPeriodParams,
    ) -> Result<Vec<PeriodScore>> {
        let raw = self.gateway.busiest_traveling_period(params).await?;
        parse_period_scores(&raw)
    }
}
