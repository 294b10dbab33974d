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

//! # Domain Operations
//!
//! One method per remote capability. Each returns the decoded body untouched;
//! shaping it is the results parsers' job.

use serde_json::Value;

use crate::discovery_query_builder::*;
use crate::error::Result;
use crate::flights_query_builder::*;
use crate::gateway::{Access, AmadeusGateway};
use crate::hotels_query_builder::*;
use crate::insights_query_builder::*;
use crate::transfers_query_builder::*;

impl AmadeusGateway {
    // Flights

    pub async fn search_multicity_flights(&self, params: &MultiCitySearchParams) -> Result<Value> {
        self.call(multicity_search_request(params)?, Access::ReadOnly).await
    }

    pub async fn price_flight_offer(&self, flight_offer: &Value) -> Result<Value> {
        self.call(pricing_request(flight_offer)?, Access::ReadOnly).await
    }

    pub async fn seatmap_from_offer(&self, flight_offer: &Value) -> Result<Value> {
        self.call(seatmap_from_offer_request(flight_offer)?, Access::ReadOnly).await
    }

    pub async fn seatmap_from_order(&self, params: &FlightOrderIdParams) -> Result<Value> {
        self.call(seatmap_from_order_request(params)?, Access::ReadOnly).await
    }

    pub async fn create_flight_order(&self, params: &FlightOrderParams) -> Result<Value> {
        self.call(create_order_request(params)?, Access::Mutating).await
    }

    pub async fn retrieve_flight_order(&self, params: &FlightOrderIdParams) -> Result<Value> {
        self.call(retrieve_order_request(params)?, Access::ReadOnly).await
    }

    /// `null` when the remote answers `204 No Content`.
    pub async fn cancel_flight_order(&self, params: &FlightOrderIdParams) -> Result<Value> {
        self.call(cancel_order_request(params)?, Access::Mutating).await
    }

    pub async fn flight_inspiration(&self, params: &FlightInspirationParams) -> Result<Value> {
        self.call(inspiration_request(params)?, Access::ReadOnly).await
    }

    pub async fn cheapest_flight_dates(&self, params: &CheapestDatesParams) -> Result<Value> {
        self.call(cheapest_dates_request(params)?, Access::ReadOnly).await
    }

    pub async fn flight_availability(&self, params: &AvailabilityParams) -> Result<Value> {
        self.call(availability_request(params)?, Access::ReadOnly).await
    }

    pub async fn flight_status(&self, params: &FlightStatusParams) -> Result<Value> {
        self.call(flight_status_request(params)?, Access::ReadOnly).await
    }

    pub async fn checkin_links(&self, params: &CheckinLinksParams) -> Result<Value> {
        self.call(checkin_links_request(params)?, Access::ReadOnly).await
    }

    pub async fn airline_lookup(&self, params: &AirlineLookupParams) -> Result<Value> {
        self.call(airline_lookup_request(params)?, Access::ReadOnly).await
    }

    pub async fn airline_routes(&self, params: &AirlineRoutesParams) -> Result<Value> {
        self.call(airline_routes_request(params)?, Access::ReadOnly).await
    }

    // Activities and cities

    pub async fn activities_nearby(&self, params: &ActivitiesNearbyParams) -> Result<Value> {
        self.call(activities_nearby_request(params)?, Access::ReadOnly).await
    }

    pub async fn activities_by_square(&self, params: &ActivitiesBySquareParams) -> Result<Value> {
        self.call(activities_by_square_request(params)?, Access::ReadOnly).await
    }

    pub async fn activity_by_id(&self, params: &ActivityIdParams) -> Result<Value> {
        self.call(activity_request(params)?, Access::ReadOnly).await
    }

    pub async fn city_search(&self, params: &CitySearchParams) -> Result<Value> {
        self.call(city_search_request(params)?, Access::ReadOnly).await
    }

    // Hotels

    pub async fn hotels_by_city(&self, params: &HotelsByCityParams) -> Result<Value> {
        self.call(hotels_by_city_request(params)?, Access::ReadOnly).await
    }

    pub async fn hotels_by_geocode(&self, params: &HotelsByGeocodeParams) -> Result<Value> {
        self.call(hotels_by_geocode_request(params)?, Access::ReadOnly).await
    }

    pub async fn hotels_by_ids(&self, params: &HotelIdsParams) -> Result<Value> {
        self.call(hotels_by_ids_request(params)?, Access::ReadOnly).await
    }

    pub async fn hotel_offers(&self, params: &HotelOffersParams) -> Result<Value> {
        self.call(hotel_offers_request(params)?, Access::ReadOnly).await
    }

    pub async fn hotel_offer_by_id(&self, params: &HotelOfferIdParams) -> Result<Value> {
        self.call(hotel_offer_request(params)?, Access::ReadOnly).await
    }

    pub async fn book_hotel(&self, params: &HotelBookingParams) -> Result<Value> {
        self.call(hotel_booking_request(params)?, Access::Mutating).await
    }

    pub async fn hotel_ratings(&self, params: &HotelIdsParams) -> Result<Value> {
        self.call(hotel_ratings_request(params)?, Access::ReadOnly).await
    }

    pub async fn hotel_name_autocomplete(&self, params: &HotelAutocompleteParams) -> Result<Value> {
        self.call(hotel_autocomplete_request(params)?, Access::ReadOnly).await
    }

    // Transfers

    pub async fn transfer_search(&self, params: &TransferSearchParams) -> Result<Value> {
        self.call(transfer_search_request(params)?, Access::ReadOnly).await
    }

    pub async fn transfer_booking(&self, params: &TransferBookingParams) -> Result<Value> {
        self.call(transfer_booking_request(params)?, Access::Mutating).await
    }

    pub async fn cancel_transfer(&self, params: &TransferCancelParams) -> Result<Value> {
        self.call(transfer_cancel_request(params)?, Access::Mutating).await
    }

    // Market insights

    pub async fn most_traveled_destinations(&self, params: &AirTrafficParams) -> Result<Value> {
        self.call(most_traveled_request(params)?, Access::ReadOnly).await
    }

    pub async fn most_booked_destinations(&self, params: &AirTrafficParams) -> Result<Value> {
        self.call(most_booked_request(params)?, Access::ReadOnly).await
    }

    pub async fn busiest_traveling_period(&self, params: &BusiestPeriodParams) -> Result<Value> {
        self.call(busiest_period_request(params)?, Access::ReadOnly).await
    }
}
