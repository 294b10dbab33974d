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

// Library for wayfarer-amadeus-gateway
// Authenticated access to the Amadeus self-service travel APIs, as agent tools

pub mod config;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod json_path;
mod operations;
pub mod request;
pub mod tools;

pub mod discovery_query_builder;
pub mod discovery_results_parser;
pub mod flights_query_builder;
pub mod flights_results_parser;
pub mod hotels_query_builder;
pub mod hotels_results_parser;
pub mod insights_query_builder;
pub mod insights_results_parser;
pub mod transfers_query_builder;
pub mod transfers_results_parser;

#[cfg(feature = "mcp")]
pub mod mcp_server;

pub use config::GatewayConfig;
pub use credentials::{Credential, CredentialProvider, OAuthTokenEndpoint, TokenEndpoint};
pub use error::{AuthFailure, GatewayError, Result, TransportKind};
pub use executor::{RemoteResponse, RequestExecutor};
pub use gateway::{Access, AmadeusGateway};
pub use request::{Method, RequestSpec};
pub use tools::TravelTools;

#[cfg(feature = "mcp")]
pub use mcp_server::AmadeusMcpServer;
