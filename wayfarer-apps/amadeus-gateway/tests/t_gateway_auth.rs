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

//! Token acquisition, caching and invalidation against a mock Amadeus service.


use async_trait::async_trait;
use clap::Parser;
use futures::future::join_all;
use mock_helpers::*;
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use wayfarer_amadeus_gateway::config::GatewayArgs;
use wayfarer_amadeus_gateway::discovery_query_builder::CitySearchParams;
use wayfarer_amadeus_gateway::flights_query_builder::FlightOrderIdParams;
use wayfarer_amadeus_gateway::{
    AmadeusGateway, AuthFailure, Credential, GatewayConfig, GatewayError, RequestExecutor,
    TokenEndpoint, TransportKind, TravelTools,
};

const CITIES_PATH: &str = "/v1/reference-data/locations/cities";

fn city_search(keyword: &str) -> CitySearchParams {
    CitySearchParams {
        keyword: keyword.to_string(),
        max_results: 10,
    }
}

fn cities_body() -> String {
    json!({"data": [{"type": "location", "subType": "city", "name": "PARIS", "iataCode": "PAR"}]})
        .to_string()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_share_one_token() {
    let mut server = Server::new_async().await;
    let token = mock_token(&mut server, "shared-token", 1).await;
    let cities = server
        .mock("GET", CITIES_PATH)
        .match_header("authorization", bearer("shared-token").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(cities_body())
        .expect(16)
        .create_async()
        .await;

    let tools = tools_for(&server);
    let params = city_search("Par");
    let results = join_all((0..16).map(|_| tools.city_search(&params))).await;

    for result in results {
        let cities = result.expect("city search");
        assert_eq!(cities[0].city_code.as_deref(), Some("PAR"));
    }
    token.assert_async().await;
    cities.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_answer_forces_a_new_token() {
    let mut server = Server::new_async().await;
    let first = mock_token(&mut server, "revoked-token", 1).await;
    let second = mock_token(&mut server, "fresh-token", 1).await;
    let rejected = server
        .mock("GET", CITIES_PATH)
        .match_header("authorization", bearer("revoked-token").as_str())
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"errors":[{"status":401,"code":38190,"title":"Invalid access token"}]}"#)
        .expect(1)
        .create_async()
        .await;
    let accepted = server
        .mock("GET", CITIES_PATH)
        .match_header("authorization", bearer("fresh-token").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(cities_body())
        .expect(1)
        .create_async()
        .await;

    let tools = tools_for(&server);
    let err = tools.city_search(&city_search("Par")).await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    let cities = tools.city_search(&city_search("Par")).await.unwrap();
    assert_eq!(cities.len(), 1);

    first.assert_async().await;
    second.assert_async().await;
    rejected.assert_async().await;
    accepted.assert_async().await;
}

#[tokio::test]
async fn test_rejected_credentials_surface_as_auth_failure() {
    let mut server = Server::new_async().await;
    let token = server
        .mock("POST", TOKEN_PATH)
        .with_status(401)
        .with_body(r#"{"error":"invalid_client","error_description":"Client credentials are invalid","code":38187}"#)
        .expect(1)
        .create_async()
        .await;
    let cities = server
        .mock("GET", CITIES_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let tools = tools_for(&server);
    let err = tools.city_search(&city_search("Par")).await.unwrap_err();
    match err {
        GatewayError::Auth(AuthFailure::Rejected { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid_client"));
        }
        other => panic!("expected rejected credentials, got {other:?}"),
    }
    token.assert_async().await;
    cities.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_token_endpoint() {
    // Nothing listens on port 9 of localhost.
    let config = test_config("http://127.0.0.1:9");
    let tools = tools_with(config);
    let err = tools.city_search(&city_search("Par")).await.unwrap_err();
    assert!(matches!(err, GatewayError::Auth(AuthFailure::Unreachable(_))), "{err:?}");
}

#[tokio::test]
async fn test_invalid_identifier_makes_no_request() {
    let mut server = Server::new_async().await;
    let token = mock_token(&mut server, "unused", 0).await;

    let tools = tools_for(&server);
    let params = FlightOrderIdParams {
        order_id: "../../v1/security".to_string(),
    };
    let err = tools.retrieve_flight_booking(&params).await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidInput(_)), "{err:?}");
    token.assert_async().await;
}

struct StaticToken;

#[async_trait]
impl TokenEndpoint for StaticToken {
    async fn fetch_token(&self) -> Result<Credential, AuthFailure> {
        Ok(Credential::new("static-token", Duration::from_secs(1799)))
    }
}

#[tokio::test]
async fn test_silent_remote_times_out_as_transport_failure() {
    // Accepts connections and never answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let silent = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let mut config = test_config(&format!("http://{addr}"));
    config.timeout = Duration::from_secs(1);
    let executor = RequestExecutor::new(&config).unwrap();
    let gateway =
        AmadeusGateway::with_token_endpoint(executor, Arc::new(StaticToken), config.token_margin);
    let tools = TravelTools::new(gateway);

    let err = tools.city_search(&city_search("Par")).await.unwrap_err();
    assert!(
        matches!(err, GatewayError::Transport { kind: TransportKind::Timeout, .. }),
        "{err:?}"
    );
    assert!(err.is_retryable());
    silent.abort();
}

#[derive(Parser)]
#[command(no_binary_name = true)]
struct Cli {
    #[command(flatten)]
    gateway: GatewayArgs,
}

#[test]
fn test_missing_credentials_fail_at_startup() {
    let mut cli = Cli::try_parse_from(["--client-secret", "secret"]).unwrap();
    cli.gateway.client_id = None;
    let err = GatewayConfig::try_from(cli.gateway).unwrap_err();
    assert!(matches!(err, GatewayError::Config(ref msg) if msg.contains("AMADEUS_CLIENT_ID")));
}
