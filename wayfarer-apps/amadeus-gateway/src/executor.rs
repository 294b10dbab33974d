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

//! # Request Executor
//!
//! Effectful (network) half of the gateway. Sends one request, returns the
//! status and body. HTTP error statuses are data here, only connection-level
//! problems are errors.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use wayfarer_query_queues::{QueryQueue, QueryQueueError};

use crate::config::GatewayConfig;
use crate::credentials::Credential;
use crate::error::{GatewayError, Result, TransportKind};
use crate::request::{Method, RequestSpec};

const ACCEPT: &str = "application/json, application/vnd.amadeus+json";
const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RemoteResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body. An empty body (`204 No Content`) is `null`.
    pub fn json(&self) -> Result<Value> {
        if self.body.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&self.body)
            .map_err(|e| GatewayError::normalization("$", format!("body is not JSON: {e}")))
    }

    /// Success body, or `RemoteApi` carrying the remote error payload.
    pub fn into_json(self) -> Result<Value> {
        if !self.is_success() {
            return Err(GatewayError::remote_api(self.status, &self.body));
        }
        self.json()
    }
}

/// Outcome of one attempt, as seen by the retry predicate.
enum Attempt {
    Failed(GatewayError),
    ServerError(RemoteResponse),
}

#[derive(Clone)]
pub struct RequestExecutor {
    client: Arc<wreq::Client>,
    base_url: String,
    query_queue: QueryQueue,
}

impl RequestExecutor {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = wreq::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {e}")))?;
        let query_queue = QueryQueue::with_qps_limit(config.queries_per_second as u64)
            .max_retries(config.read_retries);
        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            query_queue,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `spec` once with the bearer token attached.
    pub async fn execute(&self, spec: &RequestSpec, credential: &Credential) -> Result<RemoteResponse> {
        self.query_queue
            .run(move || self.send(spec, credential))
            .await
            .map_err(flatten_queue_error)
    }

    /// Like [`execute`](Self::execute), but transport failures and 5xx answers
    /// are retried when the gateway was configured with read retries.
    /// Only for requests that are safe to repeat.
    pub async fn execute_idempotent(
        &self,
        spec: &RequestSpec,
        credential: &Credential,
    ) -> Result<RemoteResponse> {
        if !self.query_queue.retries_enabled() {
            return self.execute(spec, credential).await;
        }
        let outcome = self
            .query_queue
            .with_retry(
                move || async move {
                    match self.send(spec, credential).await {
                        Ok(resp) if resp.status >= 500 => Err(Attempt::ServerError(resp)),
                        Ok(resp) => Ok(resp),
                        Err(e) => Err(Attempt::Failed(e)),
                    }
                },
                |attempt| match attempt {
                    Attempt::Failed(e) => e.is_retryable(),
                    Attempt::ServerError(_) => true,
                },
            )
            .await;

        match outcome {
            Ok(resp) => Ok(resp),
            Err(QueryQueueError::Failed { attempts, source }) => {
                tracing::warn!(
                    "{} {} gave up after {} attempt(s)",
                    spec.method.as_str(),
                    spec.path,
                    attempts
                );
                match source {
                    Attempt::ServerError(resp) => Ok(resp),
                    Attempt::Failed(e) => Err(e),
                }
            }
            Err(QueryQueueError::QueueClosed) => Err(queue_closed()),
        }
    }

    /// Form-encoded POST without bearer token, used by the token endpoint.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Result<RemoteResponse> {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!("{}{}", self.base_url, path);
        let (client, url, body) = (&self.client, url.as_str(), &body);
        self.query_queue
            .run(move || async move {
                let start = Instant::now();
                let response = client
                    .post(url)
                    .header("Content-Type", CONTENT_TYPE_FORM)
                    .header("Accept", ACCEPT)
                    .body(body.clone())
                    .send()
                    .await?;
                read_response("POST", path, response, start).await
            })
            .await
            .map_err(flatten_queue_error)
    }

    async fn send(&self, spec: &RequestSpec, credential: &Credential) -> Result<RemoteResponse> {
        let url = spec.url(&self.base_url);
        let start = Instant::now();
        tracing::trace!("[execute] {} {}", spec.method.as_str(), url);

        let mut request = match spec.method {
            Method::Get => self.client.get(url.as_str()),
            Method::Post => self.client.post(url.as_str()),
            Method::Delete => self.client.delete(url.as_str()),
        }
        .header("Accept", ACCEPT)
        .header("Authorization", format!("Bearer {}", credential.access_token));

        if let Some(body) = &spec.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| GatewayError::InvalidInput(format!("request body: {e}")))?;
            request = request.header("Content-Type", CONTENT_TYPE_JSON).body(bytes);
        }

        let response = request.send().await?;
        read_response(spec.method.as_str(), &spec.path, response, start).await
    }
}

async fn read_response(
    method: &str,
    path: &str,
    response: wreq::Response,
    start: Instant,
) -> Result<RemoteResponse> {
    let status = response.status().as_u16();
    let body = response.bytes().await?.to_vec();
    let elapsed: Duration = start.elapsed();
    tracing::debug!(
        "[execute] {} {} -> {} in {:?} ({} bytes)",
        method,
        path,
        status,
        elapsed,
        body.len()
    );
    Ok(RemoteResponse { status, body })
}

fn queue_closed() -> GatewayError {
    GatewayError::Transport {
        kind: TransportKind::Other,
        message: "request queue is closed".into(),
    }
}

fn flatten_queue_error(e: QueryQueueError<GatewayError>) -> GatewayError {
    e.into_source().unwrap_or_else(queue_closed)
}
