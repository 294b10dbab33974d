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

//! # Credential Provider
//!
//! OAuth2 client-credentials tokens, cached until shortly before expiry.
//! Concurrent callers that find the cache stale share one refresh.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use serde::Deserialize;
use serde_json::Value;
use tokio::time::Instant;

use crate::error::{AuthFailure, truncate_body};
use crate::executor::RequestExecutor;

pub const TOKEN_PATH: &str = "/v1/security/oauth2/token";

/// Lifetime assumed when the token endpoint does not send `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(25 * 60);

/// A bearer token. Replaced wholesale on refresh, never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub expires_at: Instant,
    pub lifetime: Duration,
}

impl Credential {
    pub fn new(access_token: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: Instant::now() + lifetime,
            lifetime,
        }
    }

    /// Usable for at least `margin` more.
    pub fn is_fresh(&self, margin: Duration) -> bool {
        Instant::now() + margin < self.expires_at
    }

    /// `margin`, capped at half the lifetime so short-lived tokens still get
    /// served from cache.
    pub fn effective_margin(&self, margin: Duration) -> Duration {
        margin.min(self.lifetime / 2)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field(
                "expires_in",
                &self.expires_at.saturating_duration_since(Instant::now()),
            )
            .finish()
    }
}

/// Source of fresh tokens. The real one talks to the OAuth endpoint; tests
/// plug in fakes.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    async fn fetch_token(&self) -> Result<Credential, AuthFailure>;
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<Value>,
}

/// Interprets the token endpoint's answer.
pub fn parse_token_response(status: u16, body: &[u8]) -> Result<Credential, AuthFailure> {
    if !(200..300).contains(&status) {
        return Err(AuthFailure::Rejected {
            status,
            body: truncate_body(body),
        });
    }
    let parsed: TokenResponse = serde_json::from_slice(body)
        .map_err(|e| AuthFailure::Malformed(format!("token response is not JSON: {e}")))?;
    let access_token = parsed
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthFailure::Malformed("token response has no access_token".into()))?;

    let lifetime = parsed
        .expires_in
        .and_then(|v| match v {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TOKEN_LIFETIME);

    Ok(Credential::new(access_token, lifetime))
}

pub struct OAuthTokenEndpoint {
    executor: RequestExecutor,
    client_id: String,
    client_secret: String,
}

impl OAuthTokenEndpoint {
    pub fn new(executor: RequestExecutor, client_id: String, client_secret: String) -> Self {
        Self {
            executor,
            client_id,
            client_secret,
        }
    }
}

#[async_trait]
impl TokenEndpoint for OAuthTokenEndpoint {
    async fn fetch_token(&self) -> Result<Credential, AuthFailure> {
        let response = self
            .executor
            .post_form(
                TOKEN_PATH,
                &[
                    ("grant_type", "client_credentials"),
                    ("client_id", &self.client_id),
                    ("client_secret", &self.client_secret),
                ],
            )
            .await
            .map_err(|e| AuthFailure::Unreachable(e.to_string()))?;
        parse_token_response(response.status, &response.body)
    }
}

type Refresh = Shared<BoxFuture<'static, Result<Credential, AuthFailure>>>;

/// Token cache with single-flight refresh.
///
/// Locks here are never held across an `.await`: waiters clone the shared
/// refresh future out of the slot and await it unlocked. The token request
/// itself runs as a spawned task that fills the cache on success, so it
/// completes even when every waiter is cancelled.
pub struct CredentialProvider {
    endpoint: Arc<dyn TokenEndpoint>,
    margin: Duration,
    cached: Arc<RwLock<Option<Credential>>>,
    in_flight: Mutex<Option<Refresh>>,
}

impl CredentialProvider {
    pub fn new(endpoint: Arc<dyn TokenEndpoint>, margin: Duration) -> Self {
        Self {
            endpoint,
            margin,
            cached: Arc::new(RwLock::new(None)),
            in_flight: Mutex::new(None),
        }
    }

    fn fresh_cached(&self) -> Option<Credential> {
        self.cached
            .read()
            .as_ref()
            .filter(|c| c.is_fresh(c.effective_margin(self.margin)))
            .cloned()
    }

    pub async fn get_token(&self) -> Result<Credential, AuthFailure> {
        if let Some(credential) = self.fresh_cached() {
            return Ok(credential);
        }

        let refresh = {
            let mut slot = self.in_flight.lock();
            // A refresh may have landed while we waited for the slot.
            if let Some(credential) = self.fresh_cached() {
                return Ok(credential);
            }
            match slot.as_ref() {
                Some(existing) if !matches!(existing.peek(), Some(Err(_))) => existing.clone(),
                _ => {
                    tracing::info!("Requesting a new access token");
                    let endpoint = Arc::clone(&self.endpoint);
                    let cached = Arc::clone(&self.cached);
                    let task = tokio::spawn(async move {
                        let result = endpoint.fetch_token().await;
                        match &result {
                            Ok(credential) => store(&cached, credential),
                            Err(e) => tracing::warn!("Access token refresh failed: {}", e),
                        }
                        result
                    });
                    let refresh = async move {
                        task.await.unwrap_or_else(|e| {
                            Err(AuthFailure::Unreachable(format!("token refresh task failed: {e}")))
                        })
                    }
                    .boxed()
                    .shared();
                    *slot = Some(refresh.clone());
                    refresh
                }
            }
        };

        let result = refresh.clone().await;

        let mut slot = self.in_flight.lock();
        if slot.as_ref().is_some_and(|s| s.ptr_eq(&refresh)) {
            *slot = None;
        }
        result
    }

    /// Drops `stale` from the cache, e.g. after the remote answered 401.
    /// A newer token already cached is left alone.
    pub fn invalidate(&self, stale: &Credential) {
        let mut cached = self.cached.write();
        if cached.as_ref() == Some(stale) {
            tracing::info!("Discarding access token rejected by the remote service");
            *cached = None;
        }
    }
}

fn store(cached: &RwLock<Option<Credential>>, credential: &Credential) {
    let mut cached = cached.write();
    // An older refresh finishing late must not roll the cache back.
    if cached
        .as_ref()
        .is_none_or(|c| c.expires_at < credential.expires_at)
    {
        tracing::debug!("Access token cached: {:?}", credential);
        *cached = Some(credential.clone());
    }
}
