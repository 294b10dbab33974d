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

//! # Amadeus Gateway
//!
//! Token, then request, then decoded body. Every domain operation goes
//! through [`AmadeusGateway::call`].

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::config::GatewayConfig;
use crate::credentials::{CredentialProvider, OAuthTokenEndpoint, TokenEndpoint};
use crate::error::{GatewayError, Result};
use crate::executor::RequestExecutor;
use crate::request::RequestSpec;

/// Whether the remote call changes state (orders, bookings, cancellations).
/// Only read-only calls are eligible for retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    Mutating,
}

#[derive(Clone)]
pub struct AmadeusGateway {
    executor: RequestExecutor,
    credentials: Arc<CredentialProvider>,
}

impl AmadeusGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let executor = RequestExecutor::new(config)?;
        let endpoint = OAuthTokenEndpoint::new(
            executor.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
        );
        tracing::debug!("Gateway configured for {}", executor.base_url());
        Ok(Self::with_token_endpoint(
            executor,
            Arc::new(endpoint),
            config.token_margin,
        ))
    }

    pub fn with_token_endpoint(
        executor: RequestExecutor,
        endpoint: Arc<dyn TokenEndpoint>,
        token_margin: Duration,
    ) -> Self {
        Self {
            executor,
            credentials: Arc::new(CredentialProvider::new(endpoint, token_margin)),
        }
    }

    pub fn credentials(&self) -> &CredentialProvider {
        &self.credentials
    }

    pub async fn call(&self, spec: RequestSpec, access: Access) -> Result<Value> {
        let credential = self.credentials.get_token().await?;
        let response = match access {
            Access::ReadOnly => self.executor.execute_idempotent(&spec, &credential).await?,
            Access::Mutating => self.executor.execute(&spec, &credential).await?,
        };

        if response.status == 401 {
            self.credentials.invalidate(&credential);
        }
        if !response.is_success() {
            let err = GatewayError::remote_api(response.status, &response.body);
            tracing::warn!("{} {} failed: {}", spec.method.as_str(), spec.path, err);
            return Err(err);
        }
        response.json()
    }
}
