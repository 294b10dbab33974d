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

//! # Gateway Configuration
//!
//! Settings come from `AMADEUS_*` environment variables (or the matching
//! `--flags`), parsed by clap. Application credentials are checked here,
//! before any tool is usable.

use std::fmt;
use std::time::Duration;

use clap::{Args, Parser};

use crate::error::{GatewayError, Result};

pub const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Request rate allowed by the Amadeus test environment.
pub const DEFAULT_QPS: u32 = 10;
pub const DEFAULT_TOKEN_MARGIN_SECS: u64 = 60;
pub const MAX_READ_RETRIES: u32 = 10;

/// Raw settings as given on the command line or in the environment.
#[derive(Args, Clone)]
pub struct GatewayArgs {
    /// Amadeus application key
    #[arg(long, env = "AMADEUS_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Amadeus application secret
    #[arg(long, env = "AMADEUS_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Remote base URL
    #[arg(long, env = "AMADEUS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        env = "AMADEUS_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Requests per second sent to the remote service
    #[arg(
        long,
        env = "AMADEUS_QPS",
        default_value_t = DEFAULT_QPS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub qps: u32,

    /// Retries for read-only operations on transport failures and 5xx
    #[arg(
        long,
        env = "AMADEUS_READ_RETRIES",
        default_value_t = 0,
        value_parser = clap::value_parser!(u32).range(0..=MAX_READ_RETRIES as i64)
    )]
    pub read_retries: u32,

    /// Seconds before expiry at which the access token is refreshed
    #[arg(long, env = "AMADEUS_TOKEN_MARGIN_SECS", default_value_t = DEFAULT_TOKEN_MARGIN_SECS)]
    pub token_margin_secs: u64,
}

impl fmt::Debug for GatewayArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayArgs")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("qps", &self.qps)
            .field("read_retries", &self.read_retries)
            .field("token_margin_secs", &self.token_margin_secs)
            .finish()
    }
}

/// Environment-only parse, for library users without a CLI of their own.
#[derive(Parser)]
#[command(name = "wayfarer-amadeus-gateway", no_binary_name = true)]
struct EnvOnly {
    #[command(flatten)]
    gateway: GatewayArgs,
}

#[derive(Clone)]
pub struct GatewayConfig {
    pub client_id: String,
    pub client_secret: String,
    pub base_url: String,
    pub timeout: Duration,
    pub queries_per_second: u32,
    pub read_retries: u32,
    pub token_margin: Duration,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("queries_per_second", &self.queries_per_second)
            .field("read_retries", &self.read_retries)
            .field("token_margin", &self.token_margin)
            .finish()
    }
}

impl GatewayConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            queries_per_second: DEFAULT_QPS,
            read_retries: 0,
            token_margin: Duration::from_secs(DEFAULT_TOKEN_MARGIN_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn from_env() -> Result<Self> {
        let parsed = EnvOnly::try_parse_from(std::iter::empty::<String>())
            .map_err(|e| GatewayError::Config(e.to_string()))?;
        parsed.gateway.try_into()
    }
}

impl TryFrom<GatewayArgs> for GatewayConfig {
    type Error = GatewayError;

    fn try_from(args: GatewayArgs) -> Result<Self> {
        let required = |value: Option<String>, key: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| GatewayError::Config(format!("{key} is not set")))
        };
        let client_id = required(args.client_id, "AMADEUS_CLIENT_ID")?;
        let client_secret = required(args.client_secret, "AMADEUS_CLIENT_SECRET")?;

        let base_url = args.base_url.trim();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(GatewayError::Config(format!(
                "AMADEUS_BASE_URL must be an http(s) URL, got {base_url:?}"
            )));
        }

        Ok(Self {
            timeout: Duration::from_secs(args.timeout_secs),
            queries_per_second: args.qps,
            read_retries: args.read_retries,
            token_margin: Duration::from_secs(args.token_margin_secs),
            ..Self::new(client_id, client_secret)
        }
        .with_base_url(base_url))
    }
}
