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

//! # Gateway Errors
//!
//! Every failure a tool invocation can surface. Nothing in the gateway
//! recovers locally from these, apart from the shared token refresh.

use thiserror::Error;

/// Remote bodies kept in errors are cut to this many bytes.
pub const MAX_ERROR_BODY_BYTES: usize = 2048;

/// Why the token endpoint did not hand out a credential.
///
/// Cloneable so a single failed refresh can be delivered to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("token endpoint rejected the application credentials (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("token endpoint unreachable: {0}")]
    Unreachable(String),
    #[error("token endpoint returned an unusable response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    Connect,
    Other,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TransportKind::Timeout => "timeout",
            TransportKind::Connect => "connect",
            TransportKind::Other => "transport",
        })
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthFailure),

    #[error("{kind} failure: {message}")]
    Transport {
        kind: TransportKind,
        message: String,
    },

    #[error("remote API error (HTTP {status}): {body}")]
    RemoteApi { status: u16, body: String },

    #[error("unexpected response shape at {path}: {reason}")]
    Normalization { path: String, reason: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl GatewayError {
    pub fn remote_api(status: u16, body: &[u8]) -> Self {
        GatewayError::RemoteApi {
            status,
            body: truncate_body(body),
        }
    }

    pub fn normalization(path: impl Into<String>, reason: impl Into<String>) -> Self {
        let err = GatewayError::Normalization {
            path: path.into(),
            reason: reason.into(),
        };
        tracing::error!("{}", err);
        err
    }

    /// Transient failures the caller may retry. Never applies to writes
    /// without the caller knowing the remote side is idempotent.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Transport { .. } => true,
            GatewayError::RemoteApi { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::RemoteApi { status, .. } => Some(*status),
            GatewayError::Auth(AuthFailure::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

impl From<wreq::Error> for GatewayError {
    fn from(e: wreq::Error) -> Self {
        let kind = if e.is_timeout() {
            TransportKind::Timeout
        } else if e.is_connect() {
            TransportKind::Connect
        } else {
            TransportKind::Other
        };
        GatewayError::Transport {
            kind,
            message: e.to_string(),
        }
    }
}

pub(crate) fn truncate_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= MAX_ERROR_BODY_BYTES {
        return text.into_owned();
    }
    let mut end = MAX_ERROR_BODY_BYTES;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

pub type Result<T, E = GatewayError> = std::result::Result<T, E>;
