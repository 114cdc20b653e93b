//! Socket endpoint address.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Address the dev server listens on for reload subscribers.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:3000/ws";

/// A validated plain-text WebSocket URL, stored in normalized form.
///
/// Only `ws://` is accepted. There is no TLS and no subprotocol
/// negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint(String);

impl Endpoint {
    /// Validates and wraps a URL.
    pub fn parse(input: &str) -> Result<Self, EndpointError> {
        let url = Url::parse(input).map_err(|e| match e {
            url::ParseError::EmptyHost => EndpointError::MissingHost(input.to_string()),
            url::ParseError::InvalidPort => EndpointError::InvalidPort(input.to_string()),
            other => EndpointError::InvalidFormat {
                url: input.to_string(),
                reason: other.to_string(),
            },
        })?;

        if url.scheme() != "ws" {
            return Err(EndpointError::UnsupportedScheme(url.scheme().to_string()));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(EndpointError::MissingHost(input.to_string()));
        }

        Ok(Self(url.into()))
    }

    /// Returns the URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self(DEFAULT_ENDPOINT.to_string())
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Endpoint {
    type Error = EndpointError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors that can occur when validating an endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Invalid endpoint {url:?}: {reason}")]
    InvalidFormat { url: String, reason: String },

    #[error("Unsupported scheme {0:?}: only ws:// is supported")]
    UnsupportedScheme(String),

    #[error("Endpoint {0:?} has no host")]
    MissingHost(String),

    #[error("Endpoint {0:?} has an invalid port")]
    InvalidPort(String),
}
