//! Transport protocols an agent endpoint can speak.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Preferred transport advertised by an agent card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Transport {
    /// Plain HTTP.
    #[default]
    Http,
    /// gRPC.
    Grpc,
    /// WebSocket.
    WebSocket,
    /// JSON-RPC over HTTP.
    JsonRpc,
    /// HTTP with JSON bodies (REST style).
    HttpJson,
}

/// Error returned when a transport label is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported transport '{0}'; expected one of: http, grpc, websocket, jsonrpc, http+json")]
pub struct ParseTransportError(pub String);

impl Transport {
    /// Every supported transport.
    pub const ALL: [Self; 5] = [
        Self::Http,
        Self::Grpc,
        Self::WebSocket,
        Self::JsonRpc,
        Self::HttpJson,
    ];

    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Grpc => "grpc",
            Self::WebSocket => "websocket",
            Self::JsonRpc => "jsonrpc",
            Self::HttpJson => "http+json",
        }
    }

    /// Returns whether `label` names a supported transport.
    #[must_use]
    pub fn is_supported(label: &str) -> bool {
        Self::try_from(label).is_ok()
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Transport {
    type Error = ParseTransportError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == normalized)
            .ok_or_else(|| ParseTransportError(value.to_owned()))
    }
}

impl TryFrom<String> for Transport {
    type Error = ParseTransportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Transport> for String {
    fn from(value: Transport) -> Self {
        value.as_str().to_owned()
    }
}
