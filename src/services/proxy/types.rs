//! Types shared by the connect-proxy pipeline.
//!
//! Host-facing types (`ConnectEvent`, `ConnectReply`) are owned here so the
//! pipeline has no compile-time dependency on the real-time server itself.

use serde::{Deserialize, Serialize};

/// Classification of a connection's negotiated data encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    // Any other encoding; cannot carry arbitrary bytes inline in JSON.
    Binary,
}

impl Encoding {
    /// Only the exact name `json` is structured; everything else is opaque.
    pub fn classify(name: &str) -> Self {
        if name == "json" { Self::Json } else { Self::Binary }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}

/// How a client is connected (transport name, wire protocol, data encoding).
///
/// `encoding` is the negotiated name exactly as the host reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportInfo {
    pub name: String,
    pub protocol: String,
    pub encoding: String,
}

impl TransportInfo {
    pub fn new(
        name: impl Into<String>,
        protocol: impl Into<String>,
        encoding: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            protocol: protocol.into(),
            encoding: encoding.into(),
        }
    }

    pub fn encoding_kind(&self) -> Encoding {
        Encoding::classify(&self.encoding)
    }
}

/// Connection attempt as seen by the connect handler.
#[derive(Debug, Clone)]
pub struct ConnectEvent {
    pub client_id: String,
    pub transport: TransportInfo,
    // Pre-issued credential token. Empty counts as absent.
    pub token: Option<String>,
    pub data: Vec<u8>,
}

impl ConnectEvent {
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Request handed to the proxy transport. Built once per attempt, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    pub client_id: String,
    pub transport: TransportInfo,
    pub data: Vec<u8>,
}

/// Client-visible error (reject). Code and message come verbatim from the
/// backend, except for the opaque internal error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientError {
    pub code: u32,
    pub message: String,
}

impl ClientError {
    pub const INTERNAL_CODE: u32 = 100;

    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::new(Self::INTERNAL_CODE, "internal server error")
    }
}

/// Directive to terminate the client's transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disconnect {
    pub code: u32,
    pub reason: String,
}

impl Disconnect {
    pub fn new(code: u32, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }
}

/// Connection metadata as delivered by the backend.
///
/// The same payload may arrive in either representation; which one is
/// authoritative depends on the connection encoding and is decided once by
/// `metadata::resolve_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyInfo {
    // Raw bytes in the connection's native (JSON) encoding.
    pub json: Option<Vec<u8>>,
    // Standard base64 of the payload, for opaque encodings.
    pub base64: Option<String>,
}

impl ReplyInfo {
    pub fn json(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            json: Some(bytes.into()),
            base64: None,
        }
    }

    pub fn base64(encoded: impl Into<String>) -> Self {
        Self {
            json: None,
            base64: Some(encoded.into()),
        }
    }
}

/// Credentials returned by the backend, before metadata resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyCredentials {
    pub user: String,
    pub expire_at: Option<i64>,
    pub info: ReplyInfo,
}

/// Backend verdict. Exactly one arm per reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectResult {
    Disconnect(Disconnect),
    Error(ClientError),
    Credentials(ProxyCredentials),
    None,
}

/// Resolved identity attached to an accepted connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub expire_at: Option<i64>,
    pub info: Vec<u8>,
}

/// Server action for a connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectReply {
    // `None` means the connection proceeds without proxy-issued identity.
    Accept(Option<Credentials>),
    Reject(ClientError),
    Disconnect(Disconnect),
}

impl ConnectReply {
    pub fn anonymous() -> Self {
        Self::Accept(None)
    }

    pub fn internal_error() -> Self {
        Self::Reject(ClientError::internal())
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Self::Accept(Some(c)) => Some(c),
            _ => None,
        }
    }
}
