//! HTTP+JSON connect proxy transport.
//!
//! Request body:
//!   {"client", "transport", "protocol", "encoding", "data" | "b64data"}
//! Reply body (all optional):
//!   {"result": {"user", "expire_at", "info", "b64info"},
//!    "error": {"code", "message"},
//!    "disconnect": {"code", "reason"}}

use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use url::Url;

use crate::services::proxy::error::ProxyError;
use crate::services::proxy::transport::{ConnectProxy, ProxyContext};
use crate::services::proxy::types::{
    ClientError, ConnectRequest, ConnectResult, Disconnect, ProxyCredentials, ReplyInfo,
};

#[derive(Debug, Serialize)]
struct WireConnectRequest<'a> {
    client: &'a str,
    transport: &'a str,
    protocol: &'a str,
    encoding: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    b64data: Option<String>,
}

impl<'a> WireConnectRequest<'a> {
    fn from_request(req: &'a ConnectRequest) -> Self {
        let (data, b64data) = encode_data(req);
        Self {
            client: &req.client_id,
            transport: &req.transport.name,
            protocol: &req.transport.protocol,
            encoding: &req.transport.encoding,
            data,
            b64data,
        }
    }
}

// JSON connections embed their data inline when it is valid JSON; everything
// else travels as base64.
fn encode_data(req: &ConnectRequest) -> (Option<Box<RawValue>>, Option<String>) {
    if req.data.is_empty() {
        return (None, None);
    }

    if req.transport.encoding_kind().is_json() {
        let raw = std::str::from_utf8(&req.data)
            .ok()
            .and_then(|s| RawValue::from_string(s.to_owned()).ok());
        if let Some(raw) = raw {
            return (Some(raw), None);
        }
    }

    (None, Some(STANDARD.encode(&req.data)))
}

#[derive(Debug, Default, Deserialize)]
struct WireConnectReply {
    #[serde(default)]
    result: Option<WireCredentials>,
    #[serde(default)]
    error: Option<ClientError>,
    #[serde(default)]
    disconnect: Option<Disconnect>,
}

#[derive(Debug, Default, Deserialize)]
struct WireCredentials {
    #[serde(default)]
    user: String,
    // 0 means "no expiration".
    #[serde(default)]
    expire_at: Option<i64>,
    #[serde(default)]
    info: Option<Box<RawValue>>,
    #[serde(default)]
    b64info: Option<String>,
}

impl WireConnectReply {
    // Several fields may be populated; disconnect wins over error, error over result.
    fn into_result(self) -> ConnectResult {
        if let Some(d) = self.disconnect {
            return ConnectResult::Disconnect(d);
        }
        if let Some(e) = self.error {
            return ConnectResult::Error(e);
        }
        match self.result {
            None => ConnectResult::None,
            Some(c) => ConnectResult::Credentials(ProxyCredentials {
                user: c.user,
                expire_at: c.expire_at.filter(|ts| *ts > 0),
                info: ReplyInfo {
                    json: c.info.map(|raw| raw.get().as_bytes().to_vec()),
                    base64: c.b64info,
                },
            }),
        }
    }
}

/// Connect proxy over HTTP POST with a JSON body.
#[derive(Clone, Debug)]
pub struct HttpConnectProxy {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpConnectProxy {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProxyError::Transport(e.to_string()))?;

        Ok(Self::with_client(endpoint, client))
    }

    pub fn with_client(endpoint: Url, client: reqwest::Client) -> Self {
        Self { endpoint, client }
    }

    async fn send(
        &self,
        ctx: &ProxyContext,
        req: &ConnectRequest,
    ) -> Result<ConnectResult, ProxyError> {
        let body = WireConnectRequest::from_request(req);

        let mut builder = self.client.post(self.endpoint.clone()).json(&body);
        for (name, value) in &ctx.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let reply: WireConnectReply =
            serde_json::from_slice(&bytes).map_err(|e| ProxyError::Decode(e.to_string()))?;

        Ok(reply.into_result())
    }
}

#[async_trait]
impl ConnectProxy for HttpConnectProxy {
    fn protocol(&self) -> &'static str {
        "http"
    }

    async fn proxy_connect(
        &self,
        ctx: &ProxyContext,
        req: ConnectRequest,
    ) -> Result<ConnectResult, ProxyError> {
        tokio::select! {
            _ = ctx.cancel.cancelled() => Err(ProxyError::Cancelled),
            res = self.send(ctx, &req) => res,
        }
    }
}
