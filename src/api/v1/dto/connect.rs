/*
 * Responsibility
 * - POST /connect の request/response DTO
 * - host server の connect event (JSON) → ConnectEvent への変換
 * - ConnectReply → JSON reply (info は常に base64 で返す)
 */
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use uuid::Uuid;

use crate::services::proxy::{ClientError, ConnectEvent, ConnectReply, Disconnect, TransportInfo};

#[derive(Debug, Deserialize)]
pub struct TransportDto {
    pub name: String,
    pub protocol: String,
    pub encoding: String,
}

#[derive(Debug, Deserialize)]
pub struct ConnectEventRequest {
    // Generated when the host does not assign one.
    pub client: Option<String>,
    pub transport: TransportDto,
    pub token: Option<String>,
    // Inline JSON data (JSON connections).
    pub data: Option<Box<RawValue>>,
    // Base64 data; takes precedence over `data` when non-empty.
    pub b64data: Option<String>,
}

impl ConnectEventRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.transport.name.trim().is_empty() {
            return Err("transport.name is required");
        }
        if let Some(client) = &self.client
            && client.trim().is_empty()
        {
            return Err("client cannot be empty");
        }
        Ok(())
    }

    pub fn into_event(self) -> Result<ConnectEvent, &'static str> {
        self.validate()?;

        let data = match (self.b64data.as_deref(), self.data) {
            (Some(b64), _) if !b64.is_empty() => {
                STANDARD.decode(b64).map_err(|_| "b64data is not valid base64")?
            }
            (_, Some(raw)) => raw.get().as_bytes().to_vec(),
            _ => Vec::new(),
        };

        Ok(ConnectEvent {
            client_id: self
                .client
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            transport: TransportInfo::new(
                self.transport.name,
                self.transport.protocol,
                self.transport.encoding,
            ),
            token: self.token,
            data,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CredentialsResponse {
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b64info: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConnectReplyResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CredentialsResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ClientError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disconnect: Option<Disconnect>,
}

impl From<ConnectReply> for ConnectReplyResponse {
    fn from(reply: ConnectReply) -> Self {
        let mut res = Self {
            result: None,
            error: None,
            disconnect: None,
        };

        match reply {
            ConnectReply::Accept(None) => {}
            ConnectReply::Accept(Some(c)) => {
                res.result = Some(CredentialsResponse {
                    user: c.user_id,
                    expire_at: c.expire_at,
                    b64info: (!c.info.is_empty()).then(|| STANDARD.encode(&c.info)),
                });
            }
            ConnectReply::Reject(e) => res.error = Some(e),
            ConnectReply::Disconnect(d) => res.disconnect = Some(d),
        }

        res
    }
}
