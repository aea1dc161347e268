//! Proxy transport interface used by the connect handler.
use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::services::proxy::error::ProxyError;
use crate::services::proxy::types::{ConnectRequest, ConnectResult};

/// Per-attempt context passed along with a proxy request.
///
/// `cancel` is tied to the client connection: it fires when the client goes
/// away or the server shuts down, and in-flight proxy calls must abort.
#[derive(Debug, Clone, Default)]
pub struct ProxyContext {
    pub cancel: CancellationToken,
    // Client request headers eligible for forwarding (lower-case names).
    pub headers: BTreeMap<String, String>,
}

impl ProxyContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            headers: BTreeMap::new(),
        }
    }

    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }
}

/// Request/reply exchange with the authentication backend.
///
/// Returns:
/// - `Ok(result)`: the backend's verdict
/// - `Err(_)`: transport/protocol failure (caller treats it as fail-closed)
///
/// Implementations must be cheap to share (typically `Arc<...>` inside).
#[async_trait]
pub trait ConnectProxy: Send + Sync + 'static {
    // Transport name (for logging).
    fn protocol(&self) -> &'static str;

    async fn proxy_connect(
        &self,
        ctx: &ProxyContext,
        req: ConnectRequest,
    ) -> Result<ConnectResult, ProxyError>;
}
