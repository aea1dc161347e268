//! Connect handler: the per-attempt orchestration of the proxy pipeline.
//!
//! token present -> anonymous accept, proxy bypassed
//! no token      -> build request -> proxy round trip -> interpret
//!
//! One round trip per attempt, no retries. Transport failures, cancellation,
//! expired deadlines and undecodable metadata are logged here and collapse
//! into the opaque internal error.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use tracing::{debug, error};

use crate::services::proxy::builder::build_connect_request;
use crate::services::proxy::error::ProxyError;
use crate::services::proxy::interpreter::{ConnectFailure, interpret};
use crate::services::proxy::transport::{ConnectProxy, ProxyContext};
use crate::services::proxy::types::{ConnectEvent, ConnectReply, ConnectRequest, ConnectResult};

pub type ConnectFuture = Pin<Box<dyn Future<Output = ConnectReply> + Send>>;

/// Function-shaped connect capability handed to the host server.
pub type ConnectCallback = Arc<dyn Fn(ProxyContext, ConnectEvent) -> ConnectFuture + Send + Sync>;

#[derive(Clone)]
pub struct ConnectHandler {
    proxy: Arc<dyn ConnectProxy>,
    // Upper bound for a single proxy round trip, on top of the transport's own.
    timeout: Option<Duration>,
}

impl std::fmt::Debug for ConnectHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectHandler")
            .field("proxy", &self.proxy.protocol())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ConnectHandler {
    pub fn new(proxy: Arc<dyn ConnectProxy>) -> Self {
        Self {
            proxy,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn handle(&self, ctx: &ProxyContext, event: ConnectEvent) -> ConnectReply {
        if event.has_token() {
            // Identity comes from the token; the backend is not consulted.
            return ConnectReply::anonymous();
        }

        let req = build_connect_request(&event);
        let outcome = self.round_trip(ctx, req).await;

        match interpret(event.transport.encoding_kind(), outcome) {
            Ok(reply) => {
                match &reply {
                    ConnectReply::Disconnect(d) => {
                        debug!(client = %event.client_id, code = d.code, reason = %d.reason, "connect proxy disconnect");
                    }
                    ConnectReply::Reject(e) => {
                        debug!(client = %event.client_id, code = e.code, message = %e.message, "connect proxy rejected");
                    }
                    ConnectReply::Accept(_) => {}
                }
                reply
            }
            Err(ConnectFailure::Proxy(err)) => {
                error!(client = %event.client_id, error = %err, "error proxying connect");
                ConnectReply::internal_error()
            }
            Err(ConnectFailure::Metadata(err)) => {
                error!(client = %event.client_id, error = %err, "error decoding base64 info");
                ConnectReply::internal_error()
            }
        }
    }

    /// Wrap this handler into the host-facing callback.
    pub fn callback(self: Arc<Self>) -> ConnectCallback {
        Arc::new(move |ctx: ProxyContext, event: ConnectEvent| -> ConnectFuture {
            let handler = self.clone();
            Box::pin(async move { handler.handle(&ctx, event).await })
        })
    }

    // Cancellation and the deadline both resolve as transport failures so no
    // partial accept can come out of an aborted call.
    async fn round_trip(
        &self,
        ctx: &ProxyContext,
        req: ConnectRequest,
    ) -> Result<ConnectResult, ProxyError> {
        let call = async {
            match self.timeout {
                Some(limit) => {
                    match tokio::time::timeout(limit, self.proxy.proxy_connect(ctx, req)).await {
                        Ok(res) => res,
                        Err(_) => Err(ProxyError::Timeout),
                    }
                }
                None => self.proxy.proxy_connect(ctx, req).await,
            }
        };

        tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => Err(ProxyError::Cancelled),
            res = call => res,
        }
    }
}
