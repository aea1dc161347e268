//! Reply interpretation: backend outcome -> exactly one server action.
//!
//! Precedence (first match wins):
//! 1. transport failure   -> `Err(ConnectFailure::Proxy)` (fail-closed)
//! 2. disconnect          -> `ConnectReply::Disconnect`, verbatim
//! 3. error               -> `ConnectReply::Reject`, verbatim
//! 4. no credentials      -> anonymous accept
//! 5. credentials         -> metadata resolution, then accept with credentials
//!
//! `ConnectResult` already holds a single arm; the HTTP transport applies the
//! same order when folding a wire reply that populates several fields.

use thiserror::Error;

use crate::services::proxy::error::{MetadataError, ProxyError};
use crate::services::proxy::metadata::resolve_info;
use crate::services::proxy::types::{ConnectReply, ConnectResult, Credentials, Encoding};

/// Failures that collapse into the opaque internal error at the client boundary.
#[derive(Debug, Error)]
pub enum ConnectFailure {
    #[error(transparent)]
    Proxy(#[from] ProxyError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

pub fn interpret(
    encoding: Encoding,
    outcome: Result<ConnectResult, ProxyError>,
) -> Result<ConnectReply, ConnectFailure> {
    let reply = match outcome? {
        ConnectResult::Disconnect(d) => ConnectReply::Disconnect(d),
        ConnectResult::Error(e) => ConnectReply::Reject(e),
        ConnectResult::None => ConnectReply::anonymous(),
        ConnectResult::Credentials(c) => {
            let info = resolve_info(encoding, &c.info)?;
            ConnectReply::Accept(Some(Credentials {
                user_id: c.user,
                expire_at: c.expire_at,
                info,
            }))
        }
    };

    Ok(reply)
}
