//! Connection metadata resolution.
//!
//! JSON connections carry `info` inline; opaque encodings carry it as
//! standard base64 in `b64info`. Exactly one representation is read.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::services::proxy::error::MetadataError;
use crate::services::proxy::types::{Encoding, ReplyInfo};

/// Resolve the authoritative info bytes for a connection encoding.
///
/// - `Json`: `info.json` verbatim (missing => empty).
/// - otherwise: `info.base64` decoded (missing or empty => empty).
pub fn resolve_info(encoding: Encoding, info: &ReplyInfo) -> Result<Vec<u8>, MetadataError> {
    if encoding.is_json() {
        return Ok(info.json.clone().unwrap_or_default());
    }

    match info.base64.as_deref() {
        None | Some("") => Ok(Vec::new()),
        Some(encoded) => Ok(STANDARD.decode(encoded)?),
    }
}
