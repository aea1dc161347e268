/*
 * Responsibility
 * - POST /connect: host server から connect event を受けて ConnectHandler に渡す
 * - allow-list された request header を proxy へ転送
 * - client が切断したら (future drop) in-flight の proxy 呼び出しを cancel
 */
use std::collections::BTreeMap;

use axum::{Json, extract::State, http::HeaderMap};
use tokio_util::sync::CancellationToken;

use crate::{
    api::v1::dto::connect::{ConnectEventRequest, ConnectReplyResponse},
    error::AppError,
    services::proxy::ProxyContext,
    state::AppState,
};

pub async fn connect(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ConnectEventRequest>,
) -> Result<Json<ConnectReplyResponse>, AppError> {
    let event = req
        .into_event()
        .map_err(|msg| AppError::bad_request("INVALID_CONNECT_EVENT", msg))?;

    let cancel = CancellationToken::new();
    // Fires when this future is dropped (client went away) or completes.
    let _cancel_on_drop = cancel.clone().drop_guard();

    let ctx = ProxyContext::new(cancel).with_headers(forwarded_headers(
        &headers,
        &state.forward_headers,
    ));

    let reply = state.connect.handle(&ctx, event).await;

    Ok(Json(reply.into()))
}

fn forwarded_headers(headers: &HeaderMap, allowed: &[String]) -> BTreeMap<String, String> {
    allowed
        .iter()
        .filter_map(|name| {
            let value = headers.get(name.as_str())?.to_str().ok()?;
            Some((name.clone(), value.to_string()))
        })
        .collect()
}
