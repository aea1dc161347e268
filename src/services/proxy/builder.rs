use crate::services::proxy::types::{ConnectEvent, ConnectRequest};

/// Build the backend request for a connection attempt.
///
/// Fields are taken verbatim from the event; client data is passed through
/// without re-encoding.
pub fn build_connect_request(event: &ConnectEvent) -> ConnectRequest {
    ConnectRequest {
        client_id: event.client_id.clone(),
        transport: event.transport.clone(),
        data: event.data.clone(),
    }
}
