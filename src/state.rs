/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - connect: ConnectHandler, forward_headers: 転送対象 header
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::proxy::ConnectHandler;

#[derive(Clone, Debug)]
pub struct AppState {
    pub connect: Arc<ConnectHandler>,
    pub forward_headers: Arc<[String]>,
}

impl AppState {
    pub fn new(connect: Arc<ConnectHandler>, forward_headers: Vec<String>) -> Self {
        Self {
            connect,
            forward_headers: forward_headers.into(),
        }
    }
}
