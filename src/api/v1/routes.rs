/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health (疎通用), /connect (connect proxy)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{connect::connect, health::health};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/connect", post(connect))
}
