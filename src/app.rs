/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (HttpConnectProxy, ConnectHandler) → Router 組み立て
 * - axum::serve() で起動 (Ctrl-C で graceful shutdown)
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::middleware::http::{self as http_mw, HttpLimits};
use crate::services::proxy::{ConnectHandler, HttpConnectProxy};
use crate::{api, state::AppState};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,connect_proxy=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        endpoint = %config.proxy_connect_endpoint,
        timeout_ms = config.proxy_connect_timeout.as_millis() as u64,
        "starting connect proxy in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState> {
    let proxy = HttpConnectProxy::new(
        config.proxy_connect_endpoint.clone(),
        config.proxy_connect_timeout,
    )?;

    let handler = ConnectHandler::new(Arc::new(proxy)).with_timeout(config.proxy_connect_timeout);

    Ok(AppState::new(
        Arc::new(handler),
        config.proxy_http_headers.clone(),
    ))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    http_mw::apply(
        router,
        HttpLimits {
            body_limit_bytes: config.http_body_limit_bytes,
            request_timeout: config.http_request_timeout,
        },
    )
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
