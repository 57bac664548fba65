use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::signal;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::consts::LOOKUP_ROUTE;
use crate::error::{ErrorResponse, ProxyError};
use crate::upstream::UpstreamDictionary;

#[derive(Clone)]
pub struct ProxyState {
    pub upstream: Arc<UpstreamDictionary>,
}

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    word: Option<String>,
}

pub fn create_router(upstream: UpstreamDictionary) -> Router {
    let state = ProxyState {
        upstream: Arc::new(upstream),
    };

    Router::new()
        .route("/health", get(health_check))
        .route(
            LOOKUP_ROUTE,
            get(lookup_word)
                .head(method_not_allowed)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
}

/// GET /health - Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "word_lens",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// GET /api/dictionary?word=<word> - Relay the upstream entry array
async fn lookup_word(
    State(state): State<ProxyState>,
    Query(params): Query<LookupParams>,
) -> Result<Response, ProxyError> {
    let word = params
        .word
        .as_deref()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .ok_or(ProxyError::MissingWord)?;

    let body = state.upstream.fetch(word).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

/// OPTIONS /api/dictionary - CORS preflight acknowledgment
async fn preflight() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "CORS preflight" }))
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "Method Not Allowed".to_string(),
        }),
    )
}

pub async fn serve(upstream: UpstreamDictionary, port: u16) -> anyhow::Result<()> {
    info!(upstream = upstream.base_url(), "Proxying dictionary lookups");
    let app = create_router(upstream);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
