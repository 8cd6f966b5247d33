//! HTTP surface
//!
//! A thin axum router exposing the capture pipeline and the metadata
//! previewer. The artifact comes back with its exact media type and an
//! inline content-disposition carrying the fixed per-kind file name.

use crate::capture::{perform_capture, CaptureRequest};
use crate::error::Error;
use crate::preview::{MetadataPreviewer, PagePreview};
use crate::session::SessionConfig;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing::{info, instrument};

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    /// Session configuration applied to every capture
    pub config: SessionConfig,
}

/// Build the application router
pub fn router(config: SessionConfig) -> Router {
    Router::new()
        .route("/api/capture", get(capture_handler))
        .route("/api/preview", get(preview_handler))
        .layer(CorsLayer::permissive())
        .with_state(AppState { config })
}

/// Bind and serve until shutdown
#[instrument(skip(config))]
pub async fn serve(addr: SocketAddr, config: SessionConfig) -> crate::error::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);
    axum::serve(listener, router(config)).await?;
    Ok(())
}

/// `GET /api/capture?url=<address>&type=<html|screenshot|pdf>`
async fn capture_handler(
    State(state): State<AppState>,
    Query(request): Query<CaptureRequest>,
) -> Response {
    match perform_capture(&request, &state.config).await {
        Ok(artifact) => (
            [
                (header::CONTENT_TYPE, artifact.media_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{}\"", artifact.file_name),
                ),
            ],
            artifact.payload,
        )
            .into_response(),
        Err(e @ Error::InvalidUrl(_)) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        Err(e) => (StatusCode::BAD_GATEWAY, e.to_string()).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct PreviewQuery {
    url: String,
}

/// `GET /api/preview?url=<address>` — always 200, possibly empty
async fn preview_handler(Query(query): Query<PreviewQuery>) -> Json<PagePreview> {
    Json(MetadataPreviewer::preview(&query.url).await)
}
