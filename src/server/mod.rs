//! HTTP layer
//!
//! Maps query strings onto [`SearchParams`], runs the per-kind query and
//! wraps the outcome in a JSON envelope:
//!
//! - success: `200 {"success": true, "count": n, "data": [...]}`
//! - failure: `500 {"success": false, "error": "..."}`

use crate::aws::client::AwsClients;
use crate::aws::error::{format_aws_error, sanitize_for_log};
use crate::resource::registry::{get_registry, list_resources, BadgeDef, RegistryEntry};
use crate::resource::{ResourceKind, SearchParams};
use crate::ui;
use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tokio::net::TcpListener;
use tracing::Instrument;
use uuid::Uuid;

/// Successful query response
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Failed query response
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

/// Registry listing with the badge maps the columns refer to
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistryResponse {
    success: bool,
    count: usize,
    data: Vec<RegistryEntry<'static>>,
    badge_maps: &'static HashMap<String, Vec<BadgeDef>>,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ErrorEnvelope {
            success: false,
            error: message,
        }),
    )
        .into_response()
}

/// Build the application router
pub fn router(clients: AwsClients) -> Router {
    Router::new()
        .route("/", get(ui::index))
        .route("/healthz", get(healthz))
        .route("/api/resources", get(resource_definitions))
        .route("/api/{kind}", get(query_resources))
        .with_state(clients)
}

/// Bind and serve until the process is stopped
pub async fn serve(clients: AwsClients, bind: &str) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(clients))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn healthz() -> &'static str {
    "ok"
}

async fn resource_definitions() -> Json<RegistryResponse> {
    let data = list_resources();
    Json(RegistryResponse {
        success: true,
        count: data.len(),
        data,
        badge_maps: &get_registry().badge_maps,
    })
}

async fn query_resources(
    State(clients): State<AwsClients>,
    Path(kind): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let Some(kind) = ResourceKind::from_key(&kind) else {
        return error_response(
            StatusCode::NOT_FOUND,
            format!("Unknown resource kind: {}", sanitize_for_log(&kind)),
        );
    };

    let params = SearchParams::from_query(
        kind.params(),
        query.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    );

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("query", %request_id, kind = kind.key());

    async move {
        tracing::debug!("filters: {:?}", params);

        match kind.query(&clients, &params).await {
            Ok(data) => {
                tracing::info!("returned {} record(s)", data.len());
                Json(Envelope::<Value>::ok(data)).into_response()
            }
            Err(e) => {
                tracing::error!(
                    "{} query failed: {}",
                    kind.resource_type(),
                    sanitize_for_log(&format!("{:#}", e))
                );
                error_response(StatusCode::INTERNAL_SERVER_ERROR, format_aws_error(&e))
            }
        }
    }
    .instrument(span)
    .await
}
