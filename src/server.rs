//! HTTP API for discovery, metric queries and health checks

use crate::metric::{self, QueryBatch, QueryResponse};
use crate::resource::{self, RawParameters};
use crate::ucloud::auth::{Credentials, HealthReport};
use crate::ucloud::Provider;
use axum::{
    extract::{Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{info, Instrument};
use uuid::Uuid;

/// Shared application state
pub struct AppState {
    pub provider: Arc<dyn Provider>,
    pub credentials: Credentials,
}

impl AppState {
    pub fn new(provider: Arc<dyn Provider>, credentials: Credentials) -> Self {
        Self {
            provider,
            credentials,
        }
    }
}

/// Keep the first value of every query key
fn first_values(pairs: Vec<(String, String)>) -> RawParameters {
    let mut raw = RawParameters::with_capacity(pairs.len());
    for (key, value) in pairs {
        raw.entry(key).or_insert(value);
    }
    raw
}

/// Discovery endpoint - 200 with a JSON array, 500 with a plain-text message
async fn generic_api(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let raw = first_values(pairs);

    match resource::route(state.provider.as_ref(), &raw).await {
        Ok(values) => (StatusCode::OK, Json(values)).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            err.to_string(),
        )
            .into_response(),
    }
}

/// Metric batch endpoint. Per-query failures are reported inside the body.
async fn query(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<QueryBatch>,
) -> Json<QueryResponse> {
    let results = metric::execute(Arc::clone(&state.provider), batch.queries).await;
    Json(QueryResponse { results })
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    Json(state.credentials.check())
}

/// Attach a fresh request id to everything logged while handling a request
async fn request_span(req: Request, next: Next) -> Response {
    let span = tracing::info_span!(
        "request",
        id = %Uuid::new_v4(),
        method = %req.method(),
        path = %req.uri().path(),
    );
    async move {
        let response = next.run(req).await;
        tracing::debug!(status = %response.status(), "request finished");
        response
    }
    .instrument(span)
    .await
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/generic_api", get(generic_api))
        .route("/query", post(query))
        .route("/health", get(health))
        .layer(middleware::from_fn(request_span))
        .with_state(state)
}

/// Start the API server and run until Ctrl-C
pub async fn serve(listen: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(addr = %listen, "Starting API server");

    let listener = tokio::net::TcpListener::bind(listen).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
