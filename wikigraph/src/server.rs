//! HTTP surface: search passthrough, one-hop exploration and snapshot CRUD.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use wikigraph_core::data::{SnapshotStore, StoreError};
use wikigraph_core::{
    Exploration, ExplorationGraph, ExploreError, Explorer, NewExploration, SUPPORTED_DEPTH,
};
use wikigraph_fetch::FetchError;

#[derive(Clone)]
pub struct AppState {
    pub explorer: Arc<Explorer>,
    pub store: Arc<dyn SnapshotStore>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Explore(#[from] ExploreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        ApiError::Explore(ExploreError::Fetch(err))
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Explore(ExploreError::Fetch(FetchError::ServiceUnavailable(_))) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Explore(ExploreError::Fetch(FetchError::NotFound(_))) => StatusCode::NOT_FOUND,
            ApiError::Explore(ExploreError::UnsupportedDepth { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Explore(ExploreError::Fetch(FetchError::InvalidUrl(_)))
            | ApiError::Store(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub term: String,
}

#[derive(Debug, Deserialize)]
pub struct ExploreParams {
    pub depth: Option<u32>,
}

pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid origin {:?}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/api/search", get(search))
        .route("/api/explore/*title", get(explore))
        .route(
            "/api/explorations",
            get(list_explorations).post(create_exploration),
        )
        .route("/api/explorations/:id", delete(delete_exploration))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, bind: SocketAddr, allowed_origins: &[String]) -> anyhow::Result<()> {
    let app = create_router(state, allowed_origins);
    let listener = TcpListener::bind(bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn root() -> Json<Value> {
    Json(json!({ "Hello": "World" }))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Value>> {
    let results = state.explorer.client().search_articles(&params.term).await?;
    Ok(Json(results))
}

async fn explore(
    State(state): State<AppState>,
    Path(title): Path<String>,
    Query(params): Query<ExploreParams>,
) -> ApiResult<Json<ExplorationGraph>> {
    let depth = params.depth.unwrap_or(SUPPORTED_DEPTH);
    let graph = state.explorer.explore(&title, depth).await?;
    Ok(Json(graph))
}

async fn create_exploration(
    State(state): State<AppState>,
    Json(body): Json<NewExploration>,
) -> ApiResult<(StatusCode, Json<Exploration>)> {
    let saved = with_store(state.store, move |store| store.save(&body)).await?;
    info!("Saved exploration {} ({:?})", saved.id, saved.name);
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn list_explorations(State(state): State<AppState>) -> ApiResult<Json<Vec<Exploration>>> {
    let explorations = with_store(state.store, |store| store.list()).await?;
    Ok(Json(explorations))
}

async fn delete_exploration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let lookup = id.clone();
    let deleted = with_store(state.store, move |store| store.delete(&lookup)).await?;
    if !deleted {
        return Err(StoreError::RecordNotFound(id).into());
    }
    info!("Deleted exploration {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Run a blocking store call off the async workers.
async fn with_store<T, F>(store: Arc<dyn SnapshotStore>, f: F) -> ApiResult<T>
where
    F: FnOnce(&dyn SnapshotStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || f(store.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(format!("store task failed: {}", e)))?;
    Ok(result?)
}
