//! HTTP request handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::plan::StreamOptimization;
use crate::state::AppState;

/// HTTP error type
#[derive(Debug)]
pub enum HttpError {
    TooManySubscriptions { count: usize, limit: usize },
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            HttpError::TooManySubscriptions { count, limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("Too many subscriptions: {} (limit {})", count, limit),
            ),
        };

        (status, body).into_response()
    }
}

/// Body of a plan request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub subscriptions: Vec<String>,
}

/// Catalog overview
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogInfo {
    pub languages: Vec<String>,
    pub translation_targets: Vec<String>,
    pub universal_targets: Vec<String>,
    pub multi_source_targets: BTreeMap<String, Vec<String>>,
    pub two_way_pairs: Vec<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Version endpoint
pub async fn version_check() -> &'static str {
    concat!("stream-planner v", env!("CARGO_PKG_VERSION"))
}

/// Catalog overview
/// GET /v1/catalog
pub async fn catalog_info(State(state): State<Arc<AppState>>) -> Json<CatalogInfo> {
    let catalog = &state.catalog;
    Json(CatalogInfo {
        languages: catalog.supported_languages().iter().cloned().collect(),
        translation_targets: catalog
            .translation_targets()
            .map(str::to_string)
            .collect(),
        universal_targets: catalog
            .universal_targets()
            .map(|t| t.target.clone())
            .collect(),
        multi_source_targets: catalog
            .multi_source_targets()
            .into_iter()
            .map(|(target, sources)| (target.to_string(), sources.iter().cloned().collect()))
            .collect(),
        two_way_pairs: catalog.two_way_pairs().iter().map(|p| p.to_string()).collect(),
    })
}

/// Stream plan for a subscription set
/// POST /v1/plan
pub async fn plan_subscriptions(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<StreamOptimization>, HttpError> {
    let limit = state.config.limits.max_subscriptions;
    if request.subscriptions.len() > limit {
        tracing::warn!(
            "Rejecting plan request with {} subscriptions",
            request.subscriptions.len()
        );
        return Err(HttpError::TooManySubscriptions {
            count: request.subscriptions.len(),
            limit,
        });
    }

    Ok(Json(state.plan(&request.subscriptions)))
}
