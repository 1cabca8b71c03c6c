//! HTTP request handlers for the stub backend.
//!
//! Serves the content relationship REST contract using axum.

use crate::store::{ContentStore, NewSuggestion, StoreError};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router as AxumRouter,
};
use engagerr_domain::{
    Content, ContentFamily, ContentRelationship, ContentSuggestion, CreateRelationshipRequest,
    CreatorRef, CreatorScoped, RelationshipViolation, UpdateRelationshipRequest,
    VisualizationResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Threshold applied when a suggestions request names none
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Limit applied when a suggestions request names none
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Content, relationships and suggestions
    pub store: Arc<ContentStore>,
}

impl AppState {
    /// Wrap a store
    pub fn new(store: ContentStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Query string of the suggestions endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionQuery {
    /// Minimum confidence (inclusive)
    pub confidence_threshold: Option<f64>,
    /// Maximum number of results
    pub limit: Option<usize>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Number of registered content items
    pub content_count: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub struct AppError(StoreError);

impl AppError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            StoreError::ContentNotFound(_)
            | StoreError::RelationshipNotFound(_)
            | StoreError::SuggestionNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::AlreadyResolved { .. } | StoreError::ContentExists(_) => {
                StatusCode::CONFLICT
            }
            StoreError::Violation(RelationshipViolation::Duplicate { .. }) => StatusCode::CONFLICT,
            StoreError::Violation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StoreError::Forbidden(_) => StatusCode::FORBIDDEN,
            StoreError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        debug!("Request failed with {}: {}", status, self.0);

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError(e)
    }
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        content_count: state.store.content_count(),
    })
}

/// POST /api/content - Register a content item
async fn register_content(
    State(state): State<AppState>,
    Json(content): Json<Content>,
) -> Result<(StatusCode, Json<Content>), AppError> {
    let content = state.store.add_content(content)?;
    info!("Registered content {} ({})", content.id, content.platform);
    Ok((StatusCode::CREATED, Json(content)))
}

/// GET /api/content/:content_id/relationships
async fn list_relationships(
    State(state): State<AppState>,
    Path(content_id): Path<String>,
) -> Result<Json<Vec<ContentRelationship>>, AppError> {
    debug!("Listing relationships for {}", content_id);
    Ok(Json(state.store.relationships_for(&content_id)?))
}

/// GET /api/content/:root_id/family
async fn get_family(
    State(state): State<AppState>,
    Path(root_id): Path<String>,
) -> Result<Json<ContentFamily>, AppError> {
    debug!("Building family for {}", root_id);
    Ok(Json(state.store.family(&root_id)?))
}

/// GET /api/content/:family_id/visualization
async fn get_visualization(
    State(state): State<AppState>,
    Path(family_id): Path<String>,
) -> Result<Json<VisualizationResponse>, AppError> {
    let graph = state.store.visualization(&family_id)?;
    Ok(Json(VisualizationResponse { graph }))
}

/// GET /api/content/:content_id/suggestions
async fn list_suggestions(
    State(state): State<AppState>,
    Path(content_id): Path<String>,
    Query(query): Query<SuggestionQuery>,
) -> Result<Json<Vec<ContentSuggestion>>, AppError> {
    let threshold = query
        .confidence_threshold
        .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD);
    let limit = query.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT);
    debug!(
        "Listing suggestions for {} (threshold {}, limit {})",
        content_id, threshold, limit
    );

    Ok(Json(state.store.suggestions_for(&content_id, threshold, limit)?))
}

/// POST /api/content/suggestions - Register a pending suggestion
async fn register_suggestion(
    State(state): State<AppState>,
    Json(new): Json<NewSuggestion>,
) -> Result<(StatusCode, Json<ContentSuggestion>), AppError> {
    let suggestion = state.store.add_suggestion(new)?;
    info!(
        "Registered suggestion {} ({:.2})",
        suggestion.id, suggestion.confidence
    );
    Ok((StatusCode::CREATED, Json(suggestion)))
}

/// POST /api/content/relationships
async fn create_relationship(
    State(state): State<AppState>,
    Json(request): Json<CreatorScoped<CreateRelationshipRequest>>,
) -> Result<(StatusCode, Json<ContentRelationship>), AppError> {
    let relationship = state
        .store
        .create_relationship(&request.creator_id, request.body)?;
    info!(
        "Created {} relationship {} -> {}",
        relationship.relationship_type,
        relationship.source_content_id,
        relationship.target_content_id
    );
    Ok((StatusCode::CREATED, Json(relationship)))
}

/// PUT /api/content/relationships/:id
async fn update_relationship(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CreatorScoped<UpdateRelationshipRequest>>,
) -> Result<Json<ContentRelationship>, AppError> {
    let relationship = state
        .store
        .update_relationship(&request.creator_id, &id, request.body)?;
    info!("Updated relationship {}", id);
    Ok(Json(relationship))
}

/// DELETE /api/content/relationships/:id
async fn delete_relationship(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CreatorRef>,
) -> Result<StatusCode, AppError> {
    state.store.delete_relationship(&request.creator_id, &id)?;
    info!("Deleted relationship {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/content/suggestions/:id/approve
async fn approve_suggestion(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CreatorRef>,
) -> Result<Json<ContentRelationship>, AppError> {
    let relationship = state.store.approve_suggestion(&request.creator_id, &id)?;
    info!("Approved suggestion {} as relationship {}", id, relationship.id);
    Ok(Json(relationship))
}

/// POST /api/content/suggestions/:id/reject
async fn reject_suggestion(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CreatorRef>,
) -> Result<StatusCode, AppError> {
    state.store.reject_suggestion(&request.creator_id, &id)?;
    info!("Rejected suggestion {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/api/content", post(register_content))
        .route("/api/content/relationships", post(create_relationship))
        .route(
            "/api/content/relationships/:id",
            put(update_relationship).delete(delete_relationship),
        )
        .route("/api/content/suggestions", post(register_suggestion))
        .route("/api/content/suggestions/:id/approve", post(approve_suggestion))
        .route("/api/content/suggestions/:id/reject", post(reject_suggestion))
        .route("/api/content/:content_id/relationships", get(list_relationships))
        .route("/api/content/:content_id/family", get(get_family))
        .route("/api/content/:content_id/visualization", get(get_visualization))
        .route("/api/content/:content_id/suggestions", get(list_suggestions))
        .with_state(state)
}
