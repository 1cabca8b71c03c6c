//! Integration tests for the stub backend HTTP contract

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use engagerr_domain::{
    Content, ContentFamily, ContentRelationship, ContentSuggestion, ContentType, PlatformType,
    RelationshipType, VisualizationResponse,
};
use engagerr_stub::{
    handlers::{create_router, AppState, ErrorResponse, HealthCheckResponse},
    store::{ContentStore, Seed},
};
use serde::de::DeserializeOwned;
use tower::ServiceExt; // for oneshot

/// Helper to create test application state
fn create_test_app() -> Router {
    let mut podcast = Content::new("c1", "Episode 42", PlatformType::Podcast, ContentType::PodcastEpisode, "u1");
    podcast.views = 5000;
    let mut clip = Content::new("c2", "Best moment", PlatformType::YouTube, ContentType::Short, "u1");
    clip.views = 1200;
    let story = Content::new("c3", "Teaser", PlatformType::Instagram, ContentType::Story, "u1");
    let foreign = Content::new("x1", "Other creator", PlatformType::TikTok, ContentType::Video, "u2");

    let seed = Seed {
        contents: vec![podcast, clip, story, foreign],
        relationships: vec![],
        suggestions: vec![],
    };

    create_router(AppState::new(ContentStore::from_seed(seed)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

async fn create(app: &Router, source: &str, target: &str, kind: &str) -> (StatusCode, Vec<u8>) {
    let body = format!(
        r#"{{"sourceContentId":"{}","targetContentId":"{}","relationshipType":"{}","creatorId":"u1"}}"#,
        source, target, kind
    );
    send(app, "POST", "/api/content/relationships", Some(&body)).await
}

async fn suggest(app: &Router, source: &str, target: &str, confidence: f64) -> ContentSuggestion {
    let body = format!(
        r#"{{"sourceContentId":"{}","targetContentId":"{}","relationshipType":"REPURPOSED","confidence":{}}}"#,
        source, target, confidence
    );
    let (status, bytes) = send(app, "POST", "/api/content/suggestions", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    parse(&bytes)
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_app();

    let (status, bytes) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let health: HealthCheckResponse = parse(&bytes);
    assert_eq!(health.status, "healthy");
    assert_eq!(health.content_count, 4);
}

#[tokio::test]
async fn test_create_then_list_relationships() {
    let app = create_test_app();

    let (status, bytes) = create(&app, "c2", "c1", "DERIVATIVE").await;
    assert_eq!(status, StatusCode::CREATED);
    let created: ContentRelationship = parse(&bytes);
    assert_eq!(created.relationship_type, RelationshipType::Derivative);

    let (status, bytes) = send(&app, "GET", "/api/content/c2/relationships", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<ContentRelationship> = parse(&bytes);
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn test_duplicate_relationship_conflicts() {
    let app = create_test_app();

    create(&app, "c2", "c1", "DERIVATIVE").await;
    let (status, bytes) = create(&app, "c2", "c1", "DERIVATIVE").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let error: ErrorResponse = parse(&bytes);
    assert!(error.error.contains("already exists"));
}

#[tokio::test]
async fn test_cross_creator_relationship_rejected() {
    let app = create_test_app();

    let (status, _) = create(&app, "c1", "x1", "REFERENCE").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_second_parent_rejected() {
    let app = create_test_app();

    let (status, _) = create(&app, "c1", "c2", "PARENT").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = create(&app, "c3", "c2", "PARENT").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_family_includes_descendants() {
    let app = create_test_app();

    create(&app, "c2", "c1", "DERIVATIVE").await;
    create(&app, "c3", "c2", "REPURPOSED").await;

    let (status, bytes) = send(&app, "GET", "/api/content/c1/family", None).await;
    assert_eq!(status, StatusCode::OK);

    let family: ContentFamily = parse(&bytes);
    assert_eq!(family.root_content_id, "c1");
    assert_eq!(family.nodes.len(), 3);
    assert_eq!(family.edge_count(), 2);
    assert_eq!(family.metrics.total_views, 6200);
}

#[tokio::test]
async fn test_visualization_envelope() {
    let app = create_test_app();
    create(&app, "c2", "c1", "DERIVATIVE").await;

    let (status, bytes) = send(&app, "GET", "/api/content/c1/visualization", None).await;
    assert_eq!(status, StatusCode::OK);

    let response: VisualizationResponse = parse(&bytes);
    assert_eq!(response.graph.nodes.len(), 2);
    assert_eq!(response.graph.edges.len(), 1);
    assert!(response.graph.nodes.iter().any(|n| n.is_root && n.id == "c1"));
}

#[tokio::test]
async fn test_suggestions_filtered_by_threshold() {
    let app = create_test_app();
    suggest(&app, "c2", "c1", 0.4).await;
    let strong = suggest(&app, "c3", "c1", 0.7).await;

    let (status, bytes) = send(
        &app,
        "GET",
        "/api/content/c1/suggestions?confidenceThreshold=0.5&limit=10",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let found: Vec<ContentSuggestion> = parse(&bytes);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, strong.id);
}

#[tokio::test]
async fn test_approve_twice_conflicts() {
    let app = create_test_app();
    let s = suggest(&app, "c2", "c1", 0.9).await;
    let uri = format!("/api/content/suggestions/{}/approve", s.id);

    let (status, _) = send(&app, "POST", &uri, Some(r#"{"creatorId":"u1"}"#)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", &uri, Some(r#"{"creatorId":"u1"}"#)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reject_returns_no_content() {
    let app = create_test_app();
    let s = suggest(&app, "c2", "c1", 0.9).await;

    let uri = format!("/api/content/suggestions/{}/reject", s.id);
    let (status, bytes) = send(&app, "POST", &uri, Some(r#"{"creatorId":"u1"}"#)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(bytes.is_empty());

    let (_, bytes) = send(&app, "GET", "/api/content/c1/relationships", None).await;
    let listed: Vec<ContentRelationship> = parse(&bytes);
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_update_and_delete_relationship() {
    let app = create_test_app();
    let (_, bytes) = create(&app, "c2", "c1", "DERIVATIVE").await;
    let created: ContentRelationship = parse(&bytes);
    let uri = format!("/api/content/relationships/{}", created.id);

    let (status, bytes) = send(
        &app,
        "PUT",
        &uri,
        Some(r#"{"relationshipType":"REACTION","creatorId":"u1"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated: ContentRelationship = parse(&bytes);
    assert_eq!(updated.relationship_type, RelationshipType::Reaction);
    assert_eq!(updated.source_content_id, "c2");

    let (status, _) = send(&app, "DELETE", &uri, Some(r#"{"creatorId":"u1"}"#)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &uri, Some(r#"{"creatorId":"u1"}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_content_conflict() {
    let app = create_test_app();
    let body = r#"{"id":"c1","title":"Again","platform":"BLOG","contentType":"ARTICLE","creatorId":"u1"}"#;

    let (status, _) = send(&app, "POST", "/api/content", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}
