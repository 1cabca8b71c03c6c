//! In-memory content store.
//!
//! Holds content items, relationships and suggestions for every creator and
//! enforces the relationship invariants the real backend enforces.

use chrono::Utc;
use engagerr_domain::suggestion::is_valid_confidence;
use engagerr_domain::{
    Content, ContentFamily, ContentRelationship, ContentSuggestion, CreateRelationshipRequest,
    CreationMethod, FamilyMetrics, GraphData, GraphEdge, GraphNode, RelationshipGraph,
    RelationshipType, RelationshipViolation, SuggestionStatus, UpdateRelationshipRequest,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Store error
#[derive(Debug, Error)]
pub enum StoreError {
    /// Content item does not exist
    #[error("Content not found: {0}")]
    ContentNotFound(String),

    /// Relationship does not exist
    #[error("Relationship not found: {0}")]
    RelationshipNotFound(String),

    /// Suggestion does not exist
    #[error("Suggestion not found: {0}")]
    SuggestionNotFound(String),

    /// Suggestion was already approved or rejected
    #[error("Suggestion {id} has already been {status}")]
    AlreadyResolved {
        /// Suggestion ID
        id: String,
        /// Terminal status
        status: SuggestionStatus,
    },

    /// Acting creator does not own the resource
    #[error("Creator {0} does not own this resource")]
    Forbidden(String),

    /// A content item with this ID already exists
    #[error("Content already exists: {0}")]
    ContentExists(String),

    /// Request breaks a relationship invariant
    #[error(transparent)]
    Violation(#[from] RelationshipViolation),

    /// Request is malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Data to preload into the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    /// Content items
    #[serde(default)]
    pub contents: Vec<Content>,
    /// Relationships
    #[serde(default)]
    pub relationships: Vec<ContentRelationship>,
    /// Suggestions
    #[serde(default)]
    pub suggestions: Vec<ContentSuggestion>,
}

impl Seed {
    /// Load a seed from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

/// Payload for registering a suggestion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSuggestion {
    /// Proposed source content ID
    pub source_content_id: String,
    /// Proposed target content ID
    pub target_content_id: String,
    /// Proposed relationship type
    pub relationship_type: RelationshipType,
    /// Confidence score [0.0, 1.0]
    pub confidence: f64,
    /// Why the model proposed this edge
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Default)]
struct StoreState {
    contents: HashMap<String, Content>,
    relationships: Vec<ContentRelationship>,
    suggestions: Vec<ContentSuggestion>,
}

/// Thread-safe in-memory store
#[derive(Debug, Default)]
pub struct ContentStore {
    state: RwLock<StoreState>,
}

fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

impl ContentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with seed data
    pub fn from_seed(seed: Seed) -> Self {
        let state = StoreState {
            contents: seed
                .contents
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
            relationships: seed.relationships,
            suggestions: seed.suggestions,
        };
        Self {
            state: RwLock::new(state),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a content item
    pub fn add_content(&self, content: Content) -> Result<Content, StoreError> {
        if content.id.trim().is_empty() {
            return Err(StoreError::InvalidRequest("content id is required".to_string()));
        }
        let mut state = self.write();
        if state.contents.contains_key(&content.id) {
            return Err(StoreError::ContentExists(content.id));
        }
        state.contents.insert(content.id.clone(), content.clone());
        Ok(content)
    }

    /// Number of content items
    pub fn content_count(&self) -> usize {
        self.read().contents.len()
    }

    /// Every relationship touching a content item
    pub fn relationships_for(&self, content_id: &str) -> Result<Vec<ContentRelationship>, StoreError> {
        let state = self.read();
        if !state.contents.contains_key(content_id) {
            return Err(StoreError::ContentNotFound(content_id.to_string()));
        }
        Ok(state
            .relationships
            .iter()
            .filter(|r| r.involves(content_id))
            .cloned()
            .collect())
    }

    /// The family rooted at a content item
    pub fn family(&self, root_id: &str) -> Result<ContentFamily, StoreError> {
        let state = self.read();
        build_family(&state, root_id)
    }

    /// Raw visualization graph for a family
    pub fn visualization(&self, family_id: &str) -> Result<GraphData, StoreError> {
        let state = self.read();
        let family = build_family(&state, family_id)?;

        let nodes = family
            .nodes
            .iter()
            .map(|c| GraphNode {
                id: c.id.clone(),
                label: c.title.clone(),
                platform: c.platform,
                content_type: Some(c.content_type),
                size: None,
                is_root: c.id == family.root_content_id,
                extra: Default::default(),
            })
            .collect();

        let edges = family
            .relationships
            .iter()
            .map(|r| GraphEdge {
                id: r.id.clone(),
                source: r.source_content_id.clone(),
                target: r.target_content_id.clone(),
                relationship_type: Some(r.relationship_type),
                // Manual edges are certain
                confidence: Some(r.confidence.unwrap_or(1.0)),
                weight: None,
                extra: Default::default(),
            })
            .collect();

        Ok(GraphData { nodes, edges })
    }

    /// Pending suggestions touching a content item, best first
    pub fn suggestions_for(
        &self,
        content_id: &str,
        threshold: f64,
        limit: usize,
    ) -> Result<Vec<ContentSuggestion>, StoreError> {
        let state = self.read();
        if !state.contents.contains_key(content_id) {
            return Err(StoreError::ContentNotFound(content_id.to_string()));
        }

        let mut pending: Vec<ContentSuggestion> = state
            .suggestions
            .iter()
            .filter(|s| s.is_pending())
            .filter(|s| s.source_content_id == content_id || s.target_content_id == content_id)
            .filter(|s| s.meets_threshold(threshold))
            .cloned()
            .collect();

        pending.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        pending.truncate(limit);
        Ok(pending)
    }

    /// Register a pending suggestion
    pub fn add_suggestion(&self, new: NewSuggestion) -> Result<ContentSuggestion, StoreError> {
        if !is_valid_confidence(new.confidence) {
            return Err(StoreError::InvalidRequest(format!(
                "confidence {} is outside [0, 1]",
                new.confidence
            )));
        }

        let mut state = self.write();
        for id in [&new.source_content_id, &new.target_content_id] {
            if !state.contents.contains_key(id) {
                return Err(StoreError::ContentNotFound(id.clone()));
            }
        }

        let suggestion = ContentSuggestion {
            id: new_id(),
            source_content_id: new.source_content_id,
            target_content_id: new.target_content_id,
            relationship_type: new.relationship_type,
            confidence: new.confidence,
            status: SuggestionStatus::Pending,
            reason: new.reason,
        };
        state.suggestions.push(suggestion.clone());
        Ok(suggestion)
    }

    /// Create a manual relationship
    pub fn create_relationship(
        &self,
        creator_id: &str,
        request: CreateRelationshipRequest,
    ) -> Result<ContentRelationship, StoreError> {
        let mut state = self.write();
        check_ownership(&state, creator_id, &request.source_content_id, &request.target_content_id)?;
        RelationshipGraph::new(&state.relationships).check_insert(&request)?;

        let relationship = ContentRelationship {
            id: new_id(),
            source_content_id: request.source_content_id,
            target_content_id: request.target_content_id,
            relationship_type: request.relationship_type,
            creation_method: CreationMethod::Manual,
            creator_id: creator_id.to_string(),
            confidence: None,
            created_at: Some(Utc::now()),
        };
        state.relationships.push(relationship.clone());
        Ok(relationship)
    }

    /// Apply a partial update to a relationship
    pub fn update_relationship(
        &self,
        creator_id: &str,
        id: &str,
        patch: UpdateRelationshipRequest,
    ) -> Result<ContentRelationship, StoreError> {
        let mut state = self.write();
        let index = state
            .relationships
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::RelationshipNotFound(id.to_string()))?;

        if state.relationships[index].creator_id != creator_id {
            return Err(StoreError::Forbidden(creator_id.to_string()));
        }

        let mut edited = state.relationships[index].clone();
        patch.apply_to(&mut edited);
        check_ownership(&state, creator_id, &edited.source_content_id, &edited.target_content_id)?;
        RelationshipGraph::new(&state.relationships).check_replace(id, &edited)?;

        state.relationships[index] = edited.clone();
        Ok(edited)
    }

    /// Delete a relationship; content items are untouched
    pub fn delete_relationship(&self, creator_id: &str, id: &str) -> Result<(), StoreError> {
        let mut state = self.write();
        let index = state
            .relationships
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::RelationshipNotFound(id.to_string()))?;

        if state.relationships[index].creator_id != creator_id {
            return Err(StoreError::Forbidden(creator_id.to_string()));
        }

        state.relationships.remove(index);
        Ok(())
    }

    /// Approve a suggestion, materializing it into a relationship
    pub fn approve_suggestion(
        &self,
        creator_id: &str,
        id: &str,
    ) -> Result<ContentRelationship, StoreError> {
        let mut state = self.write();
        let index = pending_index(&state, id)?;

        let candidate = state.suggestions[index].clone();
        check_ownership(
            &state,
            creator_id,
            &candidate.source_content_id,
            &candidate.target_content_id,
        )?;
        let request = CreateRelationshipRequest {
            source_content_id: candidate.source_content_id.clone(),
            target_content_id: candidate.target_content_id.clone(),
            relationship_type: candidate.relationship_type,
        };
        RelationshipGraph::new(&state.relationships).check_insert(&request)?;

        let mut relationship = state.suggestions[index]
            .approve(new_id(), creator_id)
            .map_err(|e| StoreError::AlreadyResolved {
                id: id.to_string(),
                status: e.from,
            })?;
        relationship.created_at = Some(Utc::now());
        state.relationships.push(relationship.clone());
        Ok(relationship)
    }

    /// Reject a suggestion
    pub fn reject_suggestion(&self, creator_id: &str, id: &str) -> Result<(), StoreError> {
        let mut state = self.write();
        let index = pending_index(&state, id)?;

        let candidate = &state.suggestions[index];
        check_ownership(
            &state,
            creator_id,
            &candidate.source_content_id,
            &candidate.target_content_id,
        )?;

        state.suggestions[index]
            .reject()
            .map_err(|e| StoreError::AlreadyResolved {
                id: id.to_string(),
                status: e.from,
            })
    }
}

fn pending_index(state: &StoreState, id: &str) -> Result<usize, StoreError> {
    let index = state
        .suggestions
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| StoreError::SuggestionNotFound(id.to_string()))?;

    let status = state.suggestions[index].status;
    if status.is_terminal() {
        return Err(StoreError::AlreadyResolved {
            id: id.to_string(),
            status,
        });
    }
    Ok(index)
}

fn check_ownership(
    state: &StoreState,
    creator_id: &str,
    source_id: &str,
    target_id: &str,
) -> Result<(), StoreError> {
    let source = state
        .contents
        .get(source_id)
        .ok_or_else(|| StoreError::ContentNotFound(source_id.to_string()))?;
    let target = state
        .contents
        .get(target_id)
        .ok_or_else(|| StoreError::ContentNotFound(target_id.to_string()))?;

    if source.creator_id != target.creator_id {
        return Err(RelationshipViolation::CrossCreator {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
        }
        .into());
    }
    if source.creator_id != creator_id {
        return Err(StoreError::Forbidden(creator_id.to_string()));
    }
    Ok(())
}

fn build_family(state: &StoreState, root_id: &str) -> Result<ContentFamily, StoreError> {
    if !state.contents.contains_key(root_id) {
        return Err(StoreError::ContentNotFound(root_id.to_string()));
    }

    let graph = RelationshipGraph::new(&state.relationships);
    let members = graph.connected_to(root_id);

    let nodes: Vec<Content> = members
        .iter()
        .filter_map(|id| state.contents.get(id).cloned())
        .collect();
    let relationships: Vec<ContentRelationship> = state
        .relationships
        .iter()
        .filter(|r| members.contains(&r.source_content_id))
        .cloned()
        .collect();
    let metrics = FamilyMetrics::from_nodes(&nodes);

    Ok(ContentFamily {
        root_content_id: root_id.to_string(),
        nodes,
        relationships,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use engagerr_domain::{ContentType, PlatformType};

    fn content(id: &str, creator: &str, platform: PlatformType, views: u64) -> Content {
        let mut c = Content::new(id, format!("Title {}", id), platform, ContentType::Video, creator);
        c.views = views;
        c
    }

    fn seeded() -> ContentStore {
        let store = ContentStore::new();
        store.add_content(content("c1", "u1", PlatformType::Podcast, 1000)).unwrap();
        store.add_content(content("c2", "u1", PlatformType::YouTube, 400)).unwrap();
        store.add_content(content("c3", "u1", PlatformType::Instagram, 100)).unwrap();
        store.add_content(content("x1", "u2", PlatformType::TikTok, 50)).unwrap();
        store
    }

    fn new_suggestion(source: &str, target: &str, confidence: f64) -> NewSuggestion {
        NewSuggestion {
            source_content_id: source.to_string(),
            target_content_id: target.to_string(),
            relationship_type: RelationshipType::Repurposed,
            confidence,
            reason: None,
        }
    }

    #[test]
    fn test_create_and_list() {
        let store = seeded();
        let rel = store
            .create_relationship("u1", CreateRelationshipRequest::new("c1", "c2", RelationshipType::Derivative))
            .unwrap();

        assert_eq!(rel.creator_id, "u1");
        assert_eq!(store.relationships_for("c1").unwrap(), vec![rel.clone()]);
        assert_eq!(store.relationships_for("c2").unwrap(), vec![rel]);
        assert!(store.relationships_for("c3").unwrap().is_empty());
    }

    #[test]
    fn test_cross_creator_rejected() {
        let store = seeded();
        let err = store
            .create_relationship("u1", CreateRelationshipRequest::new("c1", "x1", RelationshipType::Reference))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Violation(RelationshipViolation::CrossCreator { .. })
        ));
    }

    #[test]
    fn test_foreign_creator_forbidden() {
        let store = seeded();
        let err = store
            .create_relationship("u2", CreateRelationshipRequest::new("c1", "c2", RelationshipType::Reference))
            .unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));
    }

    #[test]
    fn test_family_and_metrics() {
        let store = seeded();
        store
            .create_relationship("u1", CreateRelationshipRequest::new("c2", "c1", RelationshipType::Derivative))
            .unwrap();
        store
            .create_relationship("u1", CreateRelationshipRequest::new("c3", "c2", RelationshipType::Repurposed))
            .unwrap();

        let family = store.family("c1").unwrap();
        assert_eq!(family.nodes.len(), 3);
        assert_eq!(family.edge_count(), 2);
        assert_eq!(family.metrics.total_views, 1500);
        assert_eq!(family.metrics.platform_count, 3);
        assert!(matches!(store.family("nope"), Err(StoreError::ContentNotFound(_))));
    }

    #[test]
    fn test_visualization_marks_root() {
        let store = seeded();
        store
            .create_relationship("u1", CreateRelationshipRequest::new("c2", "c1", RelationshipType::Derivative))
            .unwrap();

        let graph = store.visualization("c1").unwrap();
        assert_eq!(graph.nodes.iter().filter(|n| n.is_root).count(), 1);
        assert_eq!(graph.edges[0].confidence, Some(1.0));
    }

    #[test]
    fn test_suggestion_threshold_and_limit() {
        let store = seeded();
        store.add_suggestion(new_suggestion("c2", "c1", 0.4)).unwrap();
        store.add_suggestion(new_suggestion("c3", "c1", 0.7)).unwrap();
        store.add_suggestion(new_suggestion("c3", "c2", 0.9)).unwrap();

        let found = store.suggestions_for("c1", 0.5, 10).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].confidence, 0.7);

        let capped = store.suggestions_for("c3", 0.0, 1).unwrap();
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].confidence, 0.9);
    }

    #[test]
    fn test_invalid_confidence_rejected() {
        let store = seeded();
        assert!(matches!(
            store.add_suggestion(new_suggestion("c2", "c1", 1.5)),
            Err(StoreError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_approve_then_reject_conflicts() {
        let store = seeded();
        let s = store.add_suggestion(new_suggestion("c2", "c1", 0.8)).unwrap();

        let rel = store.approve_suggestion("u1", &s.id).unwrap();
        assert_eq!(rel.creation_method, CreationMethod::AiSuggested);
        assert!(store.suggestions_for("c1", 0.0, 10).unwrap().is_empty());

        let err = store.reject_suggestion("u1", &s.id).unwrap_err();
        assert!(matches!(
            err,
            StoreError::AlreadyResolved { status: SuggestionStatus::Approved, .. }
        ));
    }

    #[test]
    fn test_reject_creates_nothing() {
        let store = seeded();
        let s = store.add_suggestion(new_suggestion("c2", "c1", 0.8)).unwrap();

        store.reject_suggestion("u1", &s.id).unwrap();
        assert!(store.relationships_for("c1").unwrap().is_empty());
        assert!(store.suggestions_for("c1", 0.0, 10).unwrap().is_empty());
    }

    #[test]
    fn test_update_and_delete() {
        let store = seeded();
        let rel = store
            .create_relationship("u1", CreateRelationshipRequest::new("c2", "c1", RelationshipType::Derivative))
            .unwrap();

        let patch = UpdateRelationshipRequest {
            relationship_type: Some(RelationshipType::Reaction),
            ..Default::default()
        };
        let updated = store.update_relationship("u1", &rel.id, patch).unwrap();
        assert_eq!(updated.relationship_type, RelationshipType::Reaction);

        assert!(matches!(
            store.delete_relationship("u2", &rel.id),
            Err(StoreError::Forbidden(_))
        ));
        store.delete_relationship("u1", &rel.id).unwrap();
        assert!(matches!(
            store.delete_relationship("u1", &rel.id),
            Err(StoreError::RelationshipNotFound(_))
        ));
        assert_eq!(store.content_count(), 4);
    }

    #[test]
    fn test_seed_loading() {
        let seed: Seed = serde_json::from_str(
            r#"{
                "contents": [
                    {"id": "c1", "title": "Ep", "platform": "PODCAST",
                     "contentType": "PODCAST_EPISODE", "creatorId": "u1"}
                ]
            }"#,
        )
        .unwrap();

        let store = ContentStore::from_seed(seed);
        assert_eq!(store.content_count(), 1);
        assert!(store.relationships_for("c1").unwrap().is_empty());
    }
}
