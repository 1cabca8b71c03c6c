//! Content relationship operations.
//!
//! [`ContentRelationships`] ties the REST client, the shared query cache and
//! a notification sink together. Reads go through the cache; mutations
//! invalidate the query kinds they affect and report the outcome to the
//! notifier.
//!
//! Error policy differs per read: `get_relationships` returns the error,
//! the other reads turn failures into `None` or an empty list. Every
//! failure produces exactly one error notification. The `try_*` reads
//! return the error and notify nothing.

use crate::cache::{QueryCache, QueryKey, QueryKind};
use crate::client::ApiClient;
use crate::config::SdkConfig;
use crate::error::SdkError;
use crate::notify::TracingNotifier;
use engagerr_domain::validation::{validate_required_fields, RelationshipGraph};
use engagerr_domain::{
    prepare_visualization, relationship_type_label, ContentFamily, ContentRelationship,
    ContentSuggestion, CreateRelationshipRequest, CreatorRef, CreatorScoped,
    GraphVisualizationData, Notification, Notifier, RelationshipViolation,
    UpdateRelationshipRequest, VisualizationResponse,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

const ERROR_TITLE: &str = "Error";

/// Result of approving or rejecting a suggestion
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionOutcome {
    /// Approved; the backend created this relationship
    Approved(ContentRelationship),
    /// Rejected; nothing was created
    Rejected,
    /// Someone else already approved or rejected it
    AlreadyResolved,
}

/// Everything shown for one content item, fetched together
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipSnapshot {
    /// Relationships touching the item
    pub relationships: Vec<ContentRelationship>,
    /// Family rooted at the item
    pub family: ContentFamily,
    /// Pending suggestions above the threshold
    pub suggestions: Vec<ContentSuggestion>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionParams {
    confidence_threshold: f64,
    limit: usize,
}

/// Content relationship client for one creator
///
/// Several instances may share one [`QueryCache`].
#[derive(Clone)]
pub struct ContentRelationships {
    client: ApiClient,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
    creator_id: String,
    suggestion_threshold: f64,
    suggestion_limit: usize,
    validate_locally: bool,
}

impl ContentRelationships {
    /// Build from configuration, sharing the given cache and notifier
    pub fn new(
        config: &SdkConfig,
        cache: Arc<QueryCache>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, SdkError> {
        config.validate()?;
        let client = ApiClient::new(&config.base_url, config.token.clone(), config.timeout())?;

        Ok(Self {
            client,
            cache,
            notifier,
            creator_id: config.creator_id.clone(),
            suggestion_threshold: config.suggestion_threshold,
            suggestion_limit: config.suggestion_limit,
            validate_locally: config.validate_locally,
        })
    }

    /// Build with a private cache and a notifier that logs through tracing
    pub fn connect(config: &SdkConfig) -> Result<Self, SdkError> {
        let cache = Arc::new(QueryCache::new(config.cache_config()));
        Self::new(config, cache, Arc::new(TracingNotifier))
    }

    /// Creator this client acts for
    pub fn creator_id(&self) -> &str {
        &self.creator_id
    }

    /// Shared query cache
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Act for another creator
    ///
    /// This instance moves to a new, empty cache with the same settings.
    /// Clones made earlier keep the shared cache and keep acting for the
    /// previous creator.
    pub fn switch_creator(&mut self, creator_id: impl Into<String>) {
        self.creator_id = creator_id.into();
        self.cache = Arc::new(QueryCache::new(self.cache.config()));
        info!("Switched to creator {}", self.creator_id);
    }

    fn report(&self, err: &SdkError) {
        warn!("Content relationship request failed: {}", err);
        self.notifier
            .notify(Notification::error(ERROR_TITLE, err.user_message()));
    }

    fn confirm(&self, title: &str, description: &str) {
        self.notifier.notify(Notification::success(title, description));
    }

    async fn fetch_relationships(&self, content_id: &str) -> Result<Vec<ContentRelationship>, SdkError> {
        self.client
            .get(&["api", "content", content_id, "relationships"])
            .await
    }

    async fn fetch_family(&self, root_id: &str) -> Result<ContentFamily, SdkError> {
        self.client.get(&["api", "content", root_id, "family"]).await
    }

    async fn fetch_suggestions(&self, content_id: &str) -> Result<Vec<ContentSuggestion>, SdkError> {
        let params = SuggestionParams {
            confidence_threshold: self.suggestion_threshold,
            limit: self.suggestion_limit,
        };
        self.client
            .get_with_query(&["api", "content", content_id, "suggestions"], &params)
            .await
    }

    // Reads

    /// Relationships touching a content item
    pub async fn get_relationships(&self, content_id: &str) -> Result<Vec<ContentRelationship>, SdkError> {
        let result = self
            .cache
            .fetch(QueryKey::relationships(content_id), || {
                self.fetch_relationships(content_id)
            })
            .await;
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    /// Family rooted at a content item, without notifying on failure
    pub async fn try_get_content_family(&self, root_id: &str) -> Result<ContentFamily, SdkError> {
        self.cache
            .fetch(QueryKey::family(root_id), || self.fetch_family(root_id))
            .await
    }

    /// Family rooted at a content item, or `None` after notifying
    pub async fn get_content_family(&self, root_id: &str) -> Option<ContentFamily> {
        match self.try_get_content_family(root_id).await {
            Ok(family) => Some(family),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    /// Visualization of a family, with root sizing and platform labels
    ///
    /// Not cached; every call fetches and transforms.
    pub async fn get_visualization_data(&self, family_id: &str) -> Option<GraphVisualizationData> {
        let response: Result<VisualizationResponse, SdkError> = self
            .client
            .get(&["api", "content", family_id, "visualization"])
            .await;

        match response {
            Ok(response) => Some(prepare_visualization(response.graph, family_id)),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    /// Pending suggestions, without notifying on failure
    pub async fn try_get_relationship_suggestions(
        &self,
        content_id: &str,
    ) -> Result<Vec<ContentSuggestion>, SdkError> {
        self.cache
            .fetch(QueryKey::suggestions(content_id), || {
                self.fetch_suggestions(content_id)
            })
            .await
    }

    /// Pending suggestions at or above the configured threshold, or an
    /// empty list after notifying
    pub async fn get_relationship_suggestions(&self, content_id: &str) -> Vec<ContentSuggestion> {
        match self.try_get_relationship_suggestions(content_id).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                self.report(&e);
                Vec::new()
            }
        }
    }

    // Mutations

    async fn check_locally(&self, request: &CreateRelationshipRequest) -> Result<(), SdkError> {
        validate_required_fields(request)?;
        if !self.validate_locally {
            return Ok(());
        }

        // Cached families are trusted only while fresh; mutations invalidate them
        let mut family = match self.try_get_content_family(&request.source_content_id).await {
            Ok(family) => family,
            Err(e) => {
                debug!("Skipping local validation, family unavailable: {}", e);
                return Ok(());
            }
        };

        // A target outside the family brings its own edges, including any parent
        if !family.contains(&request.target_content_id) {
            match self.try_get_content_family(&request.target_content_id).await {
                Ok(other) => {
                    family.nodes.extend(other.nodes);
                    family.relationships.extend(other.relationships);
                }
                Err(e) => debug!("Target family unavailable: {}", e),
            }
        }

        let creator_of = |id: &str| {
            family
                .nodes
                .iter()
                .find(|n| n.id == id)
                .map(|n| n.creator_id.as_str())
        };
        if let (Some(source), Some(target)) = (
            creator_of(&request.source_content_id),
            creator_of(&request.target_content_id),
        ) {
            if source != target {
                return Err(RelationshipViolation::CrossCreator {
                    source_id: request.source_content_id.clone(),
                    target_id: request.target_content_id.clone(),
                }
                .into());
            }
        }

        RelationshipGraph::new(&family.relationships).check_insert(request)?;
        Ok(())
    }

    /// Create a relationship owned by the acting creator
    pub async fn create_relationship(
        &self,
        request: CreateRelationshipRequest,
    ) -> Result<ContentRelationship, SdkError> {
        if let Err(e) = self.check_locally(&request).await {
            self.report(&e);
            return Err(e);
        }

        let body = CreatorScoped::new(request, self.creator_id.as_str());
        match self
            .client
            .post::<_, ContentRelationship>(&["api", "content", "relationships"], &body)
            .await
        {
            Ok(relationship) => {
                info!(
                    "Created {} relationship {}",
                    relationship.relationship_type, relationship.id
                );
                self.cache.invalidate(QueryKind::ContentRelationships);
                self.cache.invalidate(QueryKind::ContentFamily);
                self.confirm(
                    "Relationship created",
                    "The content relationship has been created successfully.",
                );
                Ok(relationship)
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Change type or confidence of an existing relationship
    pub async fn update_relationship(
        &self,
        id: &str,
        patch: UpdateRelationshipRequest,
    ) -> Result<ContentRelationship, SdkError> {
        if patch.is_empty() {
            let e = SdkError::InvalidRequest("Nothing to update".to_string());
            self.report(&e);
            return Err(e);
        }

        let body = CreatorScoped::new(patch, self.creator_id.as_str());
        match self
            .client
            .put::<_, ContentRelationship>(&["api", "content", "relationships", id], &body)
            .await
        {
            Ok(relationship) => {
                info!("Updated relationship {}", id);
                self.cache.invalidate(QueryKind::ContentRelationships);
                self.cache.invalidate(QueryKind::ContentFamily);
                self.confirm(
                    "Relationship updated",
                    "The content relationship has been updated successfully.",
                );
                Ok(relationship)
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Delete a relationship
    pub async fn delete_relationship(&self, id: &str) -> Result<(), SdkError> {
        let body = CreatorRef {
            creator_id: self.creator_id.clone(),
        };
        match self
            .client
            .delete(&["api", "content", "relationships", id], &body)
            .await
        {
            Ok(()) => {
                info!("Deleted relationship {}", id);
                self.cache.invalidate(QueryKind::ContentRelationships);
                self.cache.invalidate(QueryKind::ContentFamily);
                self.confirm(
                    "Relationship deleted",
                    "The content relationship has been deleted successfully.",
                );
                Ok(())
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Approve a suggestion, creating its relationship
    pub async fn approve_relationship_suggestion(&self, id: &str) -> Result<SuggestionOutcome, SdkError> {
        let body = CreatorRef {
            creator_id: self.creator_id.clone(),
        };
        let result = self
            .client
            .post::<_, ContentRelationship>(&["api", "content", "suggestions", id, "approve"], &body)
            .await;

        match result {
            Ok(relationship) => {
                info!("Approved suggestion {} as {}", id, relationship.id);
                self.cache.invalidate(QueryKind::ContentSuggestions);
                self.cache.invalidate(QueryKind::ContentRelationships);
                self.cache.invalidate(QueryKind::ContentFamily);
                self.confirm(
                    "Suggestion approved",
                    "The suggested relationship has been created.",
                );
                Ok(SuggestionOutcome::Approved(relationship))
            }
            Err(e) => self.resolve_conflict(id, e),
        }
    }

    /// Reject a suggestion; nothing is created
    pub async fn reject_relationship_suggestion(&self, id: &str) -> Result<SuggestionOutcome, SdkError> {
        let body = CreatorRef {
            creator_id: self.creator_id.clone(),
        };
        let result = self
            .client
            .post_no_content(&["api", "content", "suggestions", id, "reject"], &body)
            .await;

        match result {
            Ok(()) => {
                info!("Rejected suggestion {}", id);
                self.cache.invalidate(QueryKind::ContentSuggestions);
                self.confirm("Suggestion rejected", "The suggestion has been dismissed.");
                Ok(SuggestionOutcome::Rejected)
            }
            Err(e) => self.resolve_conflict(id, e),
        }
    }

    /// A 404 or 409 on approve/reject means the suggestion is no longer
    /// pending; the cached list is out of date
    fn resolve_conflict(&self, id: &str, err: SdkError) -> Result<SuggestionOutcome, SdkError> {
        self.report(&err);
        if err.is_not_found() || err.is_conflict() {
            debug!("Suggestion {} already resolved", id);
            self.cache.invalidate(QueryKind::ContentSuggestions);
            return Ok(SuggestionOutcome::AlreadyResolved);
        }
        Err(err)
    }

    /// Display label for a relationship type, or the raw value if unknown
    pub fn get_relationship_type_label(&self, raw: &str) -> String {
        relationship_type_label(raw)
    }

    /// Refetch relationships, family and suggestions of a content item
    /// concurrently, ignoring freshness
    pub async fn refresh_relationship_data(&self, content_id: &str) -> Result<RelationshipSnapshot, SdkError> {
        let (relationships, family, suggestions) = tokio::join!(
            self.fetch_relationships(content_id),
            self.fetch_family(content_id),
            self.fetch_suggestions(content_id),
        );

        if let Ok(relationships) = &relationships {
            self.cache
                .set(QueryKey::relationships(content_id), relationships.clone());
        }
        if let Ok(family) = &family {
            self.cache.set(QueryKey::family(content_id), family.clone());
        }
        if let Ok(suggestions) = &suggestions {
            self.cache
                .set(QueryKey::suggestions(content_id), suggestions.clone());
        }

        match (relationships, family, suggestions) {
            (Ok(relationships), Ok(family), Ok(suggestions)) => {
                self.confirm(
                    "Data refreshed",
                    "Content relationship data has been refreshed.",
                );
                Ok(RelationshipSnapshot {
                    relationships,
                    family,
                    suggestions,
                })
            }
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                self.report(&e);
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for ContentRelationships {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentRelationships")
            .field("base_url", &self.client.base_url().as_str())
            .field("creator_id", &self.creator_id)
            .field("validate_locally", &self.validate_locally)
            .finish()
    }
}
