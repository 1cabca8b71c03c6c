//! Content family - a root item and everything linked to it

use crate::{Content, ContentRelationship};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Aggregate metrics across every item in a family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMetrics {
    /// Sum of views
    #[serde(default)]
    pub total_views: u64,

    /// Sum of engagements
    #[serde(default)]
    pub total_engagements: u64,

    /// Sum of estimated value in USD
    #[serde(default)]
    pub estimated_value: f64,

    /// Number of distinct platforms represented
    #[serde(default)]
    pub platform_count: usize,

    /// Number of content items
    #[serde(default)]
    pub content_count: usize,
}

impl FamilyMetrics {
    /// Aggregate metrics over a set of content items
    pub fn from_nodes(nodes: &[Content]) -> Self {
        let platforms: HashSet<_> = nodes.iter().map(|c| c.platform).collect();

        Self {
            total_views: nodes.iter().map(|c| c.views).sum(),
            total_engagements: nodes.iter().map(|c| c.engagements).sum(),
            estimated_value: nodes.iter().map(|c| c.estimated_value).sum(),
            platform_count: platforms.len(),
            content_count: nodes.len(),
        }
    }
}

/// Materialized graph rooted at one content item
///
/// Read-only projection computed by the backend. Clients refetch it after a
/// relationship changes rather than editing it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFamily {
    /// Root content ID
    pub root_content_id: String,

    /// Every content item in the family, root included
    #[serde(default)]
    pub nodes: Vec<Content>,

    /// Edges between family members
    #[serde(default)]
    pub relationships: Vec<ContentRelationship>,

    /// Backend-computed aggregates
    #[serde(default)]
    pub metrics: FamilyMetrics,
}

impl ContentFamily {
    /// The root content item, if present in `nodes`
    pub fn root(&self) -> Option<&Content> {
        self.nodes.iter().find(|c| c.id == self.root_content_id)
    }

    /// Whether the family contains the given content item
    pub fn contains(&self, content_id: &str) -> bool {
        self.nodes.iter().any(|c| c.id == content_id)
    }

    /// Number of edges in the family
    pub fn edge_count(&self) -> usize {
        self.relationships.len()
    }
}
