//! Graph visualization data and the display transform
//!
//! The backend returns raw nodes and edges for a family. Before display, the
//! root node is enlarged, every label gains its platform, and edge weight is
//! taken from suggestion confidence.

use crate::{ContentType, PlatformType, RelationshipType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Node size for the family root
pub const ROOT_NODE_SIZE: u32 = 2;

/// Node size for every other member
pub const NODE_SIZE: u32 = 1;

/// A content item as a graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Content ID
    pub id: String,

    /// Display label
    pub label: String,

    /// Platform of the content item
    pub platform: PlatformType,

    /// Kind of content item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,

    /// Render size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    /// Whether the backend marked this node as the family root
    #[serde(default)]
    pub is_root: bool,

    /// Fields this client does not interpret, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A relationship as a graph edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Relationship ID
    pub id: String,

    /// Source node ID
    pub source: String,

    /// Target node ID
    pub target: String,

    /// Relationship type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<RelationshipType>,

    /// Suggestion confidence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Render weight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Fields this client does not interpret, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Raw graph as served by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    /// Nodes
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    /// Edges
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

/// Envelope of `GET /api/content/{familyId}/visualization`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualizationResponse {
    /// The graph
    pub graph: GraphData,
}

/// Display-ready graph
///
/// Always derived from a freshly fetched [`GraphData`]; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphVisualizationData {
    /// Nodes with size and composed labels
    pub nodes: Vec<GraphNode>,
    /// Edges with weight set from confidence
    pub edges: Vec<GraphEdge>,
}

impl GraphVisualizationData {
    /// The node rendered as root
    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.size == Some(ROOT_NODE_SIZE))
    }
}

/// Index of the designated root node
///
/// A node flagged `isRoot` by the backend wins; otherwise the node whose ID
/// equals the requested family ID.
fn designated_root(nodes: &[GraphNode], family_id: &str) -> Option<usize> {
    nodes
        .iter()
        .position(|n| n.is_root)
        .or_else(|| nodes.iter().position(|n| n.id == family_id))
}

/// Apply the display transform to a fetched graph
///
/// Sets `size` on every node (root 2, others 1), rewrites each label to
/// `"<label> (<PLATFORM>)"` and sets each edge's `weight` to its
/// `confidence`. Nothing else changes.
///
/// # Examples
///
/// ```
/// use engagerr_domain::{prepare_visualization, GraphData};
///
/// let graph: GraphData = serde_json::from_str(r#"{
///     "nodes": [
///         {"id": "c1", "label": "Episode 42", "platform": "PODCAST"},
///         {"id": "c2", "label": "Clip", "platform": "YOUTUBE"}
///     ],
///     "edges": [{"id": "r1", "source": "c2", "target": "c1", "confidence": 0.8}]
/// }"#).unwrap();
///
/// let view = prepare_visualization(graph, "c1");
/// assert_eq!(view.nodes[0].label, "Episode 42 (PODCAST)");
/// assert_eq!(view.nodes[0].size, Some(2));
/// assert_eq!(view.edges[0].weight, Some(0.8));
/// ```
pub fn prepare_visualization(graph: GraphData, family_id: &str) -> GraphVisualizationData {
    let root = designated_root(&graph.nodes, family_id);

    let nodes = graph
        .nodes
        .into_iter()
        .enumerate()
        .map(|(i, mut node)| {
            node.size = Some(if Some(i) == root {
                ROOT_NODE_SIZE
            } else {
                NODE_SIZE
            });
            node.label = format!("{} ({})", node.label, node.platform);
            node
        })
        .collect();

    let edges = graph
        .edges
        .into_iter()
        .map(|mut edge| {
            edge.weight = edge.confidence;
            edge
        })
        .collect();

    GraphVisualizationData { nodes, edges }
}
