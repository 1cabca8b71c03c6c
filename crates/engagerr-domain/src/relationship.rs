//! Relationship module - directed edges between content items

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How one content item relates to another
///
/// Direction matters: for an edge `source -> target`, `Parent` means the
/// source is the parent of the target and `Child` means the source is a
/// child of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// Source is the original the target was cut from
    Parent,

    /// Source was cut from the target
    Child,

    /// Source is a derivative work of the target
    Derivative,

    /// Source republishes the target on another platform
    Repurposed,

    /// Source reacts to the target
    Reaction,

    /// Source references the target
    Reference,

    /// A type added by the backend that this client does not know
    #[serde(other)]
    Other,
}

impl RelationshipType {
    /// All relationship types a creator can choose
    pub const ALL: [RelationshipType; 6] = [
        RelationshipType::Parent,
        RelationshipType::Child,
        RelationshipType::Derivative,
        RelationshipType::Repurposed,
        RelationshipType::Reaction,
        RelationshipType::Reference,
    ];

    /// Wire name (e.g. `DERIVATIVE`)
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Parent => "PARENT",
            RelationshipType::Child => "CHILD",
            RelationshipType::Derivative => "DERIVATIVE",
            RelationshipType::Repurposed => "REPURPOSED",
            RelationshipType::Reaction => "REACTION",
            RelationshipType::Reference => "REFERENCE",
            RelationshipType::Other => "OTHER",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            RelationshipType::Parent => "Parent Content",
            RelationshipType::Child => "Child Content",
            RelationshipType::Derivative => "Derivative Work",
            RelationshipType::Repurposed => "Repurposed Content",
            RelationshipType::Reaction => "Reaction",
            RelationshipType::Reference => "Reference",
            RelationshipType::Other => "Other",
        }
    }

    /// Parse a relationship type from its wire name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|t| t.as_str() == upper)
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationshipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid relationship type: {}", s))
    }
}

/// Label for a raw relationship type value
///
/// Unrecognized values come back unchanged so callers can always render
/// something.
///
/// # Examples
///
/// ```
/// use engagerr_domain::relationship_type_label;
///
/// assert_eq!(relationship_type_label("REPURPOSED"), "Repurposed Content");
/// assert_eq!(relationship_type_label("REMIX"), "REMIX");
/// ```
pub fn relationship_type_label(raw: &str) -> String {
    match RelationshipType::parse(raw) {
        Some(t) => t.label().to_string(),
        None => raw.to_string(),
    }
}

/// How a relationship came to exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreationMethod {
    /// Created directly by the creator
    #[default]
    Manual,
    /// Materialized from an approved suggestion
    AiSuggested,
}

/// A directed edge between two content items owned by the same creator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRelationship {
    /// Unique identifier
    pub id: String,

    /// Source content ID
    pub source_content_id: String,

    /// Target content ID
    pub target_content_id: String,

    /// Type of relationship
    pub relationship_type: RelationshipType,

    /// Manual or AI-suggested
    #[serde(default)]
    pub creation_method: CreationMethod,

    /// Owner / approver
    pub creator_id: String,

    /// Suggestion confidence for AI-suggested edges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// When this relationship was established
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ContentRelationship {
    /// Whether this edge touches the given content item
    pub fn involves(&self, content_id: &str) -> bool {
        self.source_content_id == content_id || self.target_content_id == content_id
    }

    /// The child in a parent/child edge, if this is one
    ///
    /// `a -PARENT-> b` makes `b` the child; `a -CHILD-> b` makes `a` the child.
    pub fn child_id(&self) -> Option<&str> {
        match self.relationship_type {
            RelationshipType::Parent => Some(&self.target_content_id),
            RelationshipType::Child => Some(&self.source_content_id),
            _ => None,
        }
    }
}

/// Payload for creating a relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRelationshipRequest {
    /// Source content ID
    pub source_content_id: String,
    /// Target content ID
    pub target_content_id: String,
    /// Type of relationship
    pub relationship_type: RelationshipType,
}

impl CreateRelationshipRequest {
    /// Create a new request
    pub fn new(
        source_content_id: impl Into<String>,
        target_content_id: impl Into<String>,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            source_content_id: source_content_id.into(),
            target_content_id: target_content_id.into(),
            relationship_type,
        }
    }
}

/// Partial update of a relationship; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRelationshipRequest {
    /// New source content ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_content_id: Option<String>,
    /// New target content ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_content_id: Option<String>,
    /// New relationship type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<RelationshipType>,
}

impl UpdateRelationshipRequest {
    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.source_content_id.is_none()
            && self.target_content_id.is_none()
            && self.relationship_type.is_none()
    }

    /// Apply the patch to an existing relationship
    pub fn apply_to(&self, relationship: &mut ContentRelationship) {
        if let Some(source) = &self.source_content_id {
            relationship.source_content_id = source.clone();
        }
        if let Some(target) = &self.target_content_id {
            relationship.target_content_id = target.clone();
        }
        if let Some(relationship_type) = self.relationship_type {
            relationship.relationship_type = relationship_type;
        }
    }
}

/// Request body envelope carrying the acting creator
///
/// Every mutating call on the content API names the creator it acts for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorScoped<T> {
    /// Operation payload
    #[serde(flatten)]
    pub body: T,
    /// Acting creator
    pub creator_id: String,
}

impl<T> CreatorScoped<T> {
    /// Wrap a payload for the given creator
    pub fn new(body: T, creator_id: impl Into<String>) -> Self {
        Self {
            body,
            creator_id: creator_id.into(),
        }
    }
}

/// Body for calls whose only payload is the acting creator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorRef {
    /// Acting creator
    pub creator_id: String,
}
