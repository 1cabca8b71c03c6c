//! Engagerr Domain Layer
//!
//! This crate contains the content relationship model shared by the SDK, the
//! stub backend and the CLI. It defines the payloads exchanged with the
//! content API and the pure logic that runs on them.
//!
//! ## Key Concepts
//!
//! - **Content**: one published item on one external platform
//! - **ContentRelationship**: a directed edge between two content items
//! - **ContentFamily**: a root item and everything transitively linked to it
//! - **ContentSuggestion**: an AI-proposed relationship awaiting triage
//! - **Graph visualization**: display-ready nodes and edges for a family
//!
//! ## Architecture
//!
//! - No I/O; pure data and transforms only
//! - Serde derives match the JSON wire format (camelCase fields,
//!   SCREAMING_SNAKE_CASE enum values)
//! - Trait definitions for interactions that leave the domain live in
//!   [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod content;
pub mod family;
pub mod graph;
pub mod relationship;
pub mod suggestion;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use content::{Content, ContentType, PlatformType};
pub use family::{ContentFamily, FamilyMetrics};
pub use graph::{
    prepare_visualization, GraphData, GraphEdge, GraphNode, GraphVisualizationData,
    VisualizationResponse,
};
pub use relationship::{
    relationship_type_label, ContentRelationship, CreateRelationshipRequest, CreationMethod,
    CreatorRef, CreatorScoped, RelationshipType, UpdateRelationshipRequest,
};
pub use suggestion::{ContentSuggestion, SuggestionStatus, TransitionError};
pub use traits::{Notification, NotificationLevel, Notifier};
pub use validation::{RelationshipGraph, RelationshipViolation};
