//! Relationship invariants
//!
//! The backend is the authority on these rules. The same checks run in the
//! stub backend and, when enabled, in the SDK before a create request leaves
//! the client.

use crate::{ContentRelationship, CreateRelationshipRequest, RelationshipType};
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;

/// A relationship that would break a graph invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationshipViolation {
    /// A required request field is empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Source and target are the same item
    #[error("Content {0} cannot be related to itself")]
    SelfReference(String),

    /// Source and target belong to different creators
    #[error("Content {source_id} and {target_id} belong to different creators")]
    CrossCreator {
        /// Source content ID
        source_id: String,
        /// Target content ID
        target_id: String,
    },

    /// An identical edge already exists
    #[error("A {relationship_type} relationship from {source_id} to {target_id} already exists")]
    Duplicate {
        /// Source content ID
        source_id: String,
        /// Target content ID
        target_id: String,
        /// Relationship type
        relationship_type: RelationshipType,
    },

    /// The child already has a parent
    #[error("Content {0} already has a parent")]
    MultipleParents(String),

    /// The edge would close a cycle
    #[error("Relating {source_id} to {target_id} would create a cycle")]
    Cycle {
        /// Source content ID
        source_id: String,
        /// Target content ID
        target_id: String,
    },
}

/// Check that source, target and type are present and distinct
pub fn validate_required_fields(
    request: &CreateRelationshipRequest,
) -> Result<(), RelationshipViolation> {
    if request.source_content_id.trim().is_empty() {
        return Err(RelationshipViolation::MissingField("sourceContentId"));
    }
    if request.target_content_id.trim().is_empty() {
        return Err(RelationshipViolation::MissingField("targetContentId"));
    }
    if request.relationship_type == RelationshipType::Other {
        return Err(RelationshipViolation::MissingField("relationshipType"));
    }
    if request.source_content_id == request.target_content_id {
        return Err(RelationshipViolation::SelfReference(
            request.source_content_id.clone(),
        ));
    }
    Ok(())
}

/// Read-only view over a set of edges for invariant checks
pub struct RelationshipGraph<'a> {
    edges: &'a [ContentRelationship],
    outgoing: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> RelationshipGraph<'a> {
    /// Build a graph view over existing edges
    pub fn new(edges: &'a [ContentRelationship]) -> Self {
        let mut outgoing: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in edges {
            outgoing
                .entry(edge.source_content_id.as_str())
                .or_default()
                .push(edge.target_content_id.as_str());
        }
        Self { edges, outgoing }
    }

    /// Number of parent edges for a content item
    pub fn parent_count(&self, content_id: &str) -> usize {
        self.edges
            .iter()
            .filter(|e| e.child_id() == Some(content_id))
            .count()
    }

    /// Whether `to` is reachable from `from` following edge direction
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(next) = self.outgoing.get(current) {
                queue.extend(next.iter().copied());
            }
        }
        false
    }

    /// Every content ID connected to `root`, ignoring edge direction
    ///
    /// The root comes first; the rest follow in breadth-first order.
    pub fn connected_to(&self, root: &str) -> Vec<String> {
        let mut neighbours: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in self.edges {
            let (s, t) = (edge.source_content_id.as_str(), edge.target_content_id.as_str());
            neighbours.entry(s).or_default().push(t);
            neighbours.entry(t).or_default().push(s);
        }

        let mut seen = HashSet::from([root]);
        let mut order = vec![root.to_string()];
        let mut queue = VecDeque::from([root]);

        while let Some(current) = queue.pop_front() {
            for &next in neighbours.get(current).into_iter().flatten() {
                if seen.insert(next) {
                    order.push(next.to_string());
                    queue.push_back(next);
                }
            }
        }
        order
    }

    /// Check a new edge against every invariant except creator ownership
    pub fn check_insert(
        &self,
        request: &CreateRelationshipRequest,
    ) -> Result<(), RelationshipViolation> {
        validate_required_fields(request)?;

        let source = request.source_content_id.as_str();
        let target = request.target_content_id.as_str();

        if self.edges.iter().any(|e| {
            e.source_content_id == source
                && e.target_content_id == target
                && e.relationship_type == request.relationship_type
        }) {
            return Err(RelationshipViolation::Duplicate {
                source_id: source.to_string(),
                target_id: target.to_string(),
                relationship_type: request.relationship_type,
            });
        }

        let child = match request.relationship_type {
            RelationshipType::Parent => Some(target),
            RelationshipType::Child => Some(source),
            _ => None,
        };
        if let Some(child) = child {
            if self.parent_count(child) > 0 {
                return Err(RelationshipViolation::MultipleParents(child.to_string()));
            }
        }

        if self.reaches(target, source) {
            return Err(RelationshipViolation::Cycle {
                source_id: source.to_string(),
                target_id: target.to_string(),
            });
        }

        Ok(())
    }

    /// Check replacing edge `id` with the edited version
    pub fn check_replace(
        &self,
        id: &str,
        edited: &ContentRelationship,
    ) -> Result<(), RelationshipViolation> {
        let others: Vec<ContentRelationship> =
            self.edges.iter().filter(|e| e.id != id).cloned().collect();
        let request = CreateRelationshipRequest {
            source_content_id: edited.source_content_id.clone(),
            target_content_id: edited.target_content_id.clone(),
            relationship_type: edited.relationship_type,
        };
        RelationshipGraph::new(&others).check_insert(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CreationMethod;

    fn rel(id: &str, source: &str, target: &str, t: RelationshipType) -> ContentRelationship {
        ContentRelationship {
            id: id.to_string(),
            source_content_id: source.to_string(),
            target_content_id: target.to_string(),
            relationship_type: t,
            creation_method: CreationMethod::Manual,
            creator_id: "u1".to_string(),
            confidence: None,
            created_at: None,
        }
    }

    #[test]
    fn test_missing_and_self_fields() {
        let req = CreateRelationshipRequest::new("", "c2", RelationshipType::Reference);
        assert_eq!(
            validate_required_fields(&req),
            Err(RelationshipViolation::MissingField("sourceContentId"))
        );

        let req = CreateRelationshipRequest::new("c1", "c1", RelationshipType::Reference);
        assert!(matches!(
            validate_required_fields(&req),
            Err(RelationshipViolation::SelfReference(_))
        ));

        let req = CreateRelationshipRequest::new("c1", "c2", RelationshipType::Other);
        assert_eq!(
            validate_required_fields(&req),
            Err(RelationshipViolation::MissingField("relationshipType"))
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let edges = vec![rel("r1", "c2", "c1", RelationshipType::Derivative)];
        let graph = RelationshipGraph::new(&edges);

        let dup = CreateRelationshipRequest::new("c2", "c1", RelationshipType::Derivative);
        assert!(matches!(
            graph.check_insert(&dup),
            Err(RelationshipViolation::Duplicate { .. })
        ));

        let other_type = CreateRelationshipRequest::new("c2", "c1", RelationshipType::Reaction);
        assert!(graph.check_insert(&other_type).is_ok());
    }

    #[test]
    fn test_single_parent() {
        let edges = vec![rel("r1", "p1", "c1", RelationshipType::Parent)];
        let graph = RelationshipGraph::new(&edges);
        assert_eq!(graph.parent_count("c1"), 1);

        // c1 -CHILD-> p2 would give c1 a second parent
        let req = CreateRelationshipRequest::new("c1", "p2", RelationshipType::Child);
        assert_eq!(
            graph.check_insert(&req),
            Err(RelationshipViolation::MultipleParents("c1".to_string()))
        );

        // p1 may parent many children
        let req = CreateRelationshipRequest::new("p1", "c2", RelationshipType::Parent);
        assert!(graph.check_insert(&req).is_ok());
    }

    #[test]
    fn test_cycle_rejected() {
        let edges = vec![
            rel("r1", "a", "b", RelationshipType::Derivative),
            rel("r2", "b", "c", RelationshipType::Repurposed),
        ];
        let graph = RelationshipGraph::new(&edges);
        assert!(graph.reaches("a", "c"));
        assert!(!graph.reaches("c", "a"));

        let req = CreateRelationshipRequest::new("c", "a", RelationshipType::Reference);
        assert!(matches!(
            graph.check_insert(&req),
            Err(RelationshipViolation::Cycle { .. })
        ));
    }

    #[test]
    fn test_connected_ignores_direction() {
        let edges = vec![
            rel("r1", "clip", "ep", RelationshipType::Derivative),
            rel("r2", "story", "clip", RelationshipType::Repurposed),
            rel("r3", "x", "y", RelationshipType::Reference),
        ];
        let graph = RelationshipGraph::new(&edges);

        let family = graph.connected_to("ep");
        assert_eq!(family, vec!["ep", "clip", "story"]);
        assert_eq!(graph.connected_to("lonely"), vec!["lonely"]);
    }

    #[test]
    fn test_replace_ignores_edge_being_edited() {
        let edges = vec![rel("r1", "p1", "c1", RelationshipType::Parent)];
        let graph = RelationshipGraph::new(&edges);

        let mut edited = edges[0].clone();
        edited.relationship_type = RelationshipType::Parent;
        edited.source_content_id = "p2".to_string();
        assert!(graph.check_replace("r1", &edited).is_ok());
    }
}
