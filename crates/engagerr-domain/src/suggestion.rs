//! AI-suggested relationships and their triage state machine

use crate::{ContentRelationship, CreationMethod, RelationshipType};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Triage status of a suggestion
///
/// `Pending` is the only non-terminal state. There is no path back to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionStatus {
    /// Awaiting creator decision
    #[default]
    Pending,
    /// Materialized into a relationship
    Approved,
    /// Discarded
    Rejected,
}

/// Attempted transition out of a terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Suggestion already {from}, cannot move to {to}")]
pub struct TransitionError {
    /// Current status
    pub from: SuggestionStatus,
    /// Requested status
    pub to: SuggestionStatus,
}

impl SuggestionStatus {
    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SuggestionStatus::Pending)
    }

    /// PENDING -> APPROVED
    pub fn approve(self) -> Result<Self, TransitionError> {
        self.transition(SuggestionStatus::Approved)
    }

    /// PENDING -> REJECTED
    pub fn reject(self) -> Result<Self, TransitionError> {
        self.transition(SuggestionStatus::Rejected)
    }

    fn transition(self, to: SuggestionStatus) -> Result<Self, TransitionError> {
        match self {
            SuggestionStatus::Pending => Ok(to),
            from => Err(TransitionError { from, to }),
        }
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "PENDING",
            SuggestionStatus::Approved => "APPROVED",
            SuggestionStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An AI-proposed relationship between two content items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSuggestion {
    /// Unique identifier
    pub id: String,

    /// Proposed source content ID
    pub source_content_id: String,

    /// Proposed target content ID
    pub target_content_id: String,

    /// Proposed relationship type
    pub relationship_type: RelationshipType,

    /// Confidence score [0.0, 1.0]
    pub confidence: f64,

    /// Triage status
    #[serde(default)]
    pub status: SuggestionStatus,

    /// Why the model proposed this edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ContentSuggestion {
    /// Whether the suggestion clears a confidence threshold (inclusive)
    pub fn meets_threshold(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }

    /// Whether the suggestion still awaits a decision
    pub fn is_pending(&self) -> bool {
        self.status == SuggestionStatus::Pending
    }

    /// Approve the suggestion and build the relationship it materializes into
    ///
    /// The status moves to `Approved` only if the transition is legal.
    pub fn approve(
        &mut self,
        relationship_id: impl Into<String>,
        creator_id: impl Into<String>,
    ) -> Result<ContentRelationship, TransitionError> {
        self.status = self.status.approve()?;

        Ok(ContentRelationship {
            id: relationship_id.into(),
            source_content_id: self.source_content_id.clone(),
            target_content_id: self.target_content_id.clone(),
            relationship_type: self.relationship_type,
            creation_method: CreationMethod::AiSuggested,
            creator_id: creator_id.into(),
            confidence: Some(self.confidence),
            created_at: None,
        })
    }

    /// Reject the suggestion
    pub fn reject(&mut self) -> Result<(), TransitionError> {
        self.status = self.status.reject()?;
        Ok(())
    }
}

/// Whether a confidence score lies in [0.0, 1.0]
pub fn is_valid_confidence(confidence: f64) -> bool {
    (0.0..=1.0).contains(&confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(confidence: f64) -> ContentSuggestion {
        ContentSuggestion {
            id: "s1".to_string(),
            source_content_id: "c2".to_string(),
            target_content_id: "c1".to_string(),
            relationship_type: RelationshipType::Repurposed,
            confidence,
            status: SuggestionStatus::Pending,
            reason: None,
        }
    }

    #[test]
    fn test_pending_transitions() {
        assert_eq!(SuggestionStatus::Pending.approve(), Ok(SuggestionStatus::Approved));
        assert_eq!(SuggestionStatus::Pending.reject(), Ok(SuggestionStatus::Rejected));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for terminal in [SuggestionStatus::Approved, SuggestionStatus::Rejected] {
            assert!(terminal.is_terminal());
            assert!(terminal.approve().is_err());
            assert!(terminal.reject().is_err());
        }
        assert!(!SuggestionStatus::Pending.is_terminal());
    }

    #[test]
    fn test_approve_materializes_relationship() {
        let mut s = suggestion(0.82);
        let rel = s.approve("r9", "u1").unwrap();

        assert_eq!(s.status, SuggestionStatus::Approved);
        assert_eq!(rel.source_content_id, "c2");
        assert_eq!(rel.target_content_id, "c1");
        assert_eq!(rel.relationship_type, RelationshipType::Repurposed);
        assert_eq!(rel.creation_method, CreationMethod::AiSuggested);
        assert_eq!(rel.confidence, Some(0.82));
    }

    #[test]
    fn test_reject_after_approve_fails() {
        let mut s = suggestion(0.9);
        s.approve("r1", "u1").unwrap();

        let err = s.reject().unwrap_err();
        assert_eq!(err.from, SuggestionStatus::Approved);
        assert_eq!(err.to, SuggestionStatus::Rejected);
        assert_eq!(s.status, SuggestionStatus::Approved);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(suggestion(0.5).meets_threshold(0.5));
        assert!(suggestion(0.7).meets_threshold(0.5));
        assert!(!suggestion(0.4).meets_threshold(0.5));
    }

    #[test]
    fn test_confidence_bounds() {
        assert!(is_valid_confidence(0.0));
        assert!(is_valid_confidence(1.0));
        assert!(!is_valid_confidence(1.01));
        assert!(!is_valid_confidence(-0.1));
        assert!(!is_valid_confidence(f64::NAN));
    }
}
