//! Character suggestion workflow
//!
//! ## States
//! - `Idle`: nothing pending
//! - `Suggesting`: mentions found for a sequence, awaiting a decision
//!
//! `Idle → Suggesting` only when at least one mention is detected.
//! `Suggesting → Idle` once every suggestion is accepted/rejected, or on dismiss.
//! Every transition returns the events it produced so a presentation layer
//! can react without observing the state directly.

use crate::detection::{DetectedMention, DetectionConfig};
use crate::error::{Error, Result};
use crate::roster::CharacterRoster;
use serde::{Deserialize, Serialize};

/// Body of the "attach character to sequence" call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachRequest {
    pub sequence_id: u64,
    pub personnage_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum WorkflowState {
    #[default]
    Idle,
    Suggesting {
        sequence_id: u64,
        mentions: Vec<DetectedMention>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    /// Suggestions are ready to be shown
    Opened { sequence_id: u64, count: usize },
    Accepted(AttachRequest),
    Rejected { sequence_id: u64, personnage_id: u64 },
    /// Back to idle
    Closed,
}

#[derive(Debug, Clone, Default)]
pub struct SuggestionWorkflow {
    state: WorkflowState,
}

impl SuggestionWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, WorkflowState::Idle)
    }

    /// Pending mentions (empty when idle)
    pub fn pending(&self) -> &[DetectedMention] {
        match &self.state {
            WorkflowState::Idle => &[],
            WorkflowState::Suggesting { mentions, .. } => mentions,
        }
    }

    pub fn current_sequence_id(&self) -> Option<u64> {
        match &self.state {
            WorkflowState::Idle => None,
            WorkflowState::Suggesting { sequence_id, .. } => Some(*sequence_id),
        }
    }

    /// Detect mentions in `content` and open suggestions for `sequence_id`
    ///
    /// Returns `None` and leaves the state untouched when nothing is detected.
    pub fn detect_and_suggest(
        &mut self,
        content: &str,
        sequence_id: u64,
        roster: &CharacterRoster,
        config: &DetectionConfig,
    ) -> Option<WorkflowEvent> {
        let mentions = roster.detect(content, config);
        self.suggest(sequence_id, mentions)
    }

    /// Open suggestions from already detected mentions
    pub fn suggest(
        &mut self,
        sequence_id: u64,
        mentions: Vec<DetectedMention>,
    ) -> Option<WorkflowEvent> {
        if mentions.is_empty() {
            tracing::debug!(sequence_id, "no characters detected");
            return None;
        }

        let count = mentions.len();
        self.state = WorkflowState::Suggesting {
            sequence_id,
            mentions,
        };
        Some(WorkflowEvent::Opened { sequence_id, count })
    }

    /// Accept every pending mention of `personnage_id`
    pub fn accept(&mut self, personnage_id: u64) -> Result<Vec<WorkflowEvent>> {
        let sequence_id = self.resolve(personnage_id)?;
        let mut events = vec![WorkflowEvent::Accepted(AttachRequest {
            sequence_id,
            personnage_id,
        })];
        events.extend(self.close_if_done());
        Ok(events)
    }

    /// Reject every pending mention of `personnage_id`
    pub fn reject(&mut self, personnage_id: u64) -> Result<Vec<WorkflowEvent>> {
        let sequence_id = self.resolve(personnage_id)?;
        let mut events = vec![WorkflowEvent::Rejected {
            sequence_id,
            personnage_id,
        }];
        events.extend(self.close_if_done());
        Ok(events)
    }

    /// Drop all pending suggestions
    pub fn dismiss(&mut self) -> Option<WorkflowEvent> {
        if self.is_idle() {
            return None;
        }
        self.state = WorkflowState::Idle;
        Some(WorkflowEvent::Closed)
    }

    /// Remove the mentions of `personnage_id`, returning the sequence id
    fn resolve(&mut self, personnage_id: u64) -> Result<u64> {
        let WorkflowState::Suggesting {
            sequence_id,
            mentions,
        } = &mut self.state
        else {
            return Err(Error::InvalidTransition(
                "no suggestion pending".to_string(),
            ));
        };

        let before = mentions.len();
        mentions.retain(|m| m.personnage_id() != Some(personnage_id));
        if mentions.len() == before {
            return Err(Error::InvalidTransition(format!(
                "no pending suggestion for personnage {}",
                personnage_id
            )));
        }

        Ok(*sequence_id)
    }

    fn close_if_done(&mut self) -> Option<WorkflowEvent> {
        if self.pending().is_empty() {
            self.dismiss()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Personnage;

    fn roster() -> CharacterRoster {
        CharacterRoster::new(vec![
            Personnage::new(1, "Harry"),
            Personnage::new(2, "Hermione"),
        ])
    }

    #[test]
    fn test_no_mention_stays_idle() {
        let mut workflow = SuggestionWorkflow::new();
        let event = workflow.detect_and_suggest("rien ici", 10, &roster(), &DetectionConfig::default());
        assert!(event.is_none());
        assert!(workflow.is_idle());
        assert_eq!(workflow.current_sequence_id(), None);
    }

    #[test]
    fn test_mentions_open_suggestions() {
        let mut workflow = SuggestionWorkflow::new();
        let event = workflow.detect_and_suggest(
            "Harry et Hermione courent.",
            10,
            &roster(),
            &DetectionConfig::default(),
        );
        assert_eq!(event, Some(WorkflowEvent::Opened { sequence_id: 10, count: 2 }));
        assert_eq!(workflow.current_sequence_id(), Some(10));
        assert_eq!(workflow.pending().len(), 2);
    }

    #[test]
    fn test_accept_all_returns_to_idle() {
        let mut workflow = SuggestionWorkflow::new();
        workflow.detect_and_suggest("Harry et Hermione", 10, &roster(), &DetectionConfig::default());

        let events = workflow.accept(1).unwrap();
        assert_eq!(
            events,
            vec![WorkflowEvent::Accepted(AttachRequest { sequence_id: 10, personnage_id: 1 })]
        );
        assert!(!workflow.is_idle());

        let events = workflow.reject(2).unwrap();
        assert_eq!(
            events,
            vec![
                WorkflowEvent::Rejected { sequence_id: 10, personnage_id: 2 },
                WorkflowEvent::Closed,
            ]
        );
        assert!(workflow.is_idle());
    }

    #[test]
    fn test_dismiss() {
        let mut workflow = SuggestionWorkflow::new();
        assert_eq!(workflow.dismiss(), None);

        workflow.detect_and_suggest("Harry", 3, &roster(), &DetectionConfig::default());
        assert_eq!(workflow.dismiss(), Some(WorkflowEvent::Closed));
        assert!(workflow.is_idle());
        assert!(workflow.pending().is_empty());
    }

    #[test]
    fn test_accept_when_idle_fails() {
        let mut workflow = SuggestionWorkflow::new();
        let err = workflow.accept(1).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition(_)));
    }

    #[test]
    fn test_accept_unknown_personnage_fails() {
        let mut workflow = SuggestionWorkflow::new();
        workflow.detect_and_suggest("Harry", 3, &roster(), &DetectionConfig::default());
        assert!(matches!(workflow.accept(2), Err(Error::InvalidTransition(_))));
        // failed call leaves the suggestions untouched
        assert_eq!(workflow.pending().len(), 1);
    }

    #[test]
    fn test_new_detection_replaces_pending() {
        let mut workflow = SuggestionWorkflow::new();
        workflow.detect_and_suggest("Harry", 3, &roster(), &DetectionConfig::default());
        workflow.detect_and_suggest("Hermione", 4, &roster(), &DetectionConfig::default());
        assert_eq!(workflow.current_sequence_id(), Some(4));
        assert_eq!(workflow.pending()[0].personnage_id(), Some(2));
    }

    #[test]
    fn test_attach_request_json() {
        let json = serde_json::to_string(&AttachRequest { sequence_id: 4, personnage_id: 9 }).unwrap();
        assert_eq!(json, r#"{"sequenceId":4,"personnageId":9}"#);
    }
}
