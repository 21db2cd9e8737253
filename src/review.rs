//! Interactive review of character suggestions
//!
//! Runs the suggestion workflow on one sequence and asks, character by
//! character, whether to attach it. Accepted suggestions are written as
//! attach requests.

use crate::error::{RecitError, Result};
use dialoguer::Select;
use recit_common::{
    AttachRequest, CharacterRoster, DetectedMention, DetectionConfig, Project, SuggestionWorkflow,
    WorkflowEvent,
};
use std::path::Path;

/// Reviewer decision for one character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Accept,
    Reject,
    /// Drop every remaining suggestion
    Dismiss,
}

/// Full text of a sequence: its scenes, in order
pub fn sequence_text(project: &Project, sequence_id: u64) -> Result<String> {
    let sequence = project
        .find_sequence(sequence_id)
        .ok_or(RecitError::SequenceNotFound(sequence_id))?;

    Ok(sequence
        .scenes
        .iter()
        .map(|s| s.content.as_str())
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Distinct characters among the pending mentions, best match first
pub fn pending_personnages(mentions: &[DetectedMention]) -> Vec<&DetectedMention> {
    let mut seen = std::collections::HashSet::new();
    mentions
        .iter()
        .filter(|m| m.personnage_id().is_some_and(|id| seen.insert(id)))
        .collect()
}

/// Apply one decision and return the resulting events
pub fn apply_action(
    workflow: &mut SuggestionWorkflow,
    personnage_id: u64,
    action: ReviewAction,
) -> Result<Vec<WorkflowEvent>> {
    let events = match action {
        ReviewAction::Accept => workflow.accept(personnage_id)?,
        ReviewAction::Reject => workflow.reject(personnage_id)?,
        ReviewAction::Dismiss => workflow.dismiss().into_iter().collect(),
    };
    Ok(events)
}

pub fn attach_requests(events: &[WorkflowEvent]) -> Vec<AttachRequest> {
    events
        .iter()
        .filter_map(|e| match e {
            WorkflowEvent::Accepted(request) => Some(*request),
            _ => None,
        })
        .collect()
}

/// Drive the workflow with `decide` until it closes
///
/// # Returns
/// Accepted attach requests, in decision order
pub fn run_review<F>(
    project: &Project,
    sequence_id: u64,
    roster: &CharacterRoster,
    config: &DetectionConfig,
    mut decide: F,
) -> Result<Vec<AttachRequest>>
where
    F: FnMut(&DetectedMention) -> Result<ReviewAction>,
{
    let text = sequence_text(project, sequence_id)?;
    let mut workflow = SuggestionWorkflow::new();
    let mut events = Vec::new();

    match workflow.detect_and_suggest(&text, sequence_id, roster, config) {
        Some(opened) => events.push(opened),
        None => return Ok(Vec::new()),
    }

    while !workflow.is_idle() {
        let Some(mention) = pending_personnages(workflow.pending()).first().map(|m| (*m).clone()) else {
            events.extend(workflow.dismiss());
            break;
        };
        let Some(personnage_id) = mention.personnage_id() else {
            break;
        };

        let action = decide(&mention)?;
        events.extend(apply_action(&mut workflow, personnage_id, action)?);
    }

    tracing::debug!(sequence_id, events = events.len(), "review finished");
    Ok(attach_requests(&events))
}

/// Terminal review of one sequence
pub fn run_interactive_review(
    project: &Project,
    sequence_id: u64,
    roster: &CharacterRoster,
    config: &DetectionConfig,
    output_path: Option<&Path>,
) -> Result<Vec<AttachRequest>> {
    let sequence_name = project
        .find_sequence(sequence_id)
        .map(|s| s.name.clone())
        .unwrap_or_default();
    println!("Sequence {} {}", sequence_id, sequence_name);

    let accepted = run_review(project, sequence_id, roster, config, prompt_action)?;

    if accepted.is_empty() {
        println!("No character attached");
    } else {
        println!("{} character(s) attached", accepted.len());
    }

    if let Some(output) = output_path {
        let json = serde_json::to_string_pretty(&accepted)?;
        std::fs::write(output, json)?;
        println!("Saved: {}", output.display());
    }

    Ok(accepted)
}

fn prompt_action(mention: &DetectedMention) -> Result<ReviewAction> {
    let name = mention
        .personnage
        .as_ref()
        .map(|p| p.display_name())
        .unwrap_or_default();
    let prompt = format!(
        "\"{}\" looks like {} ({:.0}%)",
        mention.name,
        name,
        mention.confidence * 100.0
    );

    let choice = Select::new()
        .with_prompt(prompt)
        .items(&["Attach", "Ignore", "Ignore all remaining"])
        .default(0)
        .interact()
        .map_err(|e| RecitError::Prompt(e.to_string()))?;

    Ok(match choice {
        0 => ReviewAction::Accept,
        1 => ReviewAction::Reject,
        _ => ReviewAction::Dismiss,
    })
}
