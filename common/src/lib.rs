//! Recit Common Library
//!
//! Types and pure routines shared by every Recit front end:
//! project tree model, character roster, mention detection,
//! suggestion workflow, slugs, analytics and word counting.

pub mod types;
pub mod error;
pub mod detection;
pub mod roster;
pub mod workflow;
pub mod slug;
pub mod analytics;
pub mod counter;

pub use types::{Part, Personnage, Project, Scene, Sequence};
pub use error::{Error, Result};
pub use detection::{
    detect_mentions, levenshtein_distance, DetectedMention, DetectionConfig, DetectionOverrides,
    NameField,
};
pub use roster::CharacterRoster;
pub use workflow::{AttachRequest, SuggestionWorkflow, WorkflowEvent, WorkflowState};
pub use slug::{find_by_slug, personnage_slug};
pub use analytics::{AnalyticsSnapshot, ProjectStatistics, RecentScene, Statistics};
pub use counter::{count_project, count_text, CountPreferences, CountUnit, NodeCount, NodeKind};
