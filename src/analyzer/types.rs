use recit_common::DetectedMention;
use serde::{Deserialize, Serialize};

/// Mentions found in one scene of a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneReport {
    pub sequence_id: u64,
    pub sequence_name: String,
    pub scene_id: u64,
    pub scene_name: String,
    pub mentions: Vec<DetectedMention>,
    /// Served from the scan cache
    #[serde(default)]
    pub cached: bool,
}

/// Mentions found in one manuscript file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManuscriptReport {
    pub file_name: String,
    pub mentions: Vec<DetectedMention>,
}
