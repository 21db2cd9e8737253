//! Project tree type definitions
//!
//! JSON shapes exported by the writing API:
//! - Project → Part → Sequence → Scene
//! - Personnage: characters owned by a project
//!
//! The API mixes camelCase (`firstName`) with snake_case foreign keys
//! (`project_id`), so foreign keys carry explicit renames.

use serde::{Deserialize, Serialize};

/// Character of a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personnage {
    pub id: u64,

    pub first_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weakness: Option<String>,

    #[serde(default, rename = "project_id", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
}

impl Personnage {
    pub fn new(id: u64, first_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            ..Default::default()
        }
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Last name, `None` when missing or blank
    pub fn last_name(&self) -> Option<&str> {
        self.last_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// "First Last", skipping empty parts
    pub fn display_name(&self) -> String {
        [Some(self.first_name.trim()), self.last_name()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub position: i64,

    #[serde(default, rename = "sequence_id", skip_serializing_if = "Option::is_none")]
    pub sequence_id: Option<u64>,

    #[serde(default, rename = "status_id", skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u64>,

    /// Rich text (HTML)
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequence {
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub position: i64,

    #[serde(default, rename = "part_id", skip_serializing_if = "Option::is_none")]
    pub part_id: Option<u64>,

    #[serde(default, rename = "status_id", skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u64>,

    #[serde(default)]
    pub scenes: Vec<Scene>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intention: Option<String>,

    #[serde(default, rename = "aesthetic_idea", skip_serializing_if = "Option::is_none")]
    pub aesthetic_idea: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub position: i64,

    #[serde(default, rename = "project_id", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,

    #[serde(default)]
    pub sequences: Vec<Sequence>,

    #[serde(default, rename = "status_id", skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub parts: Vec<Part>,

    #[serde(default)]
    pub personnages: Vec<Personnage>,
}

impl Project {
    /// All sequences, part by part
    pub fn sequences(&self) -> impl Iterator<Item = &Sequence> {
        self.parts.iter().flat_map(|p| p.sequences.iter())
    }

    /// All scenes with their owning sequence
    pub fn scenes(&self) -> impl Iterator<Item = (&Sequence, &Scene)> {
        self.sequences()
            .flat_map(|seq| seq.scenes.iter().map(move |scene| (seq, scene)))
    }

    pub fn find_sequence(&self, sequence_id: u64) -> Option<&Sequence> {
        self.sequences().find(|s| s.id == sequence_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        serde_json::from_str(
            r#"{
                "id": 1,
                "name": "Saga",
                "slug": "saga",
                "parts": [
                    {
                        "id": 10,
                        "name": "Acte I",
                        "position": 1,
                        "project_id": 1,
                        "sequences": [
                            {
                                "id": 100,
                                "name": "Ouverture",
                                "part_id": 10,
                                "aesthetic_idea": "brume",
                                "scenes": [
                                    {"id": 1000, "name": "Gare", "sequence_id": 100, "content": "<p>Harry</p>"},
                                    {"id": 1001, "name": "Train", "sequence_id": 100}
                                ]
                            }
                        ]
                    },
                    {"id": 11, "name": "Acte II"}
                ],
                "personnages": [
                    {"id": 1, "firstName": "Harry", "lastName": "Potter", "project_id": 1}
                ]
            }"#,
        )
        .expect("deserialize failed")
    }

    #[test]
    fn test_project_deserialize_tree() {
        let project = sample_project();
        assert_eq!(project.parts.len(), 2);
        assert!(project.parts[1].sequences.is_empty());
        assert_eq!(project.parts[0].sequences[0].aesthetic_idea.as_deref(), Some("brume"));
        assert_eq!(project.personnages[0].project_id, Some(1));
        assert_eq!(project.parts[0].sequences[0].scenes[1].content, "");
    }

    #[test]
    fn test_project_flatten() {
        let project = sample_project();
        assert_eq!(project.sequences().count(), 1);
        let scene_ids: Vec<u64> = project.scenes().map(|(_, s)| s.id).collect();
        assert_eq!(scene_ids, vec![1000, 1001]);
        assert_eq!(project.find_sequence(100).map(|s| s.name.as_str()), Some("Ouverture"));
        assert!(project.find_sequence(999).is_none());
    }

    #[test]
    fn test_personnage_serialize_shape() {
        let p = Personnage {
            project_id: Some(3),
            ..Personnage::new(7, "Hermione").with_last_name("Granger")
        };
        let json = serde_json::to_string(&p).expect("serialize failed");
        assert!(json.contains("\"firstName\":\"Hermione\""));
        assert!(json.contains("\"lastName\":\"Granger\""));
        assert!(json.contains("\"project_id\":3"));
        assert!(!json.contains("background"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Personnage::new(1, "Harry").display_name(), "Harry");
        assert_eq!(
            Personnage::new(1, "Harry").with_last_name("Potter").display_name(),
            "Harry Potter"
        );
        // blank last name is treated as missing
        let blank = Personnage::new(1, "Harry").with_last_name("  ");
        assert_eq!(blank.last_name(), None);
        assert_eq!(blank.display_name(), "Harry");
    }
}
