//! Word and character counting
//!
//! Walks the project tree and sums the scene contents, honoring the
//! reader's display preferences.

use crate::detection::text::strip_markup;
use crate::types::{Part, Project, Scene, Sequence};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountUnit {
    #[default]
    Words,
    Characters,
}

impl std::str::FromStr for CountUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "words" | "word" | "w" => Ok(CountUnit::Words),
            "characters" | "chars" | "c" => Ok(CountUnit::Characters),
            _ => Err(format!("Unknown unit: {}. Use words or characters", s)),
        }
    }
}

impl std::fmt::Display for CountUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountUnit::Words => write!(f, "words"),
            CountUnit::Characters => write!(f, "characters"),
        }
    }
}

/// Display preferences for counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountPreferences {
    pub unit: CountUnit,
    /// Count whitespace when counting characters
    pub include_spaces: bool,
    /// Add part/sequence/scene descriptions to the totals
    pub include_descriptions: bool,
}

impl Default for CountPreferences {
    fn default() -> Self {
        Self {
            unit: CountUnit::Words,
            include_spaces: true,
            include_descriptions: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Project,
    Part,
    Sequence,
    Scene,
}

/// Count of one tree node, children included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCount {
    pub kind: NodeKind,
    pub id: u64,
    pub name: String,
    pub total: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeCount>,
}

/// Count rich text according to `prefs`
pub fn count_text(text: &str, prefs: &CountPreferences) -> usize {
    let plain = strip_markup(text);
    match prefs.unit {
        CountUnit::Words => plain.unicode_words().count(),
        CountUnit::Characters if prefs.include_spaces => plain.graphemes(true).count(),
        CountUnit::Characters => plain
            .graphemes(true)
            .filter(|g| !g.chars().all(char::is_whitespace))
            .count(),
    }
}

/// Count a whole project tree
pub fn count_project(project: &Project, prefs: &CountPreferences) -> NodeCount {
    let children: Vec<NodeCount> = project.parts.iter().map(|p| count_part(p, prefs)).collect();
    node(NodeKind::Project, project.id, &project.name, &project.description, children, prefs)
}

fn count_part(part: &Part, prefs: &CountPreferences) -> NodeCount {
    let children = part.sequences.iter().map(|s| count_sequence(s, prefs)).collect();
    node(NodeKind::Part, part.id, &part.name, &part.description, children, prefs)
}

fn count_sequence(sequence: &Sequence, prefs: &CountPreferences) -> NodeCount {
    let children = sequence.scenes.iter().map(|s| count_scene(s, prefs)).collect();
    node(NodeKind::Sequence, sequence.id, &sequence.name, &sequence.description, children, prefs)
}

fn count_scene(scene: &Scene, prefs: &CountPreferences) -> NodeCount {
    let mut count = node(NodeKind::Scene, scene.id, &scene.name, &scene.description, Vec::new(), prefs);
    count.total += count_text(&scene.content, prefs);
    count
}

fn node(
    kind: NodeKind,
    id: u64,
    name: &str,
    description: &str,
    children: Vec<NodeCount>,
    prefs: &CountPreferences,
) -> NodeCount {
    let own = if prefs.include_descriptions {
        count_text(description, prefs)
    } else {
        0
    };
    NodeCount {
        kind,
        id,
        name: name.to_string(),
        total: own + children.iter().map(|c| c.total).sum::<usize>(),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        Project {
            id: 1,
            name: "Roman".to_string(),
            description: "Une histoire".to_string(),
            parts: vec![Part {
                id: 10,
                name: "Partie 1".to_string(),
                sequences: vec![Sequence {
                    id: 100,
                    name: "Début".to_string(),
                    description: "Le départ".to_string(),
                    scenes: vec![
                        Scene {
                            id: 1000,
                            content: "<p>Il était une fois</p>".to_string(),
                            ..Default::default()
                        },
                        Scene {
                            id: 1001,
                            content: "<p>Harry court.</p><p>Vite !</p>".to_string(),
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_count_words() {
        let prefs = CountPreferences::default();
        assert_eq!(count_text("<p>Il était une fois</p>", &prefs), 4);
        assert_eq!(count_text("", &prefs), 0);
        assert_eq!(count_text("Harry, Ron ; Hermione !", &prefs), 3);
    }

    #[test]
    fn test_count_characters() {
        let with_spaces = CountPreferences {
            unit: CountUnit::Characters,
            ..Default::default()
        };
        let without_spaces = CountPreferences {
            include_spaces: false,
            ..with_spaces
        };
        assert_eq!(count_text("<b>Zoé</b>  rit", &with_spaces), 7);
        assert_eq!(count_text("<b>Zoé</b>  rit", &without_spaces), 6);
    }

    #[test]
    fn test_count_project_tree() {
        let tree = count_project(&project(), &CountPreferences::default());
        assert_eq!(tree.kind, NodeKind::Project);
        assert_eq!(tree.total, 7);

        let sequence = &tree.children[0].children[0];
        assert_eq!(sequence.kind, NodeKind::Sequence);
        let scene_totals: Vec<usize> = sequence.children.iter().map(|c| c.total).collect();
        assert_eq!(scene_totals, vec![4, 3]);
    }

    #[test]
    fn test_count_project_with_descriptions() {
        let prefs = CountPreferences {
            include_descriptions: true,
            ..Default::default()
        };
        let tree = count_project(&project(), &prefs);
        // "Une histoire" + "Le départ"
        assert_eq!(tree.total, 7 + 2 + 2);
        assert_eq!(tree.children[0].children[0].total, 7 + 2);
    }

    #[test]
    fn test_count_unit_from_str() {
        assert_eq!("words".parse::<CountUnit>(), Ok(CountUnit::Words));
        assert_eq!("CHARS".parse::<CountUnit>(), Ok(CountUnit::Characters));
        assert!("pages".parse::<CountUnit>().is_err());
    }
}
