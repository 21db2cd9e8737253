//! Character reference table
//!
//! Holds the characters of the project currently loaded. The list is
//! replaced wholesale when another project is loaded, and patched locally
//! after a character is saved or deleted on the server.

use crate::detection::{detect_mentions, DetectedMention, DetectionConfig};
use crate::types::Personnage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterRoster {
    personnages: Vec<Personnage>,
}

impl CharacterRoster {
    pub fn new(personnages: Vec<Personnage>) -> Self {
        Self { personnages }
    }

    /// Replace the whole table (project change)
    pub fn set_personnages(&mut self, personnages: Vec<Personnage>) {
        tracing::debug!(count = personnages.len(), "initializing personnage reference table");
        self.personnages = personnages;
    }

    /// Replace by id, or append when unknown
    pub fn upsert(&mut self, personnage: Personnage) {
        match self.personnages.iter_mut().find(|p| p.id == personnage.id) {
            Some(existing) => *existing = personnage,
            None => self.personnages.push(personnage),
        }
    }

    /// Remove by id, `true` if something was removed
    pub fn remove(&mut self, personnage_id: u64) -> bool {
        let before = self.personnages.len();
        self.personnages.retain(|p| p.id != personnage_id);
        self.personnages.len() != before
    }

    pub fn get(&self, personnage_id: u64) -> Option<&Personnage> {
        self.personnages.iter().find(|p| p.id == personnage_id)
    }

    pub fn by_project(&self, project_id: u64) -> Vec<&Personnage> {
        self.personnages
            .iter()
            .filter(|p| p.project_id == Some(project_id))
            .collect()
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Personnage> {
        crate::slug::find_by_slug(&self.personnages, slug)
    }

    /// Run mention detection against this snapshot
    pub fn detect(&self, content: &str, config: &DetectionConfig) -> Vec<DetectedMention> {
        detect_mentions(content, &self.personnages, config)
    }

    pub fn as_slice(&self) -> &[Personnage] {
        &self.personnages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Personnage> {
        self.personnages.iter()
    }

    pub fn len(&self) -> usize {
        self.personnages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personnages.is_empty()
    }
}

impl From<Vec<Personnage>> for CharacterRoster {
    fn from(personnages: Vec<Personnage>) -> Self {
        Self::new(personnages)
    }
}
