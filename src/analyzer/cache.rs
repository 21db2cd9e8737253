//! Scan result cache
//!
//! Detection results are keyed by a SHA-256 of the scene content, the
//! roster and the thresholds, so any edit to one of them invalidates the
//! entry. The cache file sits next to the project file and may hold
//! several projects; each scan drops its own project's stale keys.

use crate::error::Result;
use recit_common::{DetectedMention, DetectionConfig, Personnage};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

pub const CACHE_FILE_NAME: &str = ".recit-scan-cache.json";

/// Cache file layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanCache {
    /// Format version; a mismatch discards the file
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub project_id: u64,
    pub scene_id: u64,
    pub mentions: Vec<DetectedMention>,
}

impl ScanCache {
    const CURRENT_VERSION: u32 = 2;

    /// Load the cache of `folder`, or an empty one when missing or unreadable
    pub fn load(folder: &Path) -> Self {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(path = %cache_path.display(), error = %e, "cannot open cache");
                return Self::default();
            }
        };

        match serde_json::from_reader::<_, ScanCache>(BufReader::new(file)) {
            Ok(cache) if cache.version == Self::CURRENT_VERSION => cache,
            Ok(cache) => {
                tracing::info!(found = cache.version, "cache version mismatch, rebuilding");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(path = %cache_path.display(), error = %e, "corrupt cache ignored");
                Self::default()
            }
        }
    }

    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&[DetectedMention]> {
        self.entries.get(key).map(|e| e.mentions.as_slice())
    }

    pub fn insert(&mut self, key: String, project_id: u64, scene_id: u64, mentions: Vec<DetectedMention>) {
        self.entries.insert(
            key,
            CacheEntry {
                project_id,
                scene_id,
                mentions,
            },
        );
    }

    /// Drop the entries of `project_id` whose key is not in `live`
    ///
    /// # Returns
    /// Number of entries removed
    pub fn retain_live(&mut self, project_id: u64, live: &HashSet<&str>) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|key, entry| entry.project_id != project_id || live.contains(key.as_str()));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// Delete the cache file of `folder`
    ///
    /// # Returns
    /// `true` if a file was removed
    pub fn clear(folder: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(folder);
        if cache_path.exists() {
            std::fs::remove_file(cache_path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

impl Default for ScanCache {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// Cache key of one scene scan
pub fn cache_key(content: &str, personnages: &[Personnage], config: &DetectionConfig) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update([0u8]);
    hasher.update(serde_json::to_vec(personnages)?);
    hasher.update([0u8]);
    hasher.update(serde_json::to_vec(config)?);
    Ok(hex::encode(hasher.finalize()))
}
