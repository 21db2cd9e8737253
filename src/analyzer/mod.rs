//! Batch detection over projects and manuscript folders
//!
//! ## Flow
//! 1. Collect the scenes (or manuscript files)
//! 2. Look up the scan cache when enabled
//! 3. Detect the remaining ones in parallel (rayon)
//! 4. Store fresh results back into the cache

pub mod cache;
mod types;

pub use cache::ScanCache;
pub use types::{ManuscriptReport, SceneReport};

use crate::error::Result;
use crate::scanner::Manuscript;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use recit_common::{detect_mentions, DetectionConfig, Personnage, Project};
use std::collections::HashSet;
use std::path::Path;

fn progress_bar(len: usize, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

/// Detect mentions in every scene of `project`
///
/// # Arguments
/// * `personnages` - characters to look for
/// * `cache_dir` - folder holding the scan cache, `None` to disable it
/// * `show_progress` - draw a progress bar on stderr
///
/// # Returns
/// One report per scene, in project order
pub fn analyze_project(
    project: &Project,
    personnages: &[Personnage],
    config: &DetectionConfig,
    cache_dir: Option<&Path>,
    show_progress: bool,
) -> Result<Vec<SceneReport>> {
    let mut cache = cache_dir.map(ScanCache::load);
    let scenes: Vec<_> = project.scenes().collect();

    let keys = scenes
        .iter()
        .map(|(_, scene)| cache::cache_key(&scene.content, personnages, config))
        .collect::<Result<Vec<_>>>()?;

    let pb = progress_bar(scenes.len(), show_progress);
    pb.set_message(project.name.clone());

    let reports: Vec<SceneReport> = scenes
        .par_iter()
        .zip(keys.par_iter())
        .map(|((sequence, scene), key)| {
            let cached = cache.as_ref().and_then(|c| c.get(key));
            let (mentions, hit) = match cached {
                Some(mentions) => (mentions.to_vec(), true),
                None => (detect_mentions(&scene.content, personnages, config), false),
            };
            pb.inc(1);

            SceneReport {
                sequence_id: sequence.id,
                sequence_name: sequence.name.clone(),
                scene_id: scene.id,
                scene_name: scene.name.clone(),
                mentions,
                cached: hit,
            }
        })
        .collect();

    pb.finish_and_clear();

    let hits = reports.iter().filter(|r| r.cached).count();
    tracing::info!(project = %project.name, scenes = reports.len(), cache_hits = hits, "project scanned");

    if let (Some(cache), Some(dir)) = (cache.as_mut(), cache_dir) {
        let live: HashSet<&str> = keys.iter().map(String::as_str).collect();
        let stale = cache.retain_live(project.id, &live);
        if stale > 0 {
            tracing::debug!(project = %project.name, stale, "stale cache entries dropped");
        }

        for (report, key) in reports.iter().zip(&keys) {
            if !report.cached {
                cache.insert(key.clone(), project.id, report.scene_id, report.mentions.clone());
            }
        }
        cache.save(dir)?;
    }

    Ok(reports)
}

/// Detect mentions in every manuscript file
///
/// Unreadable files are logged and skipped.
pub fn analyze_manuscripts(
    manuscripts: &[Manuscript],
    personnages: &[Personnage],
    config: &DetectionConfig,
    show_progress: bool,
) -> Vec<ManuscriptReport> {
    let pb = progress_bar(manuscripts.len(), show_progress);

    let reports = manuscripts
        .par_iter()
        .filter_map(|manuscript| {
            pb.inc(1);
            match std::fs::read_to_string(&manuscript.path) {
                Ok(content) => Some(ManuscriptReport {
                    file_name: manuscript.file_name.clone(),
                    mentions: detect_mentions(&content, personnages, config),
                }),
                Err(e) => {
                    tracing::warn!(file = %manuscript.file_name, error = %e, "skipping manuscript");
                    None
                }
            }
        })
        .collect();

    pb.finish_and_clear();
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use recit_common::{Part, Scene, Sequence};

    fn project() -> Project {
        Project {
            id: 1,
            name: "Saga".to_string(),
            parts: vec![Part {
                id: 1,
                sequences: vec![Sequence {
                    id: 7,
                    name: "Ouverture".to_string(),
                    scenes: vec![
                        Scene {
                            id: 70,
                            content: "<p>Hary entre.</p>".to_string(),
                            ..Default::default()
                        },
                        Scene {
                            id: 71,
                            content: "<p>Personne.</p>".to_string(),
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
    fn test_analyze_project_without_cache() {
        let personnages = vec![Personnage::new(1, "Harry")];
        let reports =
            analyze_project(&project(), &personnages, &DetectionConfig::default(), None, false).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].scene_id, 70);
        assert_eq!(reports[0].mentions[0].personnage_id(), Some(1));
        assert!(reports[1].mentions.is_empty());
        assert!(reports.iter().all(|r| !r.cached));
    }

    #[test]
    fn test_analyze_project_uses_cache_on_second_run() {
        let dir = tempfile::tempdir().unwrap();
        let personnages = vec![Personnage::new(1, "Harry")];
        let config = DetectionConfig::default();

        let first = analyze_project(&project(), &personnages, &config, Some(dir.path()), false).unwrap();
        assert!(first.iter().all(|r| !r.cached));
        assert_eq!(ScanCache::load(dir.path()).len(), 2);

        let second = analyze_project(&project(), &personnages, &config, Some(dir.path()), false).unwrap();
        assert!(second.iter().all(|r| r.cached));
        assert_eq!(first[0].mentions, second[0].mentions);
    }
}
