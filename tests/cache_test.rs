//! Scan cache behaviour
//!
//! Loading, saving, clearing and the interaction with project scans.

use recit_common::{DetectionConfig, Part, Personnage, Project, Scene, Sequence};
use recit_rust::analyzer::cache::{cache_key, ScanCache, CACHE_FILE_NAME};
use recit_rust::analyzer::analyze_project;
use tempfile::tempdir;

fn project(content: &str) -> Project {
    Project {
        id: 1,
        name: "Saga".to_string(),
        parts: vec![Part {
            id: 1,
            sequences: vec![Sequence {
                id: 2,
                scenes: vec![Scene {
                    id: 3,
                    content: content.to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    }
}

#[test]
fn test_cache_file_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let cache = ScanCache::load(dir.path());

    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
}

#[test]
fn test_cache_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let personnages = vec![Personnage::new(1, "Harry")];
    let config = DetectionConfig::default();
    let mentions = recit_common::detect_mentions("Harry", &personnages, &config);
    let key = cache_key("Harry", &personnages, &config).unwrap();

    let mut cache = ScanCache::load(dir.path());
    cache.insert(key.clone(), 1, 3, mentions.clone());
    cache.save(dir.path()).expect("cache save failed");

    assert!(dir.path().join(CACHE_FILE_NAME).exists());

    let loaded = ScanCache::load(dir.path());
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get(&key), Some(mentions.as_slice()));
    assert!(loaded.get("unknown").is_none());
}

#[test]
fn test_corrupt_cache_is_ignored() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join(CACHE_FILE_NAME), "{ not json").unwrap();

    assert!(ScanCache::load(dir.path()).is_empty());
}

#[test]
fn test_cache_clear() {
    let dir = tempdir().expect("Failed to create temp dir");
    ScanCache::default().save(dir.path()).unwrap();

    assert!(ScanCache::clear(dir.path()).unwrap());
    assert!(!ScanCache::clear(dir.path()).unwrap());
}

/// Editing a scene replaces its entry instead of piling up keys
#[test]
fn test_edited_scene_is_rescanned() {
    let dir = tempdir().expect("Failed to create temp dir");
    let personnages = vec![Personnage::new(1, "Harry"), Personnage::new(2, "Ron")];
    let config = DetectionConfig::default();

    analyze_project(&project("Harry"), &personnages, &config, Some(dir.path()), false).unwrap();
    let edited = analyze_project(&project("Ron"), &personnages, &config, Some(dir.path()), false).unwrap();

    assert!(!edited[0].cached);
    assert_eq!(edited[0].mentions[0].personnage_id(), Some(2));
    assert_eq!(ScanCache::load(dir.path()).len(), 1);
}

/// Another project sharing the folder keeps its entries
#[test]
fn test_projects_share_cache_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let personnages = vec![Personnage::new(1, "Harry")];
    let config = DetectionConfig::default();
    let mut other = project("Harry encore");
    other.id = 2;

    analyze_project(&other, &personnages, &config, Some(dir.path()), false).unwrap();
    analyze_project(&project("Harry"), &personnages, &config, Some(dir.path()), false).unwrap();
    analyze_project(&project("Harry part"), &personnages, &config, Some(dir.path()), false).unwrap();

    assert_eq!(ScanCache::load(dir.path()).len(), 2);
    let again = analyze_project(&other, &personnages, &config, Some(dir.path()), false).unwrap();
    assert!(again[0].cached);
}
