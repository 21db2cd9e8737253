//! Input loading
//!
//! - project exports (`Project` JSON)
//! - character lists (`Personnage[]` or the `{ "personnages": [...] }` metadata shape)
//! - manuscript folders (.txt / .md / .html)

use crate::error::{RecitError, Result};
use recit_common::{Personnage, Project};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct Manuscript {
    pub path: PathBuf,
    pub file_name: String,
}

const MANUSCRIPT_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "html", "htm"];

#[derive(Deserialize)]
#[serde(untagged)]
enum CharactersFile {
    List(Vec<Personnage>),
    Metadata { personnages: Vec<Personnage> },
}

pub fn load_project(path: &Path) -> Result<Project> {
    if !path.exists() {
        return Err(RecitError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| RecitError::InvalidProject(format!("{}: {}", path.display(), e)))
}

/// Load several projects, skipping the ones that fail
pub fn load_projects(paths: &[PathBuf]) -> Vec<Project> {
    paths
        .iter()
        .filter_map(|path| match load_project(path) {
            Ok(project) => Some(project),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping project");
                None
            }
        })
        .collect()
}

pub fn load_personnages(path: &Path) -> Result<Vec<Personnage>> {
    if !path.exists() {
        return Err(RecitError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let file: CharactersFile = serde_json::from_str(&content)
        .map_err(|e| RecitError::InvalidCharacters(format!("{}: {}", path.display(), e)))?;

    Ok(match file {
        CharactersFile::List(personnages) => personnages,
        CharactersFile::Metadata { personnages } => personnages,
    })
}

pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<Manuscript>> {
    if !folder.is_dir() {
        return Err(RecitError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut manuscripts = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() || !is_manuscript(path) {
            continue;
        }

        let file_name = path
            .strip_prefix(folder)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        manuscripts.push(Manuscript {
            path: path.to_path_buf(),
            file_name,
        });
    }

    manuscripts.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(manuscripts)
}

fn is_manuscript(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| MANUSCRIPT_EXTENSIONS.contains(&ext.as_str()))
}
