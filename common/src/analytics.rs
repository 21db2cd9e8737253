//! Project analytics
//!
//! Totals, averages and recent scenes across every loaded project.

use crate::types::{Project, Scene};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Scenes listed in the global statistics
pub const RECENT_SCENES_LIMIT: usize = 10;

/// Data older than this is reloaded
pub const REFRESH_AFTER_MINUTES: i64 = 5;

/// Scene with the names of its project and sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentScene {
    #[serde(flatten)]
    pub scene: Scene,
    pub project_name: String,
    pub sequence_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_projects: usize,
    pub total_parts: usize,
    pub total_sequences: usize,
    pub total_scenes: usize,
    pub total_personnages: usize,
    pub average_parts_per_project: f64,
    pub average_sequences_per_part: f64,
    pub average_scenes_per_sequence: f64,
    pub recent_scenes: Vec<RecentScene>,
}

/// Counts of a single project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatistics {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub parts: usize,
    pub sequences: usize,
    pub scenes: usize,
    pub personnages: usize,
}

impl ProjectStatistics {
    pub fn of(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            slug: project.slug.clone(),
            parts: project.parts.len(),
            sequences: project.sequences().count(),
            scenes: project.scenes().count(),
            personnages: project.personnages.len(),
        }
    }
}

impl Statistics {
    pub fn compute(projects: &[Project]) -> Self {
        if projects.is_empty() {
            return Self::default();
        }

        let per_project: Vec<ProjectStatistics> = projects.iter().map(ProjectStatistics::of).collect();
        let total_parts: usize = per_project.iter().map(|p| p.parts).sum();
        let total_sequences: usize = per_project.iter().map(|p| p.sequences).sum();
        let total_scenes: usize = per_project.iter().map(|p| p.scenes).sum();
        let total_personnages: usize = per_project.iter().map(|p| p.personnages).sum();

        let mut recent_scenes: Vec<RecentScene> = projects.iter().flat_map(recent_scenes_of).collect();
        sort_recent_first(&mut recent_scenes);
        recent_scenes.truncate(RECENT_SCENES_LIMIT);

        Self {
            total_projects: projects.len(),
            total_parts,
            total_sequences,
            total_scenes,
            total_personnages,
            average_parts_per_project: average(total_parts, projects.len()),
            average_sequences_per_part: average(total_sequences, total_parts),
            average_scenes_per_sequence: average(total_scenes, total_sequences),
            recent_scenes,
        }
    }
}

/// Statistics of every project, in input order
pub fn project_statistics(projects: &[Project]) -> Vec<ProjectStatistics> {
    projects.iter().map(ProjectStatistics::of).collect()
}

/// Statistics of the project with `project_id`
pub fn project_stats(projects: &[Project], project_id: u64) -> Option<ProjectStatistics> {
    projects
        .iter()
        .find(|p| p.id == project_id)
        .map(ProjectStatistics::of)
}

/// Most recent scenes of one project (highest id first)
pub fn recent_scenes_by_project(projects: &[Project], project_id: u64, limit: usize) -> Vec<RecentScene> {
    let Some(project) = projects.iter().find(|p| p.id == project_id) else {
        return Vec::new();
    };

    let mut scenes: Vec<RecentScene> = recent_scenes_of(project).collect();
    sort_recent_first(&mut scenes);
    scenes.truncate(limit);
    scenes
}

fn recent_scenes_of(project: &Project) -> impl Iterator<Item = RecentScene> + '_ {
    project.scenes().map(move |(sequence, scene)| RecentScene {
        scene: scene.clone(),
        project_name: project.name.clone(),
        sequence_name: sequence.name.clone(),
    })
}

// Scene ids grow with creation time.
fn sort_recent_first(scenes: &mut [RecentScene]) {
    scenes.sort_by(|a, b| b.scene.id.cmp(&a.scene.id));
}

/// Ratio rounded to one decimal, 0 when `count` is 0
fn average(total: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let ratio = total as f64 / count as f64;
    (ratio * 10.0).round() / 10.0
}

/// Loaded projects plus the time they were loaded
#[derive(Debug, Clone, Default)]
pub struct AnalyticsSnapshot {
    projects: Vec<Project>,
    last_updated: Option<DateTime<Utc>>,
}

impl AnalyticsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, projects: Vec<Project>, now: DateTime<Utc>) {
        self.projects = projects;
        self.last_updated = Some(now);
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Never loaded, empty, or older than five minutes
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match self.last_updated {
            None => true,
            Some(_) if self.projects.is_empty() => true,
            Some(at) => at < now - Duration::minutes(REFRESH_AFTER_MINUTES),
        }
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::compute(&self.projects)
    }
}
