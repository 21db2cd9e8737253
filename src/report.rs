//! Terminal output of detection results, statistics and counts

use crate::analyzer::{ManuscriptReport, SceneReport};
use recit_common::{
    DetectedMention, NodeCount, NodeKind, ProjectStatistics, RecentScene, Statistics,
};

/// One line per mention: token, character, field, confidence
pub fn format_mention(mention: &DetectedMention) -> String {
    let name = mention
        .personnage
        .as_ref()
        .map(|p| p.display_name())
        .unwrap_or_else(|| "?".to_string());
    let field = match mention.matched_field {
        recit_common::NameField::First => "first name",
        recit_common::NameField::Last => "last name",
    };
    format!(
        "{:<16} -> {} [{}] {:.0}%",
        mention.name,
        name,
        field,
        mention.confidence * 100.0
    )
}

pub fn print_mentions(mentions: &[DetectedMention]) {
    if mentions.is_empty() {
        println!("  (no character detected)");
        return;
    }
    for mention in mentions {
        println!("  {}", format_mention(mention));
    }
}

pub fn print_scene_reports(reports: &[SceneReport]) {
    let mut current_sequence = None;
    for report in reports {
        if current_sequence != Some(report.sequence_id) {
            current_sequence = Some(report.sequence_id);
            println!("Sequence {} {}", report.sequence_id, report.sequence_name);
        }
        println!(
            " Scene {} {}{}",
            report.scene_id,
            report.scene_name,
            if report.cached { " (cached)" } else { "" }
        );
        print_mentions(&report.mentions);
    }
}

pub fn print_manuscript_reports(reports: &[ManuscriptReport]) {
    for report in reports {
        println!("{}", report.file_name);
        print_mentions(&report.mentions);
    }
}

pub fn print_statistics(stats: &Statistics, per_project: &[ProjectStatistics]) {
    println!("Projects:   {}", stats.total_projects);
    println!("Parts:      {} ({:.1} per project)", stats.total_parts, stats.average_parts_per_project);
    println!("Sequences:  {} ({:.1} per part)", stats.total_sequences, stats.average_sequences_per_part);
    println!("Scenes:     {} ({:.1} per sequence)", stats.total_scenes, stats.average_scenes_per_sequence);
    println!("Characters: {}", stats.total_personnages);

    if !per_project.is_empty() {
        println!();
        for p in per_project {
            println!("  {}", format_project_line(p));
        }
    }

    print_recent_scenes(&stats.recent_scenes);
}

/// Counts of one project, without the cross-project totals
pub fn format_project_stats(project: &ProjectStatistics) -> Vec<String> {
    vec![
        format!("Project:    {} [{}]", project.name, project.slug),
        format!("Parts:      {}", project.parts),
        format!("Sequences:  {}", project.sequences),
        format!("Scenes:     {}", project.scenes),
        format!("Characters: {}", project.personnages),
    ]
}

pub fn print_project_stats(project: &ProjectStatistics, recent_scenes: &[RecentScene]) {
    for line in format_project_stats(project) {
        println!("{}", line);
    }
    print_recent_scenes(recent_scenes);
}

fn format_project_line(p: &ProjectStatistics) -> String {
    format!(
        "{} [{}] parts={} sequences={} scenes={} characters={}",
        p.name, p.slug, p.parts, p.sequences, p.scenes, p.personnages
    )
}

fn print_recent_scenes(recent_scenes: &[RecentScene]) {
    if recent_scenes.is_empty() {
        return;
    }
    println!("\nRecent scenes:");
    for recent in recent_scenes {
        println!(
            "  #{} {} ({} / {})",
            recent.scene.id, recent.scene.name, recent.project_name, recent.sequence_name
        );
    }
}

/// Indented count tree
pub fn format_count_tree(root: &NodeCount) -> Vec<String> {
    let mut lines = Vec::new();
    push_count(root, 0, &mut lines);
    lines
}

fn push_count(node: &NodeCount, depth: usize, lines: &mut Vec<String>) {
    let label = match node.kind {
        NodeKind::Project => "Project",
        NodeKind::Part => "Part",
        NodeKind::Sequence => "Sequence",
        NodeKind::Scene => "Scene",
    };
    lines.push(format!("{}{} {}: {}", "  ".repeat(depth), label, node.name, node.total));
    for child in &node.children {
        push_count(child, depth + 1, lines);
    }
}
