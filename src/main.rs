use clap::Parser;
use recit_common::{
    analytics, count_project, personnage_slug, CharacterRoster, CountPreferences, DetectionOverrides,
    Personnage, Project, Statistics,
};
use recit_rust::{analyzer, cli, config, error, logging, report, review, scanner};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::path::{Path, PathBuf};

/// Recent scenes listed for a single project
const PROJECT_RECENT_SCENES: usize = 5;

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // --reset must work even when the saved file is unreadable
    let mut config = match cli.command {
        Commands::Config { reset: true, .. } => Config::default(),
        _ => Config::load()?,
    };

    match cli.command {
        Commands::Detect { file, characters, detection, json } => {
            let detection = config.detection_config(&detection.overrides())?;
            let personnages = scanner::load_personnages(&characters)?;
            if !file.exists() {
                return Err(error::RecitError::FileNotFound(file.display().to_string()));
            }
            let content = std::fs::read_to_string(&file)?;

            let mentions = recit_common::detect_mentions(&content, &personnages, &detection);
            if json {
                println!("{}", serde_json::to_string_pretty(&mentions)?);
            } else {
                println!("{}", file.display());
                report::print_mentions(&mentions);
            }
        }

        Commands::Scan { project, characters, detection, use_cache, json } => {
            let detection = config.detection_config(&detection.overrides())?;
            let loaded = scanner::load_project(&project)?;
            let personnages = resolve_personnages(&loaded, characters.as_deref())?;
            let cache_dir = use_cache.then(|| parent_dir(&project));

            let reports = analyzer::analyze_project(
                &loaded,
                &personnages,
                &detection,
                cache_dir.as_deref(),
                !json,
            )?;

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                report::print_scene_reports(&reports);
            }
        }

        Commands::Folder { folder, characters, detection, recursive, json } => {
            let detection = config.detection_config(&detection.overrides())?;
            let personnages = scanner::load_personnages(&characters)?;
            let manuscripts = scanner::scan_folder(&folder, recursive)?;

            if manuscripts.is_empty() {
                return Err(error::RecitError::NoManuscriptsFound(folder.display().to_string()));
            }

            let reports = analyzer::analyze_manuscripts(&manuscripts, &personnages, &detection, !json);
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                report::print_manuscript_reports(&reports);
            }
        }

        Commands::Review { project, sequence, characters, detection, output } => {
            let detection = config.detection_config(&detection.overrides())?;
            let loaded = scanner::load_project(&project)?;
            let roster = CharacterRoster::new(resolve_personnages(&loaded, characters.as_deref())?);

            review::run_interactive_review(&loaded, sequence, &roster, &detection, output.as_deref())?;
        }

        Commands::Stats { projects, project_id, json } => {
            let loaded = scanner::load_projects(&projects);

            if let Some(id) = project_id {
                let Some(project_stats) = analytics::project_stats(&loaded, id) else {
                    println!("Project {} not found", id);
                    return Ok(());
                };
                let recent = analytics::recent_scenes_by_project(&loaded, id, PROJECT_RECENT_SCENES);
                if json {
                    let value = serde_json::json!({ "project": project_stats, "recentScenes": recent });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                } else {
                    report::print_project_stats(&project_stats, &recent);
                }
            } else {
                let stats = Statistics::compute(&loaded);
                if json {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                } else {
                    report::print_statistics(&stats, &analytics::project_statistics(&loaded));
                }
            }
        }

        Commands::Count { project, unit, no_spaces, descriptions, json } => {
            let loaded = scanner::load_project(&project)?;
            let prefs = CountPreferences {
                unit: unit.unwrap_or(config.count.unit),
                include_spaces: config.count.include_spaces && !no_spaces,
                include_descriptions: config.count.include_descriptions || descriptions,
            };

            let tree = count_project(&loaded, &prefs);
            if json {
                println!("{}", serde_json::to_string_pretty(&tree)?);
            } else {
                println!("Unit: {}", prefs.unit);
                for line in report::format_count_tree(&tree) {
                    println!("{}", line);
                }
            }
        }

        Commands::Slug { characters, find } => {
            let roster = CharacterRoster::new(scanner::load_personnages(&characters)?);

            match find {
                Some(slug) => match roster.find_by_slug(&slug) {
                    Some(p) => println!("{} {}", p.id, p.display_name()),
                    None => println!("No character for slug: {}", slug),
                },
                None => {
                    for p in roster.iter() {
                        println!("{:<24} {}", personnage_slug(p), p.display_name());
                    }
                }
            }
        }

        Commands::Config { show, set_max_distance, set_min_length, set_min_confidence, reset } => {
            if reset {
                config.reset()?;
                println!("Settings reset");
            }

            let updates = DetectionOverrides {
                max_distance: set_max_distance,
                min_length: set_min_length,
                min_confidence: set_min_confidence,
            };
            if !updates.is_empty() {
                config.set_detection(&updates)?;
                println!("Settings saved: {}", Config::config_path()?.display());
            }

            if show || (!reset && updates.is_empty()) {
                let effective = config.detection_config(&DetectionOverrides::default())?;
                println!("Config file: {}", Config::config_path()?.display());
                println!("Detection:");
                println!("  max distance:   {}", effective.max_distance());
                println!("  min length:     {}", effective.min_length());
                println!("  min confidence: {}", effective.min_confidence());
                println!("Count:");
                println!("  unit:           {}", config.count.unit);
                println!("  spaces:         {}", config.count.include_spaces);
                println!("  descriptions:   {}", config.count.include_descriptions);
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| PathBuf::from("."));
            let cache_path = analyzer::ScanCache::cache_path(&target);

            if info || !clear {
                if cache_path.exists() {
                    let cache = analyzer::ScanCache::load(&target);
                    println!("Cache:");
                    println!("  path:    {}", cache_path.display());
                    println!("  entries: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  size:    {} bytes", meta.len());
                    }
                } else {
                    println!("No cache file: {}", cache_path.display());
                }
            }

            if clear {
                if analyzer::ScanCache::clear(&target)? {
                    println!("Cache deleted: {}", cache_path.display());
                } else {
                    println!("No cache file");
                }
            }
        }
    }

    Ok(())
}

/// Characters from `--characters`, or the project's own list
fn resolve_personnages(project: &Project, characters: Option<&Path>) -> Result<Vec<Personnage>> {
    match characters {
        Some(path) => scanner::load_personnages(path),
        None => Ok(project.personnages.clone()),
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
