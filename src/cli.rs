use clap::{Args, Parser, Subcommand};
use recit_common::{CountUnit, DetectionOverrides};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recit")]
#[command(about = "Narrative project toolkit: character mentions, statistics and counts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Detection thresholds given on the command line
#[derive(Args, Debug, Clone, Default)]
pub struct DetectionArgs {
    /// Maximum edit distance (default 3)
    #[arg(long, allow_negative_numbers = true)]
    pub max_distance: Option<i64>,

    /// Minimum token length (default 3)
    #[arg(long, allow_negative_numbers = true)]
    pub min_length: Option<i64>,

    /// Minimum confidence, 0.0-1.0 (default 0.6)
    #[arg(long, allow_negative_numbers = true)]
    pub min_confidence: Option<f64>,
}

impl DetectionArgs {
    pub fn overrides(&self) -> DetectionOverrides {
        DetectionOverrides {
            max_distance: self.max_distance,
            min_length: self.min_length,
            min_confidence: self.min_confidence,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect character mentions in one manuscript file
    Detect {
        #[arg(required = true)]
        file: PathBuf,

        /// Characters JSON (array or {"personnages": [...]})
        #[arg(short, long, required = true)]
        characters: PathBuf,

        #[command(flatten)]
        detection: DetectionArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Detect mentions in every scene of a project export
    Scan {
        #[arg(required = true)]
        project: PathBuf,

        /// Characters JSON (default: the project's own characters)
        #[arg(short, long)]
        characters: Option<PathBuf>,

        #[command(flatten)]
        detection: DetectionArgs,

        /// Reuse results of unchanged scenes
        #[arg(long)]
        use_cache: bool,

        #[arg(long)]
        json: bool,
    },

    /// Detect mentions in every manuscript of a folder
    Folder {
        #[arg(required = true)]
        folder: PathBuf,

        #[arg(short, long, required = true)]
        characters: PathBuf,

        #[command(flatten)]
        detection: DetectionArgs,

        /// Scan subfolders too
        #[arg(short = 'r', long)]
        recursive: bool,

        #[arg(long)]
        json: bool,
    },

    /// Review character suggestions for one sequence
    Review {
        #[arg(required = true)]
        project: PathBuf,

        /// Sequence id
        #[arg(short, long, required = true)]
        sequence: u64,

        /// Characters JSON (default: the project's own characters)
        #[arg(short, long)]
        characters: Option<PathBuf>,

        #[command(flatten)]
        detection: DetectionArgs,

        /// Write accepted attach requests to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Statistics across project exports
    Stats {
        #[arg(required = true, num_args = 1..)]
        projects: Vec<PathBuf>,

        /// Only the recent scenes of this project id
        #[arg(long)]
        project_id: Option<u64>,

        #[arg(long)]
        json: bool,
    },

    /// Word or character count of a project
    Count {
        #[arg(required = true)]
        project: PathBuf,

        /// words / characters (default: saved preference)
        #[arg(short, long)]
        unit: Option<CountUnit>,

        /// Ignore whitespace when counting characters
        #[arg(long)]
        no_spaces: bool,

        /// Include part/sequence/scene descriptions
        #[arg(long)]
        descriptions: bool,

        #[arg(long)]
        json: bool,
    },

    /// Character slugs
    Slug {
        #[arg(required = true)]
        characters: PathBuf,

        /// Look up the character with this slug
        #[arg(short, long)]
        find: Option<String>,
    },

    /// Show or change saved settings
    Config {
        #[arg(long)]
        show: bool,

        #[arg(long, allow_negative_numbers = true)]
        set_max_distance: Option<i64>,

        #[arg(long, allow_negative_numbers = true)]
        set_min_length: Option<i64>,

        #[arg(long, allow_negative_numbers = true)]
        set_min_confidence: Option<f64>,

        /// Restore defaults
        #[arg(long)]
        reset: bool,
    },

    /// Manage the scan cache
    Cache {
        /// Delete the cache
        #[arg(long)]
        clear: bool,

        /// Folder holding the cache (default: current directory)
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// Show cache information
        #[arg(long)]
        info: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detect_with_overrides() {
        let cli = Cli::try_parse_from([
            "recit", "detect", "chapitre.txt", "-c", "persos.json", "--max-distance", "2",
            "--min-confidence", "0.8",
        ])
        .unwrap();

        match cli.command {
            Commands::Detect { detection, json, .. } => {
                let overrides = detection.overrides();
                assert_eq!(overrides.max_distance, Some(2));
                assert_eq!(overrides.min_length, None);
                assert_eq!(overrides.min_confidence, Some(0.8));
                assert!(!json);
            }
            _ => panic!("expected detect"),
        }
    }

    #[test]
    fn test_parse_negative_is_accepted_by_parser() {
        let cli = Cli::try_parse_from(["recit", "folder", "manuscrits", "-c", "p.json", "--min-length", "-1"])
            .unwrap();
        match cli.command {
            Commands::Folder { detection, .. } => assert_eq!(detection.min_length, Some(-1)),
            _ => panic!("expected folder"),
        }
    }

    #[test]
    fn test_parse_count_unit() {
        let cli = Cli::try_parse_from(["recit", "-v", "count", "roman.json", "--unit", "characters", "--no-spaces"])
            .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Count { unit, no_spaces, .. } => {
                assert_eq!(unit, Some(CountUnit::Characters));
                assert!(no_spaces);
            }
            _ => panic!("expected count"),
        }
    }

    #[test]
    fn test_parse_stats_multiple_projects() {
        let cli = Cli::try_parse_from(["recit", "stats", "a.json", "b.json"]).unwrap();
        match cli.command {
            Commands::Stats { projects, .. } => assert_eq!(projects.len(), 2),
            _ => panic!("expected stats"),
        }
    }
}
