//! Command-line interface
//!
//! Every command prints plain text to stdout; diagnostics go through
//! `tracing` to stderr.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::evaluation::{evaluate, EvaluationConfig, Preset};
use crate::utils::DataLoader;

#[derive(Parser)]
#[command(name = "tabeval")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fit and score a model on a CSV dataset")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides shared by the preset commands
#[derive(Args, Debug, Clone, Default)]
pub struct PresetArgs {
    /// Dataset file (defaults to the preset's file in the working directory)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Seed of the train/test split
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fraction of rows held out for testing
    #[arg(long)]
    pub test_fraction: Option<f64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Iris species with a 5-nearest-neighbours classifier
    Iris(PresetArgs),

    /// Advertising sales with a random forest regressor
    Sales(PresetArgs),

    /// Titanic survival with a random forest classifier
    Titanic(PresetArgs),

    /// Run a configuration read from a JSON file
    Run {
        /// Configuration file
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Print a preset's configuration as JSON
    Config {
        /// Preset name (iris, sales, titanic)
        preset: String,
    },

    /// Show rows, columns, column types and missing counts of a CSV file
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,
    },
}

fn parse_preset(name: &str) -> anyhow::Result<Preset> {
    Preset::all()
        .into_iter()
        .find(|p| p.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow::anyhow!("unknown preset '{}' (expected iris, sales or titanic)", name))
}

/// Apply command-line overrides to a preset's configuration
pub fn preset_config(preset: Preset, args: &PresetArgs) -> EvaluationConfig {
    let mut config = preset.config();
    if let Some(path) = &args.data {
        config = config.with_dataset_path(path.clone());
    }
    if let Some(seed) = args.seed {
        config = config.with_split_seed(seed);
    }
    if let Some(fraction) = args.test_fraction {
        config = config.with_test_fraction(fraction);
    }
    config
}

pub fn cmd_preset(preset: Preset, args: &PresetArgs) -> anyhow::Result<()> {
    let config = preset_config(preset, args);
    let report = evaluate(&config).with_context(|| format!("{} evaluation failed", preset))?;
    println!("{}", report);
    Ok(())
}

pub fn cmd_run(config_path: &Path) -> anyhow::Result<()> {
    let config = EvaluationConfig::from_json_file(config_path)?;
    let report =
        evaluate(&config).with_context(|| format!("{} evaluation failed", config.name))?;
    println!("{}", report);
    Ok(())
}

pub fn cmd_config(preset: &str) -> anyhow::Result<()> {
    let preset = parse_preset(preset)?;
    println!("{}", preset.config().to_json()?);
    Ok(())
}

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    let info = DataLoader::new().get_file_info(data_path)?;

    println!("{:<12} {}", "File", info.path);
    println!("{:<12} {}", "Rows", info.n_rows);
    println!("{:<12} {}", "Columns", info.n_cols);
    println!("{:<12} {:.1} KB", "Size", info.file_size as f64 / 1024.0);
    println!();

    println!("{:<20} {:<12} {:>6}", "Column", "Type", "Nulls");
    println!("{}", "-".repeat(40));
    for column in &info.columns {
        println!(
            "{:<20} {:<12} {:>6}",
            column.name,
            column.column_type.to_string(),
            column.null_count
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["tabeval", "sales", "--seed", "3", "--data", "ads.csv"]).unwrap();
        match cli.command {
            Commands::Sales(args) => {
                assert_eq!(args.seed, Some(3));
                assert_eq!(args.data, Some(PathBuf::from("ads.csv")));
                assert_eq!(args.test_fraction, None);
            }
            _ => panic!("expected sales"),
        }

        assert!(Cli::try_parse_from(["tabeval", "run"]).is_err());
    }

    #[test]
    fn test_preset_overrides() {
        let args = PresetArgs {
            data: Some(PathBuf::from("/tmp/iris.csv")),
            seed: Some(9),
            test_fraction: Some(0.25),
        };
        let config = preset_config(Preset::Iris, &args);

        assert_eq!(config.dataset_path, PathBuf::from("/tmp/iris.csv"));
        assert_eq!(config.split_seed, 9);
        assert_eq!(config.test_fraction, 0.25);

        let defaults = preset_config(Preset::Titanic, &PresetArgs::default());
        assert_eq!(defaults.dataset_path, PathBuf::from("Titanic-Dataset.csv"));
        assert_eq!(defaults.split_seed, 42);
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!(parse_preset("Iris").unwrap(), Preset::Iris);
        assert!(parse_preset("housing").is_err());
    }
}
