use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use point2d_ga::{GaConfig, Individual};

use self::{converge::ConvergeArg, default_config::DefaultConfigArg, run::RunArg};
use crate::util;

mod converge;
mod default_config;
mod run;

const DEFAULT_TARGET: Individual = Individual::new(125.0, 270.0);

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve a population toward the target and report progress
    Run(#[clap(flatten)] RunArg),
    /// Measure how reliably seeded runs reach a fitness goal
    Converge(#[clap(flatten)] ConvergeArg),
    /// Print the default run configuration as JSON
    DefaultConfig(#[clap(flatten)] DefaultConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Run(RunArg::default())) {
        Mode::Run(arg) => run::run(&arg)?,
        Mode::Converge(arg) => converge::run(&arg)?,
        Mode::DefaultConfig(arg) => default_config::run(&arg)?,
    }
    Ok(())
}

/// Target and configuration options shared by the commands that run the GA.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GaArg {
    /// X coordinate of the target [default: 125]
    #[arg(long)]
    target_x: Option<f64>,
    /// Y coordinate of the target [default: 270]
    #[arg(long)]
    target_y: Option<f64>,
    /// JSON configuration file; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Number of individuals per generation
    #[arg(long)]
    population: Option<usize>,
    /// Number of generations to run
    #[arg(long)]
    generations: Option<usize>,
    /// Probability of mutating an offspring
    #[arg(long)]
    mutation_chance: Option<f64>,
    /// Pause between generations in milliseconds
    #[arg(long)]
    cadence_ms: Option<u64>,
}

impl GaArg {
    fn target(&self) -> Individual {
        Individual::new(
            self.target_x.unwrap_or(DEFAULT_TARGET.x()),
            self.target_y.unwrap_or(DEFAULT_TARGET.y()),
        )
    }

    /// Loads the configuration file (if any) and applies command line overrides.
    fn load_config(&self) -> anyhow::Result<GaConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => GaConfig::default(),
        };
        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(generations) = self.generations {
            config.max_generations = generations;
        }
        if let Some(mutation_chance) = self.mutation_chance {
            config.mutation_chance = mutation_chance;
        }
        if let Some(cadence_ms) = self.cadence_ms {
            config.cadence_ms = cadence_ms;
        }
        config.validate().context("Invalid GA configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
#[expect(clippy::float_cmp)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CommandArgs {
        CommandArgs::try_parse_from(std::iter::once("point2d-ga").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_overrides_apply_on_top_of_defaults() {
        let args = parse(&[
            "run",
            "--population",
            "15",
            "--mutation-chance",
            "0.1",
            "--cadence-ms",
            "0",
            "--target-x",
            "10",
        ]);
        let Some(Mode::Run(arg)) = args.mode else {
            panic!("expected run mode");
        };
        let config = arg.ga.load_config().unwrap();
        assert_eq!(config.population_size, 15);
        assert_eq!(config.mutation_chance, 0.1);
        assert_eq!(config.cadence_ms, 0);
        assert_eq!(config.max_generations, GaConfig::default().max_generations);
        assert_eq!(arg.ga.target(), Individual::new(10.0, DEFAULT_TARGET.y()));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let arg = GaArg {
            mutation_chance: Some(1.5),
            ..GaArg::default()
        };
        let err = arg.load_config().unwrap_err();
        assert!(format!("{err:#}").contains("mutation_chance"));
    }

    #[test]
    fn test_mode_defaults_to_run() {
        assert!(parse(&[]).mode.is_none());
        assert!(matches!(
            parse(&["converge", "--runs", "3"]).mode,
            Some(Mode::Converge(_))
        ));
    }
}
