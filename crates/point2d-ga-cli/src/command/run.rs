use std::{num::NonZeroUsize, path::PathBuf};

use chrono::Utc;
use point2d_ga::GeneticAlgorithm;

use super::GaArg;
use crate::{schema::run_record::RunRecord, util::Output};

const DEFAULT_REPORT_EVERY: NonZeroUsize = NonZeroUsize::new(100).unwrap();

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    #[clap(flatten)]
    pub(super) ga: GaArg,
    /// Print progress every N generations
    #[arg(long, default_value_t = DEFAULT_REPORT_EVERY)]
    report_every: NonZeroUsize,
    /// Output file path for the JSON run record
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Default for RunArg {
    fn default() -> Self {
        Self {
            ga: GaArg::default(),
            report_every: DEFAULT_REPORT_EVERY,
            output: None,
        }
    }
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let RunArg {
        ga,
        report_every,
        output,
    } = arg;
    let config = ga.load_config()?;
    let target = ga.target();
    let mut algorithm = match ga.seed {
        Some(seed) => GeneticAlgorithm::with_seed(target, config.clone(), seed)?,
        None => GeneticAlgorithm::new(target, config.clone())?,
    };

    eprintln!("Target: {target}");
    eprintln!("  Seed:        {}", algorithm.seed());
    eprintln!("  Population:  {}", config.population_size);
    eprintln!("  Generations: {}", config.max_generations);
    eprintln!();

    let mut checkpoints = vec![];
    let summary = algorithm.run(|report| {
        let is_last = report.generation == config.max_generations;
        if report.generation % report_every.get() == 0 || is_last {
            eprintln!(
                "Generation #{:5}: best {} => {:.3} (elite {:2}, graced {:2}, remaining {:2}, mean {:.3})",
                report.generation,
                report.best,
                report.best_fitness,
                report.tiers.elite,
                report.tiers.graced,
                report.tiers.remaining,
                report.fitness.mean,
            );
            checkpoints.push(report.clone());
        }
    })?;

    eprintln!();
    eprintln!("Run completed");
    eprintln!("  Best:            {}", summary.best);
    eprintln!("  Best fitness:    {:.3}", summary.best_fitness);
    eprintln!("  Initial fitness: {:.3}", summary.initial_best_fitness);
    eprintln!("  Distance:        {:.3}", summary.best.distance(&target));

    let record = RunRecord {
        finished_at: Utc::now(),
        target,
        config,
        summary,
        checkpoints,
    };
    Output::save_json(&record, output.clone())?;
    if let Some(path) = output {
        eprintln!("Run record saved to {}", path.display());
    }

    Ok(())
}
