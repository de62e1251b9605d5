use std::{path::PathBuf, thread};

use anyhow::anyhow;
use chrono::Utc;
use point2d_ga::{
    GaConfig, GaError, GeneticAlgorithm, Individual,
    fitness::{MAX_FITNESS, distance_for_fitness},
    stats::{self, FitnessSummary},
};
use rand::Rng as _;

use super::GaArg;
use crate::{
    schema::convergence::{ConvergenceReport, GenerationSpread, RunOutcome},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ConvergeArg {
    #[clap(flatten)]
    ga: GaArg,
    /// Number of independent runs; run `i` uses seed `seed + i`
    #[arg(long, default_value_t = 20)]
    runs: usize,
    /// Fitness a run has to exceed to count as converged
    #[arg(long, default_value_t = 95.0)]
    goal: f64,
    /// Output file path for the JSON report
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ConvergeArg) -> anyhow::Result<()> {
    let ConvergeArg {
        ga,
        runs,
        goal,
        output,
    } = arg;
    let (runs, goal) = (*runs, *goal);
    anyhow::ensure!(runs > 0, "at least one run is required");
    anyhow::ensure!(
        goal > 0.0 && goal <= MAX_FITNESS,
        "goal must lie in (0, {MAX_FITNESS}], got {goal}"
    );

    let config = GaConfig {
        cadence_ms: 0,
        ..ga.load_config()?
    };
    let target = ga.target();
    let base_seed = ga.seed.unwrap_or_else(|| rand::rng().random());

    eprintln!(
        "Running {runs} seeded runs toward {target} (goal {goal:.1}, within {:.3} of the target)...",
        distance_for_fitness(goal)
    );
    let outcomes = thread::scope(|s| {
        let handles = (0..runs)
            .map(|i| {
                let seed = base_seed.wrapping_add(i as u64);
                let config = config.clone();
                s.spawn(move || run_once(target, config, seed, goal))
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| anyhow!("run thread panicked"))?
                    .map_err(anyhow::Error::from)
            })
            .collect::<anyhow::Result<Vec<_>>>()
    })?;

    for outcome in &outcomes {
        let reached = outcome
            .first_generation_over_goal
            .map_or_else(|| "-".to_owned(), |g| g.to_string());
        eprintln!(
            "  seed {:20}: {:.3} -> {:.3} (goal reached at {reached})",
            outcome.seed, outcome.initial_best_fitness, outcome.best_fitness,
        );
    }

    let report = summarize(target, config, goal, outcomes)?;
    eprintln!();
    eprintln!(
        "Converged: {}/{} ({:.1}%)",
        report.successes,
        report.runs,
        report.success_rate * 100.0
    );
    if let Some(spread) = &report.first_over_goal {
        eprintln!(
            "  First generation over goal: min {}, median {}, max {}",
            spread.min, spread.median, spread.max
        );
    }
    eprintln!(
        "  Final fitness: min {:.3}, mean {:.3}, max {:.3}",
        report.final_fitness.min, report.final_fitness.mean, report.final_fitness.max
    );

    Output::save_json(&report, output.clone())
}

fn run_once(
    target: Individual,
    config: GaConfig,
    seed: u64,
    goal: f64,
) -> Result<RunOutcome, GaError> {
    let mut algorithm = GeneticAlgorithm::with_seed(target, config, seed)?;
    let mut first_generation_over_goal = None;
    let summary = algorithm.run(|report| {
        if first_generation_over_goal.is_none() && report.best_fitness > goal {
            first_generation_over_goal = Some(report.generation);
        }
    })?;
    tracing::debug!(seed, best_fitness = summary.best_fitness, "run done");
    Ok(RunOutcome {
        seed,
        initial_best_fitness: summary.initial_best_fitness,
        best_fitness: summary.best_fitness,
        best: summary.best,
        first_generation_over_goal,
    })
}

#[expect(clippy::cast_precision_loss)]
fn summarize(
    target: Individual,
    config: GaConfig,
    goal: f64,
    outcomes: Vec<RunOutcome>,
) -> anyhow::Result<ConvergenceReport> {
    let runs = outcomes.len();
    let mut reached = outcomes
        .iter()
        .filter_map(|o| o.first_generation_over_goal)
        .collect::<Vec<_>>();
    reached.sort_unstable();
    let first_over_goal = match (reached.first(), reached.last()) {
        (Some(&min), Some(&max)) => Some(GenerationSpread {
            min,
            median: reached[reached.len() / 2],
            max,
        }),
        _ => None,
    };

    let initial_fitness = FitnessSummary::new(outcomes.iter().map(|o| o.initial_best_fitness))
        .ok_or_else(|| anyhow!("no runs to summarize"))?;
    let final_fitness = FitnessSummary::new(outcomes.iter().map(|o| o.best_fitness))
        .ok_or_else(|| anyhow!("no runs to summarize"))?;
    tracing::debug!(
        median_final_fitness = stats::median(outcomes.iter().map(|o| o.best_fitness)),
        "summarized runs"
    );

    Ok(ConvergenceReport {
        finished_at: Utc::now(),
        target,
        config,
        goal,
        goal_distance: distance_for_fitness(goal),
        runs,
        successes: reached.len(),
        success_rate: reached.len() as f64 / runs as f64,
        first_over_goal,
        initial_fitness,
        final_fitness,
        outcomes,
    })
}
