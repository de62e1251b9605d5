use chrono::{DateTime, Utc};
use point2d_ga::{GaConfig, Individual, stats::FitnessSummary};
use serde::{Deserialize, Serialize};

/// Outcome of one seeded run inside a convergence measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub seed: u64,
    pub initial_best_fitness: f64,
    pub best_fitness: f64,
    pub best: Individual,
    /// First generation whose best fitness exceeded the goal
    pub first_generation_over_goal: Option<usize>,
}

/// Spread of the generation at which successful runs first exceeded the goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationSpread {
    pub min: usize,
    pub median: usize,
    pub max: usize,
}

/// Result of a `converge` invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceReport {
    pub finished_at: DateTime<Utc>,
    pub target: Individual,
    pub config: GaConfig,
    pub goal: f64,
    /// Distance from the target at which fitness equals `goal`
    pub goal_distance: f64,
    pub runs: usize,
    /// Runs whose best fitness exceeded the goal
    pub successes: usize,
    pub success_rate: f64,
    /// `None` when no run reached the goal
    pub first_over_goal: Option<GenerationSpread>,
    pub initial_fitness: FitnessSummary,
    pub final_fitness: FitnessSummary,
    pub outcomes: Vec<RunOutcome>,
}
