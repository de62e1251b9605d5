use chrono::{DateTime, Utc};
use point2d_ga::{GaConfig, GenerationReport, Individual, RunSummary};
use serde::{Deserialize, Serialize};

/// Result of a single `run` invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// When the last generation completed
    pub finished_at: DateTime<Utc>,
    pub target: Individual,
    pub config: GaConfig,
    /// Seed, final best individual and generation count
    pub summary: RunSummary,
    /// Reports sampled every `--report-every` generations, plus the last one
    pub checkpoints: Vec<GenerationReport>,
}
