//! Run configuration.
//!
//! A [`GaConfig`] is fixed for the lifetime of a
//! [`GeneticAlgorithm`](crate::algorithm::GeneticAlgorithm). It deserializes
//! from partial JSON: missing fields take their defaults.
//!
//! ```
//! use point2d_ga::config::GaConfig;
//!
//! let config: GaConfig = serde_json::from_str(r#"{ "population_size": 15 }"#).unwrap();
//! assert_eq!(config.population_size, 15);
//! assert_eq!(config.elite_min, 80.0);
//! config.validate().unwrap();
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::individual::Bounds;

/// An invalid [`GaConfig`] field.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("generation threshold must be at least 1")]
    NoGenerations,
    #[display("{field} must be a probability in [0, 1], got {value}")]
    NotAProbability { field: &'static str, value: f64 },
    #[display("{field} must be a finite, non-negative number, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[display("elite fitness threshold must lie in (0, 100], got {_0}")]
    EliteThreshold(#[error(not(source))] f64),
    #[display("sampling bounds must be positive, got {width} x {height}")]
    Bounds { width: f64, height: f64 },
}

/// Parameters of a genetic algorithm run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Number of individuals in every generation (`n`).
    pub population_size: usize,
    /// Number of generations after which the run finishes.
    pub max_generations: usize,
    /// Probability that an individual is mutated after crossover.
    pub mutation_chance: f64,
    /// Lowest fitness classified as Elite.
    pub elite_min: f64,
    /// Width of the Graced band below `elite_min`.
    pub graced_interval: f64,
    /// Largest per-coordinate mutation offset.
    pub max_abs_mutation: f64,
    /// Probability that a Remaining individual mates without approaching the elite.
    pub remaining_luck_chance: f64,
    /// Remaining individuals at or below this fitness are replaced by random ones.
    pub max_fit_to_substitute_remaining: f64,
    /// Pause between generations in milliseconds, `0` to run back-to-back.
    pub cadence_ms: u64,
    /// Rectangle random individuals are sampled from.
    pub bounds: Bounds,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            max_generations: 1000,
            mutation_chance: 0.25,
            elite_min: 80.0,
            graced_interval: 20.0,
            max_abs_mutation: 0.02,
            remaining_luck_chance: 0.2,
            max_fit_to_substitute_remaining: 1.0,
            cadence_ms: 50,
            bounds: Bounds::default(),
        }
    }
}

impl GaConfig {
    #[must_use]
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }

    /// Checks every field against its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.max_generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        for (field, value) in [
            ("mutation_chance", self.mutation_chance),
            ("remaining_luck_chance", self.remaining_luck_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::NotAProbability { field, value });
            }
        }
        for (field, value) in [
            ("graced_interval", self.graced_interval),
            ("max_abs_mutation", self.max_abs_mutation),
            (
                "max_fit_to_substitute_remaining",
                self.max_fit_to_substitute_remaining,
            ),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if !(self.elite_min > 0.0 && self.elite_min <= 100.0) {
            return Err(ConfigError::EliteThreshold(self.elite_min));
        }
        let Bounds { width, height } = self.bounds;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::Bounds { width, height });
        }
        Ok(())
    }
}
