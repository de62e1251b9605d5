//! Tiered genetic algorithm that evolves points on the plane toward a target.
//!
//! The optimizer only ever compares individuals by fitness; it never sees the
//! target directly. Each generation the population is split into three
//! performance tiers, and each tier breeds with its own strategy.
//!
//! # How a Generation Works
//!
//! 1. **Tiering** - [`cluster::PopulationCluster`] scores every individual with
//!    a [`selector::Selector`] and files it as Elite, Graced or Remaining
//! 2. **Offspring** - [`offspring::OffspringPolicy`] breeds one child per
//!    individual, using tier-specific geometry (directed steps, midpoints)
//! 3. **Mutation** - children are nudged by small random offsets
//! 4. **Tracking** - the fittest child becomes the best individual reported to
//!    the host
//!
//! # Architecture
//!
//! ```text
//! GeneticAlgorithm (algorithm)
//!     ↓ tiers population with
//! PopulationCluster (cluster) ── Selector (selector) ── FitnessFunction (fitness)
//!     ↓ maps tiers through
//! OffspringPolicy (offspring)
//!     ↓ produces
//! next population → GenerationReport → host callback
//! ```
//!
//! # Tiers
//!
//! | Tier      | Fitness range                         | Breeding                                   |
//! |-----------|---------------------------------------|--------------------------------------------|
//! | Elite     | `>= elite_min`                        | step toward the previous best, then rotate |
//! | Graced    | `[elite_min - graced_interval, elite_min)` | two midpoint steps toward the elite   |
//! | Remaining | below                                 | replace, mate, or mate and approach elite  |
//!
//! # Example
//!
//! ```
//! use point2d_ga::{algorithm::GeneticAlgorithm, config::GaConfig, individual::Individual};
//!
//! let config = GaConfig {
//!     population_size: 15,
//!     max_generations: 300,
//!     cadence_ms: 0,
//!     ..GaConfig::default()
//! };
//! let target = Individual::new(125.0, 270.0);
//! let mut ga = GeneticAlgorithm::with_seed(target, config, 1).unwrap();
//!
//! let summary = ga.start(|_best, _fitness| {}).unwrap();
//! assert!(summary.best_fitness > 0.0);
//! ```
//!
//! # Current Limitations
//!
//! - **Two dimensions only**: individuals are fixed 2D points
//! - **Rotation pivot**: elite offspring are rotated about the coordinate
//!   origin, so far from the origin the rotation moves points a long way
//! - **Stagnation**: a population that collapses onto one non-elite point can
//!   only escape through mutation, which is small by default

pub mod algorithm;
pub mod cluster;
pub mod config;
pub mod fitness;
pub mod individual;
pub mod offspring;
pub mod selector;
pub mod stats;

pub use self::{
    algorithm::{GaError, GenerationReport, GeneticAlgorithm, RunState, RunSummary},
    cluster::ClusterIncompleteError,
    config::{ConfigError, GaConfig},
    individual::{Bounds, Individual},
};
