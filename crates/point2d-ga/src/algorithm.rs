//! The generation loop.
//!
//! Each generation runs:
//!
//! 1. **Selection** - tier the current population in the [`PopulationCluster`]
//! 2. **Crossover** - breed one offspring per individual with the tier
//!    handlers of [`OffspringPolicy`]
//! 3. **Mutation** - perturb offspring with probability `mutation_chance`,
//!    sparing the carried-over best
//! 4. **Tracking** - rescan the new population for its fittest individual
//!
//! A [`GeneticAlgorithm`] moves through `Idle → Running → Finished`. Hosts
//! either call [`GeneticAlgorithm::start`] and receive a callback per
//! generation, or drive [`GeneticAlgorithm::next_generation`] themselves and
//! stop whenever they like.
//!
//! All randomness comes from one seeded [`Pcg32`], so a run is reproducible
//! from its target, configuration and seed.

use std::thread;

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    cluster::{ClusterIncompleteError, PopulationCluster, Record},
    config::{ConfigError, GaConfig},
    fitness::{FitnessFunction, TargetFitness},
    individual::Individual,
    offspring::{self, OffspringPolicy},
    selector::Selector,
    stats::{FitnessSummary, TierCounts},
};

/// Lifecycle of a run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum RunState {
    Idle,
    Running,
    Finished,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GaError {
    #[display("invalid configuration: {_0}")]
    #[from]
    Config(ConfigError),
    #[display("{_0}")]
    #[from]
    Cluster(ClusterIncompleteError),
    #[display("run already started")]
    AlreadyStarted,
    #[display("run not started")]
    NotStarted,
    #[display("generation threshold reached")]
    Finished,
}

/// What a host learns about one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// 1-based generation number.
    pub generation: usize,
    pub best: Individual,
    pub best_fitness: f64,
    /// Tier sizes of the population the generation was bred from.
    pub tiers: TierCounts,
    /// Fitness of the new population.
    pub fitness: FitnessSummary,
}

/// Outcome of a finished (or stopped) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub generations: usize,
    pub best: Individual,
    pub best_fitness: f64,
    /// Best fitness of the initial random population.
    pub initial_best_fitness: f64,
}

/// Genetic algorithm evolving points toward a target.
///
/// # Example
///
/// ```
/// use point2d_ga::{algorithm::GeneticAlgorithm, config::GaConfig, individual::Individual};
///
/// let config = GaConfig {
///     max_generations: 50,
///     cadence_ms: 0,
///     ..GaConfig::default()
/// };
/// let mut ga = GeneticAlgorithm::with_seed(Individual::new(125.0, 270.0), config, 42).unwrap();
///
/// let mut calls = 0;
/// let summary = ga
///     .start(|_best, fitness| {
///         assert!(fitness > 0.0 && fitness <= 100.0);
///         calls += 1;
///     })
///     .unwrap();
/// assert_eq!(calls, 50);
/// assert_eq!(summary.generations, 50);
/// assert!(ga.state().is_finished());
/// ```
#[derive(Debug, Clone)]
pub struct GeneticAlgorithm {
    config: GaConfig,
    seed: u64,
    rng: Pcg32,
    cluster: PopulationCluster<TargetFitness>,
    population: Vec<Individual>,
    best: Option<Record>,
    initial_best_fitness: Option<f64>,
    generation: usize,
    state: RunState,
}

impl GeneticAlgorithm {
    /// Creates an idle run with a random seed.
    pub fn new(target: Individual, config: GaConfig) -> Result<Self, ConfigError> {
        Self::with_seed(target, config, rand::rng().random())
    }

    /// Like [`Self::new`], but reproducible from `seed`.
    pub fn with_seed(target: Individual, config: GaConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let selector = Selector::new(
            TargetFitness::new(target),
            config.elite_min,
            config.graced_interval,
        );
        Ok(Self {
            cluster: PopulationCluster::new(config.population_size, selector),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            config,
            population: vec![],
            best: None,
            initial_best_fitness: None,
            generation: 0,
            state: RunState::Idle,
        })
    }

    #[must_use]
    pub fn target(&self) -> Individual {
        self.cluster.selector().fitness_fn().target()
    }

    #[must_use]
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Number of completed generations.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Current population, empty until the run is initialized.
    #[must_use]
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Fittest individual of the current population.
    #[must_use]
    pub fn best(&self) -> Option<&Record> {
        self.best.as_ref()
    }

    /// Samples the initial population and moves from Idle to Running.
    pub fn initialize(&mut self) -> Result<(), GaError> {
        if !self.state.is_idle() {
            return Err(GaError::AlreadyStarted);
        }
        self.population = self
            .config
            .bounds
            .sample_population(&mut self.rng, self.config.population_size);
        let (best, _) = self.scan()?;
        self.best = Some(best);
        self.initial_best_fitness = Some(best.fitness);
        self.state = RunState::Running;
        tracing::debug!(
            seed = self.seed,
            population = self.population.len(),
            best_fitness = best.fitness,
            "initialized population"
        );
        Ok(())
    }

    /// Breeds the next generation.
    ///
    /// Moves to Finished once `max_generations` generations are done.
    pub fn next_generation(&mut self) -> Result<GenerationReport, GaError> {
        match self.state {
            RunState::Idle => return Err(GaError::NotStarted),
            RunState::Finished => return Err(GaError::Finished),
            RunState::Running => {}
        }
        let previous_best = self.best.ok_or(GaError::NotStarted)?;

        // selection
        self.cluster.clear();
        self.cluster.add_all(&self.population);
        let tiers = self.cluster.tiers().counts();

        // crossover
        let mut policy = OffspringPolicy {
            rng: &mut self.rng,
            previous_best,
            bounds: self.config.bounds,
            remaining_luck_chance: self.config.remaining_luck_chance,
            max_fit_to_substitute_remaining: self.config.max_fit_to_substitute_remaining,
        };
        let children = self.cluster.map(&mut policy)?;

        // mutation; an Elite best is passed through and keeps its slot
        let kept = self
            .cluster
            .offspring_position(previous_best.index)
            .filter(|&position| position < tiers.elite);
        self.population = self.mutate_population(children, kept);

        let (best, fitness) = self.scan()?;
        self.best = Some(best);
        self.generation += 1;

        tracing::debug!(
            generation = self.generation,
            best_fitness = best.fitness,
            elite = tiers.elite,
            graced = tiers.graced,
            remaining = tiers.remaining,
            "generation done"
        );

        if self.generation >= self.config.max_generations {
            self.state = RunState::Finished;
            tracing::info!(
                generations = self.generation,
                best = %best.individual,
                best_fitness = best.fitness,
                "run finished"
            );
        }

        Ok(GenerationReport {
            generation: self.generation,
            best: best.individual,
            best_fitness: best.fitness,
            tiers,
            fitness,
        })
    }

    /// Runs every generation, calling `on_generation(best, best_fitness)`
    /// after each one and pausing for the configured cadence in between.
    pub fn start<C>(&mut self, mut on_generation: C) -> Result<RunSummary, GaError>
    where
        C: FnMut(&Individual, f64),
    {
        self.run(|report| on_generation(&report.best, report.best_fitness))
    }

    /// Like [`Self::start`], but hands out the full [`GenerationReport`].
    pub fn run<C>(&mut self, mut on_report: C) -> Result<RunSummary, GaError>
    where
        C: FnMut(&GenerationReport),
    {
        self.initialize()?;
        let cadence = self.config.cadence();
        while self.state.is_running() {
            let report = self.next_generation()?;
            on_report(&report);
            if self.state.is_running() && !cadence.is_zero() {
                thread::sleep(cadence);
            }
        }
        self.summary()
    }

    /// Summary of the run so far.
    pub fn summary(&self) -> Result<RunSummary, GaError> {
        let (Some(best), Some(initial_best_fitness)) = (self.best, self.initial_best_fitness)
        else {
            return Err(GaError::NotStarted);
        };
        Ok(RunSummary {
            seed: self.seed,
            generations: self.generation,
            best: best.individual,
            best_fitness: best.fitness,
            initial_best_fitness,
        })
    }

    /// Mutates each child with probability `mutation_chance`, except the one
    /// at position `kept`.
    fn mutate_population(
        &mut self,
        children: Vec<Individual>,
        kept: Option<usize>,
    ) -> Vec<Individual> {
        children
            .into_iter()
            .enumerate()
            .map(|(position, individual)| {
                if Some(position) != kept && self.rng.random_bool(self.config.mutation_chance) {
                    offspring::mutate(&mut self.rng, &individual, self.config.max_abs_mutation)
                } else {
                    individual
                }
            })
            .collect()
    }

    /// Finds the fittest individual (first one wins ties) and summarizes the
    /// population's fitness.
    fn scan(&self) -> Result<(Record, FitnessSummary), GaError> {
        let fitness_fn = self.cluster.selector().fitness_fn();
        let fitness = self
            .population
            .iter()
            .map(|individual| fitness_fn.fitness(individual))
            .collect::<Vec<_>>();

        let mut best: Option<Record> = None;
        for (index, (individual, fitness)) in self.population.iter().zip(&fitness).enumerate() {
            if best.is_none_or(|best| *fitness > best.fitness) {
                best = Some(Record {
                    index,
                    individual: *individual,
                    fitness: *fitness,
                });
            }
        }

        // empty only before the population is sampled
        let best = best.ok_or(GaError::NotStarted)?;
        let summary = FitnessSummary::new(fitness).ok_or(GaError::NotStarted)?;
        Ok((best, summary))
    }
}
