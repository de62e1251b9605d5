//! Per-generation stratification of the population into tiers.
//!
//! A [`PopulationCluster`] is rebuilt every generation:
//!
//! ```text
//! Empty --add_all--> Populated --map--> Transformed --clear--> Empty
//! ```
//!
//! [`PopulationCluster::map`] only runs on a *finished* cluster, one holding
//! exactly as many records as the configured population size. Anything else
//! means a generation lost or gained individuals, which is reported as a
//! [`ClusterIncompleteError`].

use rand::{Rng, seq::IndexedRandom as _};

use crate::{
    fitness::FitnessFunction,
    individual::Individual,
    selector::{Selector, Tier},
    stats::TierCounts,
};

/// The cluster does not hold exactly one record per population slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cluster not finished: expected {expected} individuals but found {actual}")]
pub struct ClusterIncompleteError {
    pub expected: usize,
    pub actual: usize,
}

/// An individual as seen by the cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    /// Position of the individual in the population it was tiered from.
    pub index: usize,
    pub individual: Individual,
    pub fitness: f64,
}

/// The three tier buckets, each sorted by fitness ascending.
#[derive(Debug, Clone, Default)]
pub struct Tiers {
    elite: Vec<Record>,
    graced: Vec<Record>,
    remaining: Vec<Record>,
}

impl Tiers {
    #[must_use]
    pub fn elite(&self) -> &[Record] {
        &self.elite
    }

    #[must_use]
    pub fn graced(&self) -> &[Record] {
        &self.graced
    }

    #[must_use]
    pub fn remaining(&self) -> &[Record] {
        &self.remaining
    }

    /// Records of the given tier.
    #[must_use]
    pub fn get(&self, tier: Tier) -> &[Record] {
        match tier {
            Tier::Elite => &self.elite,
            Tier::Graced => &self.graced,
            Tier::Remaining => &self.remaining,
        }
    }

    /// Total number of records over all tiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elite.len() + self.graced.len() + self.remaining.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn counts(&self) -> TierCounts {
        TierCounts {
            elite: self.elite.len(),
            graced: self.graced.len(),
            remaining: self.remaining.len(),
        }
    }

    /// Uniformly samples a record of `tier`, `None` if the tier is empty.
    pub fn random<R>(&self, tier: Tier, rng: &mut R) -> Option<&Record>
    where
        R: Rng + ?Sized,
    {
        self.get(tier).choose(rng)
    }

    pub fn random_elite<R>(&self, rng: &mut R) -> Option<&Record>
    where
        R: Rng + ?Sized,
    {
        self.random(Tier::Elite, rng)
    }

    pub fn random_graced<R>(&self, rng: &mut R) -> Option<&Record>
    where
        R: Rng + ?Sized,
    {
        self.random(Tier::Graced, rng)
    }

    pub fn random_remaining<R>(&self, rng: &mut R) -> Option<&Record>
    where
        R: Rng + ?Sized,
    {
        self.random(Tier::Remaining, rng)
    }

    /// Samples from the first non-empty tier in Remaining, Graced, Elite order.
    ///
    /// Keeps mate selection exploratory.
    pub fn random_ascending<R>(&self, rng: &mut R) -> Option<&Record>
    where
        R: Rng + ?Sized,
    {
        self.random_in_order([Tier::Remaining, Tier::Graced, Tier::Elite], rng)
    }

    /// Samples from the first non-empty tier in Elite, Graced, Remaining order.
    pub fn random_descending<R>(&self, rng: &mut R) -> Option<&Record>
    where
        R: Rng + ?Sized,
    {
        self.random_in_order([Tier::Elite, Tier::Graced, Tier::Remaining], rng)
    }

    fn random_in_order<R>(&self, order: [Tier; 3], rng: &mut R) -> Option<&Record>
    where
        R: Rng + ?Sized,
    {
        let tier = order.into_iter().find(|tier| !self.get(*tier).is_empty())?;
        self.random(tier, rng)
    }

    fn push(&mut self, tier: Tier, record: Record) {
        match tier {
            Tier::Elite => self.elite.push(record),
            Tier::Graced => self.graced.push(record),
            Tier::Remaining => self.remaining.push(record),
        }
    }

    fn sort(&mut self) {
        for bucket in [&mut self.elite, &mut self.graced, &mut self.remaining] {
            // stable: equal fitness keeps insertion order
            bucket.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
        }
    }

    fn clear(&mut self) {
        self.elite.clear();
        self.graced.clear();
        self.remaining.clear();
    }
}

/// Produces one offspring per record, per tier.
///
/// Every handler also sees all tiers so it can sample mates.
pub trait TierHandlers {
    fn elite(&mut self, tiers: &Tiers, record: &Record) -> Individual;
    fn graced(&mut self, tiers: &Tiers, record: &Record) -> Individual;
    fn remaining(&mut self, tiers: &Tiers, record: &Record) -> Individual;
}

/// Lifecycle of a [`PopulationCluster`] within one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ClusterState {
    Empty,
    Populated,
    Transformed,
}

/// Tiered view of one generation's population.
///
/// # Example
///
/// ```
/// use point2d_ga::{
///     cluster::PopulationCluster,
///     individual::Individual,
///     selector::Selector,
/// };
///
/// // fitness is the x coordinate
/// let selector = Selector::new(|p: &Individual| p.x(), 80.0, 20.0);
/// let mut cluster = PopulationCluster::new(3, selector);
/// cluster.add_all(&[
///     Individual::new(90.0, 0.0),
///     Individual::new(70.0, 0.0),
///     Individual::new(10.0, 0.0),
/// ]);
/// let counts = cluster.tiers().counts();
/// assert_eq!((counts.elite, counts.graced, counts.remaining), (1, 1, 1));
/// ```
#[derive(Debug, Clone)]
pub struct PopulationCluster<F> {
    size: usize,
    selector: Selector<F>,
    tiers: Tiers,
    state: ClusterState,
}

impl<F> PopulationCluster<F>
where
    F: FitnessFunction,
{
    /// Creates an empty cluster for populations of `size` individuals.
    pub fn new(size: usize, selector: Selector<F>) -> Self {
        Self {
            size,
            selector,
            tiers: Tiers::default(),
            state: ClusterState::Empty,
        }
    }

    /// Expected population size.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn selector(&self) -> &Selector<F> {
        &self.selector
    }

    #[must_use]
    pub fn tiers(&self) -> &Tiers {
        &self.tiers
    }

    #[must_use]
    pub fn state(&self) -> ClusterState {
        self.state
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Whether the cluster holds exactly one record per population slot.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.len() == self.size
    }

    /// Drops every record.
    pub fn clear(&mut self) {
        self.tiers.clear();
        self.state = ClusterState::Empty;
    }

    /// Tiers every individual of `population` and sorts each tier by fitness.
    ///
    /// Record indices are positions in `population`. Records are appended, so
    /// call [`Self::clear`] first when starting a new generation.
    pub fn add_all(&mut self, population: &[Individual]) {
        for (index, individual) in population.iter().enumerate() {
            let selection = self.selector.select(individual);
            self.tiers.push(
                selection.tier,
                Record {
                    index,
                    individual: *individual,
                    fitness: selection.fitness,
                },
            );
        }
        self.tiers.sort();
        self.state = ClusterState::Populated;
    }

    /// Builds the next population, Elite offspring first, then Graced, then
    /// Remaining, each in tier order.
    ///
    /// Records themselves are left untouched.
    pub fn map<H>(&mut self, handlers: &mut H) -> Result<Vec<Individual>, ClusterIncompleteError>
    where
        H: TierHandlers + ?Sized,
    {
        self.validate()?;

        let tiers = &self.tiers;
        let mut next = Vec::with_capacity(self.size);
        next.extend(tiers.elite.iter().map(|r| handlers.elite(tiers, r)));
        next.extend(tiers.graced.iter().map(|r| handlers.graced(tiers, r)));
        next.extend(tiers.remaining.iter().map(|r| handlers.remaining(tiers, r)));

        self.state = ClusterState::Transformed;
        Ok(next)
    }

    /// Position in the output of [`Self::map`] of the offspring bred from
    /// the record at population `index`.
    #[must_use]
    pub fn offspring_position(&self, index: usize) -> Option<usize> {
        let Tiers {
            elite,
            graced,
            remaining,
        } = &self.tiers;
        elite
            .iter()
            .chain(graced)
            .chain(remaining)
            .position(|record| record.index == index)
    }

    fn validate(&self) -> Result<(), ClusterIncompleteError> {
        if self.is_finished() {
            Ok(())
        } else {
            Err(ClusterIncompleteError {
                expected: self.size,
                actual: self.len(),
            })
        }
    }
}
