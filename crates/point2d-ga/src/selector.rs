//! Classification of individuals into performance tiers.

use serde::{Deserialize, Serialize};

use crate::{fitness::FitnessFunction, individual::Individual};

/// Performance tier of an individual within one generation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum Tier {
    /// `fitness >= elite_min`
    Elite,
    /// `graced_min <= fitness < elite_min`
    Graced,
    /// `fitness < graced_min`
    Remaining,
}

/// Result of [`Selector::select`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub tier: Tier,
    pub fitness: f64,
}

/// Classifies a single individual by its fitness.
///
/// The fitness function and the thresholds are injected, so a selector has no
/// hidden state and can be driven with any [`FitnessFunction`].
///
/// # Example
///
/// ```
/// use point2d_ga::{individual::Individual, selector::{Selector, Tier}};
///
/// let selector = Selector::new(|p: &Individual| p.x(), 80.0, 20.0);
/// assert_eq!(selector.select(&Individual::new(80.0, 0.0)).tier, Tier::Elite);
/// assert_eq!(selector.select(&Individual::new(60.0, 0.0)).tier, Tier::Graced);
/// assert_eq!(selector.select(&Individual::new(59.9, 0.0)).tier, Tier::Remaining);
/// ```
#[derive(Debug, Clone)]
pub struct Selector<F> {
    fitness_fn: F,
    elite_min: f64,
    graced_min: f64,
}

impl<F> Selector<F>
where
    F: FitnessFunction,
{
    /// Creates a selector.
    ///
    /// The graced tier starts `graced_interval` below `elite_min`.
    pub fn new(fitness_fn: F, elite_min: f64, graced_interval: f64) -> Self {
        Self {
            fitness_fn,
            elite_min,
            graced_min: elite_min - graced_interval,
        }
    }

    #[must_use]
    pub fn elite_min(&self) -> f64 {
        self.elite_min
    }

    #[must_use]
    pub fn graced_min(&self) -> f64 {
        self.graced_min
    }

    pub fn fitness_fn(&self) -> &F {
        &self.fitness_fn
    }

    /// Scores `individual` and assigns its tier.
    pub fn select(&self, individual: &Individual) -> Selection {
        let fitness = self.fitness_fn.fitness(individual);
        Selection {
            tier: self.classify(fitness),
            fitness,
        }
    }

    /// Tier for an already computed fitness value.
    #[must_use]
    pub fn classify(&self, fitness: f64) -> Tier {
        if fitness >= self.elite_min {
            Tier::Elite
        } else if fitness >= self.graced_min {
            Tier::Graced
        } else {
            Tier::Remaining
        }
    }
}

#[cfg(test)]
#[expect(clippy::float_cmp)]
mod tests {
    use super::*;

    // fitness equals the x coordinate
    fn selector() -> Selector<impl FitnessFunction> {
        Selector::new(|p: &Individual| p.x(), 80.0, 20.0)
    }

    #[test]
    fn test_thresholds() {
        let selector = selector();
        assert_eq!(selector.elite_min(), 80.0);
        assert_eq!(selector.graced_min(), 60.0);
    }

    #[test]
    fn test_boundaries() {
        let selector = selector();
        let cases = [
            (100.0, Tier::Elite),
            (80.0, Tier::Elite),
            (79.999, Tier::Graced),
            (60.0, Tier::Graced),
            (59.999, Tier::Remaining),
            (0.0, Tier::Remaining),
        ];
        for (fitness, tier) in cases {
            let selection = selector.select(&Individual::new(fitness, 0.0));
            assert_eq!(selection.tier, tier, "fitness {fitness}");
            assert_eq!(selection.fitness, fitness);
        }
    }

    #[test]
    fn test_select_is_pure() {
        let selector = selector();
        let p = Individual::new(70.0, 3.0);
        assert_eq!(selector.select(&p), selector.select(&p));
    }

    #[test]
    fn test_zero_interval_has_no_graced_tier() {
        let selector = Selector::new(|p: &Individual| p.x(), 50.0, 0.0);
        assert!(selector.classify(50.0).is_elite());
        assert!(selector.classify(49.0).is_remaining());
    }
}
