//! Fitness scoring.
//!
//! Fitness rewards proximity to the target with a bounded score in `(0, 100]`.
//! The distance is first shrunk by [`DISTANCE_SHRINK`] and then fed through a
//! mirrored logistic sigmoid:
//!
//! ```text
//! r       = distance * DISTANCE_SHRINK
//! sigmoid = 2 - 2 * e^r / (e^r + 1)     (2 at r = 0, → 0 as r → ∞)
//! fitness = sigmoid * 100
//! ```
//!
//! With the default shrink factor a distance of 10 scores about 80, 50 about 24
//! and 100 about 3.6, which spreads the working coordinate range (a 400 × 400
//! rectangle, diagonal ≈ 566) over a useful dynamic range.

use crate::individual::Individual;

/// Factor applied to the raw distance before the sigmoid (`1 / 25`).
pub const DISTANCE_SHRINK: f64 = 0.04;

/// Highest possible fitness, reached only at zero distance.
pub const MAX_FITNESS: f64 = 100.0;

/// Scores an individual. Higher is better.
///
/// The selector and the population cluster are written against this trait so
/// they can be tested with hand-made fitness landscapes. Any
/// `Fn(&Individual) -> f64` closure implements it.
pub trait FitnessFunction {
    fn fitness(&self, individual: &Individual) -> f64;
}

impl<F> FitnessFunction for F
where
    F: Fn(&Individual) -> f64,
{
    fn fitness(&self, individual: &Individual) -> f64 {
        self(individual)
    }
}

/// Distance-to-target fitness, see [`compute_fitness`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetFitness {
    target: Individual,
}

impl TargetFitness {
    #[must_use]
    pub const fn new(target: Individual) -> Self {
        Self { target }
    }

    #[must_use]
    pub const fn target(&self) -> Individual {
        self.target
    }
}

impl FitnessFunction for TargetFitness {
    fn fitness(&self, individual: &Individual) -> f64 {
        compute_fitness(individual, &self.target)
    }
}

/// Computes the fitness of `individual` with respect to `target`.
///
/// # Example
///
/// ```
/// use point2d_ga::{fitness::compute_fitness, individual::Individual};
///
/// let target = Individual::new(125.0, 270.0);
/// assert_eq!(compute_fitness(&target, &target), 100.0);
///
/// let near = compute_fitness(&Individual::new(135.0, 270.0), &target);
/// assert!((near - 80.26).abs() < 0.01);
/// ```
#[must_use]
pub fn compute_fitness(individual: &Individual, target: &Individual) -> f64 {
    let reduced = individual.distance(target) * DISTANCE_SHRINK;
    // 2 - 2e^r/(e^r+1) == 2/(e^r+1); this form stays finite when e^r overflows
    let sigmoid = 2.0 / (reduced.exp() + 1.0);
    sigmoid * MAX_FITNESS
}

/// Distance at which [`compute_fitness`] yields `fitness`.
///
/// Inverse of the fitness curve; `fitness` must lie in `(0, 100]`.
#[must_use]
pub fn distance_for_fitness(fitness: f64) -> f64 {
    let sigmoid = fitness / MAX_FITNESS;
    (2.0 / sigmoid - 1.0).ln() / DISTANCE_SHRINK
}

#[cfg(test)]
#[expect(clippy::float_cmp)]
mod tests {
    use super::*;

    const TARGET: Individual = Individual::new(125.0, 270.0);

    fn at_distance(distance: f64) -> Individual {
        Individual::new(TARGET.x() + distance, TARGET.y())
    }

    #[test]
    fn test_reference_values() {
        let anchors = [(10.0, 80.3), (50.0, 23.8), (100.0, 3.6)];
        for (distance, expected) in anchors {
            let fitness = compute_fitness(&at_distance(distance), &TARGET);
            assert!(
                (fitness - expected).abs() < 0.1,
                "distance {distance}: expected ≈{expected}, got {fitness}"
            );
        }
    }

    #[test]
    fn test_matches_sigmoid_definition() {
        for distance in [0.0, 0.5, 3.0, 12.5, 40.0, 250.0] {
            let r = distance * DISTANCE_SHRINK;
            let expected = (2.0 - 2.0 * r.exp() / (r.exp() + 1.0)) * 100.0;
            let actual = compute_fitness(&at_distance(distance), &TARGET);
            assert!((actual - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bounds() {
        assert_eq!(compute_fitness(&TARGET, &TARGET), MAX_FITNESS);
        for distance in [1e-9, 0.1, 1.0, 100.0, 566.0, 5_000.0] {
            let fitness = compute_fitness(&at_distance(distance), &TARGET);
            assert!(fitness > 0.0 && fitness < MAX_FITNESS, "{fitness}");
        }
        // no NaN far away from the target
        assert!(!compute_fitness(&at_distance(1e6), &TARGET).is_nan());
    }

    #[test]
    fn test_strictly_decreasing_in_distance() {
        let mut previous = compute_fitness(&TARGET, &TARGET);
        for step in 1..=600 {
            let fitness = compute_fitness(&at_distance(f64::from(step)), &TARGET);
            assert!(fitness < previous, "not decreasing at distance {step}");
            previous = fitness;
        }
    }

    #[test]
    fn test_monotonic_in_any_direction() {
        let p = Individual::new(130.0, 268.0);
        let q = Individual::new(100.0, 300.0);
        assert!(p.distance(&TARGET) < q.distance(&TARGET));
        assert!(compute_fitness(&p, &TARGET) > compute_fitness(&q, &TARGET));
    }

    #[test]
    fn test_distance_for_fitness_inverts() {
        for distance in [0.5, 2.5, 10.0, 42.0] {
            let fitness = compute_fitness(&at_distance(distance), &TARGET);
            assert!((distance_for_fitness(fitness) - distance).abs() < 1e-6);
        }
    }

    #[test]
    fn test_closure_is_fitness_function() {
        let constant = |_: &Individual| 42.0;
        assert_eq!(constant.fitness(&TARGET), 42.0);
        assert_eq!(TargetFitness::new(TARGET).fitness(&TARGET), MAX_FITNESS);
    }
}
