//! Offspring synthesis.
//!
//! Each tier breeds differently:
//!
//! - **Elite** individuals step toward the previous generation's best, with
//!   jitter and a small rotation so the tier does not collapse onto one point.
//!   The previous best itself passes through unchanged.
//! - **Graced** individuals are pulled toward the elite region in two midpoint
//!   steps.
//! - **Remaining** individuals are either replaced (dead ends), bred with an
//!   exploratory mate, or bred and then pulled toward the elite.
//!
//! The free functions are pure apart from the random source they are given.
//! [`OffspringPolicy`] wires them into [`TierHandlers`] for
//! [`PopulationCluster::map`](crate::cluster::PopulationCluster::map).

use std::f64::consts::FRAC_PI_4;

use rand::Rng;

use crate::{
    cluster::{Record, TierHandlers, Tiers},
    fitness::MAX_FITNESS,
    individual::{Bounds, Individual},
};

/// Largest rotation applied to an elite offspring, in radians.
pub const MAX_ELITE_ROTATION: f64 = FRAC_PI_4;

/// Returns `1.0` or `-1.0` with equal probability.
pub fn random_sign<R>(rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

/// Moves an elite individual toward the previous best.
///
/// The search radius `100 - best_fitness` shrinks as the best improves and is
/// scaled by `distance / (best_fitness - fitness)`. The step along the line to
/// the best is `distance - dr ± random·dr`; the result is then rotated about
/// the origin by up to [`MAX_ELITE_ROTATION`] either way.
///
/// `distance` must be the (non-zero) distance between `current` and
/// `previous_best`. When `current` is at least as fit as the best the radius
/// is used unscaled.
pub fn create_from_elite<R>(
    rng: &mut R,
    current: &Record,
    previous_best: &Record,
    distance: f64,
) -> Individual
where
    R: Rng + ?Sized,
{
    let radius = MAX_FITNESS - previous_best.fitness;
    let gap = previous_best.fitness - current.fitness;
    let dr = if gap > 0.0 {
        radius * (distance / gap)
    } else {
        radius
    };
    let jitter = rng.random::<f64>() * dr * random_sign(rng);
    let scale = (distance - dr + jitter) / distance;

    let from = current.individual;
    let to = previous_best.individual;
    let stepped = from.translate((to.x() - from.x()) * scale, (to.y() - from.y()) * scale);

    let angle = rng.random::<f64>() * MAX_ELITE_ROTATION * random_sign(rng);
    stepped.rotate(angle)
}

/// Midpoint of `p1` and `p2`, then the midpoint of that and `elite`.
#[must_use]
pub fn create_and_approach_elite(p1: &Individual, p2: &Individual, elite: &Individual) -> Individual {
    p1.midpoint(p2).midpoint(elite)
}

/// Plain midpoint crossover.
#[must_use]
pub fn create_by_midpoint(p1: &Individual, p2: &Individual) -> Individual {
    p1.midpoint(p2)
}

/// Shifts each coordinate by an independent signed offset of at most `max_abs`.
pub fn mutate<R>(rng: &mut R, individual: &Individual, max_abs: f64) -> Individual
where
    R: Rng + ?Sized,
{
    let dx = rng.random::<f64>() * max_abs * random_sign(rng);
    let dy = rng.random::<f64>() * max_abs * random_sign(rng);
    individual.translate(dx, dy)
}

/// Tier handlers for one generation.
///
/// Holds the previous generation's best as a [`Record`]: its `index` is the
/// position of the best in the population being tiered, which is how the
/// elite handler recognizes it.
#[derive(Debug)]
pub struct OffspringPolicy<'a, R: ?Sized> {
    pub rng: &'a mut R,
    pub previous_best: Record,
    pub bounds: Bounds,
    pub remaining_luck_chance: f64,
    pub max_fit_to_substitute_remaining: f64,
}

impl<R> OffspringPolicy<'_, R>
where
    R: Rng + ?Sized,
{
    fn ascending_mate(&mut self, tiers: &Tiers, fallback: &Individual) -> Individual {
        tiers
            .random_ascending(&mut *self.rng)
            .map_or(*fallback, |r| r.individual)
    }

    fn descending_mate(&mut self, tiers: &Tiers, fallback: &Individual) -> Individual {
        tiers
            .random_descending(&mut *self.rng)
            .map_or(*fallback, |r| r.individual)
    }
}

impl<R> TierHandlers for OffspringPolicy<'_, R>
where
    R: Rng + ?Sized,
{
    fn elite(&mut self, tiers: &Tiers, record: &Record) -> Individual {
        if record.index == self.previous_best.index {
            return record.individual;
        }
        let distance = record.individual.distance(&self.previous_best.individual);
        if distance > 0.0 {
            return create_from_elite(&mut *self.rng, record, &self.previous_best, distance);
        }
        // Same coordinates as the best but a different slot.
        tracing::debug!(
            index = record.index,
            best_index = self.previous_best.index,
            "elite duplicates the previous best"
        );
        let mate = self.ascending_mate(tiers, &record.individual);
        create_by_midpoint(&record.individual, &mate)
    }

    fn graced(&mut self, tiers: &Tiers, record: &Record) -> Individual {
        let mate = self.descending_mate(tiers, &record.individual);
        let elite = match tiers.random_elite(&mut *self.rng) {
            Some(elite) => elite.individual,
            None => self.bounds.sample(&mut *self.rng),
        };
        create_and_approach_elite(&record.individual, &mate, &elite)
    }

    fn remaining(&mut self, tiers: &Tiers, record: &Record) -> Individual {
        if record.fitness <= self.max_fit_to_substitute_remaining {
            return self.bounds.sample(&mut *self.rng);
        }
        if self.rng.random_bool(self.remaining_luck_chance) {
            let mate = self.ascending_mate(tiers, &record.individual);
            return create_by_midpoint(&record.individual, &mate);
        }
        let mate1 = self.ascending_mate(tiers, &record.individual);
        let mate2 = self.ascending_mate(tiers, &record.individual);
        let elite = match tiers.random_elite(&mut *self.rng) {
            Some(elite) => elite.individual,
            None => self.descending_mate(tiers, &record.individual),
        };
        create_and_approach_elite(&mate1, &mate2, &elite)
    }
}

#[cfg(test)]
#[expect(clippy::float_cmp)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{
        cluster::PopulationCluster,
        fitness::{FitnessFunction, compute_fitness},
        selector::Selector,
    };

    const BOUNDS: Bounds = Bounds {
        width: 10.0,
        height: 10.0,
    };

    /// Cluster whose fitness is the x coordinate.
    fn tiered(population: &[Individual]) -> PopulationCluster<impl FitnessFunction> {
        let mut cluster = PopulationCluster::new(
            population.len(),
            Selector::new(|p: &Individual| p.x(), 80.0, 20.0),
        );
        cluster.add_all(population);
        cluster
    }

    fn record(index: usize, individual: Individual, fitness: f64) -> Record {
        Record {
            index,
            individual,
            fitness,
        }
    }

    fn policy(rng: &mut Pcg32, previous_best: Record, luck: f64) -> OffspringPolicy<'_, Pcg32> {
        OffspringPolicy {
            rng,
            previous_best,
            bounds: BOUNDS,
            remaining_luck_chance: luck,
            max_fit_to_substitute_remaining: 1.0,
        }
    }

    #[test]
    fn test_create_and_approach_elite() {
        let p1 = Individual::new(0.0, 0.0);
        let p2 = Individual::new(4.0, 8.0);
        let elite = Individual::new(10.0, 10.0);
        assert_eq!(
            create_and_approach_elite(&p1, &p2, &elite),
            Individual::new(6.0, 7.0)
        );
    }

    #[test]
    fn test_mutate_is_bounded() {
        let mut rng = Pcg32::seed_from_u64(11);
        let p = Individual::new(125.0, 270.0);
        for _ in 0..1000 {
            let m = mutate(&mut rng, &p, 0.02);
            assert!((m.x() - p.x()).abs() <= 0.02);
            assert!((m.y() - p.y()).abs() <= 0.02);
        }
        assert_eq!(mutate(&mut rng, &p, 0.0), p);
    }

    #[test]
    fn test_random_sign_takes_both_values() {
        let mut rng = Pcg32::seed_from_u64(5);
        let signs: Vec<_> = (0..64).map(|_| random_sign(&mut rng)).collect();
        assert!(signs.iter().all(|s| *s == 1.0 || *s == -1.0));
        assert!(signs.contains(&1.0) && signs.contains(&-1.0));
    }

    #[test]
    fn test_create_from_elite_with_perfect_best_lands_on_rotated_best() {
        // radius 0: the step reaches the best exactly, only the rotation remains
        let mut rng = Pcg32::seed_from_u64(3);
        let best = record(0, Individual::new(120.0, 80.0), MAX_FITNESS);
        let current = record(1, Individual::new(100.0, 90.0), 85.0);
        let origin = Individual::default();
        let distance = current.individual.distance(&best.individual);
        let best_angle = best.individual.y().atan2(best.individual.x());

        for _ in 0..100 {
            let child = create_from_elite(&mut rng, &current, &best, distance);
            assert!((child.distance(&origin) - best.individual.distance(&origin)).abs() < 1e-9);
            let angle = child.y().atan2(child.x()) - best_angle;
            assert!(angle.abs() <= MAX_ELITE_ROTATION + 1e-12);
        }
    }

    #[test]
    fn test_create_from_elite_stays_finite_on_fitness_tie() {
        let mut rng = Pcg32::seed_from_u64(4);
        let target = Individual::new(0.0, 0.0);
        let best_point = Individual::new(3.0, 0.0);
        let tie_point = Individual::new(0.0, 3.0);
        let fitness = compute_fitness(&best_point, &target);
        let best = record(0, best_point, fitness);
        let current = record(1, tie_point, fitness);

        let child = create_from_elite(
            &mut rng,
            &current,
            &best,
            tie_point.distance(&best_point),
        );
        assert!(child.x().is_finite() && child.y().is_finite());
    }

    #[test]
    fn test_elite_previous_best_passes_through() {
        let mut rng = Pcg32::seed_from_u64(6);
        let population = [Individual::new(90.0, 1.0), Individual::new(85.0, 2.0)];
        let cluster = tiered(&population);
        let best = record(0, population[0], 90.0);
        let mut policy = policy(&mut rng, best, 0.2);

        let elite = cluster.tiers().elite();
        let best_record = elite.iter().find(|r| r.index == 0).unwrap();
        assert_eq!(policy.elite(cluster.tiers(), best_record), population[0]);
    }

    #[test]
    fn test_elite_duplicate_of_best_is_crossed_with_mate() {
        let mut rng = Pcg32::seed_from_u64(7);
        let population = [
            Individual::new(90.0, 1.0),
            Individual::new(90.0, 1.0),
            Individual::new(10.0, 5.0),
        ];
        let cluster = tiered(&population);
        let best = record(0, population[0], 90.0);
        let mut policy = policy(&mut rng, best, 0.2);

        let duplicate = cluster
            .tiers()
            .elite()
            .iter()
            .find(|r| r.index == 1)
            .unwrap();
        // the only Remaining individual is the preferred mate
        assert_eq!(
            policy.elite(cluster.tiers(), duplicate),
            Individual::new(50.0, 3.0)
        );
    }

    #[test]
    fn test_graced_approaches_elite() {
        let mut rng = Pcg32::seed_from_u64(8);
        let population = [Individual::new(92.0, 4.0), Individual::new(70.0, 8.0)];
        let cluster = tiered(&population);
        let mut policy = policy(&mut rng, record(0, population[0], 92.0), 0.2);

        let graced = &cluster.tiers().graced()[0];
        // mate and elite are both the single Elite individual
        assert_eq!(
            policy.graced(cluster.tiers(), graced),
            Individual::new(86.5, 5.0)
        );
    }

    #[test]
    fn test_graced_without_elite_uses_random_individual() {
        let mut rng = Pcg32::seed_from_u64(9);
        let population = [Individual::new(70.0, 0.0), Individual::new(74.0, 0.0)];
        let cluster = tiered(&population);
        let mut policy = policy(&mut rng, record(1, population[1], 74.0), 0.2);

        for graced in cluster.tiers().graced() {
            let child = policy.graced(cluster.tiers(), graced);
            // halfway between a Graced midpoint (x in [70, 74]) and a point in BOUNDS
            assert!((35.0..=42.0).contains(&child.x()), "{child}");
            assert!((0.0..=5.0).contains(&child.y()), "{child}");
        }
    }

    #[test]
    fn test_remaining_dead_end_is_replaced() {
        let mut rng = Pcg32::seed_from_u64(10);
        let population = [Individual::new(0.5, 1000.0), Individual::new(90.0, 0.0)];
        let cluster = tiered(&population);
        let mut policy = policy(&mut rng, record(1, population[1], 90.0), 0.2);

        let dead_end = &cluster.tiers().remaining()[0];
        let child = policy.remaining(cluster.tiers(), dead_end);
        assert!((0.0..10.0).contains(&child.x()));
        assert!((0.0..10.0).contains(&child.y()));
    }

    #[test]
    fn test_remaining_lucky_midpoint() {
        let mut rng = Pcg32::seed_from_u64(12);
        let population = [Individual::new(10.0, 0.0), Individual::new(30.0, 8.0)];
        let cluster = tiered(&population);
        let mut policy = policy(&mut rng, record(1, population[1], 30.0), 1.0);

        let first = &cluster.tiers().remaining()[0];
        for _ in 0..20 {
            let child = policy.remaining(cluster.tiers(), first);
            assert!(
                child == population[0] || child == Individual::new(20.0, 4.0),
                "{child}"
            );
        }
    }

    #[test]
    fn test_remaining_approaches_elite() {
        let mut rng = Pcg32::seed_from_u64(13);
        let population = [Individual::new(20.0, 2.0), Individual::new(90.0, 6.0)];
        let cluster = tiered(&population);
        let mut policy = policy(&mut rng, record(1, population[1], 90.0), 0.0);

        let remaining = &cluster.tiers().remaining()[0];
        // both mates are the single Remaining individual
        assert_eq!(
            policy.remaining(cluster.tiers(), remaining),
            Individual::new(55.0, 4.0)
        );
    }

    #[test]
    fn test_remaining_without_elite_falls_back_to_graced() {
        let mut rng = Pcg32::seed_from_u64(14);
        let population = [Individual::new(20.0, 2.0), Individual::new(70.0, 6.0)];
        let cluster = tiered(&population);
        let mut policy = policy(&mut rng, record(1, population[1], 70.0), 0.0);

        let remaining = &cluster.tiers().remaining()[0];
        assert_eq!(
            policy.remaining(cluster.tiers(), remaining),
            Individual::new(45.0, 4.0)
        );
    }
}
