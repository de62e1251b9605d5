//! The unit of the population: an immutable point on the plane.
//!
//! Individuals are plain `Copy` values. Every operation that "changes" an
//! individual (offspring synthesis, mutation) returns a new value, so two
//! generations never alias each other.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A candidate solution: a point with two real-valued coordinates.
///
/// # Example
///
/// ```
/// use point2d_ga::individual::Individual;
///
/// let a = Individual::new(-1.0, -5.0);
/// let b = Individual::new(3.0, -5.0);
/// assert_eq!(a.distance(&b), 4.0);
/// assert_eq!(a.midpoint(&b), Individual::new(1.0, -5.0));
/// ```
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize, derive_more::Display,
)]
#[display("({x:.3}, {y:.3})")]
pub struct Individual {
    x: f64,
    y: f64,
}

impl Individual {
    /// Creates an individual at `(x, y)`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance to `other`.
    ///
    /// Non-negative and symmetric; zero only when both points coincide.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new(f64::midpoint(self.x, other.x), f64::midpoint(self.y, other.y))
    }

    /// Rotates the point by `angle` radians about the coordinate origin.
    ///
    /// The pivot is the origin, not the target.
    #[must_use]
    pub fn rotate(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.y * cos + self.x * sin)
    }

    /// Returns a copy shifted by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// The rectangle `[0, width) × [0, height)` new individuals are sampled from.
///
/// Bounds only drive random sampling; offspring and mutants may leave the
/// rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
        }
    }
}

impl Bounds {
    /// Samples an individual uniformly inside the bounds.
    pub fn sample<R>(&self, rng: &mut R) -> Individual
    where
        R: Rng + ?Sized,
    {
        let x = rng.random::<f64>() * self.width;
        let y = rng.random::<f64>() * self.height;
        Individual::new(x, y)
    }

    /// Samples `count` independent individuals.
    pub fn sample_population<R>(&self, rng: &mut R, count: usize) -> Vec<Individual>
    where
        R: Rng + ?Sized,
    {
        (0..count).map(|_| self.sample(rng)).collect()
    }
}
