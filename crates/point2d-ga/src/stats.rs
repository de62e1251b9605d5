//! Summaries of a generation, for hosts that report progress.

use serde::{Deserialize, Serialize};

/// Number of individuals per tier.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub elite: usize,
    pub graced: usize,
    pub remaining: usize,
}

impl TierCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.elite + self.graced + self.remaining
    }
}

/// Location and spread of a set of fitness values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl FitnessSummary {
    /// Summarizes `values`, or returns `None` when there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// # use point2d_ga::stats::FitnessSummary;
    /// let summary = FitnessSummary::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert_eq!(summary.min, 2.0);
    /// assert_eq!(summary.max, 9.0);
    /// assert_eq!(summary.mean, 5.0);
    /// assert_eq!(summary.std_dev, 2.0);
    ///
    /// assert!(FitnessSummary::new(std::iter::empty()).is_none());
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        let n = values.len() as f64;
        let min = values.iter().copied().reduce(f64::min)?;
        let max = values.iter().copied().reduce(f64::max)?;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }
}

/// Median of `values`, `None` if empty. The upper median for even lengths.
#[must_use]
pub fn median<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut values = values.into_iter().collect::<Vec<_>>();
    values.sort_by(f64::total_cmp);
    values.get(values.len() / 2).copied()
}
