use serde::{Deserialize, Serialize};

use crate::error::AggregationError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileEstimate {
    pub percentile: f64,
    pub duration_days: f64,
}

/// Per-trial project durations, in trial order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleSet {
    samples: Vec<f64>,
}

impl SampleSet {
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    pub fn min(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::max)
    }

    pub fn sorted(&self) -> SortedSamples {
        let mut values = self.samples.clone();
        values.sort_by(f64::total_cmp);
        SortedSamples { values }
    }

    pub fn percentile(&self, p: f64) -> Result<f64, AggregationError> {
        self.sorted().percentile(p)
    }
}

impl From<Vec<f64>> for SampleSet {
    fn from(samples: Vec<f64>) -> Self {
        Self::new(samples)
    }
}

/// Ascending copy of a sample set, for repeated percentile queries.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedSamples {
    values: Vec<f64>,
}

impl SortedSamples {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn percentile(&self, p: f64) -> Result<f64, AggregationError> {
        percentile_of_sorted(&self.values, p)
    }

    pub fn percentiles(&self, ps: &[f64]) -> Result<Vec<PercentileEstimate>, AggregationError> {
        ps.iter()
            .map(|&p| {
                Ok(PercentileEstimate {
                    percentile: p,
                    duration_days: self.percentile(p)?,
                })
            })
            .collect()
    }
}

/// Linear interpolation between order statistics.
///
/// `rank = p / 100 * (n - 1)`; an integral rank returns that sample, otherwise
/// the two neighbouring samples are interpolated. The result is clamped to the
/// bounding pair so that it never decreases as `p` grows.
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> Result<f64, AggregationError> {
    if sorted.is_empty() {
        return Err(AggregationError::EmptySampleSet);
    }
    if !(0.0..=100.0).contains(&p) {
        return Err(AggregationError::PercentileOutOfRange(p));
    }

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(sorted.len() - 1);
    let (a, b) = (sorted[lower], sorted[upper]);
    if lower == upper {
        return Ok(a);
    }
    let fraction = rank - lower as f64;
    Ok((a + (b - a) * fraction).max(a).min(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_linear_interpolation_convention() {
        let samples = SampleSet::new(vec![4.0, 1.0, 3.0, 2.0]);
        let sorted = samples.sorted();
        assert_eq!(sorted.percentile(0.0).unwrap(), 1.0);
        assert_eq!(sorted.percentile(100.0).unwrap(), 4.0);
        // rank 1.5 -> halfway between 2 and 3
        assert!((sorted.percentile(50.0).unwrap() - 2.5).abs() < 1e-12);
        // rank 2.4 -> 3 + 0.4
        assert!((sorted.percentile(80.0).unwrap() - 3.4).abs() < 1e-12);
        // rank 2.7 -> 3 + 0.7
        assert!((sorted.percentile(90.0).unwrap() - 3.7).abs() < 1e-12);
    }

    #[test]
    fn single_sample_is_every_percentile() {
        let sorted = SampleSet::new(vec![8.0]).sorted();
        for p in [0.0, 12.5, 50.0, 99.9, 100.0] {
            assert_eq!(sorted.percentile(p).unwrap(), 8.0);
        }
    }

    #[test]
    fn empty_set_and_bad_percentiles_fail() {
        let empty = SampleSet::default();
        assert_eq!(
            empty.percentile(50.0),
            Err(AggregationError::EmptySampleSet)
        );
        let set = SampleSet::new(vec![1.0, 2.0]);
        assert!(matches!(
            set.percentile(100.5),
            Err(AggregationError::PercentileOutOfRange(_))
        ));
        assert!(set.percentile(f64::NAN).is_err());
    }

    #[test]
    fn summary_statistics() {
        let set = SampleSet::new(vec![2.0, 6.0, 4.0]);
        assert_eq!(set.mean(), Some(4.0));
        assert_eq!(set.min(), Some(2.0));
        assert_eq!(set.max(), Some(6.0));
        assert_eq!(SampleSet::default().mean(), None);
    }
}
