use rand::Rng;
use thiserror::Error;

/// Errors raised while building a weighted table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightError {
    #[error("probability {prob} at entry {index} is outside [0, 1]")]
    OutOfRange { index: usize, prob: f64 },
    #[error("probability at entry {index} is not a finite number")]
    NonFinite { index: usize },
}

/// One option with an optional probability.
///
/// Entries without a probability share whatever mass the explicit ones leave over.
#[derive(Debug, Clone, PartialEq)]
pub struct Weighted<T> {
    pub value: T,
    pub prob: Option<f64>,
}

impl<T> Weighted<T> {
    /// Wraps a raw value with no probability assigned.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self { value, prob: None }
    }

    #[must_use]
    pub fn with_prob(value: T, prob: f64) -> Self {
        Self {
            value,
            prob: Some(prob),
        }
    }
}

/// Table preparation flags.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PickOptions {
    /// Distribute the unallocated mass over entries with no probability.
    pub prepare: bool,
    /// Rescale every probability so the total is exactly 1.
    pub normalise: bool,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            prepare: true,
            normalise: false,
        }
    }
}

/// Prepared set of options drawn by cumulative-probability thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTable<T> {
    entries: Vec<(T, f64)>,
}

impl<T> WeightedTable<T> {
    /// Validates explicit probabilities and resolves the table per `options`.
    ///
    /// Without `prepare`, entries lacking a probability count as zero.
    pub fn new(entries: Vec<Weighted<T>>, options: PickOptions) -> Result<Self, WeightError> {
        for (index, entry) in entries.iter().enumerate() {
            let Some(prob) = entry.prob else {
                continue;
            };
            if !prob.is_finite() {
                return Err(WeightError::NonFinite { index });
            }
            if !(0.0..=1.0).contains(&prob) {
                return Err(WeightError::OutOfRange { index, prob });
            }
        }

        let share = if options.prepare {
            unallocated_share(&entries)
        } else {
            0.0
        };

        let mut resolved: Vec<(T, f64)> = entries
            .into_iter()
            .map(|entry| {
                let prob = entry.prob.unwrap_or(share);
                (entry.value, prob)
            })
            .collect();

        if options.normalise {
            let total: f64 = resolved.iter().map(|(_, prob)| prob).sum();
            if total > 0.0 {
                let scale = 1.0 / total;
                for (_, prob) in &mut resolved {
                    *prob *= scale;
                }
            }
        }

        Ok(Self { entries: resolved })
    }

    /// Returns the first entry whose band `(threshold, threshold + prob]` contains `r`.
    ///
    /// `r == 0.0` never matches, and neither does any `r` past the total mass.
    #[must_use]
    pub fn select(&self, r: f64) -> Option<&T> {
        let mut threshold = 0.0;
        for (value, prob) in &self.entries {
            if r > threshold && r <= threshold + prob {
                return Some(value);
            }
            threshold += prob;
        }
        None
    }

    /// Draws `r` from `[0, 1)` and selects with it.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        self.select(rng.gen_range(0.0..1.0))
    }

    /// Iterates over resolved probabilities in entry order.
    pub fn probabilities(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, prob)| *prob)
    }
}

fn unallocated_share<T>(entries: &[Weighted<T>]) -> f64 {
    let unset = entries.iter().filter(|entry| entry.prob.is_none()).count();
    if unset == 0 {
        return 0.0;
    }

    let given: f64 = entries.iter().filter_map(|entry| entry.prob).sum();
    (1.0 - given).max(0.0) / unset as f64
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{PickOptions, WeightError, Weighted, WeightedTable};

    #[test]
    fn unset_entries_share_the_remainder() {
        let table = WeightedTable::new(
            vec![
                Weighted::with_prob('a', 0.4),
                Weighted::new('b'),
                Weighted::new('c'),
            ],
            PickOptions::default(),
        )
        .expect("table should build");

        let probs: Vec<f64> = table.probabilities().collect();
        assert!((probs[0] - 0.4).abs() < 1e-12);
        assert!((probs[1] - 0.3).abs() < 1e-12);
        assert!((probs[2] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn overshooting_explicit_mass_leaves_nothing_for_unset() {
        let table = WeightedTable::new(
            vec![Weighted::with_prob(1, 0.7), Weighted::with_prob(2, 0.6), Weighted::new(3)],
            PickOptions::default(),
        )
        .expect("table should build");

        assert_eq!(table.probabilities().last(), Some(0.0));
    }

    #[test]
    fn normalise_rescales_to_unit_total() {
        let table = WeightedTable::new(
            vec![Weighted::with_prob("x", 0.2), Weighted::with_prob("y", 0.6)],
            PickOptions {
                prepare: true,
                normalise: true,
            },
        )
        .expect("table should build");

        let probs: Vec<f64> = table.probabilities().collect();
        assert!((probs[0] - 0.25).abs() < 1e-12);
        assert!((probs[1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn select_uses_half_open_bands() {
        let table = WeightedTable::new(
            vec![Weighted::with_prob('a', 0.5), Weighted::with_prob('b', 0.5)],
            PickOptions::default(),
        )
        .expect("table should build");

        assert_eq!(table.select(0.25), Some(&'a'));
        assert_eq!(table.select(0.5), Some(&'a'));
        assert_eq!(table.select(0.500_001), Some(&'b'));
        assert_eq!(table.select(0.0), None);
    }

    #[test]
    fn degenerate_weights_select_nothing() {
        let table = WeightedTable::new(
            vec![Weighted::with_prob('a', 0.0), Weighted::with_prob('b', 0.0)],
            PickOptions {
                prepare: true,
                normalise: true,
            },
        )
        .expect("table should build");

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            assert_eq!(table.pick(&mut rng), None);
        }
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let result = WeightedTable::new(
            vec![Weighted::new(0), Weighted::with_prob(1, 1.5)],
            PickOptions::default(),
        );

        assert_eq!(
            result,
            Err(WeightError::OutOfRange {
                index: 1,
                prob: 1.5
            })
        );
    }

    #[test]
    fn rejects_nan_probability() {
        let result =
            WeightedTable::new(vec![Weighted::with_prob(0, f64::NAN)], PickOptions::default());
        assert_eq!(result, Err(WeightError::NonFinite { index: 0 }));
    }

    #[test]
    fn empirical_frequencies_track_weights() {
        let weights = [0.6, 0.3, 0.1];
        let table = WeightedTable::new(
            weights
                .iter()
                .enumerate()
                .map(|(index, prob)| Weighted::with_prob(index, *prob))
                .collect(),
            PickOptions::default(),
        )
        .expect("table should build");

        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 100_000;
        let mut counts = [0_usize; 3];
        for _ in 0..trials {
            if let Some(index) = table.pick(&mut rng) {
                counts[*index] += 1;
            }
        }

        for (count, expected) in counts.iter().zip(weights) {
            let observed = *count as f64 / trials as f64;
            assert!(
                (observed - expected).abs() < 0.01,
                "observed {observed} expected {expected}"
            );
        }
    }
}
