use serde::{Deserialize, Serialize};

use crate::{CellCount, CellType, ConfigError};

/// Allowed distance from 1 for the sum of a distribution's weights.
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-6;

/// Slack for the float error accumulated while summing the weights.
const SUMMATION_SLACK: f64 = 1e-12;

/// Normalized proportions over the monster types Rat..=Witch.
///
/// Boss is never weighted: the generator places exactly one Boss on its own.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    weights: [f64; CellType::MONSTERS.len()],
}

impl Distribution {
    /// Builds a distribution from `(type, proportion)` pairs; omitted types weigh 0.
    pub fn new(entries: &[(CellType, f64)]) -> Result<Self, ConfigError> {
        let mut weights = [0.0; CellType::MONSTERS.len()];
        for &(kind, weight) in entries {
            match kind {
                CellType::Empty => return Err(ConfigError::EmptyInDistribution),
                CellType::Boss => return Err(ConfigError::BossInDistribution),
                _ => {}
            }
            weights[Self::slot(kind)] += weight;
        }
        let distribution = Self { weights };
        distribution.validate()?;
        Ok(distribution)
    }

    /// Wraps raw weights in Rat..=Witch order without validating them.
    pub(crate) const fn from_weights(weights: [f64; CellType::MONSTERS.len()]) -> Self {
        Self { weights }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (kind, weight) in self.iter() {
            if weight.is_nan() || weight < 0.0 {
                return Err(ConfigError::NegativeWeight(kind));
            }
        }

        let sum: f64 = self.weights.iter().sum();
        if (sum - 1.0).abs() > DISTRIBUTION_TOLERANCE + SUMMATION_SLACK {
            return Err(ConfigError::DistributionSum(sum));
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellType, f64)> + '_ {
        CellType::MONSTERS.into_iter().zip(self.weights.iter().copied())
    }

    /// Splits `count` monster slots across the types in ascending order.
    ///
    /// Bucket boundaries are the rounded cumulative proportions, clamped to be monotone, and
    /// the last positively weighted type absorbs whatever rounding left over, so the counts
    /// always add up to `count` and none of them can go negative.
    pub fn apportion(&self, count: CellCount) -> [(CellType, CellCount); CellType::MONSTERS.len()] {
        let last_weighted = self.weights.iter().rposition(|&weight| weight > 0.0);
        let mut buckets = CellType::MONSTERS.map(|kind| (kind, 0));
        let mut cumulative = 0.0;
        let mut previous: CellCount = 0;

        for (i, &weight) in self.weights.iter().enumerate() {
            cumulative += weight;
            let boundary = match last_weighted {
                Some(last) if i >= last => count,
                None if i + 1 == self.weights.len() => count,
                _ => {
                    let scaled = (cumulative * f64::from(count)).round();
                    (scaled.max(0.0) as CellCount).min(count)
                }
            };
            let boundary = boundary.max(previous);
            buckets[i].1 = boundary - previous;
            previous = boundary;
        }

        buckets
    }

    const fn slot(kind: CellType) -> usize {
        kind.magnitude() as usize - 1
    }
}
