use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use class::*;
pub use distribution::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use persistence::*;
pub use player::*;
pub use session::*;
pub use settings::*;
pub use types::*;

mod board;
mod cell;
mod class;
mod distribution;
mod engine;
mod error;
mod generator;
mod persistence;
mod player;
mod session;
mod settings;
mod types;

/// Parameters for a new board.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub width: Coord,
    pub height: Coord,
    /// Share of non-Empty cells, in `[0, 1]`.
    pub frequency: f64,
    pub distribution: Distribution,
}

impl BoardConfig {
    pub fn new(
        width: usize,
        height: usize,
        frequency: f64,
        distribution: Distribution,
    ) -> core::result::Result<Self, ConfigError> {
        let invalid = ConfigError::InvalidDimensions { width, height };
        let config = Self {
            width: Coord::try_from(width).map_err(|_| invalid)?,
            height: Coord::try_from(height).map_err(|_| invalid)?,
            frequency,
            distribution,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width.into(),
                height: self.height.into(),
            });
        }
        if !(0.0..=1.0).contains(&self.frequency) {
            return Err(ConfigError::InvalidFrequency(self.frequency));
        }
        self.distribution.validate()
    }

    pub const fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    /// Rounded number of monster cells asked for, Boss excluded.
    pub fn monster_target(&self) -> CellCount {
        let total = self.total_cells();
        let target = (self.frequency * f64::from(total)).round();
        (target.max(0.0) as CellCount).min(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distribution() -> Distribution {
        Distribution::new(&[(CellType::Rat, 1.0)]).unwrap()
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        assert_eq!(
            BoardConfig::new(0, 5, 0.1, distribution()),
            Err(ConfigError::InvalidDimensions {
                width: 0,
                height: 5
            })
        );
        assert!(matches!(
            BoardConfig::new(300, 5, 0.1, distribution()),
            Err(ConfigError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn rejects_frequency_out_of_range() {
        for frequency in [-0.1, 1.5, f64::NAN] {
            assert!(matches!(
                BoardConfig::new(5, 5, frequency, distribution()),
                Err(ConfigError::InvalidFrequency(_))
            ));
        }
    }

    #[test]
    fn monster_target_rounds() {
        let config = BoardConfig::new(40, 20, 0.2, distribution()).unwrap();
        assert_eq!(config.total_cells(), 800);
        assert_eq!(config.monster_target(), 160);

        let config = BoardConfig::new(3, 3, 0.25, distribution()).unwrap();
        assert_eq!(config.monster_target(), 2);
    }
}
