use core::iter::repeat_n;
use ndarray::Array2;

use super::*;

/// Fills the board from a shuffled "urn" of cell types.
///
/// The urn holds the Empty slots, exactly one Boss, and the monster slots apportioned by the
/// distribution in ascending type order. It is shuffled with a uniform Fisher-Yates pass and
/// then popped once per cell in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct UrnGenerator {
    seed: u64,
}

impl UrnGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Builds the unshuffled urn for `config`.
    pub(crate) fn fill_urn(config: &BoardConfig) -> Vec<CellType> {
        let total = config.total_cells();
        let requested = config.monster_target();

        // one slot always goes to the boss
        let monsters = requested.min(total.saturating_sub(1));
        if monsters < requested {
            log::warn!(
                "Board full of monsters, requested {} but only {} fit beside the boss",
                requested,
                monsters
            );
        }
        let empties = total - 1 - monsters;

        let mut urn = Vec::with_capacity(total.into());
        urn.extend(repeat_n(CellType::Empty, empties.into()));
        urn.push(CellType::Boss);
        for (kind, count) in config.distribution.apportion(monsters) {
            urn.extend(repeat_n(kind, count.into()));
        }
        urn
    }
}

impl BoardGenerator for UrnGenerator {
    fn generate(self, config: &BoardConfig) -> core::result::Result<Board, ConfigError> {
        use rand::rngs::SmallRng;
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        config.validate()?;

        let mut urn = Self::fill_urn(config);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        urn.shuffle(&mut rng);

        let (width, height) = config.size();
        let mut cells: Array2<Cell> = Array2::default(config.size().to_nd_index());
        for y in 0..height {
            for x in 0..width {
                let kind = urn.pop().unwrap_or_default();
                cells[(x, y).to_nd_index()] = Cell::new(kind);
            }
        }

        let board = Board::from_grid(cells, config.frequency, config.distribution);
        log::debug!(
            "Generated {}x{} board with {} monsters (seed {})",
            width,
            height,
            board.monster_count(),
            self.seed
        );
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn distribution() -> Distribution {
        Distribution::new(&[
            (CellType::Rat, 0.4),
            (CellType::Zombie, 0.3),
            (CellType::Skeleton, 0.15),
            (CellType::Ghost, 0.1),
            (CellType::Witch, 0.05),
        ])
        .unwrap()
    }

    #[test]
    fn urn_holds_exactly_one_boss() {
        let config = BoardConfig::new(10, 10, 0.2, distribution()).unwrap();
        let urn = UrnGenerator::fill_urn(&config);

        assert_eq!(urn.len(), 100);
        assert_eq!(urn.iter().filter(|&&kind| kind == CellType::Boss).count(), 1);
        assert_eq!(urn.iter().filter(|&&kind| kind == CellType::Empty).count(), 79);
        assert_eq!(urn.iter().filter(|&&kind| kind == CellType::Rat).count(), 8);
    }

    #[test]
    fn zero_frequency_places_only_the_boss() {
        let config = BoardConfig::new(10, 10, 0.0, distribution()).unwrap();
        let board = UrnGenerator::new(1).generate(&config).unwrap();

        assert_eq!(board.count_of(CellType::Empty), 99);
        assert_eq!(board.count_of(CellType::Boss), 1);
        for coords in board.coords() {
            let cell = board[coords];
            if cell.kind().is_empty() {
                let touches_boss = board
                    .iter_neighbors(coords)
                    .any(|pos| board[pos].kind() == CellType::Boss);
                let expected = if touches_boss { 6 } else { 0 };
                assert_eq!(cell.value(), Some(expected));
            }
        }
    }

    #[test]
    fn single_cell_board_is_the_boss() {
        let config = BoardConfig::new(1, 1, 0.5, distribution()).unwrap();
        let board = UrnGenerator::new(9).generate(&config).unwrap();
        assert_eq!(board[(0, 0)].kind(), CellType::Boss);
    }

    #[test]
    fn full_frequency_keeps_one_boss() {
        let config = BoardConfig::new(4, 3, 1.0, distribution()).unwrap();
        let board = UrnGenerator::new(3).generate(&config).unwrap();
        assert_eq!(board.count_of(CellType::Boss), 1);
        assert_eq!(board.count_of(CellType::Empty), 0);
    }

    #[test]
    fn same_seed_same_board() {
        let config = BoardConfig::new(12, 8, 0.2, distribution()).unwrap();
        let a = UrnGenerator::new(42).generate(&config).unwrap();
        let b = UrnGenerator::new(42).generate(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_distribution_fails_generation() {
        let mut config = BoardConfig::new(5, 5, 0.2, distribution()).unwrap();
        config.distribution = Distribution::from_weights([0.5, 0.2, 0.1, 0.1, 0.0]);
        assert!(matches!(
            UrnGenerator::new(0).generate(&config),
            Err(ConfigError::DistributionSum(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_generated_boards_hold_invariants(
            width in 1usize..30,
            height in 1usize..30,
            frequency in 0.0f64..=1.0,
            seed in any::<u64>(),
        ) {
            let config = BoardConfig::new(width, height, frequency, distribution()).unwrap();
            let board = UrnGenerator::new(seed).generate(&config).unwrap();

            prop_assert_eq!(board.count_of(CellType::Boss), 1);

            let target = frequency * (width * height) as f64;
            let non_empty = board.monster_count() as f64;
            prop_assert!((non_empty - target).abs() <= 1.5, "{} vs {}", non_empty, target);

            for coords in board.coords() {
                let cell = board[coords];
                if cell.kind().is_empty() {
                    prop_assert_eq!(cell.value(), Some(board.neighbor_sum(coords)));
                } else {
                    prop_assert_eq!(cell.value(), None);
                }
            }
        }
    }
}
