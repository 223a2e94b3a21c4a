use core::ops::Index;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Grid of cells plus the parameters it was generated from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    frequency: f64,
    distribution: Distribution,
}

impl Board {
    /// Wraps populated cells and derives every Empty cell's value.
    pub(crate) fn from_grid(
        cells: Array2<Cell>,
        frequency: f64,
        distribution: Distribution,
    ) -> Self {
        let mut board = Self {
            cells,
            frequency,
            distribution,
        };
        board.recompute_values();
        board
    }

    /// Builds a hidden board from rows of types (`rows[y][x]`).
    ///
    /// Returns `None` when the rows are empty or ragged.
    pub fn from_types(rows: &[Vec<CellType>], distribution: Distribution) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.len();
        if width == 0 || rows.iter().any(|row| row.len() != width) {
            return None;
        }
        let width_coord = Coord::try_from(width).ok()?;
        let height_coord = Coord::try_from(height).ok()?;

        let cells = Array2::from_shape_fn((width, height), |(x, y)| Cell::new(rows[y][x]));
        let monsters = cells.iter().filter(|cell| cell.kind().is_monster()).count();
        let frequency = monsters as f64 / f64::from(mult(width_coord, height_coord));
        Some(Self::from_grid(cells, frequency, distribution))
    }

    pub(crate) fn from_cells(
        cells: Array2<Cell>,
        frequency: f64,
        distribution: Distribution,
    ) -> Self {
        Self {
            cells,
            frequency,
            distribution,
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap()
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    /// The cell at `coords`, or `None` past any edge.
    pub fn get(&self, coords: Coord2) -> Option<&Cell> {
        let (width, height) = self.size();
        if coords.0 < width && coords.1 < height {
            Some(&self.cells[coords.to_nd_index()])
        } else {
            None
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        self.get(coords).map(|_| coords).ok_or(GameError::InvalidCoords)
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub fn iter_block(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_block(coords)
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (width, height) = self.size();
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    /// Sum of the neighbors' type magnitudes; missing neighbors count as Empty.
    pub fn neighbor_sum(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .map(|pos| self[pos].kind().magnitude())
            .sum()
    }

    pub fn recompute_values(&mut self) {
        for coords in self.coords() {
            if self[coords].kind().is_empty() {
                let sum = self.neighbor_sum(coords);
                self.cell_mut(coords).set_value(sum);
            }
        }
    }

    pub fn count_of(&self, kind: CellType) -> usize {
        self.cells.iter().filter(|cell| cell.kind() == kind).count()
    }

    pub fn monster_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.kind().is_monster())
            .count()
    }

    pub fn revealed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_revealed()).count()
    }

    pub fn has_revealed_neighbor(&self, coords: Coord2) -> bool {
        self.iter_neighbors(coords).any(|pos| self[pos].is_revealed())
    }

    /// Reveals every cell at once, without cascading or side effects.
    pub fn reveal_all(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.reveal();
        }
    }

    /// Gives every hidden monster that no revealed cell touches a `chance` to advance one tier.
    ///
    /// Values are recomputed afterwards. Returns how many monsters evolved.
    pub fn evolve<R: Rng>(&mut self, rng: &mut R, chance: f64) -> usize {
        let candidates: Vec<Coord2> = self
            .coords()
            .filter(|&coords| {
                let cell = self[coords];
                cell.is_hidden()
                    && cell.kind().is_monster()
                    && cell.kind().evolved() != cell.kind()
                    && !self.has_revealed_neighbor(coords)
            })
            .collect();

        let mut evolved = 0;
        for coords in candidates {
            if rng.random_bool(chance) {
                let next = self[coords].kind().evolved();
                log::trace!("Evolve {:?} at {:?} into {:?}", self[coords].kind(), coords, next);
                self.cell_mut(coords).set_kind(next);
                evolved += 1;
            }
        }

        if evolved > 0 {
            self.recompute_values();
        }
        log::debug!("Board evolution advanced {} monsters", evolved);
        evolved
    }

    /// Checks the invariants a restored board must hold.
    pub(crate) fn check_invariants(&self) -> core::result::Result<(), CorruptState> {
        for coords in self.coords() {
            let cell = self[coords];
            let at = (coords.0.into(), coords.1.into());
            if cell.is_revealed() && cell.is_flagged() {
                return Err(CorruptState::FlaggedReveal(at));
            }
            let expected = cell.kind().is_empty().then(|| self.neighbor_sum(coords));
            if cell.value() != expected {
                return Err(CorruptState::CellValue(at));
            }
        }

        let mut bosses = self.coords().filter(|&coords| self[coords].kind() == CellType::Boss);
        match (bosses.next(), bosses.count()) {
            (Some(boss), 0) if self[boss].is_revealed() => Err(CorruptState::BossRevealed),
            (Some(_), 0) => Ok(()),
            (first, rest) => Err(CorruptState::BossCount(usize::from(first.is_some()) + rest)),
        }
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.cells[(x as usize, y as usize)]
    }
}
