use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for monster counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`, `x` being the column and `y` the row.
pub type Coord2 = (Coord, Coord);

/// Board coordinates as an `ndarray` index into the `(x, y)` shaped cell grid.
pub trait ToNdIndex {
    fn to_nd_index(self) -> [usize; 2];
}

impl ToNdIndex for Coord2 {
    fn to_nd_index(self) -> [usize; 2] {
        let (x, y) = self;
        [usize::from(x), usize::from(y)]
    }
}

/// Cell count of a `width × height` grid.
pub const fn mult(width: Coord, height: Coord) -> CellCount {
    (width as CellCount).saturating_mul(height as CellCount)
}

pub trait NeighborIterExt {
    /// Up to 8 in-bounds neighbors of `index`, in the fixed scan order.
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;

    /// The 3×3 block centred on `index` (center included), clipped to the grid.
    fn iter_block(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, grid_bounds(self), &NEIGHBORHOOD)
    }

    fn iter_block(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, grid_bounds(self), &BLOCK)
    }
}

fn grid_bounds<T>(grid: &Array2<T>) -> Coord2 {
    let dim = grid.dim();
    (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
}

/// Scan order: rows top to bottom (`dy` outer), columns left to right (`dx` inner).
const NEIGHBORHOOD: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const BLOCK: [(i8, i8); 9] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// `coords` moved by `(dx, dy)`; `None` past any edge, the grid does not wrap.
fn offset(coords: Coord2, (dx, dy): (i8, i8), (width, height): Coord2) -> Option<Coord2> {
    let x = coords.0.checked_add_signed(dx)?;
    let y = coords.1.checked_add_signed(dy)?;
    (x < width && y < height).then_some((x, y))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    deltas: &'static [(i8, i8)],
    index: u8,
}

impl NeighborIter {
    fn new(center: Coord2, bounds: Coord2, deltas: &'static [(i8, i8)]) -> Self {
        Self {
            center,
            bounds,
            deltas,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = self.deltas.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(coords) = offset(self.center, *delta, self.bounds) {
                return Some(coords);
            }
        }
    }
}
