use serde::{Deserialize, Serialize};

/// Monster strength of a cell, ordered from harmless to the final boss.
///
/// The discriminant doubles as the monster level and as the damage magnitude, and is what
/// an Empty cell's value sums over.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CellType {
    Empty = 0,
    Rat = 1,
    Zombie = 2,
    Skeleton = 3,
    Ghost = 4,
    Witch = 5,
    Boss = 6,
}

impl CellType {
    /// Every monster type a distribution may weight, in ascending order.
    pub const MONSTERS: [CellType; 5] = [
        CellType::Rat,
        CellType::Zombie,
        CellType::Skeleton,
        CellType::Ghost,
        CellType::Witch,
    ];

    pub const fn magnitude(self) -> u8 {
        self as u8
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn is_monster(self) -> bool {
        !self.is_empty()
    }

    /// The next tier for board evolution. Witch is the ceiling; Empty and Boss never evolve.
    pub const fn evolved(self) -> Self {
        use CellType::*;
        match self {
            Rat => Zombie,
            Zombie => Skeleton,
            Skeleton => Ghost,
            Ghost => Witch,
            Witch => Witch,
            Empty => Empty,
            Boss => Boss,
        }
    }
}

impl Default for CellType {
    fn default() -> Self {
        Self::Empty
    }
}

/// One grid unit. The position is implied by its index in the board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    kind: CellType,
    value: Option<u8>,
    revealed: bool,
    flagged: bool,
}

impl Cell {
    pub const fn new(kind: CellType) -> Self {
        Self {
            kind,
            value: None,
            revealed: false,
            flagged: false,
        }
    }

    pub(crate) const fn from_parts(
        kind: CellType,
        value: Option<u8>,
        revealed: bool,
        flagged: bool,
    ) -> Self {
        Self {
            kind,
            value,
            revealed,
            flagged,
        }
    }

    pub const fn kind(&self) -> CellType {
        self.kind
    }

    /// Neighbor magnitude sum, defined only for Empty cells.
    pub const fn value(&self) -> Option<u8> {
        self.value
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    pub const fn is_hidden(&self) -> bool {
        !self.revealed
    }

    pub const fn is_zero(&self) -> bool {
        matches!(self.value, Some(0))
    }

    pub(crate) fn set_kind(&mut self, kind: CellType) {
        self.kind = kind;
        if kind.is_monster() {
            self.value = None;
        }
    }

    pub(crate) fn set_value(&mut self, value: u8) {
        debug_assert!(self.kind.is_empty(), "only Empty cells carry a value");
        self.value = Some(value);
    }

    /// Terminal transition; any flag is cleared.
    pub(crate) fn reveal(&mut self) -> bool {
        if self.revealed {
            return false;
        }
        self.revealed = true;
        self.flagged = false;
        true
    }

    /// Hidden <-> Flagged. Revealed cells are left untouched.
    pub(crate) fn toggle_flag(&mut self) -> bool {
        if self.revealed {
            return false;
        }
        self.flagged = !self.flagged;
        true
    }
}
