use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSnapshot {
    #[serde(rename = "type")]
    pub kind: CellType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u8>,
    pub is_clicked: bool,
    pub is_flagged: bool,
}

impl From<&Cell> for CellSnapshot {
    fn from(cell: &Cell) -> Self {
        Self {
            kind: cell.kind(),
            value: cell.value(),
            is_clicked: cell.is_revealed(),
            is_flagged: cell.is_flagged(),
        }
    }
}

impl From<CellSnapshot> for Cell {
    fn from(snapshot: CellSnapshot) -> Self {
        Cell::from_parts(
            snapshot.kind,
            snapshot.value,
            snapshot.is_clicked,
            snapshot.is_flagged,
        )
    }
}

/// Player stats plus the class state; ability fields are only present for Mage and Assassin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub class_name: PlayerClass,
    pub experience: u32,
    pub health: u32,
    pub max_health: u32,
    pub level: u8,
    pub score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability_armed: Option<bool>,
}

impl From<&Player> for PlayerSnapshot {
    fn from(player: &Player) -> Self {
        let (ability_available, ability_armed) = match *player.kit() {
            ClassKit::Mage { ready, armed } | ClassKit::Assassin { ready, armed } => {
                (Some(ready), Some(armed))
            }
            ClassKit::Warrior | ClassKit::Paladin => (None, None),
        };
        Self {
            class_name: player.class(),
            experience: player.experience(),
            health: player.health(),
            max_health: player.max_health(),
            level: player.level(),
            score: player.score(),
            ability_available,
            ability_armed,
        }
    }
}

impl TryFrom<&PlayerSnapshot> for Player {
    type Error = CorruptState;

    fn try_from(snapshot: &PlayerSnapshot) -> core::result::Result<Self, Self::Error> {
        let ready = snapshot.ability_available.unwrap_or(true);
        let armed = snapshot.ability_armed.unwrap_or(false);
        let has_ability_state =
            snapshot.ability_available.is_some() || snapshot.ability_armed.is_some();

        let kit = match snapshot.class_name {
            PlayerClass::Mage => ClassKit::Mage { ready, armed },
            PlayerClass::Assassin => ClassKit::Assassin { ready, armed },
            class if has_ability_state => {
                return Err(CorruptState::ClassState(class.to_string()));
            }
            class => ClassKit::new(class),
        };

        Player::from_parts(
            kit,
            snapshot.health,
            snapshot.max_health,
            snapshot.experience,
            snapshot.level,
            snapshot.score,
        )
    }
}

/// Snapshot of an in-progress session.
///
/// The board is stored as rows (`board[y][x]`). Board frequency and distribution are not
/// stored; they follow from the difficulty in `settings`. Cascade steps still pending when the
/// snapshot is taken are not part of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMemento {
    pub board: Vec<Vec<CellSnapshot>>,
    pub player: PlayerSnapshot,
    pub elapsed_seconds: u32,
    pub settings: GameSettings,
}

impl StorageKey for GameMemento {
    const KEY: &'static str = "saveGame";
}

impl GameMemento {
    pub fn capture(
        board: &Board,
        player: &Player,
        elapsed_seconds: u32,
        settings: GameSettings,
    ) -> Self {
        let (width, height) = board.size();
        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| CellSnapshot::from(&board[(x, y)]))
                    .collect()
            })
            .collect();

        Self {
            board: rows,
            player: PlayerSnapshot::from(player),
            elapsed_seconds,
            settings,
        }
    }

    /// Rebuilds the board, refusing grids that break the board invariants.
    pub fn restore_board(&self) -> core::result::Result<Board, CorruptState> {
        let height = self.board.len();
        let width = self.board.first().map_or(0, Vec::len);
        let fits = |n: usize| (1..=usize::from(Coord::MAX)).contains(&n);
        if !fits(width) || !fits(height) || self.board.iter().any(|row| row.len() != width) {
            return Err(CorruptState::BoardShape);
        }

        let cells = Array2::from_shape_fn((width, height), |(x, y)| Cell::from(self.board[y][x]));
        let difficulty = self.settings.difficulty;
        let board = Board::from_cells(cells, difficulty.frequency(), difficulty.distribution());
        board.check_invariants()?;
        Ok(board)
    }

    pub fn restore_player(&self) -> core::result::Result<Player, CorruptState> {
        Player::try_from(&self.player)
    }
}
