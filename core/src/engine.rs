use core::ops::BitOr;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::*;

/// Chance for each eligible hidden monster to advance a tier on level-up.
pub const EVOLUTION_CHANCE: f64 = 0.25;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Active
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    NoChange,
    Changed,
    Won,
    Lost,
}

impl ActionOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Merges outcomes of a multi-cell action; losing beats winning beats any change.
impl BitOr for ActionOutcome {
    type Output = ActionOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use ActionOutcome::*;
        match (self, rhs) {
            (Lost, _) | (_, Lost) => Lost,
            (Won, _) | (_, Won) => Won,
            (Changed, _) | (_, Changed) => Changed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EngineOptions {
    /// Secondary action never places flags.
    pub remove_flags: bool,
    pub evolution_chance: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            remove_flags: false,
            evolution_chance: EVOLUTION_CHANCE,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct CascadeStep {
    coords: Coord2,
    /// Whether reveals from this step grant open experience.
    rewarded: bool,
}

/// Applies cell interactions to a board and its player.
///
/// Reveal cascades run through a FIFO work queue in the fixed neighbor scan order. Actions
/// only seed the queue; [`PlayEngine::step_cascade`] resolves one entry at a time so the caller
/// can pace them, and [`PlayEngine::run_cascade`] drains it. Once the engine is finished the
/// queue is dropped at the next step.
#[derive(Clone, Debug)]
pub struct PlayEngine {
    board: Board,
    player: Player,
    state: EngineState,
    options: EngineOptions,
    cascade: VecDeque<CascadeStep>,
    rng: SmallRng,
}

impl PlayEngine {
    pub fn new(board: Board, player: Player, options: EngineOptions, seed: u64) -> Self {
        Self {
            board,
            player,
            state: Default::default(),
            options,
            cascade: VecDeque::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn pending_cascade(&self) -> usize {
        self.cascade.len()
    }

    pub fn compute_score(&mut self, elapsed_secs: u32) -> u32 {
        self.player.compute_score(elapsed_secs)
    }

    pub fn special_ability(&self) -> Option<SpecialAbility> {
        self.player.kit().special_ability()
    }

    pub fn use_special_ability(&mut self) -> Result<SpecialAbility> {
        self.check_not_finished()?;
        self.player.kit_mut().use_special_ability()
    }

    /// Reveals a random lowest-value Empty cell, preferring a zero so the opening cascades.
    ///
    /// Nothing revealed by the opening grants experience.
    pub fn open_safe_start(&mut self) -> Option<Coord2> {
        let hidden_empty = |board: &Board, coords: Coord2| {
            let cell = board[coords];
            cell.is_hidden() && cell.kind().is_empty()
        };

        let lowest = self
            .board
            .coords()
            .filter(|&coords| hidden_empty(&self.board, coords))
            .filter_map(|coords| self.board[coords].value())
            .min()?;
        let candidates: Vec<Coord2> = self
            .board
            .coords()
            .filter(|&coords| {
                hidden_empty(&self.board, coords) && self.board[coords].value() == Some(lowest)
            })
            .collect();

        let start = candidates[self.rng.random_range(0..candidates.len())];
        log::debug!("Safe start at {:?} with value {}", start, lowest);
        self.reveal_empty(start, false);
        Some(start)
    }

    pub fn primary_action(&mut self, coords: Coord2) -> Result<ActionOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_not_finished()?;

        let cell = self.board[coords];
        let action = self.player.kit_mut().on_primary_action(cell.is_hidden());
        Ok(match action {
            ActionOverride::Fireball => self.fireball(coords),
            ActionOverride::Execute => self.strike(coords, ActionOverride::Execute),
            ActionOverride::Strike | ActionOverride::Default => {
                if cell.is_revealed() || cell.is_flagged() {
                    ActionOutcome::NoChange
                } else {
                    self.resolve(coords, true, true)
                }
            }
        })
    }

    pub fn secondary_action(&mut self, coords: Coord2) -> Result<ActionOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_not_finished()?;

        let cell = self.board[coords];
        let action = self.player.kit_mut().on_secondary_action(cell.is_hidden());
        Ok(match action {
            ActionOverride::Fireball => self.fireball(coords),
            ActionOverride::Execute => self.strike(coords, ActionOverride::Execute),
            ActionOverride::Strike => self.strike(coords, ActionOverride::Strike),
            ActionOverride::Default if cell.is_revealed() => self.chord(coords),
            ActionOverride::Default if self.options.remove_flags && !cell.is_flagged() => {
                ActionOutcome::NoChange
            }
            ActionOverride::Default => {
                self.board.cell_mut(coords).toggle_flag();
                ActionOutcome::Changed
            }
        })
    }

    /// Fights the monster at `coords`; `damage` overrides the regular encounter formula.
    ///
    /// Empty cells are revealed instead, revealed cells are left alone.
    pub fn attack(&mut self, coords: Coord2, damage: Option<u32>) -> Result<ActionOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_not_finished()?;

        let cell = self.board[coords];
        Ok(if cell.is_revealed() {
            ActionOutcome::NoChange
        } else if cell.kind().is_empty() {
            self.reveal_empty(coords, true)
        } else {
            let damage = damage.unwrap_or_else(|| self.player.encounter_damage(cell.kind()));
            self.encounter(coords, damage)
        })
    }

    /// Resolves the next queued cascade entry.
    ///
    /// Returns `None` once the queue is empty, or as soon as the engine has finished.
    pub fn step_cascade(&mut self) -> Option<ActionOutcome> {
        if self.state.is_finished() {
            if !self.cascade.is_empty() {
                log::trace!("Dropping {} pending cascade steps", self.cascade.len());
                self.cascade.clear();
            }
            return None;
        }

        let step = self.cascade.pop_front()?;
        log::trace!("Cascade step at {:?}", step.coords);
        Some(self.resolve(step.coords, false, step.rewarded))
    }

    pub fn run_cascade(&mut self) -> ActionOutcome {
        let mut outcome = ActionOutcome::NoChange;
        while let Some(step) = self.step_cascade() {
            outcome = outcome | step;
        }
        outcome
    }

    pub fn cancel_cascade(&mut self) {
        self.cascade.clear();
    }

    /// Ends the game from outside (no-op when already finished).
    pub fn finish(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }
        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        self.cascade.clear();
        log::debug!("Engine finished: {:?}", self.state);
    }

    pub fn reveal_all(&mut self) {
        self.cascade.clear();
        self.board.reveal_all();
    }

    /// Shared rule for direct actions and cascade steps.
    ///
    /// Zero-value Empty cells queue their neighbors; the boss only answers a direct action.
    fn resolve(&mut self, coords: Coord2, direct: bool, rewarded: bool) -> ActionOutcome {
        let cell = self.board[coords];
        if cell.is_revealed() || (!direct && cell.is_flagged()) {
            return ActionOutcome::NoChange;
        }

        match cell.kind() {
            CellType::Empty => self.reveal_empty(coords, rewarded),
            CellType::Boss if !direct => ActionOutcome::NoChange,
            kind => self.encounter(coords, self.player.encounter_damage(kind)),
        }
    }

    fn reveal_empty(&mut self, coords: Coord2, rewarded: bool) -> ActionOutcome {
        if !self.board.cell_mut(coords).reveal() {
            return ActionOutcome::NoChange;
        }
        log::trace!("Revealed {:?}, value {:?}", coords, self.board[coords].value());

        if rewarded {
            self.gain_experience(OPEN_EXPERIENCE);
        }
        if self.board[coords].is_zero() {
            self.queue_neighbors(coords, rewarded);
        }
        ActionOutcome::Changed
    }

    fn encounter(&mut self, coords: Coord2, damage: u32) -> ActionOutcome {
        let kind = self.board[coords].kind();
        self.board.cell_mut(coords).reveal();
        log::debug!("Encounter with {:?} at {:?} for {} damage", kind, coords, damage);

        let reward = u32::from(kind.magnitude()) * EXPERIENCE_MULTIPLIER;
        match self.player.take_damage(damage) {
            DamageOutcome::Died => {
                // The kill still counts; the board of a lost game does not evolve.
                self.player.gain_experience(reward);
                self.finish(false);
                return ActionOutcome::Lost;
            }
            DamageOutcome::AlreadyDead => return ActionOutcome::NoChange,
            DamageOutcome::Hurt | DamageOutcome::Unharmed => {}
        }

        self.gain_experience(reward);
        if kind == CellType::Boss {
            self.finish(true);
            ActionOutcome::Won
        } else {
            ActionOutcome::Changed
        }
    }

    fn strike(&mut self, coords: Coord2, mode: ActionOverride) -> ActionOutcome {
        let cell = self.board[coords];
        if cell.is_revealed() {
            return ActionOutcome::NoChange;
        }
        if cell.kind().is_empty() {
            return self.reveal_empty(coords, true);
        }

        let damage = match mode {
            ActionOverride::Execute => self.player.execute_damage(cell.kind()),
            _ => self.player.strike_damage(cell.kind()),
        };
        self.encounter(coords, damage)
    }

    fn fireball(&mut self, coords: Coord2) -> ActionOutcome {
        let targets: Vec<Coord2> = self
            .board
            .iter_block(coords)
            .filter(|&pos| {
                let cell = self.board[pos];
                cell.is_hidden() && cell.kind().is_empty()
            })
            .collect();
        log::debug!("Fireball at {:?} reveals {} cells", coords, targets.len());

        targets
            .into_iter()
            .map(|pos| self.reveal_empty(pos, true))
            .fold(ActionOutcome::NoChange, BitOr::bitor)
    }

    fn chord(&mut self, coords: Coord2) -> ActionOutcome {
        if self.queue_neighbors(coords, true) > 0 {
            ActionOutcome::Changed
        } else {
            ActionOutcome::NoChange
        }
    }

    fn queue_neighbors(&mut self, coords: Coord2, rewarded: bool) -> usize {
        if self.state.is_finished() {
            return 0;
        }
        let before = self.cascade.len();
        for pos in self.board.iter_neighbors(coords) {
            let cell = self.board[pos];
            if cell.is_hidden() && !cell.is_flagged() {
                self.cascade.push_back(CascadeStep {
                    coords: pos,
                    rewarded,
                });
            }
        }
        self.cascade.len() - before
    }

    fn gain_experience(&mut self, amount: u32) {
        let gained = self.player.gain_experience(amount);
        for _ in 0..gained {
            self.board.evolve(&mut self.rng, self.options.evolution_chance);
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
