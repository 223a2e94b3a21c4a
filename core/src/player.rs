use serde::{Deserialize, Serialize};

use crate::*;

/// Cumulative experience needed to leave level `n + 1`.
pub const LEVEL_THRESHOLDS: [u32; 4] = [100, 200, 300, 400];

pub const MAX_LEVEL: u8 = LEVEL_THRESHOLDS.len() as u8 + 1;

/// Level reached with `experience` cumulative experience.
pub fn level_for(experience: u32) -> u8 {
    1 + LEVEL_THRESHOLDS
        .iter()
        .take_while(|&&threshold| experience >= threshold)
        .count() as u8
}

/// Experience per monster magnitude.
pub const EXPERIENCE_MULTIPLIER: u32 = 3;

/// Experience for revealing one Empty cell.
pub const OPEN_EXPERIENCE: u32 = 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    Unharmed,
    Hurt,
    /// Health just reached zero; reported once.
    Died,
    AlreadyDead,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    kit: ClassKit,
    health: u32,
    max_health: u32,
    experience: u32,
    level: u8,
    score: u32,
}

impl Player {
    pub fn new(class: PlayerClass) -> Self {
        let health = class.base_health();
        Self {
            kit: ClassKit::new(class),
            health,
            max_health: health,
            experience: 0,
            level: 1,
            score: 0,
        }
    }

    pub(crate) fn from_parts(
        kit: ClassKit,
        health: u32,
        max_health: u32,
        experience: u32,
        level: u8,
        score: u32,
    ) -> core::result::Result<Self, CorruptState> {
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(CorruptState::PlayerRange("level"));
        }
        if level != level_for(experience) {
            return Err(CorruptState::LevelMismatch { level, experience });
        }
        if health == 0 || health > max_health {
            return Err(CorruptState::PlayerRange("health"));
        }
        if !kit.is_consistent() {
            return Err(CorruptState::ClassState(kit.class().to_string()));
        }
        Ok(Self {
            kit,
            health,
            max_health,
            experience,
            level,
            score,
        })
    }

    pub fn class(&self) -> PlayerClass {
        self.kit.class()
    }

    pub fn kit(&self) -> &ClassKit {
        &self.kit
    }

    pub(crate) fn kit_mut(&mut self) -> &mut ClassKit {
        &mut self.kit
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Experience still needed for the next level, `None` at the cap.
    pub fn experience_to_next_level(&self) -> Option<u32> {
        let threshold = LEVEL_THRESHOLDS.get(usize::from(self.level) - 1)?;
        Some(threshold.saturating_sub(self.experience))
    }

    /// Damage a monster deals on a regular encounter, floored at 0.
    pub fn encounter_damage(&self, kind: CellType) -> u32 {
        if kind == CellType::Boss && self.level >= MAX_LEVEL {
            return 0;
        }
        (u32::from(kind.magnitude()) + 1).saturating_sub(u32::from(self.level))
    }

    /// Assassin strike: free when the monster's level matches the player's.
    pub fn strike_damage(&self, kind: CellType) -> u32 {
        if kind.magnitude() == self.level {
            0
        } else {
            self.encounter_damage(kind)
        }
    }

    /// Execute mode: one less than a regular encounter.
    pub fn execute_damage(&self, kind: CellType) -> u32 {
        self.encounter_damage(kind).saturating_sub(1)
    }

    pub fn take_damage(&mut self, damage: u32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::AlreadyDead;
        }
        if damage == 0 {
            return DamageOutcome::Unharmed;
        }

        self.health = self.health.saturating_sub(damage);
        log::debug!("Player took {} damage, health {}", damage, self.health);
        if self.is_alive() {
            DamageOutcome::Hurt
        } else {
            DamageOutcome::Died
        }
    }

    /// Adds experience and applies every level crossed; returns the levels gained.
    pub fn gain_experience(&mut self, amount: u32) -> u8 {
        self.experience = self.experience.saturating_add(amount);

        let mut gained = 0;
        while let Some(&threshold) = LEVEL_THRESHOLDS.get(usize::from(self.level) - 1) {
            if self.experience < threshold {
                break;
            }
            self.level += 1;
            gained += 1;
            self.on_level_up();
        }
        gained
    }

    fn on_level_up(&mut self) {
        log::debug!("{} reached level {}", self.class(), self.level);
        match self.kit.on_level_up() {
            LevelUpBonus::BonusHeart if self.is_alive() => {
                self.max_health += 1;
                self.health += 1;
            }
            _ => {}
        }
    }

    /// Experience minus elapsed seconds, never negative.
    pub fn compute_score(&mut self, elapsed_secs: u32) -> u32 {
        self.score = self.experience.saturating_sub(elapsed_secs);
        self.score
    }
}
