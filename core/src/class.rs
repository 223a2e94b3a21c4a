use serde::{Deserialize, Serialize};

use crate::*;

/// Character class chosen in the settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerClass {
    Warrior,
    Paladin,
    Mage,
    Assassin,
}

impl PlayerClass {
    pub const ALL: [PlayerClass; 4] = [
        PlayerClass::Warrior,
        PlayerClass::Paladin,
        PlayerClass::Mage,
        PlayerClass::Assassin,
    ];

    pub const fn base_health(self) -> u32 {
        match self {
            Self::Warrior => 3,
            Self::Paladin => 4,
            Self::Mage => 2,
            Self::Assassin => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Warrior => "Warrior",
            Self::Paladin => "Paladin",
            Self::Mage => "Mage",
            Self::Assassin => "Assassin",
        }
    }
}

impl core::fmt::Display for PlayerClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityKind {
    Fireball,
    Execute,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityStatus {
    /// Charged, not armed.
    Ready,
    /// Will apply to the next interaction.
    Armed,
    /// Used up until the next level-up.
    Waiting,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialAbility {
    pub kind: AbilityKind,
    pub status: AbilityStatus,
}

/// How a class reroutes a cell interaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionOverride {
    /// Regular primary/secondary handling.
    Default,
    /// Reveal the Empty cells of the 3×3 block around the target.
    Fireball,
    /// Attack the target through the execute damage path.
    Execute,
    /// Assassin secondary action: attack the target instead of flagging it.
    Strike,
}

/// What a level-up grants besides the level itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LevelUpBonus {
    None,
    BonusHeart,
    Recharged,
}

/// Class tag plus its transient state; dispatches the class capabilities.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKit {
    Warrior,
    Paladin,
    Mage { ready: bool, armed: bool },
    Assassin { ready: bool, armed: bool },
}

impl ClassKit {
    pub const fn new(class: PlayerClass) -> Self {
        match class {
            PlayerClass::Warrior => Self::Warrior,
            PlayerClass::Paladin => Self::Paladin,
            PlayerClass::Mage => Self::Mage {
                ready: true,
                armed: false,
            },
            PlayerClass::Assassin => Self::Assassin {
                ready: true,
                armed: false,
            },
        }
    }

    pub const fn class(&self) -> PlayerClass {
        match self {
            Self::Warrior => PlayerClass::Warrior,
            Self::Paladin => PlayerClass::Paladin,
            Self::Mage { .. } => PlayerClass::Mage,
            Self::Assassin { .. } => PlayerClass::Assassin,
        }
    }

    /// Armed abilities are always charged.
    pub(crate) const fn is_consistent(&self) -> bool {
        match *self {
            Self::Mage { ready, armed } | Self::Assassin { ready, armed } => ready || !armed,
            Self::Warrior | Self::Paladin => true,
        }
    }

    pub fn on_primary_action(&mut self, target_hidden: bool) -> ActionOverride {
        match self {
            Self::Mage { ready, armed } if *armed => {
                *ready = false;
                *armed = false;
                ActionOverride::Fireball
            }
            Self::Assassin { ready, armed } if *armed && target_hidden => {
                *ready = false;
                *armed = false;
                ActionOverride::Execute
            }
            _ => ActionOverride::Default,
        }
    }

    pub fn on_secondary_action(&mut self, target_hidden: bool) -> ActionOverride {
        let overridden = self.on_primary_action(target_hidden);
        match overridden {
            ActionOverride::Default if target_hidden && matches!(self, Self::Assassin { .. }) => {
                ActionOverride::Strike
            }
            _ => overridden,
        }
    }

    pub fn on_level_up(&mut self) -> LevelUpBonus {
        match self {
            Self::Warrior => LevelUpBonus::BonusHeart,
            Self::Paladin => LevelUpBonus::None,
            Self::Mage { ready, .. } | Self::Assassin { ready, .. } => {
                if *ready {
                    LevelUpBonus::None
                } else {
                    *ready = true;
                    LevelUpBonus::Recharged
                }
            }
        }
    }

    pub fn special_ability(&self) -> Option<SpecialAbility> {
        let (kind, ready, armed) = match *self {
            Self::Mage { ready, armed } => (AbilityKind::Fireball, ready, armed),
            Self::Assassin { ready, armed } => (AbilityKind::Execute, ready, armed),
            Self::Warrior | Self::Paladin => return None,
        };
        let status = match (ready, armed) {
            (_, true) => AbilityStatus::Armed,
            (true, false) => AbilityStatus::Ready,
            (false, false) => AbilityStatus::Waiting,
        };
        Some(SpecialAbility { kind, status })
    }

    /// Arms a charged ability, or disarms an armed one.
    pub fn use_special_ability(&mut self) -> Result<SpecialAbility> {
        match self {
            Self::Mage { ready, armed } | Self::Assassin { ready, armed } => {
                if *armed {
                    *armed = false;
                } else if *ready {
                    *armed = true;
                } else {
                    return Err(GameError::AbilityUnavailable);
                }
            }
            Self::Warrior | Self::Paladin => return Err(GameError::AbilityUnavailable),
        }
        self.special_ability().ok_or(GameError::AbilityUnavailable)
    }
}
