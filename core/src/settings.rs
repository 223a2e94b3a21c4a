use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardSize {
    Small,
    Medium,
    Large,
}

impl BoardSize {
    pub const ALL: [BoardSize; 3] = [BoardSize::Small, BoardSize::Medium, BoardSize::Large];

    /// `(width, height)` in cells.
    pub const fn dimensions(self) -> (usize, usize) {
        match self {
            Self::Small => (10, 10),
            Self::Medium => (20, 12),
            Self::Large => (40, 20),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub const fn frequency(self) -> f64 {
        match self {
            Self::Easy => 0.10,
            Self::Normal => 0.15,
            Self::Hard => 0.20,
        }
    }

    /// Monster-type proportions over Rat..=Witch.
    pub const fn distribution(self) -> Distribution {
        Distribution::from_weights(match self {
            Self::Easy => [0.5, 0.3, 0.15, 0.05, 0.0],
            Self::Normal => [0.4, 0.3, 0.15, 0.1, 0.05],
            Self::Hard => [0.25, 0.25, 0.2, 0.15, 0.15],
        })
    }
}

/// Persisted user preferences.
///
/// Deserialization doubles as validation: unknown enum members, missing fields or wrongly
/// typed booleans make the whole record invalid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub board_size: BoardSize,
    pub difficulty: Difficulty,
    pub player_class: PlayerClass,
    pub invert_clicks: bool,
    pub remove_flags: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            board_size: BoardSize::Large,
            difficulty: Difficulty::Normal,
            player_class: PlayerClass::Warrior,
            invert_clicks: false,
            remove_flags: false,
        }
    }
}

impl GameSettings {
    pub fn board_config(&self) -> core::result::Result<BoardConfig, ConfigError> {
        let (width, height) = self.board_size.dimensions();
        BoardConfig::new(
            width,
            height,
            self.difficulty.frequency(),
            self.difficulty.distribution(),
        )
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            remove_flags: self.remove_flags,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_builds_a_valid_config() {
        for board_size in BoardSize::ALL {
            for difficulty in Difficulty::ALL {
                let settings = GameSettings {
                    board_size,
                    difficulty,
                    ..Default::default()
                };
                assert!(settings.board_config().is_ok(), "{settings:?}");
                assert!(difficulty.distribution().validate().is_ok());
            }
        }
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = serde_json::to_value(GameSettings::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "boardSize": "Large",
                "difficulty": "Normal",
                "playerClass": "Warrior",
                "invertClicks": false,
                "removeFlags": false,
            })
        );
    }

    #[test]
    fn unknown_members_are_rejected() {
        let bad_enum = r#"{"boardSize":"Huge","difficulty":"Normal","playerClass":"Warrior","invertClicks":false,"removeFlags":false}"#;
        let bad_bool = r#"{"boardSize":"Small","difficulty":"Normal","playerClass":"Mage","invertClicks":"yes","removeFlags":false}"#;
        let missing = r#"{"boardSize":"Small","difficulty":"Normal","playerClass":"Mage"}"#;

        for payload in [bad_enum, bad_bool, missing] {
            assert!(serde_json::from_str::<GameSettings>(payload).is_err(), "{payload}");
        }
    }
}
