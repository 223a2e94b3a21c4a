//! Typed records on top of a key-value store.
//!
//! Three records are kept: the user's [`GameSettings`], the in-progress [`GameMemento`] and the
//! [`Leaderboard`]. Records that fail to parse or validate are logged, removed from the store and
//! replaced by their default; they never surface as errors.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::*;

pub use leaderboard::*;
pub use memento::*;
pub use store::*;

mod leaderboard;
mod memento;
mod store;

impl StorageKey for GameSettings {
    const KEY: &'static str = "settings";
}

impl StorageKey for Leaderboard {
    const KEY: &'static str = "leaderboard";
}

#[derive(Clone, Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read<T: StorageKey + DeserializeOwned>(&self) -> StoreResult<Option<T>> {
        match self.store.get(T::KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn write<T: StorageKey + Serialize>(&mut self, record: &T) -> StoreResult<()> {
        let json = serde_json::to_string(record)?;
        self.store.set(T::KEY, &json)
    }

    /// Reads a record, dropping it from the store if it does not parse.
    fn read_or_discard<T: StorageKey + DeserializeOwned>(&mut self) -> Option<T> {
        match self.read::<T>() {
            Ok(record) => record,
            Err(StoreError::Json(err)) => {
                self.discard(T::KEY, &err);
                None
            }
            Err(err) => {
                log::error!("Could not read {:?}: {}", T::KEY, err);
                None
            }
        }
    }

    fn discard(&mut self, key: &str, reason: &dyn core::fmt::Display) {
        log::warn!("Discarding corrupt {:?} record: {}", key, reason);
        if let Err(err) = self.store.remove(key) {
            log::error!("Could not remove {:?}: {}", key, err);
        }
    }

    /// Stored settings, or the defaults when none are stored or they are invalid.
    pub fn load_settings(&mut self) -> GameSettings {
        self.read_or_discard().unwrap_or_default()
    }

    pub fn save_settings(&mut self, settings: &GameSettings) -> StoreResult<()> {
        self.write(settings)
    }

    /// The in-progress save, if one parses. Board invariants are checked at restore time.
    pub fn load_save(&mut self) -> Option<GameMemento> {
        self.read_or_discard()
    }

    pub fn write_save(&mut self, memento: &GameMemento) -> StoreResult<()> {
        self.write(memento)
    }

    pub fn delete_save(&mut self) -> StoreResult<()> {
        self.store.remove(GameMemento::KEY)
    }

    /// Drops a save that parsed but could not be restored.
    pub fn discard_save(&mut self, reason: &CorruptState) {
        self.discard(GameMemento::KEY, reason);
    }

    pub fn has_save(&self) -> bool {
        matches!(self.store.get(GameMemento::KEY), Ok(Some(_)))
    }

    pub fn load_leaderboard(&mut self) -> Leaderboard {
        let leaderboard: Option<Leaderboard> = self.read_or_discard();
        match leaderboard {
            Some(leaderboard) => match leaderboard.validate() {
                Ok(()) => leaderboard,
                Err(reason) => {
                    self.discard(Leaderboard::KEY, &reason);
                    Leaderboard::new()
                }
            },
            None => Leaderboard::new(),
        }
    }

    /// Adds a score to the stored leaderboard and returns its position, if it made the board.
    pub fn record_score(&mut self, score: u32) -> StoreResult<Option<usize>> {
        let mut leaderboard = self.load_leaderboard();
        let position = leaderboard.insert(score);
        if position.is_some() {
            self.write(&leaderboard)?;
        }
        Ok(position)
    }
}
