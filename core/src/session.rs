use core::time::Duration;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::*;

/// Period of the session clock.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Delay a UI should leave between two paced cascade steps.
pub const CASCADE_STEP_DELAY: Duration = Duration::from_millis(30);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Running,
    Paused,
    Ended,
}

impl SessionState {
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CascadeMode {
    /// Cascades resolve inside the action that triggered them.
    #[default]
    Immediate,
    /// Cascades wait for [`GameSession::step_cascade`], one cell per call.
    Paced,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Seeds every board and engine of the session; random when unset.
    pub seed: Option<u64>,
    pub cascade: CascadeMode,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
}

/// Notifications for the presentation layer, drained with [`GameSession::drain_events`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    BoardChanged,
    ShowLeaderboard { status: Option<String> },
    AbilityChanged(AbilityStatus),
}

/// Owns the active board and player and drives the game lifecycle.
///
/// The session never spawns timers: the host calls [`GameSession::tick`] every
/// [`TICK_INTERVAL`], and the session only counts ticks while its clock runs.
#[derive(Debug)]
pub struct GameSession<S> {
    persistence: Persistence<S>,
    config: SessionConfig,
    settings: GameSettings,
    engine: Option<PlayEngine>,
    state: SessionState,
    elapsed_secs: u32,
    clock_running: bool,
    seeds: SmallRng,
    events: Vec<SessionEvent>,
}

impl<S: KeyValueStore> GameSession<S> {
    pub fn new(store: S, config: SessionConfig) -> Self {
        let mut persistence = Persistence::new(store);
        let settings = persistence.load_settings();
        let seeds = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        Self {
            persistence,
            config,
            settings,
            engine: None,
            state: SessionState::NotStarted,
            elapsed_secs: 0,
            clock_running: false,
            seeds,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    /// Settings for the next game; stored when it starts.
    pub fn set_settings(&mut self, settings: GameSettings) {
        self.settings = settings;
    }

    pub fn engine(&self) -> Option<&PlayEngine> {
        self.engine.as_ref()
    }

    pub fn board(&self) -> Option<&Board> {
        self.engine.as_ref().map(PlayEngine::board)
    }

    pub fn player(&self) -> Option<&Player> {
        self.engine.as_ref().map(PlayEngine::player)
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn is_clock_running(&self) -> bool {
        self.clock_running
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Stores the settings, builds a fresh game and opens its safe start.
    pub fn start(&mut self) -> Result<()> {
        if self.state.is_in_progress() {
            return Err(self.invalid("start"));
        }

        let board_config = self.settings.board_config()?;
        if let Err(err) = self.persistence.save_settings(&self.settings) {
            log::error!("Could not save settings: {}", err);
        }

        let board = UrnGenerator::new(self.seeds.random()).generate(&board_config)?;
        let player = Player::new(self.settings.player_class);
        let mut engine = PlayEngine::new(
            board,
            player,
            self.settings.engine_options(),
            self.seeds.random(),
        );
        if engine.open_safe_start().is_none() {
            log::warn!("Board has no Empty cell for a safe start");
        }
        if self.config.cascade == CascadeMode::Immediate {
            engine.run_cascade();
        }

        log::debug!(
            "Started {:?} {:?} game as {}",
            self.settings.board_size,
            self.settings.difficulty,
            self.settings.player_class
        );
        self.install(engine, 0);
        Ok(())
    }

    /// Drops the current game and any stored save, then starts over.
    pub fn reset(&mut self) -> Result<()> {
        if let Some(engine) = self.engine.as_mut() {
            engine.cancel_cascade();
        }
        self.stop_clock();
        self.engine = None;
        self.state = SessionState::NotStarted;
        self.delete_save();
        self.start()
    }

    pub fn pause(&mut self) -> Result<()> {
        if self.state != SessionState::Running {
            return Err(self.invalid("pause"));
        }
        self.stop_clock();
        self.state = SessionState::Paused;
        self.save_game();
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        if self.state != SessionState::Paused {
            return Err(self.invalid("resume"));
        }
        self.state = SessionState::Running;
        self.start_clock();
        Ok(())
    }

    pub fn win(&mut self) -> Result<()> {
        self.end(true)
    }

    pub fn lose(&mut self) -> Result<()> {
        self.end(false)
    }

    fn end(&mut self, won: bool) -> Result<()> {
        match self.state {
            SessionState::Ended => return Ok(()),
            SessionState::NotStarted => return Err(self.invalid("end")),
            SessionState::Running | SessionState::Paused => {}
        }
        let Some(engine) = self.engine.as_mut() else {
            return Err(GameError::NoActiveGame);
        };

        self.clock_running = false;
        self.state = SessionState::Ended;
        engine.finish(won);
        engine.reveal_all();
        let score = engine.compute_score(self.elapsed_secs);
        log::debug!("Game ended, won: {}, score: {}", won, score);

        let status = if won {
            match self.persistence.record_score(score) {
                Ok(Some(position)) => format!("Victory! Score {score}, rank #{position}"),
                Ok(None) => format!("Victory! Score {score}"),
                Err(err) => {
                    log::error!("Could not update the leaderboard: {}", err);
                    format!("Victory! Score {score}")
                }
            }
        } else {
            String::from("Defeated")
        };
        self.delete_save();

        self.notify(SessionEvent::BoardChanged);
        self.notify(SessionEvent::ShowLeaderboard {
            status: Some(status),
        });
        Ok(())
    }

    /// Advances the clock by one [`TICK_INTERVAL`]; returns whether the tick was counted.
    pub fn tick(&mut self) -> bool {
        if !self.clock_running || self.state != SessionState::Running {
            return false;
        }
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        engine.compute_score(self.elapsed_secs);
        true
    }

    pub fn primary_action(&mut self, coords: Coord2) -> Result<ActionOutcome> {
        self.act(coords, PlayEngine::primary_action)
    }

    pub fn secondary_action(&mut self, coords: Coord2) -> Result<ActionOutcome> {
        self.act(coords, PlayEngine::secondary_action)
    }

    /// Dispatches a pointer button, honoring the inverted-clicks setting.
    pub fn click(&mut self, coords: Coord2, button: Button) -> Result<ActionOutcome> {
        let primary = (button == Button::Primary) != self.settings.invert_clicks;
        if primary {
            self.primary_action(coords)
        } else {
            self.secondary_action(coords)
        }
    }

    /// Resolves one paced cascade step; `None` when nothing is pending or the game is not running.
    pub fn step_cascade(&mut self) -> Option<ActionOutcome> {
        if self.state != SessionState::Running {
            return None;
        }
        let engine = self.engine.as_mut()?;
        let before = engine.special_ability();
        let outcome = engine.step_cascade()?;
        Some(self.settle(before, outcome))
    }

    pub fn use_special_ability(&mut self) -> Result<SpecialAbility> {
        let engine = self.running_engine("use an ability")?;
        let ability = engine.use_special_ability()?;
        self.notify(SessionEvent::AbilityChanged(ability.status));
        Ok(ability)
    }

    pub fn create_memento(&self) -> Result<GameMemento> {
        if !self.state.is_in_progress() {
            return Err(GameError::NoActiveGame);
        }
        let engine = self.engine.as_ref().ok_or(GameError::NoActiveGame)?;
        Ok(GameMemento::capture(
            engine.board(),
            engine.player(),
            self.elapsed_secs,
            self.settings,
        ))
    }

    /// Replaces the current game with the snapshot; the restored game is running.
    pub fn restore_from_memento(&mut self, memento: &GameMemento) -> Result<()> {
        let board = memento.restore_board()?;
        let player = memento.restore_player()?;
        let engine = PlayEngine::new(
            board,
            player,
            memento.settings.engine_options(),
            self.seeds.random(),
        );

        self.settings = memento.settings;
        log::debug!("Restored game at {}s", memento.elapsed_seconds);
        self.install(engine, memento.elapsed_seconds);
        Ok(())
    }

    /// Resumes the stored game, if there is a valid one.
    pub fn load_saved_game(&mut self) -> bool {
        let Some(memento) = self.persistence.load_save() else {
            return false;
        };
        match self.restore_from_memento(&memento) {
            Ok(()) => true,
            Err(GameError::Corrupt(reason)) => {
                self.persistence.discard_save(&reason);
                false
            }
            Err(err) => {
                log::error!("Could not restore saved game: {}", err);
                false
            }
        }
    }

    /// Stores a snapshot of the game in progress; does nothing otherwise.
    pub fn save_game(&mut self) {
        let Ok(memento) = self.create_memento() else {
            return;
        };
        match self.persistence.write_save(&memento) {
            Ok(()) => log::debug!("Game saved"),
            Err(err) => log::error!("Could not save game: {}", err),
        }
    }

    pub fn get_scores(&mut self) -> Vec<u32> {
        self.persistence.load_leaderboard().scores().to_vec()
    }

    fn act(
        &mut self,
        coords: Coord2,
        action: fn(&mut PlayEngine, Coord2) -> Result<ActionOutcome>,
    ) -> Result<ActionOutcome> {
        let cascade = self.config.cascade;
        let engine = self.running_engine("act")?;
        let before = engine.special_ability();

        let mut outcome = action(engine, coords)?;
        if cascade == CascadeMode::Immediate {
            outcome = outcome | engine.run_cascade();
        }
        Ok(self.settle(before, outcome))
    }

    /// Emits the notifications for an outcome and ends the game when it is decided.
    fn settle(&mut self, before: Option<SpecialAbility>, outcome: ActionOutcome) -> ActionOutcome {
        if outcome.has_update() {
            self.notify(SessionEvent::BoardChanged);
        }
        let after = self.engine.as_ref().and_then(PlayEngine::special_ability);
        if let Some(ability) = after.filter(|&after| Some(after) != before) {
            self.notify(SessionEvent::AbilityChanged(ability.status));
        }

        let ended = match outcome {
            ActionOutcome::Won => self.win(),
            ActionOutcome::Lost => self.lose(),
            ActionOutcome::Changed | ActionOutcome::NoChange => Ok(()),
        };
        if let Err(err) = ended {
            log::error!("Could not end the game: {}", err);
        }
        outcome
    }

    fn install(&mut self, engine: PlayEngine, elapsed_secs: u32) {
        let ability = engine.special_ability();
        self.engine = Some(engine);
        self.elapsed_secs = elapsed_secs;
        self.state = SessionState::Running;
        self.start_clock();

        self.notify(SessionEvent::BoardChanged);
        if let Some(ability) = ability {
            self.notify(SessionEvent::AbilityChanged(ability.status));
        }
    }

    fn running_engine(&mut self, action: &'static str) -> Result<&mut PlayEngine> {
        if self.state != SessionState::Running {
            return Err(self.invalid(action));
        }
        self.engine.as_mut().ok_or(GameError::NoActiveGame)
    }

    fn start_clock(&mut self) {
        self.clock_running = true;
    }

    fn stop_clock(&mut self) {
        self.clock_running = false;
    }

    fn delete_save(&mut self) {
        if let Err(err) = self.persistence.delete_save() {
            log::error!("Could not delete saved game: {}", err);
        }
    }

    fn notify(&mut self, event: SessionEvent) {
        let repeated = event == SessionEvent::BoardChanged
            && self.events.last() == Some(&SessionEvent::BoardChanged);
        if !repeated {
            self.events.push(event);
        }
    }

    fn invalid(&self, action: &'static str) -> GameError {
        GameError::InvalidTransition {
            from: self.state,
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(player_class: PlayerClass) -> GameSettings {
        GameSettings {
            board_size: BoardSize::Small,
            difficulty: Difficulty::Easy,
            player_class,
            ..Default::default()
        }
    }

    fn session(player_class: PlayerClass) -> GameSession<MemoryStore> {
        let mut session = GameSession::new(
            MemoryStore::new(),
            SessionConfig {
                seed: Some(7),
                ..Default::default()
            },
        );
        session.set_settings(settings(player_class));
        session
    }

    fn find(session: &GameSession<MemoryStore>, kind: CellType) -> Coord2 {
        let board = session.board().unwrap();
        board
            .coords()
            .find(|&coords| board[coords].kind() == kind && board[coords].is_hidden())
            .unwrap()
    }

    #[test]
    fn start_opens_a_safe_area() {
        let mut session = session(PlayerClass::Warrior);
        assert_eq!(session.state(), SessionState::NotStarted);
        session.start().unwrap();

        assert_eq!(session.state(), SessionState::Running);
        assert!(session.is_clock_running());
        let board = session.board().unwrap();
        assert_eq!(board.size(), (10, 10));
        assert!(board.revealed_count() > 0);
        assert_eq!(session.player().unwrap().experience(), 0);
        assert_eq!(session.drain_events(), vec![SessionEvent::BoardChanged]);
        assert!(session.drain_events().is_empty());

        assert!(session.persistence().store().get("settings").unwrap().is_some());
    }

    #[test]
    fn start_is_guarded_while_in_progress() {
        let mut session = session(PlayerClass::Warrior);
        session.start().unwrap();
        assert_eq!(
            session.start(),
            Err(GameError::InvalidTransition {
                from: SessionState::Running,
                action: "start"
            })
        );
    }

    #[test]
    fn same_seed_same_game() {
        let mut a = session(PlayerClass::Paladin);
        let mut b = session(PlayerClass::Paladin);
        a.start().unwrap();
        b.start().unwrap();
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn clock_only_runs_while_running() {
        let mut session = session(PlayerClass::Warrior);
        assert!(!session.tick());

        session.start().unwrap();
        assert!(session.tick());
        assert!(session.tick());
        assert_eq!(session.elapsed_secs(), 2);

        session.pause().unwrap();
        assert!(!session.is_clock_running());
        assert!(!session.tick());
        assert_eq!(session.elapsed_secs(), 2);
        assert!(session.primary_action((0, 0)).is_err());

        session.resume().unwrap();
        assert!(session.tick());
        assert_eq!(session.elapsed_secs(), 3);

        session.lose().unwrap();
        assert!(!session.is_clock_running());
        assert!(!session.tick());
        assert_eq!(session.elapsed_secs(), 3);
    }

    #[test]
    fn pause_and_resume_are_guarded() {
        let mut session = session(PlayerClass::Warrior);
        assert!(session.pause().is_err());
        session.start().unwrap();
        assert!(session.resume().is_err());
        session.pause().unwrap();
        assert!(session.pause().is_err());
    }

    #[test]
    fn pause_writes_a_save() {
        let mut session = session(PlayerClass::Warrior);
        session.start().unwrap();
        assert!(!session.persistence().has_save());
        session.pause().unwrap();
        assert!(session.persistence().has_save());
    }

    #[test]
    fn losing_reveals_everything_once() {
        let mut session = session(PlayerClass::Warrior);
        session.start().unwrap();
        session.pause().unwrap();
        session.drain_events();

        session.lose().unwrap();
        assert_eq!(session.state(), SessionState::Ended);
        let board = session.board().unwrap();
        assert_eq!(board.revealed_count(), usize::from(board.total_cells()));
        assert!(!session.persistence().has_save());
        assert_eq!(
            session.drain_events(),
            vec![
                SessionEvent::BoardChanged,
                SessionEvent::ShowLeaderboard {
                    status: Some("Defeated".into())
                },
            ]
        );
        assert!(session.get_scores().is_empty());

        session.lose().unwrap();
        session.win().unwrap();
        assert!(session.drain_events().is_empty());
        assert!(session.get_scores().is_empty());
    }

    #[test]
    fn ending_requires_a_game() {
        let mut session = session(PlayerClass::Warrior);
        assert!(matches!(
            session.win(),
            Err(GameError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn boss_at_level_one_loses() {
        let mut session = session(PlayerClass::Warrior);
        session.start().unwrap();
        let boss = find(&session, CellType::Boss);

        assert_eq!(session.primary_action(boss).unwrap(), ActionOutcome::Lost);
        assert_eq!(session.state(), SessionState::Ended);
        assert_eq!(session.player().unwrap().health(), 0);
        assert!(matches!(
            session.primary_action((0, 0)),
            Err(GameError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn winning_records_the_score() {
        let mut session = session(PlayerClass::Warrior);
        session.start().unwrap();
        session.tick();
        session.win().unwrap();

        assert_eq!(session.state(), SessionState::Ended);
        assert_eq!(session.get_scores(), vec![0]);
        let events = session.drain_events();
        assert!(events.contains(&SessionEvent::ShowLeaderboard {
            status: Some("Victory! Score 0, rank #1".into())
        }));
    }

    #[test]
    fn reset_starts_over_and_drops_the_save() {
        let mut session = session(PlayerClass::Warrior);
        session.start().unwrap();
        session.tick();
        session.pause().unwrap();
        assert!(session.persistence().has_save());

        session.reset().unwrap();
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.elapsed_secs(), 0);
        assert!(!session.persistence().has_save());
    }

    #[test]
    fn fresh_session_reset_replaces_an_old_save() {
        let mut old = session(PlayerClass::Warrior);
        old.start().unwrap();
        old.pause().unwrap();
        let store = old.persistence().store().clone();

        let mut session = GameSession::new(store, SessionConfig::default());
        assert!(session.persistence().has_save());
        session.reset().unwrap();
        assert_eq!(session.state(), SessionState::Running);
        assert!(!session.persistence().has_save());
    }

    #[test]
    fn memento_round_trip() {
        let mut session = session(PlayerClass::Mage);
        session.start().unwrap();
        let rat = find(&session, CellType::Rat);
        session.primary_action(rat).unwrap();
        session.tick();
        session.tick();
        session.use_special_ability().unwrap();

        let memento = session.create_memento().unwrap();
        let board = session.board().unwrap().clone();
        let player = session.player().unwrap().clone();

        let mut restored = GameSession::new(MemoryStore::new(), SessionConfig::default());
        restored.restore_from_memento(&memento).unwrap();

        assert_eq!(restored.state(), SessionState::Running);
        assert!(restored.is_clock_running());
        assert_eq!(restored.elapsed_secs(), 2);
        assert_eq!(restored.player(), Some(&player));
        assert_eq!(restored.board(), Some(&board));
        assert_eq!(restored.settings(), session.settings());
    }

    #[test]
    fn saved_game_survives_a_new_session() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            seed: Some(3),
            ..Default::default()
        };
        let mut session = GameSession::new(FileStore::new(dir.path()), config);
        session.set_settings(settings(PlayerClass::Paladin));
        session.start().unwrap();
        session.tick();
        session.pause().unwrap();
        let board = session.board().unwrap().clone();

        let mut next = GameSession::new(FileStore::new(dir.path()), config);
        assert_eq!(next.settings(), settings(PlayerClass::Paladin));
        assert!(next.load_saved_game());
        assert_eq!(next.state(), SessionState::Running);
        assert_eq!(next.elapsed_secs(), 1);
        assert_eq!(next.board(), Some(&board));
    }

    #[test]
    fn corrupt_save_is_discarded_on_load() {
        let mut session = session(PlayerClass::Warrior);
        session.start().unwrap();
        let mut memento = session.create_memento().unwrap();
        memento.player.level = 9;

        let mut store = MemoryStore::new();
        store
            .set("saveGame", &serde_json::to_string(&memento).unwrap())
            .unwrap();
        let mut fresh = GameSession::new(store, SessionConfig::default());

        assert!(!fresh.load_saved_game());
        assert_eq!(fresh.state(), SessionState::NotStarted);
        assert!(!fresh.persistence().has_save());
    }

    #[test]
    fn memento_requires_a_game_in_progress() {
        let session = session(PlayerClass::Warrior);
        assert_eq!(session.create_memento(), Err(GameError::NoActiveGame));
    }

    #[test]
    fn inverted_clicks_swap_buttons() {
        let mut session = session(PlayerClass::Warrior);
        session.set_settings(GameSettings {
            invert_clicks: true,
            ..settings(PlayerClass::Warrior)
        });
        session.start().unwrap();
        let rat = find(&session, CellType::Rat);

        session.click(rat, Button::Primary).unwrap();
        assert!(session.board().unwrap()[rat].is_flagged());

        session.click(rat, Button::Secondary).unwrap();
        assert!(session.board().unwrap()[rat].is_flagged());
        assert!(session.board().unwrap()[rat].is_hidden());
    }

    #[test]
    fn ability_changes_are_reported() {
        let mut session = session(PlayerClass::Assassin);
        session.start().unwrap();
        assert_eq!(
            session.drain_events(),
            vec![
                SessionEvent::BoardChanged,
                SessionEvent::AbilityChanged(AbilityStatus::Ready)
            ]
        );

        session.use_special_ability().unwrap();
        assert_eq!(
            session.drain_events(),
            vec![SessionEvent::AbilityChanged(AbilityStatus::Armed)]
        );

        let rat = find(&session, CellType::Rat);
        session.primary_action(rat).unwrap();
        assert_eq!(
            session.drain_events(),
            vec![
                SessionEvent::BoardChanged,
                SessionEvent::AbilityChanged(AbilityStatus::Waiting)
            ]
        );
        assert_eq!(session.player().unwrap().health(), 2);
    }

    #[test]
    fn warriors_have_no_ability() {
        let mut session = session(PlayerClass::Warrior);
        session.start().unwrap();
        assert_eq!(
            session.use_special_ability(),
            Err(GameError::AbilityUnavailable)
        );
    }

    #[test]
    fn paced_cascade_waits_for_steps() {
        let mut session = GameSession::new(
            MemoryStore::new(),
            SessionConfig {
                seed: Some(11),
                cascade: CascadeMode::Paced,
            },
        );
        session.set_settings(GameSettings {
            board_size: BoardSize::Medium,
            ..settings(PlayerClass::Paladin)
        });
        session.start().unwrap();

        let revealed = session.board().unwrap().revealed_count();
        let mut steps = 0;
        while session.step_cascade().is_some() {
            steps += 1;
        }
        let engine = session.engine().unwrap();
        assert_eq!(engine.pending_cascade(), 0);
        assert!(session.board().unwrap().revealed_count() >= revealed);
        assert!(steps > 0 || revealed == 1);
        assert_eq!(session.player().unwrap().experience(), 0);
    }

    #[test]
    fn lethal_step_aborts_the_rest_of_a_paced_cascade() {
        use CellType::*;

        let rows = vec![
            vec![Empty, Witch, Empty],
            vec![Empty, Empty, Empty],
            vec![Empty, Empty, Boss],
        ];
        let mut board = Board::from_types(&rows, Difficulty::Normal.distribution()).unwrap();
        board.cell_mut((1, 1)).reveal();
        let player = Player::new(PlayerClass::Paladin);
        let memento = GameMemento::capture(&board, &player, 0, settings(PlayerClass::Paladin));

        let mut session = GameSession::new(
            MemoryStore::new(),
            SessionConfig {
                seed: Some(1),
                cascade: CascadeMode::Paced,
            },
        );
        session.restore_from_memento(&memento).unwrap();

        assert_eq!(session.secondary_action((1, 1)).unwrap(), ActionOutcome::Changed);
        assert_eq!(session.engine().unwrap().pending_cascade(), 8);

        assert_eq!(session.step_cascade(), Some(ActionOutcome::Changed));
        assert_eq!(session.step_cascade(), Some(ActionOutcome::Lost));
        assert_eq!(session.state(), SessionState::Ended);
        assert_eq!(session.engine().unwrap().pending_cascade(), 0);
        assert_eq!(session.step_cascade(), None);
        assert_eq!(session.player().unwrap().experience(), 1 + 15);
    }

    #[test]
    fn paused_sessions_hold_the_cascade() {
        let mut session = GameSession::new(
            MemoryStore::new(),
            SessionConfig {
                seed: Some(5),
                cascade: CascadeMode::Paced,
            },
        );
        session.set_settings(settings(PlayerClass::Warrior));
        session.start().unwrap();
        let pending = session.engine().unwrap().pending_cascade();

        session.pause().unwrap();
        assert_eq!(session.step_cascade(), None);
        assert_eq!(session.engine().unwrap().pending_cascade(), pending);
    }
}
