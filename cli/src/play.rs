use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Instant;

use anyhow::Context;
use delvesweeper_core::{
    CASCADE_STEP_DELAY, CascadeMode, FileStore, GameError, GameSession, SessionConfig,
    SessionEvent, SessionState, TICK_INTERVAL,
};

use crate::PlayArgs;
use crate::command::{Command, HELP};
use crate::render;

/// Converts wall-clock time into session ticks.
struct Clock {
    last_tick: Instant,
}

impl Clock {
    fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    fn restart(&mut self) {
        self.last_tick = Instant::now();
    }

    fn catch_up(&mut self, session: &mut GameSession<FileStore>) {
        while self.last_tick.elapsed() >= TICK_INTERVAL {
            self.last_tick += TICK_INTERVAL;
            session.tick();
        }
    }
}

pub(crate) fn run(store: FileStore, seed: Option<u64>, args: &PlayArgs) -> anyhow::Result<()> {
    let config = SessionConfig {
        seed,
        cascade: CascadeMode::Paced,
    };
    let mut session = GameSession::new(store, config);
    let mut settings = session.settings();
    args.apply(&mut settings);
    session.set_settings(settings);

    let resume = !args.new && !args.overrides_settings();
    if resume && session.load_saved_game() {
        println!("Resumed saved game");
    } else {
        session.reset().context("Could not start a game")?;
    }
    print!("{HELP}");

    let mut clock = Clock::new();
    play_cascade(&mut session, &mut clock);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        report(&mut session);
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        clock.catch_up(&mut session);

        let Some(command) = Command::parse(&line) else {
            println!("Unknown command, h for help");
            continue;
        };
        let result = match command {
            Command::Click(coords, button) => session.click(coords, button).map(|_| ()),
            Command::Ability => session.use_special_ability().map(|_| ()),
            Command::Pause => session.pause(),
            Command::Resume => session.resume().inspect(|_| clock.restart()),
            Command::NewGame => session.reset().inspect(|_| clock.restart()),
            Command::Scores => {
                print!("{}", render::leaderboard(&session.get_scores()));
                Ok(())
            }
            Command::Help => {
                print!("{HELP}");
                Ok(())
            }
            Command::Quit => break,
        };
        if let Err(err) = result {
            explain(&err);
        }
        play_cascade(&mut session, &mut clock);
    }

    session.save_game();
    Ok(())
}

/// Resolves pending cascade steps one at a time, `CASCADE_STEP_DELAY` apart.
///
/// Stops as soon as a step ends the game.
fn play_cascade(session: &mut GameSession<FileStore>, clock: &mut Clock) {
    let mut steps = 0;
    while session.step_cascade().is_some() {
        steps += 1;
        thread::sleep(CASCADE_STEP_DELAY);
        clock.catch_up(session);
    }
    if steps > 0 {
        log::debug!("Cascade resolved in {} steps", steps);
    }
}

fn report(session: &mut GameSession<FileStore>) {
    let mut redraw = false;
    for event in session.drain_events() {
        match event {
            SessionEvent::BoardChanged => redraw = true,
            SessionEvent::ShowLeaderboard { status } => {
                if let Some(status) = status {
                    println!("{status}");
                }
                print!("{}", render::leaderboard(&session.get_scores()));
            }
            SessionEvent::AbilityChanged(status) => log::info!("Ability {:?}", status),
        }
    }

    if redraw {
        if let Some(board) = session.board() {
            print!("{}", render::board(board));
        }
    }
    if let Some(player) = session.player() {
        println!("{}", render::status(player, session.elapsed_secs()));
    }
    match session.state() {
        SessionState::Paused => println!("Paused, r to resume"),
        SessionState::Ended => println!("Game over, n for a new game"),
        SessionState::NotStarted | SessionState::Running => {}
    }
}

fn explain(err: &GameError) {
    match err {
        GameError::InvalidCoords => println!("Those coordinates are off the board"),
        GameError::AbilityUnavailable => println!("No ability to use right now"),
        err => println!("{err}"),
    }
}
