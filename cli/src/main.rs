use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use delvesweeper_core::{
    BoardSize, Difficulty, FileStore, GameSettings, Persistence, PlayerClass,
};

mod command;
mod play;
mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Directory holding settings, the saved game and the leaderboard
    #[arg(long, default_value = ".delvesweeper")]
    data_dir: PathBuf,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play in the terminal, resuming the saved game if there is one
    Play(PlayArgs),
    /// Print the leaderboard
    Scores,
    /// Delete the saved game
    Forget,
}

#[derive(Args, Debug, Default)]
struct PlayArgs {
    /// Ignore the saved game and start a new one
    #[arg(short, long)]
    new: bool,

    #[arg(long, value_enum)]
    size: Option<SizeArg>,

    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,

    #[arg(long, value_enum)]
    class: Option<ClassArg>,

    /// Swap the open and flag commands
    #[arg(long)]
    invert_clicks: Option<bool>,

    /// Disable flag placement
    #[arg(long)]
    remove_flags: Option<bool>,
}

impl PlayArgs {
    fn apply(&self, settings: &mut GameSettings) {
        if let Some(size) = self.size {
            settings.board_size = size.into();
        }
        if let Some(difficulty) = self.difficulty {
            settings.difficulty = difficulty.into();
        }
        if let Some(class) = self.class {
            settings.player_class = class.into();
        }
        if let Some(invert_clicks) = self.invert_clicks {
            settings.invert_clicks = invert_clicks;
        }
        if let Some(remove_flags) = self.remove_flags {
            settings.remove_flags = remove_flags;
        }
    }

    fn overrides_settings(&self) -> bool {
        self.size.is_some()
            || self.difficulty.is_some()
            || self.class.is_some()
            || self.invert_clicks.is_some()
            || self.remove_flags.is_some()
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SizeArg {
    Small,
    Medium,
    Large,
}

impl From<SizeArg> for BoardSize {
    fn from(size: SizeArg) -> Self {
        match size {
            SizeArg::Small => BoardSize::Small,
            SizeArg::Medium => BoardSize::Medium,
            SizeArg::Large => BoardSize::Large,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(difficulty: DifficultyArg) -> Self {
        match difficulty {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ClassArg {
    Warrior,
    Paladin,
    Mage,
    Assassin,
}

impl From<ClassArg> for PlayerClass {
    fn from(class: ClassArg) -> Self {
        match class {
            ClassArg::Warrior => PlayerClass::Warrior,
            ClassArg::Paladin => PlayerClass::Paladin,
            ClassArg::Mage => PlayerClass::Mage,
            ClassArg::Assassin => PlayerClass::Assassin,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();
    log::debug!("data dir: {:?}, seed: {:?}", cli.data_dir, cli.seed);

    let store = FileStore::new(&cli.data_dir);
    match cli.command {
        None => play::run(store, cli.seed, &PlayArgs::default()),
        Some(Command::Play(args)) => play::run(store, cli.seed, &args),
        Some(Command::Scores) => {
            let mut persistence = Persistence::new(store);
            print!("{}", render::leaderboard(persistence.load_leaderboard().scores()));
            Ok(())
        }
        Some(Command::Forget) => {
            Persistence::new(store)
                .delete_save()
                .context("Could not delete the saved game")?;
            println!("Saved game deleted");
            Ok(())
        }
    }
}
