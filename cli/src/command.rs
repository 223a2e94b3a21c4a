use delvesweeper_core::{Button, Coord, Coord2};

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Click(Coord2, Button),
    Ability,
    Pause,
    Resume,
    NewGame,
    Scores,
    Help,
    Quit,
}

pub(crate) const HELP: &str = "\
commands:
  o X Y   open (primary action)
  f X Y   flag (secondary action)
  a       arm or disarm the special ability
  p / r   pause / resume
  n       new game
  s       leaderboard
  h       this help
  q       save and quit
";

impl Command {
    pub(crate) fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match words.next()? {
            "o" | "open" => Self::Click(parse_coords(&mut words)?, Button::Primary),
            "f" | "flag" => Self::Click(parse_coords(&mut words)?, Button::Secondary),
            "a" | "ability" => Self::Ability,
            "p" | "pause" => Self::Pause,
            "r" | "resume" => Self::Resume,
            "n" | "new" => Self::NewGame,
            "s" | "scores" => Self::Scores,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" => Self::Quit,
            _ => return None,
        };
        words.next().is_none().then_some(command)
    }
}

fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> Option<Coord2> {
    let x: Coord = words.next()?.parse().ok()?;
    let y: Coord = words.next()?.parse().ok()?;
    Some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clicks() {
        assert_eq!(
            Command::parse("o 3 4"),
            Some(Command::Click((3, 4), Button::Primary))
        );
        assert_eq!(
            Command::parse("  flag 0 12 "),
            Some(Command::Click((0, 12), Button::Secondary))
        );
    }

    #[test]
    fn parses_single_letters() {
        assert_eq!(Command::parse("a"), Some(Command::Ability));
        assert_eq!(Command::parse("p"), Some(Command::Pause));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("o 3"), None);
        assert_eq!(Command::parse("o 3 x"), None);
        assert_eq!(Command::parse("o 3 4 5"), None);
        assert_eq!(Command::parse("o -1 2"), None);
        assert_eq!(Command::parse("dig 1 1"), None);
    }
}
