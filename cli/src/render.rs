use core::fmt::Write;

use delvesweeper_core::{AbilityStatus, Board, Cell, CellType, Player, SpecialAbility};

fn glyph(cell: &Cell) -> String {
    if cell.is_flagged() {
        return "F".into();
    }
    if cell.is_hidden() {
        return "#".into();
    }
    match cell.kind() {
        CellType::Empty => match cell.value() {
            Some(0) | None => ".".into(),
            Some(value) => value.to_string(),
        },
        CellType::Rat => "r".into(),
        CellType::Zombie => "z".into(),
        CellType::Skeleton => "s".into(),
        CellType::Ghost => "g".into(),
        CellType::Witch => "w".into(),
        CellType::Boss => "B".into(),
    }
}

/// Plain text grid with column and row indices.
pub(crate) fn board(board: &Board) -> String {
    let (width, height) = board.size();
    let mut out = String::from("   ");
    for x in 0..width {
        let _ = write!(out, "{:>3}", x);
    }
    out.push('\n');

    for y in 0..height {
        let _ = write!(out, "{:>3}", y);
        for x in 0..width {
            let _ = write!(out, "{:>3}", glyph(&board[(x, y)]));
        }
        out.push('\n');
    }
    out
}

pub(crate) fn status(player: &Player, elapsed_secs: u32) -> String {
    let mut out = format!(
        "{}  HP {}/{}  LV {}  XP {}",
        player.class(),
        player.health(),
        player.max_health(),
        player.level(),
        player.experience(),
    );
    if let Some(missing) = player.experience_to_next_level() {
        let _ = write!(out, " ({missing} to next)");
    }
    let _ = write!(out, "  score {}  time {}s", player.score(), elapsed_secs);
    if let Some(ability) = player.kit().special_ability() {
        let _ = write!(out, "  {}", ability_label(ability));
    }
    out
}

pub(crate) fn ability_label(ability: SpecialAbility) -> String {
    let status = match ability.status {
        AbilityStatus::Ready => "ready",
        AbilityStatus::Armed => "ARMED",
        AbilityStatus::Waiting => "recharging",
    };
    format!("{:?}: {}", ability.kind, status)
}

pub(crate) fn leaderboard(scores: &[u32]) -> String {
    if scores.is_empty() {
        return "No scores yet\n".into();
    }
    scores
        .iter()
        .enumerate()
        .map(|(i, score)| format!("{:>2}. {}\n", i + 1, score))
        .collect()
}
