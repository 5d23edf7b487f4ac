//! Plain-text save files.
//!
//! ```text
//! Round: 2
//!
//! Computer:
//!    Score: 10
//!    Color: White
//!
//! Human:
//!    Score: 0
//!    Color: Black
//!
//! Board:
//!    W W W W W
//!    ...
//!
//! Next Player: Human
//! ```
//!
//! Lines end in CRLF on output; any line ending is accepted on input.
//! Player 2's block comes first. Players of different kinds are labelled by
//! kind only, in which case the first block read belongs to player 2.

use tracing::warn;

use crate::board::Board;
use crate::error::SaveError;
use crate::game::Game;
use crate::player::Player;
use crate::tournament::Tournament;
use crate::types::{Color, PlayerKind, Seat};

const INDENT: &str = "   ";
const NEWLINE: &str = "\r\n";

pub fn serialize(tournament: &Tournament) -> String {
    let game = tournament.game();
    let labels = labels(game.players());
    let board = game.board();

    let mut lines = vec![format!("Round: {}", tournament.round()), String::new()];
    for seat in [Seat::Two, Seat::One] {
        lines.push(format!("{}:", labels[seat.index()]));
        lines.push(format!(
            "{INDENT}Score: {}",
            game.player(seat).overall_points()
        ));
        lines.push(format!("{INDENT}Color: {}", game.color_of(seat).name()));
        lines.push(String::new());
    }

    lines.push("Board:".to_owned());
    for row in board.to_tokens().chunks(board.size()) {
        lines.push(format!("{INDENT}{}", row.join(" ")));
    }
    lines.push(String::new());
    lines.push(format!("Next Player: {}", labels[game.next_seat().index()]));

    let mut text = lines.join(NEWLINE);
    text.push_str(NEWLINE);
    text
}

/// Rebuilds a tournament from save text. Nothing is returned unless every
/// section is present and valid.
pub fn deserialize(text: &str) -> Result<Tournament, SaveError> {
    parse(text).inspect_err(|err| warn!(%err, "rejected save data"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    /// `Human` / `Computer`: the seat depends on where the label appears.
    Kind(PlayerKind),
    /// `Human1`, `Computer2`, ...
    Seated(PlayerKind, Seat),
}

fn labels(players: &[Player; 2]) -> [&'static str; 2] {
    match (players[0].kind(), players[1].kind()) {
        (PlayerKind::Human, PlayerKind::Human) => ["Human1", "Human2"],
        (PlayerKind::Computer, PlayerKind::Computer) => ["Computer1", "Computer2"],
        (first, second) => [first.name(), second.name()],
    }
}

fn parse_label(word: &str) -> Option<Label> {
    use PlayerKind::{Computer, Human};

    Some(match word {
        "Human" => Label::Kind(Human),
        "Computer" => Label::Kind(Computer),
        "Human1" => Label::Seated(Human, Seat::One),
        "Human2" => Label::Seated(Human, Seat::Two),
        "Computer1" => Label::Seated(Computer, Seat::One),
        "Computer2" => Label::Seated(Computer, Seat::Two),
        _ => return None,
    })
}

fn parse(text: &str) -> Result<Tournament, SaveError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut round = None;
    let mut players: [Option<Player>; 2] = [None, None];
    let mut seen_unseated = false;
    let mut board = None;
    let mut next = None;

    let mut index = 0;
    while index < lines.len() {
        let words: Vec<&str> = lines[index].split_whitespace().collect();
        index += 1;

        match words.as_slice() {
            [] => {}
            ["Round:", value, ..] => round = value.parse::<u32>().ok().filter(|&n| n > 0),
            ["Board:", ..] => {
                let (parsed, used) = read_board(&lines[index..])?;
                board = Some(parsed);
                index += used;
            }
            ["Next", "Player:", label, ..] => next = parse_label(label),
            [header, ..] => {
                let Some(label) = header.strip_suffix(':').and_then(parse_label) else {
                    continue;
                };
                let (kind, seat) = match label {
                    Label::Seated(kind, seat) => (kind, seat),
                    Label::Kind(kind) if seen_unseated => (kind, Seat::One),
                    Label::Kind(kind) => {
                        seen_unseated = true;
                        (kind, Seat::Two)
                    }
                };
                let end = (index + 2).min(lines.len());
                players[seat.index()] = Some(read_player(&lines[index..end], kind, seat)?);
                index = end;
            }
        }
    }

    let round = round.ok_or(SaveError::MissingRound)?;
    let [first, second] = players;
    let first = first.ok_or(SaveError::MissingPlayer(Seat::One))?;
    let second = second.ok_or(SaveError::MissingPlayer(Seat::Two))?;
    let board = board.ok_or(SaveError::MissingBoard)?;
    if first.color() == second.color() {
        return Err(SaveError::ColorClash);
    }

    let next = match next.ok_or(SaveError::MissingNextPlayer)? {
        Label::Seated(_, seat) => seat,
        Label::Kind(kind) if first.kind() == kind => Seat::One,
        Label::Kind(kind) if second.kind() == kind => Seat::Two,
        Label::Kind(_) => return Err(SaveError::MissingNextPlayer),
    };

    Ok(Tournament::new(Game::new(first, second, next, board), round))
}

/// Reads the score and color lines that follow a player header.
fn read_player(lines: &[&str], kind: PlayerKind, seat: Seat) -> Result<Player, SaveError> {
    let mut score = None;
    let mut color = None;
    for line in lines {
        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["Score:", value, ..] => score = value.parse::<u32>().ok(),
            ["Color:", "White", ..] => color = Some(Color::White),
            ["Color:", "Black", ..] => color = Some(Color::Black),
            _ => {}
        }
    }

    let (Some(score), Some(color)) = (score, color) else {
        return Err(SaveError::MissingPlayer(seat));
    };
    let mut player = Player::new(kind, score);
    player.set_color(color);
    Ok(player)
}

/// The first board row gives the side length, and that many rows are read.
/// Returns the board and the number of lines consumed.
fn read_board(lines: &[&str]) -> Result<(Board, usize), SaveError> {
    let side = lines
        .first()
        .map(|line| line.split_whitespace().count())
        .filter(|&side| side > 0)
        .ok_or(SaveError::MissingBoard)?;

    let rows = &lines[..side.min(lines.len())];
    let board = Board::from_tokens(rows.iter().flat_map(|row| row.split_whitespace()))?;
    Ok((board, rows.len()))
}
