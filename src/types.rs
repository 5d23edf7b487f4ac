use serde::Serialize;
use std::fmt;

/// Side of the board. White starts on rows 1-2, Black on the last two rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Single-letter form used by the save format.
    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

/// A board coordinate, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub row: u8,
    pub col: u8,
}

impl Point {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// One diagonal step. Returns `None` only when the step would leave the
    /// representable range; board bounds are checked by the board.
    pub fn step(self, dir: Direction) -> Option<Self> {
        let (dr, dc) = dir.delta();
        Some(Self {
            row: self.row.checked_add_signed(dr)?,
            col: self.col.checked_add_signed(dc)?,
        })
    }

    /// Two points can be joined by diagonal steps iff their coordinate sums
    /// share parity.
    pub fn diagonally_connected(self, other: Point) -> bool {
        (self.row as u16 + self.col as u16) % 2 == (other.row as u16 + other.col as u16) % 2
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    NW,
    NE,
    SE,
    SW,
}

impl Direction {
    /// Neighbour scan order: upper row left to right, then lower row.
    pub const ALL: [Direction; 4] = [Direction::NW, Direction::NE, Direction::SW, Direction::SE];

    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::NW => (-1, -1),
            Direction::NE => (-1, 1),
            Direction::SE => (1, 1),
            Direction::SW => (1, -1),
        }
    }

    pub fn from_delta(dr: i32, dc: i32) -> Option<Self> {
        match (dr.signum(), dc.signum()) {
            (-1, -1) => Some(Direction::NW),
            (-1, 1) => Some(Direction::NE),
            (1, 1) => Some(Direction::SE),
            (1, -1) => Some(Direction::SW),
            _ => None,
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_uppercase().as_str() {
            "NW" => Some(Direction::NW),
            "NE" => Some(Direction::NE),
            "SE" => Some(Direction::SE),
            "SW" => Some(Direction::SW),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Direction::NW => "NW",
            Direction::NE => "NE",
            Direction::SE => "SE",
            Direction::SW => "SW",
        };
        f.write_str(text)
    }
}

/// Supported board sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BoardSize {
    S5 = 5,
    S7 = 7,
    S9 = 9,
}

impl BoardSize {
    pub fn from_side(side: usize) -> Option<Self> {
        match side {
            5 => Some(BoardSize::S5),
            7 => Some(BoardSize::S7),
            9 => Some(BoardSize::S9),
            _ => None,
        }
    }

    /// Infers the size from a row-major cell count (25, 49 or 81).
    pub fn from_cell_count(count: usize) -> Option<Self> {
        match count {
            25 => Some(BoardSize::S5),
            49 => Some(BoardSize::S7),
            81 => Some(BoardSize::S9),
            _ => None,
        }
    }

    pub fn side(self) -> usize {
        self as usize
    }

    pub fn cells(self) -> usize {
        self.side() * self.side()
    }

    /// Pieces each color starts with: the full outer row plus two flank pieces.
    pub fn pieces_per_side(self) -> u32 {
        self.side() as u32 + 2
    }
}

/// Position of a player in a game: player 1 or player 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Seat::One),
            2 => Some(Seat::Two),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Seat::One => 1,
            Seat::Two => 2,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }
}

/// Who drives a player's moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlayerKind {
    /// Moves are chosen outside the core and passed in.
    Human,
    /// Moves are chosen by the heuristic.
    Computer,
}

impl PlayerKind {
    pub fn name(self) -> &'static str {
        match self {
            PlayerKind::Human => "Human",
            PlayerKind::Computer => "Computer",
        }
    }
}

/// A piece on the board. Replaced, never mutated, when it gains capture ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Piece {
    pub color: Color,
    pub can_capture: bool,
}

/// Full view of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Home color of the cell, fixed at construction.
    pub owner: Option<Color>,
    pub occupant: Option<Piece>,
    pub value: u32,
}

/// Final scores of a finished game, player 1 first.
///
/// Scores are signed: quitting costs the quitter points and may go below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameOutcome {
    pub first_score: i32,
    pub second_score: i32,
}

impl GameOutcome {
    /// Seat with the higher score, `None` on a tie.
    pub fn winner(&self) -> Option<Seat> {
        if self.first_score > self.second_score {
            Some(Seat::One)
        } else if self.second_score > self.first_score {
            Some(Seat::Two)
        } else {
            None
        }
    }

    /// Points the winner earns for the tournament.
    pub fn margin(&self) -> u32 {
        self.first_score.abs_diff(self.second_score)
    }
}

/// Per-player part of a game snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerState {
    pub number: u8,
    pub kind: PlayerKind,
    pub color: Option<Color>,
    pub overall_points: u32,
    /// Current on-board score for this player's color.
    pub board_score: u32,
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub size: usize,
    /// Row-major cells.
    pub cells: Vec<Cell>,
    pub players: Vec<PlayerState>,
    pub next_player: u8,
    /// 1 or 2 within the current turn.
    pub move_number: u8,
    /// Piece that must make the second move of the turn, if any.
    pub forced_piece: Option<Point>,
    pub outcome: Option<GameOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TournamentState {
    pub round: u32,
    pub game: GameState,
}

/// Final tournament standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TournamentResult {
    /// `None` when both players finished level.
    pub winner: Option<u8>,
    pub first_points: u32,
    pub second_points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_walks_each_diagonal() {
        let p = Point::new(3, 3);

        assert_eq!(p.step(Direction::NW), Some(Point::new(2, 2)));
        assert_eq!(p.step(Direction::NE), Some(Point::new(2, 4)));
        assert_eq!(p.step(Direction::SE), Some(Point::new(4, 4)));
        assert_eq!(p.step(Direction::SW), Some(Point::new(4, 2)));
        assert_eq!(Point::new(0, 1).step(Direction::NW), None);
    }

    #[test]
    fn diagonal_parity_rule() {
        assert!(Point::new(1, 1).diagonally_connected(Point::new(5, 3)));
        assert!(Point::new(1, 2).diagonally_connected(Point::new(2, 1)));
        assert!(!Point::new(1, 1).diagonally_connected(Point::new(1, 2)));
    }

    #[test]
    fn board_size_inferred_from_cell_count() {
        assert_eq!(BoardSize::from_cell_count(25), Some(BoardSize::S5));
        assert_eq!(BoardSize::from_cell_count(49), Some(BoardSize::S7));
        assert_eq!(BoardSize::from_cell_count(81), Some(BoardSize::S9));
        assert_eq!(BoardSize::from_cell_count(36), None);
        assert_eq!(BoardSize::S7.pieces_per_side(), 9);
    }

    #[test]
    fn outcome_winner_and_margin() {
        let outcome = GameOutcome {
            first_score: 3,
            second_score: 10,
        };
        assert_eq!(outcome.winner(), Some(Seat::Two));
        assert_eq!(outcome.margin(), 7);

        let tie = GameOutcome {
            first_score: -5,
            second_score: -5,
        };
        assert_eq!(tie.winner(), None);
        assert_eq!(tie.margin(), 0);
    }
}
