use once_cell::sync::Lazy;

use crate::error::{BoardError, MoveError};
use crate::moves::{Move, MoveAction};
use crate::types::{BoardSize, Cell, Color, Direction, Piece, Point};

const MAX_CELLS: usize = 81;
/// Points per opposing piece removed from the board.
pub const CAPTURE_BONUS: u32 = 5;

/// Fixed per-size data: which cells are home to which color, and what a
/// piece earns by reaching them.
struct Layout {
    white_home: u128,
    black_home: u128,
    values: [u8; MAX_CELLS],
}

static LAYOUTS: Lazy<[Layout; 3]> = Lazy::new(|| {
    [
        Layout::build(BoardSize::S5),
        Layout::build(BoardSize::S7),
        Layout::build(BoardSize::S9),
    ]
});

impl Layout {
    fn for_size(size: BoardSize) -> &'static Layout {
        let slot = match size {
            BoardSize::S5 => 0,
            BoardSize::S7 => 1,
            BoardSize::S9 => 2,
        };
        &LAYOUTS[slot]
    }

    /// Home cells are the outer row of each two-row band plus both edge
    /// columns of the inner band row. Nothing outside the bands is owned or
    /// valued, so no clean-up pass over the middle rows is needed.
    fn build(size: BoardSize) -> Self {
        let n = size.side();
        let mut layout = Layout {
            white_home: 0,
            black_home: 0,
            values: [0; MAX_CELLS],
        };

        for row in 0..n {
            let (color, outer) = if row <= 1 {
                (Color::White, row == 0)
            } else if row >= n - 2 {
                (Color::Black, row == n - 1)
            } else {
                continue;
            };

            for col in 0..n {
                if !(outer || col == 0 || col == n - 1) {
                    continue;
                }
                let pos = row * n + col;
                match color {
                    Color::White => layout.white_home |= bit(pos),
                    Color::Black => layout.black_home |= bit(pos),
                }
                layout.values[pos] = home_value(n, col, outer);
            }
        }

        layout
    }
}

/// 1 on the inner band row and next to the corners, 3 in the corners, then
/// rising odd values toward the middle of the outer row.
fn home_value(n: usize, col: usize, outer: bool) -> u8 {
    if !outer || col == 1 || col == n - 2 {
        1
    } else if col == 0 || col == n - 1 {
        3
    } else {
        (2 * (col.min(n - 1 - col) + 1) - 1) as u8
    }
}

/// Kono board represented by three bitboards over the row-major cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    size: BoardSize,
    white: u128,
    black: u128,
    /// Pieces (of either color) that have gained capture ability.
    capture: u128,
}

impl Board {
    /// Creates the starting position: every home cell holds a piece of its
    /// own color without capture ability.
    pub fn new(size: BoardSize) -> Self {
        let layout = Layout::for_size(size);
        Self {
            size,
            white: layout.white_home,
            black: layout.black_home,
            capture: 0,
        }
    }

    pub fn with_side(side: usize) -> Result<Self, BoardError> {
        BoardSize::from_side(side)
            .map(Self::new)
            .ok_or(BoardError::InvalidSize(side))
    }

    /// Rebuilds a board from row-major cell tokens (`O`, `W`, `B`, `WW`, `BB`).
    /// Ownership and values come from the size's layout; only occupancy is read.
    pub fn from_tokens<'a, I>(tokens: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tokens: Vec<&str> = tokens.into_iter().collect();
        let size =
            BoardSize::from_cell_count(tokens.len()).ok_or(BoardError::CellCount(tokens.len()))?;

        let mut board = Self {
            size,
            white: 0,
            black: 0,
            capture: 0,
        };
        for (pos, token) in tokens.iter().enumerate() {
            let (color, can_capture) = match *token {
                "O" => continue,
                "W" => (Color::White, false),
                "WW" => (Color::White, true),
                "B" => (Color::Black, false),
                "BB" => (Color::Black, true),
                other => {
                    return Err(BoardError::UnknownToken {
                        index: pos,
                        token: other.to_string(),
                    });
                }
            };
            board.put(pos, Piece { color, can_capture });
        }

        Ok(board)
    }

    /// Row-major cell tokens, the inverse of [`Board::from_tokens`].
    pub fn to_tokens(&self) -> Vec<&'static str> {
        (0..self.size.cells())
            .map(|pos| match self.piece_at(pos) {
                None => "O",
                Some(Piece {
                    color: Color::White,
                    can_capture: false,
                }) => "W",
                Some(Piece {
                    color: Color::White,
                    can_capture: true,
                }) => "WW",
                Some(Piece {
                    color: Color::Black,
                    can_capture: false,
                }) => "B",
                Some(Piece {
                    color: Color::Black,
                    can_capture: true,
                }) => "BB",
            })
            .collect()
    }

    pub fn size(&self) -> usize {
        self.size.side()
    }

    pub fn board_size(&self) -> BoardSize {
        self.size
    }

    pub fn is_valid_location(&self, pt: Point) -> bool {
        let n = self.size();
        (1..=n).contains(&(pt.row as usize)) && (1..=n).contains(&(pt.col as usize))
    }

    /// Row-major index: `(row - 1) * size + (col - 1)`.
    pub fn point_to_number(&self, pt: Point) -> Option<usize> {
        if !self.is_valid_location(pt) {
            return None;
        }
        Some((pt.row as usize - 1) * self.size() + (pt.col as usize - 1))
    }

    pub fn number_to_point(&self, number: usize) -> Option<Point> {
        if number >= self.size.cells() {
            return None;
        }
        let n = self.size();
        Some(Point::new((number / n + 1) as u8, (number % n + 1) as u8))
    }

    pub fn occupant(&self, pt: Point) -> Option<Piece> {
        self.point_to_number(pt).and_then(|pos| self.piece_at(pos))
    }

    pub fn owner(&self, pt: Point) -> Option<Color> {
        self.point_to_number(pt).and_then(|pos| self.owner_at(pos))
    }

    pub fn value(&self, pt: Point) -> u32 {
        self.point_to_number(pt)
            .map_or(0, |pos| Layout::for_size(self.size).values[pos] as u32)
    }

    pub fn cell(&self, pt: Point) -> Option<Cell> {
        let pos = self.point_to_number(pt)?;
        Some(Cell {
            owner: self.owner_at(pos),
            occupant: self.piece_at(pos),
            value: Layout::for_size(self.size).values[pos] as u32,
        })
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> Vec<Cell> {
        (0..self.size.cells())
            .filter_map(|pos| self.number_to_point(pos))
            .filter_map(|pt| self.cell(pt))
            .collect()
    }

    /// On-board diagonal neighbours of `pt` with the direction leading there.
    pub fn surrounding_points(&self, pt: Point) -> Vec<(Point, Direction)> {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| self.point_from_direction(pt, dir).map(|next| (next, dir)))
            .collect()
    }

    pub fn point_from_direction(&self, pt: Point, dir: Direction) -> Option<Point> {
        pt.step(dir).filter(|next| self.is_valid_location(*next))
    }

    /// Direction from `start` to `end` when both lie on a common diagonal.
    pub fn direction_between(start: Point, end: Point) -> Option<Direction> {
        let dr = end.row as i32 - start.row as i32;
        let dc = end.col as i32 - start.col as i32;
        if dr.abs() != dc.abs() {
            return None;
        }
        Direction::from_delta(dr, dc)
    }

    pub fn piece_count(&self, color: Color) -> u32 {
        self.stones(color).count_ones()
    }

    /// Points holding `color`'s pieces, row-major.
    pub fn pieces(&self, color: Color) -> Vec<Point> {
        bit_indices(self.stones(color))
            .filter_map(|pos| self.number_to_point(pos))
            .collect()
    }

    /// Executes a play for `color`. On error the board is unchanged.
    ///
    /// A piece landing on a cell owned by the opponent gains capture ability
    /// for good.
    pub fn make_move(&mut self, mv: &Move, color: Color) -> Result<(), MoveError> {
        if mv.action() != MoveAction::Play {
            return Err(MoveError::NotAPlay);
        }

        let source = mv.location().ok_or(MoveError::MissingLocation)?;
        let from = self
            .point_to_number(source)
            .ok_or(MoveError::OffBoard(source))?;
        let piece = self.piece_at(from).ok_or(MoveError::EmptySource(source))?;
        if piece.color != color {
            return Err(MoveError::NotYourPiece(source));
        }

        let dir = mv.direction().ok_or(MoveError::MissingDirection)?;
        let dest = self
            .point_from_direction(source, dir)
            .ok_or_else(|| MoveError::OffBoard(source.step(dir).unwrap_or(source)))?;
        let to = self.point_to_number(dest).ok_or(MoveError::OffBoard(dest))?;

        match self.piece_at(to) {
            Some(other) if other.color == color => {
                return Err(MoveError::OwnPieceCollision(dest));
            }
            Some(_) if !piece.can_capture => return Err(MoveError::CannotCapture(dest)),
            _ => {}
        }

        let promoted = self.owner_at(to) == Some(color.opponent());
        let moved = Piece {
            color,
            can_capture: piece.can_capture || promoted,
        };

        self.remove(from);
        self.remove(to);
        self.put(to, moved);

        Ok(())
    }

    /// Value of `color`'s pieces standing on opponent home cells, plus
    /// [`CAPTURE_BONUS`] for every opposing piece no longer on the board.
    pub fn player_score(&self, color: Color) -> u32 {
        let values = &Layout::for_size(self.size).values;
        let infiltrated = self.stones(color) & self.home(color.opponent());
        let territory: u32 = bit_indices(infiltrated).map(|pos| values[pos] as u32).sum();

        let captured = self
            .size
            .pieces_per_side()
            .saturating_sub(self.piece_count(color.opponent()));

        territory + CAPTURE_BONUS * captured
    }

    /// True once a color has no pieces left, or every surviving piece of a
    /// color stands on the opponent's home cells.
    pub fn is_winner(&self) -> bool {
        [Color::White, Color::Black].into_iter().any(|color| {
            let stones = self.stones(color);
            stones == 0 || stones & !self.home(color.opponent()) == 0
        })
    }

    fn stones(&self, color: Color) -> u128 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    fn home(&self, color: Color) -> u128 {
        let layout = Layout::for_size(self.size);
        match color {
            Color::White => layout.white_home,
            Color::Black => layout.black_home,
        }
    }

    fn owner_at(&self, pos: usize) -> Option<Color> {
        let square = bit(pos);
        if self.home(Color::White) & square != 0 {
            Some(Color::White)
        } else if self.home(Color::Black) & square != 0 {
            Some(Color::Black)
        } else {
            None
        }
    }

    fn piece_at(&self, pos: usize) -> Option<Piece> {
        let square = bit(pos);
        let color = if self.white & square != 0 {
            Color::White
        } else if self.black & square != 0 {
            Color::Black
        } else {
            return None;
        };
        Some(Piece {
            color,
            can_capture: self.capture & square != 0,
        })
    }

    fn put(&mut self, pos: usize, piece: Piece) {
        let square = bit(pos);
        match piece.color {
            Color::White => self.white |= square,
            Color::Black => self.black |= square,
        }
        if piece.can_capture {
            self.capture |= square;
        }
    }

    fn remove(&mut self, pos: usize) {
        let keep = !bit(pos);
        self.white &= keep;
        self.black &= keep;
        self.capture &= keep;
    }

    #[cfg(test)]
    pub(crate) fn empty(size: BoardSize) -> Self {
        Self {
            size,
            white: 0,
            black: 0,
            capture: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, pt: Point, color: Color, can_capture: bool) {
        let pos = self.point_to_number(pt).expect("test point must be on the board");
        self.remove(pos);
        self.put(pos, Piece { color, can_capture });
    }

    #[cfg(test)]
    pub(crate) fn clear(&mut self, pt: Point) {
        let pos = self.point_to_number(pt).expect("test point must be on the board");
        self.remove(pos);
    }
}

fn bit(pos: usize) -> u128 {
    if pos < MAX_CELLS { 1u128 << pos } else { 0 }
}

fn bit_indices(mut mask: u128) -> impl Iterator<Item = usize> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let pos = mask.trailing_zeros() as usize;
        mask &= mask - 1;
        Some(pos)
    })
}
