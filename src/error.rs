use thiserror::Error;

use crate::types::{Point, Seat};

/// Reasons a move is rejected by the board. The board is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("only play moves can be executed on the board")]
    NotAPlay,
    #[error("player has no color assigned")]
    Unassigned,
    #[error("move has no starting location")]
    MissingLocation,
    #[error("move has no direction")]
    MissingDirection,
    #[error("{0} is not on the board")]
    OffBoard(Point),
    #[error("there is no piece at {0}")]
    EmptySource(Point),
    #[error("the piece at {0} belongs to the opponent")]
    NotYourPiece(Point),
    #[error("you cannot capture your own piece at {0}")]
    OwnPieceCollision(Point),
    #[error("the piece cannot capture the opponent at {0}")]
    CannotCapture(Point),
}

/// Malformed board data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("invalid board size {0}, expected 5, 7 or 9")]
    InvalidSize(usize),
    #[error("board data has {0} cells, expected 25, 49 or 81")]
    CellCount(usize),
    #[error("unknown cell token {token:?} at index {index}")]
    UnknownToken { index: usize, token: String },
}

/// Malformed save text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("missing or invalid round")]
    MissingRound,
    #[error("missing or incomplete data for player {}", .0.number())]
    MissingPlayer(Seat),
    #[error("missing board block")]
    MissingBoard,
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("missing or unresolvable next player")]
    MissingNextPlayer,
    #[error("both players have the same color")]
    ColorClash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("game is already over")]
    GameOver,
    #[error("the current game is still in progress")]
    GameInProgress,
    #[error("illegal move: {0}")]
    Illegal(#[from] MoveError),
    #[error("the second move of a turn must continue with the piece at {0}")]
    MustMoveSamePiece(Point),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("dice kept tying after {0} rolls")]
    Stalemate(usize),
}
