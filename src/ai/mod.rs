//! Move selection for computer players.

mod heuristic;

pub use heuristic::Heuristic;

use rand::RngCore;

use crate::board::Board;
use crate::moves::Move;
use crate::types::{Color, Point};

pub trait MoveSelector: Send + Sync {
    /// Chooses a move for `color`.
    ///
    /// With `forced` set, only that piece may move (second move of a turn)
    /// and the selector may answer with a skip. Without any candidate at
    /// all the answer is a quit.
    fn select_move(
        &self,
        board: &Board,
        color: Color,
        forced: Option<Point>,
        rng: &mut dyn RngCore,
    ) -> Move;
}
