use rand::RngCore;

use crate::ai::{Heuristic, MoveSelector};
use crate::board::Board;
use crate::error::MoveError;
use crate::moves::{Move, MoveAction};
use crate::types::{Color, PlayerKind};

/// A tournament participant. Only color and running points are stored;
/// behaviour is chosen by `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    kind: PlayerKind,
    color: Option<Color>,
    overall_points: u32,
}

impl Player {
    pub fn new(kind: PlayerKind, overall_points: u32) -> Self {
        Self {
            kind,
            color: None,
            overall_points,
        }
    }

    pub fn human(overall_points: u32) -> Self {
        Self::new(PlayerKind::Human, overall_points)
    }

    pub fn computer(overall_points: u32) -> Self {
        Self::new(PlayerKind::Computer, overall_points)
    }

    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = Some(color);
    }

    pub fn overall_points(&self) -> u32 {
        self.overall_points
    }

    pub fn add_points(&mut self, points: u32) {
        self.overall_points += points;
    }

    pub fn set_overall_points(&mut self, points: u32) {
        self.overall_points = points;
    }

    /// The move this player wants to make.
    ///
    /// A human hands back `pending` unchanged (`None` if nothing was
    /// supplied). A computer asks `selector`; a `pending` play naming a
    /// location pins the selector to that piece.
    pub fn propose_move(
        &self,
        pending: Option<Move>,
        board: &Board,
        selector: &dyn MoveSelector,
        rng: &mut dyn RngCore,
    ) -> Option<Move> {
        match self.kind {
            PlayerKind::Human => pending,
            PlayerKind::Computer => {
                let color = self.color?;
                let forced = pending
                    .filter(|mv| mv.action() == MoveAction::Play)
                    .and_then(|mv| mv.location());
                Some(selector.select_move(board, color, forced, rng))
            }
        }
    }

    /// Like [`Player::propose_move`] with the built-in heuristic.
    pub fn propose(
        &self,
        pending: Option<Move>,
        board: &Board,
        rng: &mut dyn RngCore,
    ) -> Option<Move> {
        self.propose_move(pending, board, &Heuristic, rng)
    }

    /// Applies `mv` for this player. Skips succeed without touching the board.
    pub fn execute(&self, mv: &Move, board: &mut Board) -> Result<(), MoveError> {
        if mv.action() == MoveAction::Skip {
            return Ok(());
        }
        let color = self.color.ok_or(MoveError::Unassigned)?;
        board.make_move(mv, color)
    }
}
