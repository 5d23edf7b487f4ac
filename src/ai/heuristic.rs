use rand::{Rng, RngCore};
use tracing::debug;

use super::MoveSelector;
use crate::board::Board;
use crate::moves::{Move, MoveReason};
use crate::types::{Color, Direction, Piece, Point};

/// One-ply greedy player.
///
/// Every piece proposes at most one move through a fixed cascade
/// (escape, block, capture, advance, shuffle). The highest-weighted
/// proposals survive and one of them is picked at random.
#[derive(Debug, Default, Clone, Copy)]
pub struct Heuristic;

impl MoveSelector for Heuristic {
    fn select_move(
        &self,
        board: &Board,
        color: Color,
        forced: Option<Point>,
        rng: &mut dyn RngCore,
    ) -> Move {
        if let Some(start) = forced {
            return match candidate(board, start, color) {
                Some(mv) if mv.reason() != Some(MoveReason::Random) => mv,
                _ => Move::skip(),
            };
        }

        let pieces = board.pieces(color);
        let mut pool = strongest(
            pieces
                .iter()
                .filter_map(|&pt| candidate(board, pt, color))
                .collect(),
        );
        if pool.is_empty() {
            pool = pieces
                .iter()
                .filter_map(|&pt| move_to_empty(board, pt))
                .collect();
        }
        if pool.is_empty() {
            debug!(?color, "no piece can move, quitting");
            return Move::quit();
        }

        let choice = pool[rng.random_range(0..pool.len())];
        debug!(?color, options = pool.len(), %choice, "heuristic move");
        choice
    }
}

/// Keeps only the candidates carrying the highest reason weight.
fn strongest(candidates: Vec<Move>) -> Vec<Move> {
    let weight = |mv: &Move| mv.reason().map(MoveReason::weight);
    let Some(top) = candidates.iter().filter_map(weight).max() else {
        return Vec::new();
    };
    candidates
        .into_iter()
        .filter(|mv| weight(mv) == Some(top))
        .collect()
}

/// The single move the cascade proposes for the piece at `pt`.
fn candidate(board: &Board, pt: Point, color: Color) -> Option<Move> {
    let piece = board.occupant(pt).filter(|piece| piece.color == color)?;

    if threatened(board, pt, color, None) {
        return escape(board, pt, color).or_else(|| advance(board, pt, piece));
    }

    block(board, pt, color)
        .or_else(|| capture(board, pt, piece))
        .or_else(|| {
            if stay_blocking(board, pt, color) {
                move_to_empty(board, pt)
            } else {
                advance(board, pt, piece)
            }
        })
}

/// Whether a piece of `color` at `at` sits next to an opposing piece that
/// can capture. `vacated` is ignored as a neighbour.
fn threatened(board: &Board, at: Point, color: Color, vacated: Option<Point>) -> bool {
    board
        .surrounding_points(at)
        .into_iter()
        .filter(|(pt, _)| Some(*pt) != vacated)
        .filter_map(|(pt, _)| board.occupant(pt))
        .any(|other| other.color != color && other.can_capture)
}

fn escape(board: &Board, start: Point, color: Color) -> Option<Move> {
    board
        .surrounding_points(start)
        .into_iter()
        .find(|&(pt, _)| {
            board.occupant(pt).is_none() && !threatened(board, pt, color, Some(start))
        })
        .map(|(_, dir)| Move::play(start, dir).with_reason(MoveReason::Escape, None))
}

/// Steps onto an empty home cell that a non-capturing opponent next to it
/// could otherwise walk into.
fn block(board: &Board, start: Point, color: Color) -> Option<Move> {
    for (home, dir) in board.surrounding_points(start) {
        if board.occupant(home).is_some() || board.owner(home) != Some(color) {
            continue;
        }
        let intruder = board.surrounding_points(home).into_iter().find(|&(pt, _)| {
            board
                .occupant(pt)
                .is_some_and(|other| other.color != color && !other.can_capture)
        });
        if let Some((intruder, _)) = intruder {
            return Some(Move::play(start, dir).with_reason(MoveReason::Block, Some(intruder)));
        }
    }
    None
}

fn capture(board: &Board, start: Point, piece: Piece) -> Option<Move> {
    if !piece.can_capture {
        return None;
    }
    board
        .surrounding_points(start)
        .into_iter()
        .find(|&(pt, _)| {
            board
                .occupant(pt)
                .is_some_and(|other| other.color != piece.color)
                && !threatened(board, pt, piece.color, Some(start))
        })
        .map(|(pt, dir)| Move::play(start, dir).with_reason(MoveReason::Capture, Some(pt)))
}

/// A piece on its own home cell with an opponent alongside holds its ground.
fn stay_blocking(board: &Board, start: Point, color: Color) -> bool {
    board.owner(start) == Some(color)
        && board
            .surrounding_points(start)
            .into_iter()
            .any(|(pt, _)| board.occupant(pt).is_some_and(|other| other.color != color))
}

/// Heads for the opponent's home. Pieces already standing on it stay put.
fn advance(board: &Board, start: Point, piece: Piece) -> Option<Move> {
    let opponent = piece.color.opponent();
    if board.owner(start) == Some(opponent) {
        return None;
    }

    let adjacent = board
        .surrounding_points(start)
        .into_iter()
        .find(|&(pt, _)| board.owner(pt) == Some(opponent) && board.occupant(pt).is_none());
    if let Some((pt, dir)) = adjacent {
        return Some(Move::play(start, dir).with_reason(MoveReason::Advance, Some(pt)));
    }

    // Nearest first; pieces come row-major, which breaks ties.
    let mut goals: Vec<Point> = board
        .pieces(opponent)
        .into_iter()
        .filter(|&goal| board.owner(goal) == Some(opponent) && start.diagonally_connected(goal))
        .collect();
    goals.sort_by_key(|goal| start.row.abs_diff(goal.row).max(start.col.abs_diff(goal.col)));

    for goal in goals {
        if let Some(dir) = step_toward(board, start, goal, piece) {
            return Some(Move::play(start, dir).with_reason(MoveReason::Advance, Some(goal)));
        }
    }

    move_to_empty(board, start)
}

/// A safe step that closes in on `goal` along its longer axis without
/// overshooting the shorter one.
fn step_toward(board: &Board, start: Point, goal: Point, piece: Piece) -> Option<Direction> {
    let distance = |pt: Point| (pt.col.abs_diff(goal.col), pt.row.abs_diff(goal.row));
    let (start_h, start_v) = distance(start);

    for (pt, dir) in board.surrounding_points(start) {
        if threatened(board, pt, piece.color, Some(start)) {
            continue;
        }
        let (h, v) = distance(pt);
        let closer = if start_h <= start_v {
            v < start_v && h <= v
        } else {
            h < start_h && v <= h
        };
        if !closer {
            continue;
        }
        match board.occupant(pt) {
            None => return Some(dir),
            Some(other) if other.color != piece.color && piece.can_capture => return Some(dir),
            Some(_) => {}
        }
    }
    None
}

fn move_to_empty(board: &Board, start: Point) -> Option<Move> {
    board
        .surrounding_points(start)
        .into_iter()
        .find(|&(pt, _)| board.occupant(pt).is_none())
        .map(|(_, dir)| Move::play(start, dir).with_reason(MoveReason::Random, None))
}
