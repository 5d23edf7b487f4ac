use serde::Serialize;
use std::fmt;

use crate::types::{Direction, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MoveAction {
    Play,
    Skip,
    Quit,
}

/// Why the heuristic chose a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MoveReason {
    Random,
    Advance,
    Capture,
    Block,
    Escape,
}

impl MoveReason {
    /// Ranking used to pick among per-piece candidates.
    pub fn weight(self) -> u8 {
        match self {
            MoveReason::Random => 0,
            MoveReason::Advance => 1,
            MoveReason::Capture => 2,
            MoveReason::Block => 3,
            MoveReason::Escape => 4,
        }
    }

    fn explanation(self) -> &'static str {
        match self {
            MoveReason::Random => "to continue the game",
            MoveReason::Advance => "to advance towards the opponent's home location",
            MoveReason::Capture => "to capture the opponent",
            MoveReason::Block => "to block the opponent",
            MoveReason::Escape => "to escape being captured by the opponent",
        }
    }
}

/// A prospective action. `reason` and `target` are only set by the heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    location: Option<Point>,
    direction: Option<Direction>,
    action: MoveAction,
    reason: Option<MoveReason>,
    target: Option<Point>,
}

impl Move {
    pub fn play(location: Point, direction: Direction) -> Self {
        Self {
            location: Some(location),
            direction: Some(direction),
            action: MoveAction::Play,
            reason: None,
            target: None,
        }
    }

    pub fn skip() -> Self {
        Self {
            location: None,
            direction: None,
            action: MoveAction::Skip,
            reason: None,
            target: None,
        }
    }

    pub fn quit() -> Self {
        Self {
            location: None,
            direction: None,
            action: MoveAction::Quit,
            reason: None,
            target: None,
        }
    }

    /// A pending move naming only the piece that has to move.
    pub fn forced(location: Point) -> Self {
        Self {
            location: Some(location),
            direction: None,
            action: MoveAction::Play,
            reason: None,
            target: None,
        }
    }

    pub fn with_reason(mut self, reason: MoveReason, target: Option<Point>) -> Self {
        self.reason = Some(reason);
        self.target = target;
        self
    }

    pub fn location(&self) -> Option<Point> {
        self.location
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn action(&self) -> MoveAction {
        self.action
    }

    pub fn reason(&self) -> Option<MoveReason> {
        self.reason
    }

    pub fn target(&self) -> Option<Point> {
        self.target
    }

    /// Where the piece lands, if the move is a fully specified play.
    pub fn destination(&self) -> Option<Point> {
        match (self.action, self.location, self.direction) {
            (MoveAction::Play, Some(loc), Some(dir)) => loc.step(dir),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            MoveAction::Skip => return f.write_str("skips their turn."),
            MoveAction::Quit => return f.write_str("quits the game."),
            MoveAction::Play => {}
        }

        f.write_str("a move")?;
        if let Some(dir) = self.direction {
            write!(f, " {dir}")?;
        }
        if let Some(loc) = self.location {
            write!(f, " from {loc}")?;
        }
        if let Some(reason) = self.reason {
            write!(f, " {}", reason.explanation())?;
        }
        if let Some(target) = self.target {
            write!(f, " at {target}")?;
        }
        Ok(())
    }
}
