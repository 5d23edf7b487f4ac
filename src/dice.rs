//! Dice for deciding who moves first in a tournament.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::error::DiceError;
use crate::types::Seat;

/// Rolls used when a tournament is set up from a fixed script.
pub const DEFAULT_SEQUENCE: [u8; 8] = [4, 3, 2, 2, 5, 4, 2, 6];

/// Opening rounds attempted before giving up on a tie that never breaks.
pub const MAX_OPENING_ROLLS: usize = 64;

/// A six-sided die, either replaying a script in a loop or drawing from a
/// seeded generator.
#[derive(Debug, Clone)]
pub enum Dice {
    Scripted(Script),
    Random(StdRng),
}

/// A non-empty list of faces and the position of the next roll. Only
/// [`Dice::scripted`] builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    rolls: Vec<u8>,
    next: usize,
}

impl Script {
    fn roll(&mut self) -> u8 {
        let value = self.rolls[self.next];
        self.next = (self.next + 1) % self.rolls.len();
        value
    }
}

impl Dice {
    /// `None` if the script is empty or holds a value outside 1..=6.
    pub fn scripted(rolls: Vec<u8>) -> Option<Self> {
        if rolls.is_empty() || rolls.iter().any(|roll| !(1..=6).contains(roll)) {
            return None;
        }
        Some(Dice::Scripted(Script { rolls, next: 0 }))
    }

    pub fn seeded(seed: u64) -> Self {
        Dice::Random(StdRng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: StdRng) -> Self {
        Dice::Random(rng)
    }

    pub fn roll(&mut self) -> u8 {
        match self {
            Dice::Scripted(script) => script.roll(),
            Dice::Random(rng) => rng.random_range(1..=6),
        }
    }
}

impl Default for Dice {
    fn default() -> Self {
        Dice::Scripted(Script {
            rolls: DEFAULT_SEQUENCE.to_vec(),
            next: 0,
        })
    }
}

/// The deciding round of the opening roll: two dice per player, player 1's
/// pair first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpeningRoll {
    pub rolls: [u8; 4],
    pub first: Seat,
}

impl OpeningRoll {
    pub fn totals(&self) -> (u8, u8) {
        (
            self.rolls[0] + self.rolls[1],
            self.rolls[2] + self.rolls[3],
        )
    }
}

impl fmt::Display for OpeningRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.rolls;
        write!(
            f,
            "Player 1 rolls {a} and {b}. Player 2 rolls {c} and {d}. Player {} wins and moves first.",
            self.first.number()
        )
    }
}

/// Both players roll two dice until the sums differ; the higher sum moves
/// first.
pub fn roll_for_first_player(dice: &mut Dice) -> Result<OpeningRoll, DiceError> {
    for _ in 0..MAX_OPENING_ROLLS {
        let rolls = [dice.roll(), dice.roll(), dice.roll(), dice.roll()];
        let first = rolls[0] + rolls[1];
        let second = rolls[2] + rolls[3];
        if first == second {
            debug!(?rolls, "opening roll tied");
            continue;
        }

        let first = if first > second { Seat::One } else { Seat::Two };
        return Ok(OpeningRoll { rolls, first });
    }
    Err(DiceError::Stalemate(MAX_OPENING_ROLLS))
}
