//! Browser entry points.
//!
//! The page drives one `KonoSession`; every state change goes through the
//! core types, and snapshots go back to JS through `serde-wasm-bindgen`.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use wasm_bindgen::prelude::*;
use web_time::{SystemTime, UNIX_EPOCH};

use crate::dice::{Dice, OpeningRoll, roll_for_first_player};
use crate::moves::Move;
use crate::player::Player;
use crate::serializer;
use crate::tournament::Tournament;
use crate::types::{BoardSize, Color, Direction, Point, PlayerKind};

#[wasm_bindgen]
pub struct KonoSession {
    tournament: Option<Tournament>,
    dice: Dice,
    opening: Option<OpeningRoll>,
    rng: StdRng,
}

#[wasm_bindgen]
impl KonoSession {
    /// Dice and AI tie-breaks seeded from the clock.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(seed)
    }

    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            tournament: None,
            dice: Dice::seeded(seed),
            opening: None,
            rng: StdRng::seed_from_u64(seed.rotate_left(17)),
        }
    }

    /// Dice replay `rolls` in a loop instead of drawing random values.
    #[wasm_bindgen(js_name = withScriptedDice)]
    pub fn with_scripted_dice(rolls: Vec<u8>, seed: u64) -> Result<KonoSession, JsError> {
        let dice = Dice::scripted(rolls).ok_or_else(|| JsError::new("dice rolls must be 1 to 6"))?;
        Ok(Self {
            dice,
            ..Self::with_seed(seed)
        })
    }

    /// Rolls for the first player and returns the `OpeningRoll`.
    #[wasm_bindgen(js_name = rollDice)]
    pub fn roll_dice(&mut self) -> Result<JsValue, JsError> {
        let opening = roll_for_first_player(&mut self.dice)?;
        info!(%opening, "opening roll");
        self.opening = Some(opening);
        Ok(serde_wasm_bindgen::to_value(&opening)?)
    }

    /// Starts round 1. The winner of the last opening roll moves first and
    /// gets the requested color unless it is a computer.
    #[wasm_bindgen(js_name = beginTournament)]
    pub fn begin_tournament(
        &mut self,
        size: usize,
        first_is_computer: bool,
        second_is_computer: bool,
        chooser_takes_white: bool,
    ) -> Result<(), JsError> {
        let opening = self
            .opening
            .take()
            .ok_or_else(|| JsError::new("roll the dice first"))?;
        let size = board_size(size)?;

        self.tournament = Some(Tournament::begin(
            player(first_is_computer),
            player(second_is_computer),
            size,
            opening.first,
            color(chooser_takes_white),
        ));
        Ok(())
    }

    pub fn load(&mut self, text: &str) -> Result<(), JsError> {
        self.tournament = Some(serializer::deserialize(text)?);
        Ok(())
    }

    pub fn save(&self) -> Result<String, JsError> {
        Ok(serializer::serialize(current(&self.tournament)?))
    }

    /// `TournamentState` snapshot.
    pub fn state(&self) -> Result<JsValue, JsError> {
        let state = current(&self.tournament)?.state();
        Ok(serde_wasm_bindgen::to_value(&state)?)
    }

    /// Plays a human move from (`row`, `col`) in `direction` (NW, NE, SE, SW).
    pub fn play(&mut self, row: u8, col: u8, direction: &str) -> Result<(), JsError> {
        let direction = Direction::parse(direction)
            .ok_or_else(|| JsError::new(&format!("unknown direction {direction:?}")))?;
        self.play_human(Move::play(Point::new(row, col), direction))
    }

    pub fn skip(&mut self) -> Result<(), JsError> {
        self.play_human(Move::skip())
    }

    pub fn quit(&mut self) -> Result<(), JsError> {
        self.play_human(Move::quit())
    }

    /// Lets the computer take its move and returns the explanation.
    #[wasm_bindgen(js_name = computerMove)]
    pub fn computer_move(&mut self) -> Result<String, JsError> {
        let game = current_mut(&mut self.tournament)?.game_mut();
        if game.next_player().kind() != PlayerKind::Computer {
            return Err(JsError::new("it is not the computer's turn"));
        }

        let mv = game
            .propose_move(None, &mut self.rng)
            .ok_or_else(|| JsError::new("the computer has no color"))?;
        game.play(mv)?;
        Ok(mv.to_string())
    }

    /// What the computer would do in the current player's place.
    pub fn suggest(&mut self) -> Result<String, JsError> {
        let game = current(&self.tournament)?.game();
        Ok(game.suggest_move(&mut self.rng).to_string())
    }

    /// Starts the next round; returns the number of the player who chose
    /// the color and moves first.
    #[wasm_bindgen(js_name = nextRound)]
    pub fn next_round(&mut self, size: usize, chooser_takes_white: bool) -> Result<u8, JsError> {
        let size = board_size(size)?;
        let tournament = current_mut(&mut self.tournament)?;
        let chooser = tournament.start_next_game(size, color(chooser_takes_white))?;
        Ok(chooser.number())
    }

    /// `TournamentResult` by overall points.
    #[wasm_bindgen(js_name = tournamentResult)]
    pub fn tournament_result(&self) -> Result<JsValue, JsError> {
        let result = current(&self.tournament)?.winner();
        Ok(serde_wasm_bindgen::to_value(&result)?)
    }
}

impl KonoSession {
    fn play_human(&mut self, mv: Move) -> Result<(), JsError> {
        let game = current_mut(&mut self.tournament)?.game_mut();
        if game.next_player().kind() != PlayerKind::Human {
            return Err(JsError::new("it is the computer's turn"));
        }
        game.play(mv)?;
        Ok(())
    }
}

impl Default for KonoSession {
    fn default() -> Self {
        Self::new()
    }
}

fn current(tournament: &Option<Tournament>) -> Result<&Tournament, JsError> {
    tournament
        .as_ref()
        .ok_or_else(|| JsError::new("no tournament in progress"))
}

fn current_mut(tournament: &mut Option<Tournament>) -> Result<&mut Tournament, JsError> {
    tournament
        .as_mut()
        .ok_or_else(|| JsError::new("no tournament in progress"))
}

fn board_size(side: usize) -> Result<BoardSize, JsError> {
    BoardSize::from_side(side).ok_or_else(|| JsError::new(&format!("invalid board size {side}")))
}

fn player(computer: bool) -> Player {
    if computer {
        Player::computer(0)
    } else {
        Player::human(0)
    }
}

fn color(white: bool) -> Color {
    if white { Color::White } else { Color::Black }
}
