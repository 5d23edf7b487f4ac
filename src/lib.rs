use wasm_bindgen::prelude::*;

pub mod ai;
pub mod api;
pub mod board;
pub mod dice;
pub mod error;
pub mod game;
pub mod moves;
pub mod player;
pub mod serializer;
pub mod tournament;
pub mod types;

pub use api::KonoSession;
pub use board::Board;
pub use game::Game;
pub use moves::Move;
pub use player::Player;
pub use tournament::Tournament;

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
