use tracing::info;

use crate::board::Board;
use crate::error::PlayError;
use crate::game::Game;
use crate::player::Player;
use crate::types::{BoardSize, Color, PlayerKind, Seat, TournamentResult, TournamentState};

/// A series of games between the same two players.
///
/// The players live inside the current game. Their overall points belong to
/// the tournament and carry over whenever a new game replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tournament {
    game: Game,
    round: u32,
}

impl Tournament {
    pub fn new(game: Game, round: u32) -> Self {
        Self { game, round }
    }

    /// Round 1. `chooser` won the opening roll, picks `color` and moves first.
    pub fn begin(
        first: Player,
        second: Player,
        size: BoardSize,
        chooser: Seat,
        color: Color,
    ) -> Self {
        let color = chosen_color(chooser_kind(&first, &second, chooser), color);
        let [first, second] = assign_colors([first, second], chooser, color);
        info!(size = size.side(), chooser = chooser.number(), ?color, "tournament started");
        Self::new(Game::new(first, second, chooser, Board::new(size)), 1)
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Replaces the current game and moves on to the next round. The
    /// incoming players take over the running totals.
    pub fn add_game(&mut self, mut game: Game) {
        game.set_overall_points(self.standings());
        self.game = game;
        self.round += 1;
        info!(round = self.round, "next round");
    }

    /// Winner of the last game, or player 1 after a tie or while the game
    /// is still running.
    pub fn next_chooser(&self) -> Seat {
        self.game
            .outcome()
            .and_then(|outcome| outcome.winner())
            .unwrap_or(Seat::One)
    }

    /// Starts the next round on a fresh board with the same players.
    /// Returns the seat that chose the color and moves first.
    pub fn start_next_game(&mut self, size: BoardSize, color: Color) -> Result<Seat, PlayError> {
        if !self.game.is_over() {
            return Err(PlayError::GameInProgress);
        }

        let chooser = self.next_chooser();
        let color = chosen_color(self.game.player(chooser).kind(), color);
        let [first, second] = assign_colors(self.game.players().clone(), chooser, color);
        self.add_game(Game::new(first, second, chooser, Board::new(size)));
        Ok(chooser)
    }

    /// Overall points, player 1 first.
    pub fn standings(&self) -> [u32; 2] {
        [Seat::One, Seat::Two].map(|seat| self.game.player(seat).overall_points())
    }

    pub fn winner(&self) -> TournamentResult {
        let [first_points, second_points] = self.standings();
        let winner = match first_points.cmp(&second_points) {
            std::cmp::Ordering::Greater => Some(Seat::One.number()),
            std::cmp::Ordering::Less => Some(Seat::Two.number()),
            std::cmp::Ordering::Equal => None,
        };
        TournamentResult {
            winner,
            first_points,
            second_points,
        }
    }

    pub fn state(&self) -> TournamentState {
        TournamentState {
            round: self.round,
            game: self.game.state(),
        }
    }
}

/// The chooser takes `color`, the other player the opposite one.
pub fn assign_colors(mut players: [Player; 2], chooser: Seat, color: Color) -> [Player; 2] {
    players[chooser.index()].set_color(color);
    players[chooser.other().index()].set_color(color.opponent());
    players
}

/// A computer always picks White; a human gets what was asked for.
pub fn chosen_color(kind: PlayerKind, requested: Color) -> Color {
    match kind {
        PlayerKind::Computer => Color::White,
        PlayerKind::Human => requested,
    }
}

fn chooser_kind(first: &Player, second: &Player, chooser: Seat) -> PlayerKind {
    match chooser {
        Seat::One => first.kind(),
        Seat::Two => second.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move;
    use crate::types::{Direction, Point};

    #[test]
    fn begin_gives_the_chooser_its_color_and_the_first_move() {
        let tournament = Tournament::begin(
            Player::human(0),
            Player::human(0),
            BoardSize::S7,
            Seat::Two,
            Color::Black,
        );
        let game = tournament.game();

        assert_eq!(tournament.round(), 1);
        assert_eq!(game.next_seat(), Seat::Two);
        assert_eq!(game.color_of(Seat::Two), Color::Black);
        assert_eq!(game.color_of(Seat::One), Color::White);
        assert_eq!(game.board().size(), 7);
    }

    #[test]
    fn computer_chooser_picks_white() {
        let tournament = Tournament::begin(
            Player::computer(0),
            Player::human(0),
            BoardSize::S5,
            Seat::One,
            Color::Black,
        );

        assert_eq!(tournament.game().color_of(Seat::One), Color::White);
        assert_eq!(tournament.game().color_of(Seat::Two), Color::Black);
    }

    #[test]
    fn next_game_waits_for_the_current_one() {
        let mut tournament = Tournament::begin(
            Player::human(0),
            Player::human(0),
            BoardSize::S5,
            Seat::One,
            Color::White,
        );

        assert_eq!(
            tournament.start_next_game(BoardSize::S5, Color::White),
            Err(PlayError::GameInProgress)
        );
        assert_eq!(tournament.round(), 1);
    }

    #[test]
    fn winner_of_a_game_chooses_next() {
        let mut tournament = Tournament::begin(
            Player::human(0),
            Player::human(2),
            BoardSize::S5,
            Seat::One,
            Color::White,
        );
        tournament.game_mut().play(Move::quit()).unwrap();
        assert_eq!(tournament.next_chooser(), Seat::Two);

        let chooser = tournament
            .start_next_game(BoardSize::S9, Color::White)
            .unwrap();
        let game = tournament.game();

        assert_eq!(chooser, Seat::Two);
        assert_eq!(tournament.round(), 2);
        assert_eq!(game.next_seat(), Seat::Two);
        assert_eq!(game.color_of(Seat::Two), Color::White);
        assert_eq!(game.color_of(Seat::One), Color::Black);
        assert_eq!(game.board().size(), 9);
        assert!(!game.is_over());
        assert_eq!(tournament.standings(), [0, 7]);
    }

    #[test]
    fn tie_hands_the_choice_to_player_one() {
        let mut board = Board::empty(BoardSize::S5);
        board.place(Point::new(2, 2), Color::White, true);
        board.place(Point::new(3, 3), Color::Black, false);
        board.place(Point::new(2, 4), Color::Black, false);
        board.place(Point::new(1, 5), Color::White, false);
        let mut first = Player::human(0);
        first.set_color(Color::White);
        let game = Game::new(first, Player::human(0), Seat::Two, board);
        let mut tournament = Tournament::new(game, 3);

        tournament.game_mut().play(Move::skip()).unwrap();
        tournament
            .game_mut()
            .play(Move::play(Point::new(2, 2), Direction::SE))
            .unwrap();
        tournament.game_mut().play(Move::quit()).unwrap();

        assert_eq!(tournament.game().outcome().and_then(|o| o.winner()), None);
        assert_eq!(tournament.next_chooser(), Seat::One);
        assert_eq!(tournament.start_next_game(BoardSize::S5, Color::Black), Ok(Seat::One));
        assert_eq!(tournament.round(), 4);
    }

    #[test]
    fn add_game_keeps_count_of_rounds() {
        let mut tournament = Tournament::begin(
            Player::computer(4),
            Player::computer(9),
            BoardSize::S5,
            Seat::One,
            Color::White,
        );
        let [first, second] = tournament.game().players().clone();

        tournament.add_game(Game::new(first, second, Seat::Two, Board::new(BoardSize::S5)));

        assert_eq!(tournament.round(), 2);
        assert_eq!(tournament.state().round, 2);
        assert_eq!(tournament.standings(), [4, 9]);
    }

    #[test]
    fn add_game_carries_totals_to_fresh_players() {
        let mut tournament = Tournament::begin(
            Player::human(0),
            Player::human(0),
            BoardSize::S5,
            Seat::One,
            Color::White,
        );
        tournament.game_mut().play(Move::quit()).unwrap();
        assert_eq!(tournament.standings(), [0, 5]);

        tournament.add_game(Game::new(
            Player::human(0),
            Player::human(0),
            Seat::Two,
            Board::new(BoardSize::S7),
        ));

        assert_eq!(tournament.round(), 2);
        assert_eq!(tournament.standings(), [0, 5]);
        assert_eq!(tournament.game().player(Seat::Two).overall_points(), 5);
    }

    #[test]
    fn tournament_winner_compares_overall_points() {
        let tournament = Tournament::begin(
            Player::human(12),
            Player::computer(30),
            BoardSize::S5,
            Seat::One,
            Color::White,
        );
        assert_eq!(
            tournament.winner(),
            TournamentResult {
                winner: Some(2),
                first_points: 12,
                second_points: 30,
            }
        );

        let level = Tournament::begin(
            Player::human(8),
            Player::human(8),
            BoardSize::S5,
            Seat::One,
            Color::White,
        );
        assert_eq!(level.winner().winner, None);
    }
}
