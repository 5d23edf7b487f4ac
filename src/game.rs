use rand::RngCore;
use tracing::{debug, info};

use crate::ai::{Heuristic, MoveSelector};
use crate::board::Board;
use crate::error::PlayError;
use crate::moves::{Move, MoveAction};
use crate::player::Player;
use crate::types::{Color, GameOutcome, GameState, PlayerKind, PlayerState, Point, Seat};

/// Points deducted from a player who quits, before settlement.
pub const QUIT_PENALTY: i32 = 5;

/// One match between two players.
///
/// Each turn allows two plays with the same piece; a skip or the second
/// play hands the turn over. The game ends when the board reports a winner
/// or a player quits, at which point the score difference is paid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    players: [Player; 2],
    colors: [Color; 2],
    board: Board,
    active: Seat,
    on_second_move: bool,
    /// Where the first play of the current turn landed.
    forced_piece: Option<Point>,
    outcome: Option<GameOutcome>,
}

impl Game {
    /// Player one keeps its color (White if unset); player two always gets
    /// the other one.
    pub fn new(first: Player, second: Player, first_to_move: Seat, board: Board) -> Self {
        let mut players = [first, second];
        let color = players[0].color().unwrap_or(Color::White);
        let colors = [color, color.opponent()];
        for (player, color) in players.iter_mut().zip(colors) {
            player.set_color(color);
        }

        Self {
            players,
            colors,
            board,
            active: first_to_move,
            on_second_move: false,
            forced_piece: None,
            outcome: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn color_of(&self, seat: Seat) -> Color {
        self.colors[seat.index()]
    }

    pub fn next_player(&self) -> &Player {
        self.player(self.active)
    }

    pub fn next_seat(&self) -> Seat {
        self.active
    }

    pub fn next_player_number(&self) -> u8 {
        self.active.number()
    }

    /// 1 or 2 within the current turn.
    pub fn move_number(&self) -> u8 {
        if self.on_second_move { 2 } else { 1 }
    }

    /// The piece that has to make the second play of this turn.
    pub fn forced_piece(&self) -> Option<Point> {
        self.forced_piece.filter(|_| self.on_second_move)
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Overwrites both running totals, player 1 first.
    pub fn set_overall_points(&mut self, points: [u32; 2]) {
        for (player, points) in self.players.iter_mut().zip(points) {
            player.set_overall_points(points);
        }
    }

    pub fn into_players(self) -> [Player; 2] {
        self.players
    }

    /// Asks the player to move for the move it wants to make.
    pub fn propose_move(&self, pending: Option<Move>, rng: &mut dyn RngCore) -> Option<Move> {
        self.propose_move_with(&Heuristic, pending, rng)
    }

    /// Same as [`Game::propose_move`] with an explicit selector for computer
    /// players. On a second move a computer is pinned to the forced piece.
    pub fn propose_move_with(
        &self,
        selector: &dyn MoveSelector,
        pending: Option<Move>,
        rng: &mut dyn RngCore,
    ) -> Option<Move> {
        let player = self.next_player();
        let pending = match (pending, player.kind()) {
            (None, PlayerKind::Computer) => self.forced_piece().map(Move::forced),
            (pending, _) => pending,
        };
        player.propose_move(pending, &self.board, selector, rng)
    }

    /// What the heuristic would play for the side to move, whatever its kind.
    pub fn suggest_move(&self, rng: &mut dyn RngCore) -> Move {
        Heuristic.select_move(
            &self.board,
            self.color_of(self.active),
            self.forced_piece(),
            rng,
        )
    }

    /// Plays `mv` for the side to move.
    ///
    /// Rejected moves leave the whole game untouched. A quit ends the game
    /// with a penalty for the quitter.
    pub fn play(&mut self, mv: Move) -> Result<(), PlayError> {
        if self.outcome.is_some() {
            return Err(PlayError::GameOver);
        }
        let seat = self.active;

        match mv.action() {
            MoveAction::Quit => {
                info!(player = seat.number(), "player quits");
                self.settle(Some(seat));
                return Ok(());
            }
            MoveAction::Skip => {
                debug!(player = seat.number(), "player skips");
                self.end_turn();
                return Ok(());
            }
            MoveAction::Play => {}
        }

        if let Some(expected) = self.forced_piece()
            && mv.location() != Some(expected)
        {
            return Err(PlayError::MustMoveSamePiece(expected));
        }

        if let Err(err) = self.players[seat.index()].execute(&mv, &mut self.board) {
            debug!(player = seat.number(), %mv, %err, "move rejected");
            return Err(err.into());
        }
        debug!(player = seat.number(), move_number = self.move_number(), %mv, "move played");

        if self.board.is_winner() {
            self.settle(None);
        }

        if self.on_second_move {
            self.end_turn();
        } else {
            self.on_second_move = true;
            self.forced_piece = mv.destination();
        }

        Ok(())
    }

    pub fn state(&self) -> GameState {
        let players = [Seat::One, Seat::Two]
            .into_iter()
            .map(|seat| {
                let player = self.player(seat);
                PlayerState {
                    number: seat.number(),
                    kind: player.kind(),
                    color: player.color(),
                    overall_points: player.overall_points(),
                    board_score: self.board.player_score(self.color_of(seat)),
                }
            })
            .collect();

        GameState {
            size: self.board.size(),
            cells: self.board.cells(),
            players,
            next_player: self.next_player_number(),
            move_number: self.move_number(),
            forced_piece: self.forced_piece(),
            outcome: self.outcome,
        }
    }

    fn end_turn(&mut self) {
        self.active = self.active.other();
        self.on_second_move = false;
        self.forced_piece = None;
    }

    /// Scores both sides and pays the difference to the higher one.
    fn settle(&mut self, quitter: Option<Seat>) {
        let mut scores = self.colors.map(|color| self.board.player_score(color) as i32);
        if let Some(seat) = quitter {
            scores[seat.index()] -= QUIT_PENALTY;
        }

        let outcome = GameOutcome {
            first_score: scores[0],
            second_score: scores[1],
        };
        if let Some(winner) = outcome.winner() {
            self.players[winner.index()].add_points(outcome.margin());
        }

        info!(
            first_score = outcome.first_score,
            second_score = outcome.second_score,
            winner = outcome.winner().map(Seat::number),
            "game over"
        );
        self.outcome = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::error::MoveError;
    use crate::types::{BoardSize, Direction};

    struct FixedMoveSelector(Move);

    impl MoveSelector for FixedMoveSelector {
        fn select_move(
            &self,
            _board: &Board,
            _color: Color,
            _forced: Option<Point>,
            _rng: &mut dyn RngCore,
        ) -> Move {
            self.0
        }
    }

    fn p(row: u8, col: u8) -> Point {
        Point::new(row, col)
    }

    fn human_game(board: Board) -> Game {
        let mut first = Player::human(0);
        first.set_color(Color::White);
        Game::new(first, Player::human(0), Seat::One, board)
    }

    #[test]
    fn initial_state_is_correct() {
        let mut first = Player::computer(3);
        first.set_color(Color::Black);
        let game = Game::new(first, Player::human(8), Seat::Two, Board::new(BoardSize::S7));
        let state = game.state();

        assert_eq!(game.next_seat(), Seat::Two);
        assert_eq!(game.next_player_number(), 2);
        assert_eq!(game.move_number(), 1);
        assert_eq!(game.color_of(Seat::One), Color::Black);
        assert_eq!(game.player(Seat::Two).color(), Some(Color::White));
        assert_eq!(state.size, 7);
        assert_eq!(state.cells.len(), 49);
        assert_eq!(state.players[0].overall_points, 3);
        assert_eq!(state.players[1].board_score, 0);
        assert_eq!(state.outcome, None);
    }

    #[test]
    fn two_plays_then_the_turn_passes() {
        let mut game = human_game(Board::new(BoardSize::S5));

        game.play(Move::play(p(1, 1), Direction::SE)).unwrap();
        assert_eq!(game.next_seat(), Seat::One);
        assert_eq!(game.move_number(), 2);
        assert_eq!(game.forced_piece(), Some(p(2, 2)));

        game.play(Move::play(p(2, 2), Direction::SE)).unwrap();
        assert_eq!(game.next_seat(), Seat::Two);
        assert_eq!(game.move_number(), 1);
        assert_eq!(game.forced_piece(), None);
    }

    #[test]
    fn illegal_move_changes_nothing() {
        let mut game = human_game(Board::new(BoardSize::S5));
        let before = game.clone();

        let err = game.play(Move::play(p(5, 1), Direction::NE)).unwrap_err();

        assert_eq!(err, PlayError::Illegal(MoveError::NotYourPiece(p(5, 1))));
        assert_eq!(game, before);
    }

    #[test]
    fn second_play_must_reuse_the_piece() {
        let mut game = human_game(Board::new(BoardSize::S5));
        game.play(Move::play(p(1, 1), Direction::SE)).unwrap();
        let before = game.clone();

        let err = game.play(Move::play(p(1, 3), Direction::SE)).unwrap_err();

        assert_eq!(err, PlayError::MustMoveSamePiece(p(2, 2)));
        assert_eq!(game, before);
    }

    #[test]
    fn skip_hands_over_the_turn() {
        let mut game = human_game(Board::new(BoardSize::S5));
        game.play(Move::play(p(1, 1), Direction::SE)).unwrap();

        game.play(Move::skip()).unwrap();

        assert_eq!(game.next_seat(), Seat::Two);
        assert_eq!(game.move_number(), 1);
    }

    #[test]
    fn quitting_costs_five_points() {
        let mut game = human_game(Board::new(BoardSize::S5));

        game.play(Move::quit()).unwrap();

        let outcome = game.outcome().unwrap();
        assert_eq!(outcome.first_score, -QUIT_PENALTY);
        assert_eq!(outcome.second_score, 0);
        assert_eq!(game.player(Seat::Two).overall_points(), 5);
        assert_eq!(game.player(Seat::One).overall_points(), 0);
    }

    #[test]
    fn capturing_the_last_piece_ends_the_game() {
        let mut board = Board::empty(BoardSize::S5);
        board.place(p(2, 2), Color::White, true);
        board.place(p(3, 3), Color::Black, false);
        let mut game = human_game(board);

        game.play(Move::play(p(2, 2), Direction::SE)).unwrap();

        // No territory on either side, 5 per missing opponent piece.
        let outcome = game.outcome().unwrap();
        assert_eq!(outcome.first_score, 35);
        assert_eq!(outcome.second_score, 30);
        assert_eq!(game.player(Seat::One).overall_points(), 5);
        assert_eq!(game.play(Move::skip()), Err(PlayError::GameOver));
    }

    #[test]
    fn tie_pays_nobody() {
        let mut board = Board::empty(BoardSize::S5);
        board.place(p(2, 2), Color::White, true);
        board.place(p(3, 3), Color::Black, false);
        board.place(p(2, 4), Color::Black, false);
        board.place(p(1, 5), Color::White, false);
        let mut game = human_game(board);

        game.play(Move::play(p(2, 2), Direction::SE)).unwrap();
        assert!(!game.is_over());
        game.play(Move::quit()).unwrap();

        // 5*(7-1) - 5 against 5*(7-2)
        let outcome = game.outcome().unwrap();
        assert_eq!(outcome, GameOutcome { first_score: 25, second_score: 25 });
        assert_eq!(outcome.winner(), None);
        assert_eq!(game.player(Seat::One).overall_points(), 0);
        assert_eq!(game.player(Seat::Two).overall_points(), 0);
    }

    #[test]
    fn computer_is_pinned_to_its_piece_on_the_second_move() {
        let mut first = Player::computer(0);
        first.set_color(Color::White);
        let mut game = Game::new(first, Player::human(0), Seat::One, Board::new(BoardSize::S5));
        let mut rng = StdRng::seed_from_u64(11);

        let opening = game.propose_move(None, &mut rng).unwrap();
        game.play(opening).unwrap();

        let follow_up = game.propose_move(None, &mut rng).unwrap();
        match follow_up.action() {
            MoveAction::Play => assert_eq!(follow_up.location(), opening.destination()),
            action => assert_eq!(action, MoveAction::Skip),
        }
        game.play(follow_up).unwrap();
        assert_eq!(game.next_seat(), Seat::Two);
    }

    #[test]
    fn injected_selector_drives_the_computer() {
        let mut first = Player::computer(0);
        first.set_color(Color::White);
        let mut game = Game::new(first, Player::computer(0), Seat::One, Board::new(BoardSize::S5));
        let mut rng = StdRng::seed_from_u64(0);

        let mv = game
            .propose_move_with(&FixedMoveSelector(Move::quit()), None, &mut rng)
            .unwrap();
        game.play(mv).unwrap();

        assert!(game.is_over());
    }

    #[test]
    fn human_without_a_move_proposes_nothing() {
        let game = human_game(Board::new(BoardSize::S5));
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(game.propose_move(None, &mut rng), None);
        assert!(game.suggest_move(&mut rng).action() == MoveAction::Play);
    }

    #[test]
    fn computer_vs_computer_only_makes_legal_moves() {
        for seed in 0..8 {
            let mut first = Player::computer(0);
            first.set_color(Color::Black);
            let mut game =
                Game::new(first, Player::computer(0), Seat::Two, Board::new(BoardSize::S5));
            let mut rng = StdRng::seed_from_u64(seed);

            for _ in 0..400 {
                if game.is_over() {
                    break;
                }
                let mv = game.propose_move(None, &mut rng).unwrap();
                assert_eq!(game.play(mv), Ok(()), "seed {seed}: {mv:?}");
            }
        }
    }
}
