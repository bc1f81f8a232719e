//! Game session with a notated move log.
//!
//! [`Game`] wraps a [`Position`] for callers that play a game move by move:
//! it accepts moves as [`Move`] values, UCI strings or SAN, records each
//! move with its SAN, keeps the current [`Outcome`] up to date, and refuses
//! further moves once the game has ended.

use gambit_core::{Color, Move, Square};
use thiserror::Error;
use tracing::debug;

use crate::error::EngineError;
use crate::rules::Outcome;
use crate::san::{move_to_san, san_to_move, SanError};
use crate::{MoveList, Position};

/// A recorded move in the game log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMove {
    /// The move with its flags resolved.
    pub mv: Move,
    /// SAN notation for the move, including any check suffix.
    pub san: String,
}

/// Error type for game operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("invalid SAN: {0}")]
    InvalidSan(#[from] SanError),

    #[error("invalid UCI move: {0}")]
    InvalidUci(String),

    #[error("game has already ended: {0}")]
    GameOver(Outcome),
}

/// A chess game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    moves: Vec<GameMove>,
    outcome: Outcome,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::new_game())
    }

    /// Creates a game from an existing position. The position may already be
    /// terminal, in which case no moves are accepted.
    pub fn from_position(mut position: Position) -> Self {
        let outcome = position.classify();
        Game {
            position,
            moves: Vec::new(),
            outcome,
        }
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// Returns a reference to the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns all legal moves in the current position.
    pub fn legal_moves(&mut self) -> MoveList {
        if self.outcome.is_terminal() {
            return MoveList::new();
        }
        self.position.legal_moves()
    }

    /// Returns the legal moves of the piece on `sq`.
    pub fn legal_moves_for(&mut self, sq: Square) -> MoveList {
        if self.outcome.is_terminal() {
            return MoveList::new();
        }
        self.position.legal_moves_for(sq)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    /// The state of the game after the last move.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Returns true if the game has ended.
    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// The winner, if the game ended in checkmate.
    pub fn winner(&self) -> Option<Color> {
        self.outcome.winner(self.position.side_to_move())
    }

    /// Returns the move log.
    pub fn move_history(&self) -> &[GameMove] {
        &self.moves
    }

    /// Returns the number of half-moves (plies) played.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Returns the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Plays a move. Flags on `m` are ignored; the move is matched against
    /// the legal moves by origin, destination and promotion piece.
    pub fn make_move(&mut self, m: Move) -> Result<&GameMove, GameError> {
        if self.outcome.is_terminal() {
            return Err(GameError::GameOver(self.outcome));
        }

        let resolved = self.position.resolve(m)?;
        let san = move_to_san(&mut self.position, resolved);
        self.position.apply(resolved)?;
        self.moves.push(GameMove { mv: resolved, san });

        self.outcome = self.position.classify();
        if self.outcome.is_terminal() {
            debug!(outcome = %self.outcome, plies = self.moves.len(), "game ended");
        }

        Ok(&self.moves[self.moves.len() - 1])
    }

    /// Plays a move given in UCI notation (e.g. "e2e4", "e7e8q").
    pub fn make_move_uci(&mut self, uci: &str) -> Result<&GameMove, GameError> {
        let m = Move::from_uci(uci).ok_or_else(|| GameError::InvalidUci(uci.to_string()))?;
        self.make_move(m)
    }

    /// Plays a move given in SAN (e.g. "Nf3", "exd5", "O-O").
    pub fn make_move_san(&mut self, san: &str) -> Result<&GameMove, GameError> {
        if self.outcome.is_terminal() {
            return Err(GameError::GameOver(self.outcome));
        }
        let m = san_to_move(&mut self.position, san)?;
        self.make_move(m)
    }

    /// Takes back the last move. Allowed after the game has ended.
    pub fn undo(&mut self) -> Result<GameMove, GameError> {
        let record = self.moves.pop().ok_or(EngineError::NoMoveToUndo)?;
        self.position.undo()?;
        self.outcome = self.position.classify();
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gambit_core::FenParser;

    #[test]
    fn new_game() {
        let mut game = Game::new();
        assert_eq!(game.ply_count(), 0);
        assert!(!game.is_over());
        assert!(!game.is_check());
        assert_eq!(game.outcome(), Outcome::Ongoing);
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.to_fen(), FenParser::STARTPOS);
    }

    #[test]
    fn make_move_uci() {
        let mut game = Game::new();
        let played = game.make_move_uci("e2e4").unwrap();
        assert_eq!(played.san, "e4");
        assert!(played.mv.is_double_push());
        assert_eq!(game.ply_count(), 1);

        assert_eq!(
            game.make_move_uci("e7"),
            Err(GameError::InvalidUci("e7".to_string()))
        );
    }

    #[test]
    fn make_move_san() {
        let mut game = Game::new();
        game.make_move_san("e4").unwrap();
        game.make_move_san("e5").unwrap();
        game.make_move_san("Nf3").unwrap();

        let history: Vec<&str> = game.move_history().iter().map(|m| m.san.as_str()).collect();
        assert_eq!(history, ["e4", "e5", "Nf3"]);
    }

    #[test]
    fn illegal_move() {
        let mut game = Game::new();
        let result = game.make_move_uci("e2e5");
        assert!(matches!(
            result,
            Err(GameError::Engine(EngineError::InvalidMove(_)))
        ));
        assert_eq!(game.ply_count(), 0);
        assert!(matches!(
            game.make_move_san("Qh5"),
            Err(GameError::InvalidSan(SanError::NoMatchingMove(_)))
        ));
    }

    #[test]
    fn checkmate_fools_mate() {
        let mut game = Game::new();
        for san in ["f3", "e5", "g4", "Qh4"] {
            game.make_move_san(san).unwrap();
        }
        assert!(game.is_over());
        assert!(game.is_check());
        assert_eq!(game.outcome(), Outcome::Checkmate);
        assert_eq!(game.winner(), Some(Color::Black));
        assert_eq!(game.move_history()[3].san, "Qh4#");
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn cannot_move_after_game_over() {
        let mut game = Game::new();
        for san in ["f3", "e5", "g4", "Qh4"] {
            game.make_move_san(san).unwrap();
        }
        assert_eq!(
            game.make_move_uci("a2a3"),
            Err(GameError::GameOver(Outcome::Checkmate))
        );
        assert_eq!(
            game.make_move_san("a3"),
            Err(GameError::GameOver(Outcome::Checkmate))
        );
    }

    #[test]
    fn undo_reopens_the_game() {
        let mut game = Game::new();
        for san in ["f3", "e5", "g4", "Qh4"] {
            game.make_move_san(san).unwrap();
        }
        let taken_back = game.undo().unwrap();
        assert_eq!(taken_back.san, "Qh4#");
        assert_eq!(game.outcome(), Outcome::Ongoing);
        assert_eq!(game.ply_count(), 3);
        game.make_move_san("Nc6").unwrap();
    }

    #[test]
    fn undo_with_no_moves() {
        let mut game = Game::new();
        assert_eq!(
            game.undo(),
            Err(GameError::Engine(EngineError::NoMoveToUndo))
        );
    }

    #[test]
    fn stalemate() {
        let mut game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(game.is_over());
        assert_eq!(game.outcome(), Outcome::Stalemate);
        assert_eq!(game.winner(), None);
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn threefold_repetition() {
        let mut game = Game::new();
        for san in ["Nf3", "Nf6", "Ng1", "Ng8"] {
            game.make_move_san(san).unwrap();
        }
        assert!(!game.is_over());

        for san in ["Nf3", "Nf6", "Ng1", "Ng8"] {
            game.make_move_san(san).unwrap();
        }
        assert_eq!(game.outcome(), Outcome::ThreefoldRepetition);
    }

    #[test]
    fn fifty_move_rule() {
        let mut game = Game::from_fen("8/8/8/8/8/8/8/R3K2k w Q - 99 1").unwrap();
        assert!(!game.is_over());
        game.make_move_uci("a1a2").unwrap();
        assert_eq!(game.outcome(), Outcome::FiftyMoveRule);
    }

    #[test]
    fn insufficient_material() {
        let game = Game::from_fen("8/8/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        assert_eq!(game.outcome(), Outcome::InsufficientMaterial);
    }
}
