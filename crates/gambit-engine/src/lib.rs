//! Chess rules engine with reversible make/undo.
//!
//! This crate provides:
//! - [`Position`] - Board state with castling rights, en passant target,
//!   move counters and an undo history
//! - Legal move generation built on a standalone attack oracle
//! - [`Outcome`] classification: checkmate, stalemate, insufficient material,
//!   threefold repetition and the fifty-move rule
//! - [`Game`] - A game session with a SAN move log
//! - SAN notation parsing and generation
//! - Perft for validating the move generator
//!
//! # Architecture
//!
//! The board is a 64-entry mailbox of optional pieces. Legal moves are found
//! by generating pseudo-legal candidates, applying each one, testing whether
//! the mover's king is attacked, and undoing it. Every applied move pushes an
//! [`UndoRecord`] so that [`Position::undo`] restores the previous state
//! exactly, which lets search code walk the game tree on a single position.
//!
//! # Example
//!
//! ```
//! use gambit_core::{Move, Square};
//! use gambit_engine::{Game, Outcome, Position};
//!
//! let mut position = Position::new_game();
//! assert_eq!(position.legal_moves().len(), 20);
//!
//! let e2e4 = Move::from_uci("e2e4").unwrap();
//! position.apply(e2e4).unwrap();
//! assert_eq!(position.en_passant(), Square::from_algebraic("e3"));
//! position.undo().unwrap();
//! assert_eq!(position, Position::new_game());
//!
//! let mut game = Game::new();
//! for san in ["f3", "e5", "g4", "Qh4"] {
//!     game.make_move_san(san).unwrap();
//! }
//! assert_eq!(game.outcome(), Outcome::Checkmate);
//! ```

mod error;
mod game;
pub mod movegen;
mod position;
pub mod rules;
pub mod san;

pub use error::{EngineError, PositionError};
pub use game::{Game, GameError, GameMove};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{is_king_attacked, is_square_attacked, MoveList};
pub use position::{CastlingRights, Position, PositionKey, UndoRecord};
pub use rules::Outcome;
pub use san::{move_to_san, san_to_move, SanError};
