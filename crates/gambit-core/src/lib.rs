//! Core value types for the Gambit chess rules engine.
//!
//! This crate provides the primitives every other layer builds on:
//! - [`Color`], [`PieceKind`] and [`Piece`] for piece identity
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] and [`MoveFlag`] for move representation
//! - FEN field parsing via [`FenParser`]
//!
//! None of these types carry behavior beyond validation and notation; board
//! state and rules live in `gambit-engine`.

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenParser};
pub use mov::{Move, MoveFlag};
pub use piece::{Piece, PieceKind};
pub use square::{File, Rank, Square, SquareError};
