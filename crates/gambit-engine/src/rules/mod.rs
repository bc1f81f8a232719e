//! Terminal-state classification.
//!
//! [`classify`] decides whether a game is still in progress and, if not,
//! why it ended. Checks run in a fixed priority order: checkmate,
//! stalemate, insufficient material, threefold repetition, then the
//! fifty-move rule.

mod material;
mod repetition;

pub use material::is_insufficient_material;
pub use repetition::{is_threefold_repetition, repetition_count};

use gambit_core::Color;
use tracing::debug;

use crate::movegen;
use crate::Position;

/// Halfmoves without a pawn move or capture after which the game is drawn.
pub const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// State of the game in a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// The side to move has at least one legal move and no draw applies.
    Ongoing,
    /// The side to move is in check and has no legal move.
    Checkmate,
    /// The side to move is not in check and has no legal move.
    Stalemate,
    /// Neither side can possibly deliver mate.
    InsufficientMaterial,
    /// The current position has occurred three times.
    ThreefoldRepetition,
    /// 100 halfmoves without a pawn move or capture.
    FiftyMoveRule,
}

impl Outcome {
    /// Returns true for every outcome except [`Outcome::Ongoing`].
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }

    /// Returns true for drawn outcomes.
    #[inline]
    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            Outcome::Stalemate
                | Outcome::InsufficientMaterial
                | Outcome::ThreefoldRepetition
                | Outcome::FiftyMoveRule
        )
    }

    /// The winning color, given the side to move in the classified position.
    #[inline]
    pub const fn winner(self, side_to_move: Color) -> Option<Color> {
        match self {
            Outcome::Checkmate => Some(side_to_move.opposite()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Outcome::Ongoing => "ongoing",
            Outcome::Checkmate => "checkmate",
            Outcome::Stalemate => "stalemate",
            Outcome::InsufficientMaterial => "draw by insufficient material",
            Outcome::ThreefoldRepetition => "draw by threefold repetition",
            Outcome::FiftyMoveRule => "draw by the fifty-move rule",
        };
        write!(f, "{}", s)
    }
}

/// Classifies the position.
///
/// The position is used as scratch space for the legal-move probe and is
/// restored before returning.
pub fn classify(position: &mut Position) -> Outcome {
    let outcome = if !movegen::has_legal_move(position) {
        if position.is_check() {
            Outcome::Checkmate
        } else {
            Outcome::Stalemate
        }
    } else if is_insufficient_material(position) {
        Outcome::InsufficientMaterial
    } else if is_threefold_repetition(position) {
        Outcome::ThreefoldRepetition
    } else if position.halfmove_clock() >= FIFTY_MOVE_HALFMOVES {
        Outcome::FiftyMoveRule
    } else {
        Outcome::Ongoing
    };

    if outcome.is_terminal() {
        debug!(%outcome, fen = %position.to_fen(), "game over");
    }
    outcome
}
