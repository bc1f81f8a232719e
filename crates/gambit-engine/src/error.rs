//! Error types for the engine.

use gambit_core::{Color, FenError, Square, SquareError};
use thiserror::Error;

/// Reasons a position string cannot be turned into a playable position.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("{0} has no king")]
    MissingKing(Color),

    #[error("{0} has more than one king")]
    ExtraKing(Color),

    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(Square),

    #[error("castling right '{0}' needs king and rook on their home squares")]
    InconsistentCastling(char),

    #[error("en passant square {0} does not follow a double pawn push")]
    InconsistentEnPassant(Square),

    #[error("{0} is in check but it is not their move")]
    OpponentInCheck(Color),
}

/// Errors returned by the engine's public operations.
///
/// Every error leaves the position exactly as it was before the call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid square: {0}")]
    InvalidSquare(#[from] SquareError),

    #[error("invalid move: {0}")]
    InvalidMove(String),

    #[error("no move to undo")]
    NoMoveToUndo,

    #[error("malformed position: {0}")]
    MalformedPosition(#[from] PositionError),
}

impl From<FenError> for EngineError {
    fn from(e: FenError) -> Self {
        EngineError::MalformedPosition(PositionError::Fen(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(EngineError::NoMoveToUndo.to_string(), "no move to undo");
        assert_eq!(
            EngineError::InvalidMove("e2e5".to_string()).to_string(),
            "invalid move: e2e5"
        );
        let err = EngineError::from(PositionError::MissingKing(Color::Black));
        assert_eq!(err.to_string(), "malformed position: Black has no king");
    }

    #[test]
    fn fen_errors_become_malformed_position() {
        let err = EngineError::from(FenError::InvalidPartCount(2));
        assert!(matches!(
            err,
            EngineError::MalformedPosition(PositionError::Fen(FenError::InvalidPartCount(2)))
        ));
    }

    #[test]
    fn square_errors_become_invalid_square() {
        let err: EngineError = SquareError::InvalidNotation("j9".to_string()).into();
        assert!(matches!(err, EngineError::InvalidSquare(_)));
        assert!(err.to_string().contains("j9"));
    }
}
