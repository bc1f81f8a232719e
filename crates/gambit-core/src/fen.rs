//! FEN (Forsyth-Edwards Notation) field parsing and serialization.
//!
//! This layer checks the syntax of each field. Whether the placement makes
//! a playable position (one king per side, no pawns on the back ranks, ...)
//! is the engine's concern.

use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 or 6 fields, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// Parsed FEN fields.
///
/// This struct holds the raw, syntax-checked FEN components. The engine
/// converts it into its own position representation. The move counters are
/// optional in the input; when absent they default to `0` and `1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Piece placement string (e.g., "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR")
    pub piece_placement: String,
    /// Active color ('w' or 'b')
    pub active_color: char,
    /// Castling availability (e.g., "KQkq", "-")
    pub castling: String,
    /// En passant target square (e.g., "e3", "-")
    pub en_passant: String,
    /// Halfmove clock (for 50-move rule)
    pub halfmove_clock: u32,
    /// Fullmove number
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string with either 4 fields (no counters) or all 6.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() != 4 && parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let piece_placement = parts[0];
        Self::validate_piece_placement(piece_placement)?;

        let active_color = match parts[1] {
            "w" => 'w',
            "b" => 'b',
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = parts[2];
        Self::validate_castling(castling)?;

        let en_passant = parts[3];
        Self::validate_en_passant(en_passant)?;

        let (halfmove_clock, fullmove_number) = if parts.len() == 6 {
            let halfmove = parts[4]
                .parse::<u32>()
                .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;
            let fullmove = parts[5]
                .parse::<u32>()
                .ok()
                .filter(|&n| n >= 1)
                .ok_or_else(|| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;
            (halfmove, fullmove)
        } else {
            (0, 1)
        };

        Ok(FenParser {
            piece_placement: piece_placement.to_string(),
            active_color,
            castling: castling.to_string(),
            en_passant: en_passant.to_string(),
            halfmove_clock,
            fullmove_number,
        })
    }

    fn validate_piece_placement(placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        for (i, rank) in ranks.iter().enumerate() {
            let mut squares = 0;
            let mut previous_was_digit = false;
            for c in rank.chars() {
                if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    if previous_was_digit {
                        return Err(FenError::InvalidPiecePlacement(format!(
                            "consecutive digits in rank {}",
                            8 - i
                        )));
                    }
                    squares += run;
                    previous_was_digit = true;
                } else if "pnbrqkPNBRQK".contains(c) {
                    squares += 1;
                    previous_was_digit = false;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - i
                    )));
                }
            }
            if squares != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - i,
                    squares
                )));
            }
        }

        Ok(())
    }

    fn validate_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }
        if castling.is_empty() {
            return Err(FenError::InvalidCastlingRights("empty field".to_string()));
        }

        let mut seen = String::new();
        for c in castling.chars() {
            if !"KQkq".contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{}'",
                    c
                )));
            }
            if seen.contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "duplicate character '{}'",
                    c
                )));
            }
            seen.push(c);
        }

        Ok(())
    }

    fn validate_en_passant(ep: &str) -> Result<(), FenError> {
        if ep == "-" {
            return Ok(());
        }

        let chars: Vec<char> = ep.chars().collect();
        if chars.len() != 2
            || !('a'..='h').contains(&chars[0])
            || !(chars[1] == '3' || chars[1] == '6')
        {
            return Err(FenError::InvalidEnPassantSquare(ep.to_string()));
        }

        Ok(())
    }

    /// Converts the parsed FEN back to a six-field FEN string.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.piece_placement,
            self.active_color,
            self.castling,
            self.en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}
