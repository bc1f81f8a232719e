//! Player color representation.

use crate::Rank;

/// The two sides in a game of chess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Both colors, White first.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// Returns the opposite color.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns the index (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the rank step a pawn of this color advances by (+1 or -1).
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Returns the rank the king and rooks start on.
    #[inline]
    pub const fn back_rank(self) -> Rank {
        match self {
            Color::White => Rank::R1,
            Color::Black => Rank::R8,
        }
    }

    /// Returns the rank this color's pawns start on.
    #[inline]
    pub const fn pawn_rank(self) -> Rank {
        match self {
            Color::White => Rank::R2,
            Color::Black => Rank::R7,
        }
    }

    /// Returns the far rank where this color's pawns promote.
    #[inline]
    pub const fn promotion_rank(self) -> Rank {
        match self {
            Color::White => Rank::R8,
            Color::Black => Rank::R1,
        }
    }

    /// Returns the FEN active-color character.
    #[inline]
    pub const fn to_fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Parses a FEN active-color character.
    #[inline]
    pub const fn from_fen_char(c: char) -> Option<Self> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.opposite()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_color() {
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(!Color::Black, Color::White);
    }

    #[test]
    fn ranks_per_color() {
        assert_eq!(Color::White.back_rank(), Rank::R1);
        assert_eq!(Color::Black.back_rank(), Rank::R8);
        assert_eq!(Color::White.pawn_rank(), Rank::R2);
        assert_eq!(Color::Black.pawn_rank(), Rank::R7);
        assert_eq!(Color::White.promotion_rank(), Rank::R8);
        assert_eq!(Color::Black.promotion_rank(), Rank::R1);
    }

    #[test]
    fn fen_char() {
        assert_eq!(Color::from_fen_char('w'), Some(Color::White));
        assert_eq!(Color::from_fen_char('b'), Some(Color::Black));
        assert_eq!(Color::from_fen_char('x'), None);
        assert_eq!(Color::Black.to_fen_char(), 'b');
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Color::White), "White");
        assert_eq!(format!("{}", Color::Black), "Black");
    }
}
