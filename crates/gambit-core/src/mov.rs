//! Move representation.

use crate::{PieceKind, Square};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Flags for special move types.
///
/// Flags are resolved by the engine's move generator. A move built by a
/// caller from two squares carries [`MoveFlag::Normal`] (or a promotion flag)
/// and is matched against the generated moves before it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// Normal move (no special action).
    Normal = 0,
    /// Pawn double push from starting rank.
    DoublePush = 1,
    /// Kingside castling (O-O).
    CastleKingside = 2,
    /// Queenside castling (O-O-O).
    CastleQueenside = 3,
    /// En passant capture.
    EnPassant = 4,
    /// Pawn promotion to knight.
    PromoteKnight = 5,
    /// Pawn promotion to bishop.
    PromoteBishop = 6,
    /// Pawn promotion to rook.
    PromoteRook = 7,
    /// Pawn promotion to queen.
    PromoteQueen = 8,
}

impl MoveFlag {
    /// Returns the promotion flag for a piece kind, if it is a legal target.
    #[inline]
    pub const fn promote_to(kind: PieceKind) -> Option<MoveFlag> {
        match kind {
            PieceKind::Knight => Some(MoveFlag::PromoteKnight),
            PieceKind::Bishop => Some(MoveFlag::PromoteBishop),
            PieceKind::Rook => Some(MoveFlag::PromoteRook),
            PieceKind::Queen => Some(MoveFlag::PromoteQueen),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }

    /// Returns the promotion piece if this is a promotion move.
    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceKind> {
        match self {
            MoveFlag::PromoteKnight => Some(PieceKind::Knight),
            MoveFlag::PromoteBishop => Some(PieceKind::Bishop),
            MoveFlag::PromoteRook => Some(PieceKind::Rook),
            MoveFlag::PromoteQueen => Some(PieceKind::Queen),
            _ => None,
        }
    }

    /// Returns true if this is a promotion move.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion_piece().is_some()
    }

    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }

    const fn from_bits(bits: u16) -> MoveFlag {
        match bits {
            1 => MoveFlag::DoublePush,
            2 => MoveFlag::CastleKingside,
            3 => MoveFlag::CastleQueenside,
            4 => MoveFlag::EnPassant,
            5 => MoveFlag::PromoteKnight,
            6 => MoveFlag::PromoteBishop,
            7 => MoveFlag::PromoteRook,
            8 => MoveFlag::PromoteQueen,
            _ => MoveFlag::Normal,
        }
    }
}

/// A chess move.
///
/// Encoded compactly: 6 bits from, 6 bits to, 4 bits flags = 16 bits total.
///
/// Two moves compare equal when their origin, destination and promotion
/// piece match. The remaining flags (double push, castling, en passant) are
/// derived from the position and take no part in equality or hashing, so a
/// caller-built `Move::normal(e1, g1)` equals the generated castling move.
#[derive(Clone, Copy)]
pub struct Move(u16);

impl Move {
    /// Creates a new move.
    #[inline]
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        let encoded = (from.index() as u16) | ((to.index() as u16) << 6) | ((flag as u16) << 12);
        Move(encoded)
    }

    /// Creates a normal move (no special flags).
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveFlag::Normal)
    }

    /// Creates a promotion move. Returns `None` if `kind` is not a piece a
    /// pawn may promote to.
    #[inline]
    pub const fn promoting(from: Square, to: Square, kind: PieceKind) -> Option<Self> {
        match MoveFlag::promote_to(kind) {
            Some(flag) => Some(Self::new(from, to, flag)),
            None => None,
        }
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        Square::from_masked(self.0)
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        Square::from_masked(self.0 >> 6)
    }

    /// Returns the move flag.
    #[inline]
    pub const fn flag(self) -> MoveFlag {
        MoveFlag::from_bits(self.0 >> 12)
    }

    /// Returns the piece a pawn promotes to, if any.
    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        self.flag().promotion_piece()
    }

    /// Returns true for en passant captures.
    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.flag(), MoveFlag::EnPassant)
    }

    /// Returns true for castling moves.
    #[inline]
    pub const fn is_castle(self) -> bool {
        self.flag().is_castling()
    }

    /// Returns true for pawn double pushes.
    #[inline]
    pub const fn is_double_push(self) -> bool {
        matches!(self.flag(), MoveFlag::DoublePush)
    }

    /// The fields that take part in equality: from, to and promotion piece.
    #[inline]
    const fn identity(self) -> u16 {
        let promo = match self.promotion() {
            Some(kind) => kind as u16,
            None => 0,
        };
        (self.0 & 0x0FFF) | (promo << 12)
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        match self.promotion() {
            Some(kind) => format!("{}{}{}", self.from(), self.to(), kind.to_char()),
            None => format!("{}{}", self.from(), self.to()),
        }
    }

    /// Parses a move from UCI notation.
    ///
    /// The result carries no special flags besides promotion; the engine
    /// resolves castling, en passant and double pushes against the position.
    pub fn from_uci(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        match s[4..].chars().next() {
            Some(c) => Move::promoting(from, to, PieceKind::from_char(c)?),
            None => Some(Move::normal(from, to)),
        }
    }

    /// A null move (used as placeholder, not a legal move).
    pub const NULL: Move = Move(0);
}

impl PartialEq for Move {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};
    use std::collections::HashSet;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn move_encoding() {
        let m = Move::new(sq("e2"), sq("e4"), MoveFlag::DoublePush);

        assert_eq!(m.from(), sq("e2"));
        assert_eq!(m.to(), sq("e4"));
        assert_eq!(m.flag(), MoveFlag::DoublePush);
        assert!(m.is_double_push());
        assert!(!m.is_castle());
        assert!(!m.is_en_passant());
    }

    #[test]
    fn equality_ignores_derived_flags() {
        let castle = Move::new(Square::E1, Square::G1, MoveFlag::CastleKingside);
        assert_eq!(castle, Move::normal(Square::E1, Square::G1));

        let ep = Move::new(sq("e5"), sq("d6"), MoveFlag::EnPassant);
        assert_eq!(ep, Move::normal(sq("e5"), sq("d6")));

        let mut set = HashSet::new();
        set.insert(castle);
        assert!(set.contains(&Move::normal(Square::E1, Square::G1)));
    }

    #[test]
    fn equality_respects_promotion() {
        let from = Square::new(File::E, Rank::R7);
        let to = Square::new(File::E, Rank::R8);
        let queen = Move::promoting(from, to, PieceKind::Queen).unwrap();
        let knight = Move::promoting(from, to, PieceKind::Knight).unwrap();

        assert_ne!(queen, knight);
        assert_ne!(queen, Move::normal(from, to));
        assert_eq!(knight.promotion(), Some(PieceKind::Knight));
    }

    #[test]
    fn promoting_rejects_pawn_and_king() {
        assert!(Move::promoting(sq("a7"), sq("a8"), PieceKind::King).is_none());
        assert!(Move::promoting(sq("a7"), sq("a8"), PieceKind::Pawn).is_none());
    }

    #[test]
    fn move_uci() {
        assert_eq!(Move::normal(sq("e2"), sq("e4")).to_uci(), "e2e4");
        let promo = Move::new(sq("e7"), sq("e8"), MoveFlag::PromoteQueen);
        assert_eq!(promo.to_uci(), "e7e8q");
        let under = Move::new(sq("b2"), sq("a1"), MoveFlag::PromoteKnight);
        assert_eq!(under.to_uci(), "b2a1n");
    }

    #[test]
    fn move_from_uci() {
        let m = Move::from_uci("e2e4").unwrap();
        assert_eq!(m.from().to_algebraic(), "e2");
        assert_eq!(m.to().to_algebraic(), "e4");
        assert_eq!(m.flag(), MoveFlag::Normal);

        assert_eq!(
            Move::from_uci("e7e8Q").unwrap().flag(),
            MoveFlag::PromoteQueen
        );
        assert_eq!(
            Move::from_uci("e7e8r").unwrap().flag(),
            MoveFlag::PromoteRook
        );
        assert_eq!(
            Move::from_uci("e7e8b").unwrap().flag(),
            MoveFlag::PromoteBishop
        );

        assert!(Move::from_uci("invalid").is_none());
        assert!(Move::from_uci("e2e9").is_none());
        assert!(Move::from_uci("e7e8k").is_none());
        assert!(Move::from_uci("e7e8x").is_none());
        assert!(Move::from_uci("e2").is_none());
        assert!(Move::from_uci("e2e4qq").is_none());
        assert!(Move::from_uci("é2e4").is_none());
    }

    #[test]
    fn move_debug_display() {
        let m = Move::normal(sq("g1"), sq("f3"));
        assert_eq!(format!("{:?}", m), "Move(g1f3)");
        assert_eq!(format!("{}", m), "g1f3");
    }
}
