//! Chess position representation.
//!
//! [`Position`] is the aggregate root of the engine: the occupancy grid,
//! side to move, castling rights, en passant target, cached king squares,
//! the FEN move counters, and a stack of [`UndoRecord`]s that makes every
//! move exactly reversible.

use std::fmt;

use gambit_core::{
    Color, FenError, FenParser, File, Move, MoveFlag, Piece, PieceKind, Rank, Square,
};
use tracing::{debug, trace, warn};

use crate::error::{EngineError, PositionError};
use crate::movegen::{self, MoveList};
use crate::rules::{self, Outcome};

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Returns true if the given side can castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Returns true if the given side can castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Returns true if the given side keeps any castling right.
    #[inline]
    pub const fn can_castle(self, color: Color) -> bool {
        self.can_castle_kingside(color) || self.can_castle_queenside(color)
    }

    /// Removes castling rights for a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        let mask = match color {
            Color::White => !(Self::WHITE_KINGSIDE | Self::WHITE_QUEENSIDE),
            Color::Black => !(Self::BLACK_KINGSIDE | Self::BLACK_QUEENSIDE),
        };
        self.0 &= mask;
    }

    /// Removes kingside castling for a color.
    #[inline]
    pub fn remove_kingside(&mut self, color: Color) {
        let mask = match color {
            Color::White => !Self::WHITE_KINGSIDE,
            Color::Black => !Self::BLACK_KINGSIDE,
        };
        self.0 &= mask;
    }

    /// Removes queenside castling for a color.
    #[inline]
    pub fn remove_queenside(&mut self, color: Color) {
        let mask = match color {
            Color::White => !Self::WHITE_QUEENSIDE,
            Color::Black => !Self::BLACK_QUEENSIDE,
        };
        self.0 &= mask;
    }

    /// Removes the right tied to a rook home square, if `sq` is one.
    ///
    /// Called for both the origin and destination of every move: a rook
    /// leaving home and a piece landing on a rook's home square (capturing
    /// it) both end that wing's right.
    #[inline]
    pub fn remove_for_square(&mut self, sq: Square) {
        match sq {
            Square::H1 => self.remove_kingside(Color::White),
            Square::A1 => self.remove_queenside(Color::White),
            Square::H8 => self.remove_kingside(Color::Black),
            Square::A8 => self.remove_queenside(Color::Black),
            _ => {}
        }
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }
        for (flag, c) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.0 & flag != 0 {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// Everything needed to reverse one applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRecord {
    /// The move as generated, with its flags resolved.
    pub mv: Move,
    /// The piece that moved, before any promotion.
    pub moved: Piece,
    /// The captured piece and the square it stood on (differs from the
    /// destination for en passant).
    pub captured: Option<(Piece, Square)>,
    /// Castling rights before the move.
    pub castling: CastlingRights,
    /// En passant target before the move.
    pub en_passant: Option<Square>,
    /// Halfmove clock before the move.
    pub halfmove_clock: u32,
    /// Fullmove number before the move.
    pub fullmove_number: u32,
}

/// The parts of a position that decide whether two positions repeat:
/// placement, side to move, castling rights and en passant target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionKey {
    board: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
}

/// Complete chess position state.
///
/// Placement lives only in the occupancy grid; pieces carry no coordinates.
/// The cached king squares are kept in step by [`Position::apply`] and
/// [`Position::undo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    king_squares: [Square; 2],
    halfmove_clock: u32,
    fullmove_number: u32,
    history: Vec<UndoRecord>,
}

/// Rook origin and destination for a castling move.
pub(crate) fn castling_rook_squares(color: Color, flag: MoveFlag) -> Option<(Square, Square)> {
    match (color, flag) {
        (Color::White, MoveFlag::CastleKingside) => Some((Square::H1, Square::F1)),
        (Color::White, MoveFlag::CastleQueenside) => Some((Square::A1, Square::D1)),
        (Color::Black, MoveFlag::CastleKingside) => Some((Square::H8, Square::F8)),
        (Color::Black, MoveFlag::CastleQueenside) => Some((Square::A8, Square::D8)),
        _ => None,
    }
}

#[inline]
fn idx(sq: Square) -> usize {
    sq.index() as usize
}

impl Position {
    /// Creates the standard starting position.
    pub fn new_game() -> Self {
        let mut position = Position::blank();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for color in Color::ALL {
            for (file, kind) in File::ALL.into_iter().zip(back_rank) {
                position.put(Square::new(file, color.back_rank()), Piece::new(kind, color));
                position.put(
                    Square::new(file, color.pawn_rank()),
                    Piece::new(PieceKind::Pawn, color),
                );
            }
        }
        position.king_squares = [Square::E1, Square::E8];
        position.castling = CastlingRights::ALL;
        position
    }

    /// A board with no pieces. Not a valid position until kings are placed.
    fn blank() -> Self {
        Position {
            board: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            king_squares: [Square::E1, Square::E8],
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
        }
    }

    /// Creates a position from a FEN string.
    ///
    /// Both the four-field form (no move counters) and the full six-field
    /// form are accepted. Besides syntax, the position must be playable:
    /// one king per side, no pawns on the first or last rank, castling
    /// rights backed by king and rook on their home squares, an en passant
    /// square that follows a double push, and the side not to move not in
    /// check.
    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        let parsed = FenParser::parse(fen)?;
        let mut position = Position::blank();

        for (rank_idx, rank_str) in parsed.piece_placement.split('/').enumerate() {
            let rank = 7 - rank_idx as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10) {
                    file += run as u8;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    position.put(Square::from_coords(rank, file)?, piece);
                    file += 1;
                }
            }
        }

        for color in Color::ALL {
            let king = {
                let mut kings = position
                    .pieces()
                    .filter(|(_, p)| p.is(PieceKind::King, color))
                    .map(|(sq, _)| sq);
                let king = kings.next().ok_or(PositionError::MissingKing(color))?;
                if kings.next().is_some() {
                    return Err(PositionError::ExtraKing(color).into());
                }
                king
            };
            position.king_squares[color.index()] = king;
        }

        if let Some((sq, _)) = position.pieces().find(|(sq, p)| {
            p.kind == PieceKind::Pawn && (sq.rank() == Rank::R1 || sq.rank() == Rank::R8)
        }) {
            return Err(PositionError::PawnOnBackRank(sq).into());
        }

        position.side_to_move = Color::from_fen_char(parsed.active_color)
            .ok_or_else(|| FenError::InvalidActiveColor(parsed.active_color.to_string()))?;

        let mut castling = 0u8;
        for c in parsed.castling.chars() {
            let (flag, color, rook_home) = match c {
                'K' => (CastlingRights::WHITE_KINGSIDE, Color::White, Square::H1),
                'Q' => (CastlingRights::WHITE_QUEENSIDE, Color::White, Square::A1),
                'k' => (CastlingRights::BLACK_KINGSIDE, Color::Black, Square::H8),
                'q' => (CastlingRights::BLACK_QUEENSIDE, Color::Black, Square::A8),
                _ => continue,
            };
            let king_home = Square::new(File::E, color.back_rank());
            let rook = Piece::new(PieceKind::Rook, color);
            if position.king_square(color) != king_home || position.piece_at(rook_home) != Some(rook)
            {
                return Err(PositionError::InconsistentCastling(c).into());
            }
            castling |= flag;
        }
        position.castling = CastlingRights::new(castling);

        if parsed.en_passant != "-" {
            let ep = parsed.en_passant.parse::<Square>()?;
            position.validate_en_passant(ep)?;
            position.en_passant = Some(ep);
        }

        let waiting = position.side_to_move.opposite();
        if movegen::is_king_attacked(&position, waiting) {
            return Err(PositionError::OpponentInCheck(waiting).into());
        }

        position.halfmove_clock = parsed.halfmove_clock;
        position.fullmove_number = parsed.fullmove_number;

        debug!(fen, "loaded position");
        Ok(position)
    }

    /// Checks that `ep` is the square skipped by the opponent's last move,
    /// a double pawn push.
    fn validate_en_passant(&self, ep: Square) -> Result<(), PositionError> {
        let us = self.side_to_move;
        let them = us.opposite();
        let expected_rank = match us {
            Color::White => Rank::R6,
            Color::Black => Rank::R3,
        };
        let victim = ep.offset(0, -us.pawn_direction());
        let origin = ep.offset(0, us.pawn_direction());
        let consistent = ep.rank() == expected_rank
            && self.piece_at(ep).is_none()
            && origin.is_some_and(|sq| self.piece_at(sq).is_none())
            && victim.and_then(|sq| self.piece_at(sq)) == Some(Piece::new(PieceKind::Pawn, them));
        if consistent {
            Ok(())
        } else {
            Err(PositionError::InconsistentEnPassant(ep))
        }
    }

    /// Converts the position to a FEN string, always with both counters.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in Rank::ALL.into_iter().rev() {
            let mut empty_count = 0;
            for file in File::ALL {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank != Rank::R1 {
                fen.push('/');
            }
        }

        let en_passant = match self.en_passant {
            Some(sq) => sq.to_algebraic(),
            None => "-".to_string(),
        };

        format!(
            "{} {} {} {} {} {}",
            fen,
            self.side_to_move.to_fen_char(),
            self.castling,
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Returns the piece at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board[idx(sq)]
    }

    /// Iterates all occupied squares with their pieces, from a1 to h8.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// The side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Current castling rights.
    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    /// The en passant target square, set only right after a double push.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// The square of the given color's king.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    /// Halfmove clock for the fifty-move rule.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Fullmove number (starts at 1, increments after Black's move).
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Undo records for every move applied since this position was created.
    #[inline]
    pub fn history(&self) -> &[UndoRecord] {
        &self.history
    }

    /// The most recently applied move.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|record| record.mv)
    }

    /// The repetition key of the current position.
    pub fn key(&self) -> PositionKey {
        PositionKey {
            board: self.board,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
        }
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        movegen::is_king_attacked(self, self.side_to_move)
    }

    /// All legal moves for the side to move.
    pub fn legal_moves(&mut self) -> MoveList {
        movegen::legal_moves(self)
    }

    /// Legal moves starting from one square.
    pub fn legal_moves_for(&mut self, sq: Square) -> MoveList {
        movegen::legal_moves_for(self, sq)
    }

    /// Classifies the position as ongoing or one of the terminal outcomes.
    pub fn classify(&mut self) -> Outcome {
        rules::classify(self)
    }

    /// Looks up the legal move between two squares given in algebraic
    /// notation, with an optional promotion piece.
    pub fn find_move(
        &mut self,
        from: &str,
        to: &str,
        promotion: Option<PieceKind>,
    ) -> Result<Move, EngineError> {
        let from: Square = from.parse()?;
        let to: Square = to.parse()?;
        let requested = match promotion {
            Some(kind) => Move::promoting(from, to, kind).ok_or_else(|| {
                EngineError::InvalidMove(format!("{}{} promoting to {}", from, to, kind))
            })?,
            None => Move::normal(from, to),
        };
        self.resolve(requested)
    }

    /// Finds the generated legal move equal to `mv`, carrying the correct
    /// flags.
    pub fn resolve(&mut self, mv: Move) -> Result<Move, EngineError> {
        let legal = movegen::legal_moves(self);
        match legal.iter().find(|&&m| m == mv) {
            Some(&resolved) => Ok(resolved),
            None => {
                warn!(mv = %mv, fen = %self.to_fen(), "rejected move");
                Err(EngineError::InvalidMove(mv.to_uci()))
            }
        }
    }

    /// Applies a move for the side to move.
    ///
    /// The move is matched against the legal moves by origin, destination and
    /// promotion piece; its flags are taken from the generated move, so a
    /// caller cannot desynchronize the state with wrong flags. Returns the
    /// resolved move. On error the position is unchanged.
    pub fn apply(&mut self, mv: Move) -> Result<Move, EngineError> {
        let resolved = self.resolve(mv)?;
        self.make_move(resolved);
        trace!(mv = %resolved, ply = self.history.len(), "applied move");
        Ok(resolved)
    }

    /// Reverses the most recent move and returns it.
    pub fn undo(&mut self) -> Result<Move, EngineError> {
        let mv = self.unmake_move().ok_or(EngineError::NoMoveToUndo)?;
        trace!(mv = %mv, ply = self.history.len(), "undid move");
        Ok(mv)
    }

    #[inline]
    fn put(&mut self, sq: Square, piece: Piece) {
        self.board[idx(sq)] = Some(piece);
    }

    #[inline]
    fn take(&mut self, sq: Square) -> Option<Piece> {
        self.board[idx(sq)].take()
    }

    /// Applies a generated move without checking it. Used by the legal
    /// move filter, perft and `apply`.
    pub(crate) fn make_move(&mut self, mv: Move) {
        let us = self.side_to_move;
        let them = us.opposite();
        let from = mv.from();
        let to = mv.to();

        let moved = self.take(from).expect("generated move starts on an occupied square");

        let captured = if mv.is_en_passant() {
            let victim_sq = Square::new(to.file(), from.rank());
            self.take(victim_sq).map(|p| (p, victim_sq))
        } else {
            self.take(to).map(|p| (p, to))
        };

        let landing = Piece::new(mv.promotion().unwrap_or(moved.kind), us);
        self.put(to, landing);

        if let Some((rook_from, rook_to)) = castling_rook_squares(us, mv.flag()) {
            if let Some(rook) = self.take(rook_from) {
                self.put(rook_to, rook);
            }
        }

        self.history.push(UndoRecord {
            mv,
            moved,
            captured,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        });

        if moved.kind == PieceKind::King {
            self.king_squares[us.index()] = to;
            self.castling.remove_color(us);
        }
        self.castling.remove_for_square(from);
        self.castling.remove_for_square(to);

        self.en_passant = if mv.is_double_push() {
            from.offset(0, us.pawn_direction())
        } else {
            None
        };

        if moved.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.side_to_move = them;
    }

    /// Reverses the last move from its undo record. Returns `None` when
    /// there is no history.
    pub(crate) fn unmake_move(&mut self) -> Option<Move> {
        let record = self.history.pop()?;
        let us = self.side_to_move.opposite();
        let mv = record.mv;

        self.take(mv.to());
        self.put(mv.from(), record.moved);

        if let Some((rook_from, rook_to)) = castling_rook_squares(us, mv.flag()) {
            if let Some(rook) = self.take(rook_to) {
                self.put(rook_from, rook);
            }
        }

        if let Some((piece, sq)) = record.captured {
            self.put(sq, piece);
        }

        if record.moved.kind == PieceKind::King {
            self.king_squares[us.index()] = mv.from();
        }

        self.castling = record.castling;
        self.en_passant = record.en_passant;
        self.halfmove_clock = record.halfmove_clock;
        self.fullmove_number = record.fullmove_number;
        self.side_to_move = us;

        Some(mv)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new_game()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            write!(f, "{} ", rank)?;
            for file in File::ALL {
                let c = self
                    .piece_at(Square::new(file, rank))
                    .map_or('.', Piece::to_fen_char);
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "{} to move", self.side_to_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_fen_roundtrip() {
        let pos = Position::new_game();
        assert_eq!(pos.to_fen(), FenParser::STARTPOS);
        assert_eq!(Position::from_fen(FenParser::STARTPOS).unwrap(), pos);
    }

    #[test]
    fn custom_fen_roundtrip() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn four_field_fen() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.to_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn piece_at_and_kings() {
        let pos = Position::new_game();
        assert_eq!(
            pos.piece_at(Square::E1),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            pos.piece_at(Square::D8),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
        assert_eq!(pos.piece_at(sq("e4")), None);
        assert_eq!(pos.king_square(Color::White), Square::E1);
        assert_eq!(pos.king_square(Color::Black), Square::E8);
        assert_eq!(pos.pieces().count(), 32);
    }

    #[test]
    fn castling_rights_flags() {
        let mut rights = CastlingRights::ALL;
        rights.remove_kingside(Color::White);
        assert!(!rights.can_castle_kingside(Color::White));
        assert!(rights.can_castle_queenside(Color::White));

        rights.remove_for_square(Square::A8);
        assert!(!rights.can_castle_queenside(Color::Black));
        assert!(rights.can_castle_kingside(Color::Black));

        rights.remove_color(Color::Black);
        assert!(!rights.can_castle(Color::Black));
        assert_eq!(rights.to_string(), "Q");
        assert_eq!(CastlingRights::NONE.to_string(), "-");
        assert_eq!(CastlingRights::ALL.to_string(), "KQkq");
    }

    #[test]
    fn rejects_missing_or_extra_kings() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(PositionError::MissingKing(Color::Black).into())
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/3KK3 w - - 0 1"),
            Err(PositionError::ExtraKing(Color::White).into())
        );
    }

    #[test]
    fn rejects_pawn_on_back_rank() {
        assert_eq!(
            Position::from_fen("P3k3/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(PositionError::PawnOnBackRank(Square::A8).into())
        );
    }

    #[test]
    fn rejects_castling_without_rook() {
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w K - 0 1"),
            Err(PositionError::InconsistentCastling('K').into())
        );
        assert!(Position::from_fen("r3k3/8/8/8/8/8/8/4K3 w q - 0 1").is_ok());
    }

    #[test]
    fn rejects_inconsistent_en_passant() {
        // No pawn that could have just double-pushed.
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - e3 0 1"),
            Err(PositionError::InconsistentEnPassant(sq("e3")).into())
        );
        // Wrong side to move for a rank-3 target.
        assert!(Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 w - e3 0 1").is_err());
        assert!(Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1").is_ok());
    }

    #[test]
    fn rejects_side_not_to_move_in_check() {
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4RK2 w - - 0 1"),
            Err(PositionError::OpponentInCheck(Color::Black).into())
        );
    }

    #[test]
    fn rejects_bad_syntax() {
        assert!(matches!(
            Position::from_fen("not a fen"),
            Err(EngineError::MalformedPosition(PositionError::Fen(_)))
        ));
    }

    #[test]
    fn apply_and_undo_double_push() {
        let mut pos = Position::new_game();
        let before = pos.clone();

        let applied = pos.apply(Move::normal(sq("e2"), sq("e4"))).unwrap();
        assert_eq!(applied.flag(), MoveFlag::DoublePush);
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.piece_at(sq("e2")), None);
        assert_eq!(pos.en_passant(), Some(sq("e3")));
        assert_eq!(pos.history().len(), 1);
        assert_eq!(pos.last_move(), Some(applied));

        assert_eq!(pos.undo(), Ok(applied));
        assert_eq!(pos, before);
    }

    #[test]
    fn apply_rejects_illegal_move_without_mutation() {
        let mut pos = Position::new_game();
        let before = pos.clone();
        assert_eq!(
            pos.apply(Move::normal(sq("e2"), sq("e5"))),
            Err(EngineError::InvalidMove("e2e5".to_string()))
        );
        assert_eq!(pos, before);
    }

    #[test]
    fn undo_on_empty_history() {
        let mut pos = Position::new_game();
        assert_eq!(pos.undo(), Err(EngineError::NoMoveToUndo));
    }

    #[test]
    fn counters_follow_moves() {
        let mut pos = Position::new_game();
        pos.apply(Move::normal(sq("g1"), sq("f3"))).unwrap();
        assert_eq!(pos.halfmove_clock(), 1);
        assert_eq!(pos.fullmove_number(), 1);
        pos.apply(Move::normal(sq("e7"), sq("e5"))).unwrap();
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_number(), 2);
        pos.undo().unwrap();
        assert_eq!(pos.halfmove_clock(), 1);
        assert_eq!(pos.fullmove_number(), 1);
    }

    #[test]
    fn counters_saturate_at_u32_max() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 4294967295 1").unwrap();
        assert_eq!(pos.classify(), Outcome::FiftyMoveRule);
        assert!(!pos.legal_moves().is_empty());

        pos.apply(Move::from_uci("a1a2").unwrap()).unwrap();
        assert_eq!(pos.halfmove_clock(), u32::MAX);
        pos.undo().unwrap();
        assert_eq!(pos.halfmove_clock(), u32::MAX);

        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 4294967295").unwrap();
        let before = pos.clone();
        pos.apply(Move::from_uci("e8d8").unwrap()).unwrap();
        assert_eq!(pos.fullmove_number(), u32::MAX);
        pos.undo().unwrap();
        assert_eq!(pos, before);
    }

    #[test]
    fn find_move_parses_squares() {
        let mut pos = Position::new_game();
        let mv = pos.find_move("g1", "f3", None).unwrap();
        assert_eq!(mv, Move::normal(Square::G1, sq("f3")));

        assert!(matches!(
            pos.find_move("z9", "f3", None),
            Err(EngineError::InvalidSquare(_))
        ));
        assert!(matches!(
            pos.find_move("g1", "g3", None),
            Err(EngineError::InvalidMove(_))
        ));
        assert!(matches!(
            pos.find_move("e2", "e4", Some(PieceKind::King)),
            Err(EngineError::InvalidMove(_))
        ));
    }

    #[test]
    fn display_board() {
        let text = Position::new_game().to_string();
        assert!(text.starts_with("8  r n b q k b n r"));
        assert!(text.contains("1  R N B Q K B N R"));
        assert!(text.ends_with("White to move"));
    }
}
