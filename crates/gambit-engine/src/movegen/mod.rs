//! Move generation.
//!
//! Moves are first generated pseudo-legally (following piece movement rules
//! but ignoring self-check), then filtered by applying each candidate,
//! testing whether the mover's king is attacked, and undoing it.

mod attacks;
pub mod perft;

use gambit_core::{Color, Move, MoveFlag, PieceKind, Square};

use crate::position::castling_rook_squares;
use crate::Position;

pub use attacks::{is_king_attacked, is_square_attacked};
use attacks::{ray, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves the list can hold.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Iterates the moves.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Returns true if a move equal to `m` is in the list.
    pub fn contains(&self, m: Move) -> bool {
        self.iter().any(|&other| other == m)
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates pseudo-legal moves for every piece of `color`.
///
/// Pawn en passant captures are only produced when `color` is the side to
/// move, since the en passant target belongs to the player about to move.
pub fn pseudo_legal_moves(position: &Position, color: Color) -> MoveList {
    let mut moves = MoveList::new();
    for (from, piece) in position.pieces() {
        if piece.color == color {
            generate_piece_moves(position, from, piece.kind, color, &mut moves);
        }
    }
    moves
}

/// Generates pseudo-legal moves for the piece on `sq`. Empty if the square
/// is empty.
pub fn pseudo_legal_moves_from(position: &Position, sq: Square) -> MoveList {
    let mut moves = MoveList::new();
    if let Some(piece) = position.piece_at(sq) {
        generate_piece_moves(position, sq, piece.kind, piece.color, &mut moves);
    }
    moves
}

fn generate_piece_moves(
    position: &Position,
    from: Square,
    kind: PieceKind,
    color: Color,
    moves: &mut MoveList,
) {
    match kind {
        PieceKind::Pawn => generate_pawn_moves(position, from, color, moves),
        PieceKind::Knight => generate_step_moves(position, from, color, &KNIGHT_OFFSETS, moves),
        PieceKind::Bishop => generate_slider_moves(position, from, color, &BISHOP_DIRECTIONS, moves),
        PieceKind::Rook => generate_slider_moves(position, from, color, &ROOK_DIRECTIONS, moves),
        PieceKind::Queen => {
            generate_slider_moves(position, from, color, &ROOK_DIRECTIONS, moves);
            generate_slider_moves(position, from, color, &BISHOP_DIRECTIONS, moves);
        }
        PieceKind::King => {
            generate_step_moves(position, from, color, &KING_OFFSETS, moves);
            generate_castling_moves(position, from, color, moves);
        }
    }
}

/// Pushes a pawn move, expanding it into all four promotions on the last rank.
fn push_pawn_move(from: Square, to: Square, color: Color, moves: &mut MoveList) {
    if to.rank() == color.promotion_rank() {
        for kind in PieceKind::PROMOTIONS {
            if let Some(m) = Move::promoting(from, to, kind) {
                moves.push(m);
            }
        }
    } else {
        moves.push(Move::normal(from, to));
    }
}

/// Generates pseudo-legal pawn moves.
fn generate_pawn_moves(position: &Position, from: Square, color: Color, moves: &mut MoveList) {
    let dir = color.pawn_direction();

    // Pushes
    if let Some(one) = from.offset(0, dir).filter(|&sq| position.piece_at(sq).is_none()) {
        push_pawn_move(from, one, color, moves);
        if from.rank() == color.pawn_rank() {
            if let Some(two) = one.offset(0, dir).filter(|&sq| position.piece_at(sq).is_none()) {
                moves.push(Move::new(from, two, MoveFlag::DoublePush));
            }
        }
    }

    // Captures
    for df in [-1, 1] {
        let Some(to) = from.offset(df, dir) else {
            continue;
        };
        match position.piece_at(to) {
            Some(target) if target.color != color => push_pawn_move(from, to, color, moves),
            None if position.en_passant() == Some(to) && position.side_to_move() == color => {
                moves.push(Move::new(from, to, MoveFlag::EnPassant));
            }
            _ => {}
        }
    }
}

/// Generates single-step moves for knights and kings.
fn generate_step_moves(
    position: &Position,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(df, dr) in offsets {
        if let Some(to) = from.offset(df, dr) {
            if position.piece_at(to).map_or(true, |p| p.color != color) {
                moves.push(Move::normal(from, to));
            }
        }
    }
}

/// Generates ray moves for bishops, rooks and queens.
fn generate_slider_moves(
    position: &Position,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &dir in directions {
        for to in ray(from, dir) {
            match position.piece_at(to) {
                None => moves.push(Move::normal(from, to)),
                Some(p) => {
                    if p.color != color {
                        moves.push(Move::normal(from, to));
                    }
                    break;
                }
            }
        }
    }
}

/// Castling lanes: (flag, king destination, squares that must be empty,
/// squares the king crosses that must not be attacked).
fn castling_lanes(color: Color) -> [(MoveFlag, Square, &'static [Square], &'static [Square]); 2] {
    match color {
        Color::White => [
            (
                MoveFlag::CastleKingside,
                Square::G1,
                &[Square::F1, Square::G1],
                &[Square::F1, Square::G1],
            ),
            (
                MoveFlag::CastleQueenside,
                Square::C1,
                &[Square::B1, Square::C1, Square::D1],
                &[Square::D1, Square::C1],
            ),
        ],
        Color::Black => [
            (
                MoveFlag::CastleKingside,
                Square::G8,
                &[Square::F8, Square::G8],
                &[Square::F8, Square::G8],
            ),
            (
                MoveFlag::CastleQueenside,
                Square::C8,
                &[Square::B8, Square::C8, Square::D8],
                &[Square::D8, Square::C8],
            ),
        ],
    }
}

/// Generates castling moves if the right is held, the rook is home, the
/// lane is clear, and the king is not in, through, or into check.
fn generate_castling_moves(position: &Position, from: Square, color: Color, moves: &mut MoveList) {
    let rights = position.castling_rights();
    if !rights.can_castle(color) || from != position.king_square(color) {
        return;
    }

    let them = color.opposite();
    if is_square_attacked(position, from, them) {
        return;
    }

    for (flag, to, empty, transit) in castling_lanes(color) {
        let held = match flag {
            MoveFlag::CastleKingside => rights.can_castle_kingside(color),
            _ => rights.can_castle_queenside(color),
        };
        if !held {
            continue;
        }
        let rook_home = castling_rook_squares(color, flag).map(|(rook_from, _)| rook_from);
        let rook_present = rook_home
            .and_then(|sq| position.piece_at(sq))
            .is_some_and(|p| p.is(PieceKind::Rook, color));
        if rook_present
            && empty.iter().all(|&sq| position.piece_at(sq).is_none())
            && transit.iter().all(|&sq| !is_square_attacked(position, sq, them))
        {
            moves.push(Move::new(from, to, flag));
        }
    }
}

/// Returns true if applying `m` leaves the mover's own king attacked.
fn leaves_king_attacked(position: &mut Position, m: Move) -> bool {
    let us = position.side_to_move();
    position.make_move(m);
    let attacked = is_king_attacked(position, us);
    position.unmake_move();
    attacked
}

/// Generates all legal moves for the side to move.
///
/// The position is used as scratch space and is restored before returning.
pub fn legal_moves(position: &mut Position) -> MoveList {
    let mut moves = pseudo_legal_moves(position, position.side_to_move());
    moves.retain(|&m| !leaves_king_attacked(position, m));
    moves
}

/// Generates legal moves for the piece on `sq`. Empty when the square is
/// empty or holds a piece of the side not to move.
pub fn legal_moves_for(position: &mut Position, sq: Square) -> MoveList {
    match position.piece_at(sq) {
        Some(p) if p.color == position.side_to_move() => {
            let mut moves = pseudo_legal_moves_from(position, sq);
            moves.retain(|&m| !leaves_king_attacked(position, m));
            moves
        }
        _ => MoveList::new(),
    }
}

/// Returns true if the side to move has at least one legal move. Stops at
/// the first one found.
pub fn has_legal_move(position: &mut Position) -> bool {
    let moves = pseudo_legal_moves(position, position.side_to_move());
    moves.iter().any(|&m| !leaves_king_attacked(position, m))
}
