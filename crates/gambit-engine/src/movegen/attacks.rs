//! Attack detection by scanning outward from the target square.

use gambit_core::{Color, PieceKind, Square};

use crate::Position;

/// Knight jumps as (file, rank) deltas.
pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// King steps as (file, rank) deltas.
pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Orthogonal ray directions.
pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Diagonal ray directions.
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Iterates the squares along a ray from `from` (exclusive) to the board edge.
pub(crate) fn ray(from: Square, (df, dr): (i8, i8)) -> impl Iterator<Item = Square> {
    std::iter::successors(from.offset(df, dr), move |sq| sq.offset(df, dr))
}

/// Returns true if any piece of `by` attacks `sq`.
///
/// Attacks are counted whether or not `sq` is occupied, and regardless of
/// whether moving the attacker would be legal.
pub fn is_square_attacked(position: &Position, sq: Square, by: Color) -> bool {
    let attacker = |target: Option<Square>, kinds: &[PieceKind]| {
        target
            .and_then(|t| position.piece_at(t))
            .is_some_and(|p| p.color == by && kinds.contains(&p.kind))
    };

    // A pawn of `by` attacks diagonally forward, so look one rank behind
    // `sq` from its point of view.
    let back = -by.pawn_direction();
    if attacker(sq.offset(-1, back), &[PieceKind::Pawn])
        || attacker(sq.offset(1, back), &[PieceKind::Pawn])
    {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(df, dr)| attacker(sq.offset(df, dr), &[PieceKind::Knight]))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(df, dr)| attacker(sq.offset(df, dr), &[PieceKind::King]))
    {
        return true;
    }

    let slider_hits = |directions: &[(i8, i8)], kinds: &[PieceKind]| {
        directions.iter().any(|&dir| {
            ray(sq, dir)
                .find_map(|t| position.piece_at(t))
                .is_some_and(|p| p.color == by && kinds.contains(&p.kind))
        })
    };

    slider_hits(&ROOK_DIRECTIONS, &[PieceKind::Rook, PieceKind::Queen])
        || slider_hits(&BISHOP_DIRECTIONS, &[PieceKind::Bishop, PieceKind::Queen])
}

/// Returns true if the king of the given color is attacked.
pub fn is_king_attacked(position: &Position, king_color: Color) -> bool {
    is_square_attacked(
        position,
        position.king_square(king_color),
        king_color.opposite(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_attacks() {
        let position = Position::new_game();

        assert!(is_square_attacked(&position, sq("e3"), Color::White));
        assert!(is_square_attacked(&position, sq("f3"), Color::White));
        assert!(!is_square_attacked(&position, sq("e4"), Color::White));
        assert!(is_square_attacked(&position, sq("c6"), Color::Black));
        assert!(!is_square_attacked(&position, sq("e5"), Color::Black));
        assert!(!is_king_attacked(&position, Color::White));
        assert!(!is_king_attacked(&position, Color::Black));
    }

    #[test]
    fn pawns_attack_diagonally_forward() {
        let position = Position::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();

        assert!(is_square_attacked(&position, sq("d5"), Color::White));
        assert!(is_square_attacked(&position, sq("f5"), Color::White));
        assert!(!is_square_attacked(&position, sq("e5"), Color::White));
        assert!(!is_square_attacked(&position, sq("d3"), Color::White));

        assert!(is_square_attacked(&position, sq("e4"), Color::Black));
        assert!(is_square_attacked(&position, sq("c4"), Color::Black));
        assert!(!is_square_attacked(&position, sq("d6"), Color::Black));
    }

    #[test]
    fn sliders_are_blocked() {
        let position = Position::from_fen("4k3/8/8/8/R2P3q/8/8/4K3 w - - 0 1").unwrap();

        assert!(is_square_attacked(&position, sq("c4"), Color::White));
        assert!(is_square_attacked(&position, sq("d4"), Color::White));
        assert!(!is_square_attacked(&position, sq("e4"), Color::White));
        assert!(is_square_attacked(&position, sq("a8"), Color::White));

        // The queen sees along the rank up to the pawn and down the diagonal.
        assert!(is_square_attacked(&position, sq("d4"), Color::Black));
        assert!(!is_square_attacked(&position, sq("c4"), Color::Black));
        assert!(is_square_attacked(&position, sq("e1"), Color::Black));
    }

    #[test]
    fn knight_and_king_attacks() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").unwrap();

        assert!(is_square_attacked(&position, sq("b3"), Color::White));
        assert!(is_square_attacked(&position, sq("c2"), Color::White));
        assert!(!is_square_attacked(&position, sq("b2"), Color::White));
        assert!(is_square_attacked(&position, sq("d2"), Color::White));
        assert!(is_square_attacked(&position, sq("f1"), Color::White));
        assert!(is_square_attacked(&position, sq("d7"), Color::Black));
    }

    #[test]
    fn king_in_check() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
        assert!(is_king_attacked(&position, Color::White));
        assert!(position.is_check());
    }
}
