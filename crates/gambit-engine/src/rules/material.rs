//! Insufficient material detection.

use gambit_core::{PieceKind, Square};

use crate::Position;

/// Returns true if neither side can deliver checkmate with the material on
/// the board.
///
/// Recognised cases: bare kings, king and one minor piece against a bare
/// king, and king and bishop against king and bishop with both bishops on
/// squares of the same color. Everything else, including king and bishop
/// against king and knight, counts as sufficient.
pub fn is_insufficient_material(position: &Position) -> bool {
    // Non-king pieces as (kind, square); more than two always suffices.
    let mut others: [Option<(PieceKind, Square)>; 2] = [None; 2];
    let mut count = 0;

    for (sq, piece) in position.pieces() {
        match piece.kind {
            PieceKind::King => {}
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            kind => {
                if count == others.len() {
                    return false;
                }
                others[count] = Some((kind, sq));
                count += 1;
            }
        }
    }

    match others {
        [None, None] => true,
        [Some(_), None] => true,
        [Some((PieceKind::Bishop, a)), Some((PieceKind::Bishop, b))] => {
            let colors_differ = position.piece_at(a).map(|p| p.color)
                != position.piece_at(b).map(|p| p.color);
            colors_differ && a.is_light() == b.is_light()
        }
        _ => false,
    }
}
