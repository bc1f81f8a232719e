//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use super::legal_moves;
use crate::Position;

/// Counts the number of leaf nodes at the given depth.
///
/// Walks the tree in place with make/unmake; the position is restored when
/// this returns.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(position);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &m in &moves {
        position.make_move(m);
        nodes += perft(position, depth - 1);
        position.unmake_move();
    }
    nodes
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let moves = legal_moves(position);
    let mut results = Vec::with_capacity(moves.len());

    for &m in &moves {
        position.make_move(m);
        let nodes = if depth > 1 {
            perft(position, depth - 1)
        } else {
            1
        };
        position.unmake_move();
        results.push((m.to_uci(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
