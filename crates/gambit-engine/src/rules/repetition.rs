//! Repetition detection over the undo history.

use crate::Position;

/// Counts how many times the current position has occurred, itself
/// included.
///
/// Earlier positions are rebuilt by unwinding a scratch copy, so the live
/// position is never touched. The walk stops after `halfmove_clock` plies:
/// a pawn move or capture cannot be reversed, so nothing before it can
/// match.
pub fn repetition_count(position: &Position) -> usize {
    let reversible = (position.halfmove_clock() as usize).min(position.history().len());
    if reversible < 4 {
        return 1;
    }

    let target = position.key();
    let mut scratch = position.clone();
    let mut count = 1;
    for _ in 0..reversible {
        if scratch.unmake_move().is_none() {
            break;
        }
        if scratch.key() == target {
            count += 1;
        }
    }
    count
}

/// Returns true if the current position has occurred at least three times.
pub fn is_threefold_repetition(position: &Position) -> bool {
    repetition_count(position) >= 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use gambit_core::Move;

    fn play(position: &mut Position, uci: &str) {
        let mv = Move::from_uci(uci).unwrap();
        position.apply(mv).unwrap();
    }

    #[test]
    fn fresh_position_occurs_once() {
        assert_eq!(repetition_count(&Position::new_game()), 1);
    }

    #[test]
    fn knight_shuffle_repeats() {
        let mut position = Position::new_game();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

        for uci in shuffle {
            play(&mut position, uci);
        }
        assert_eq!(repetition_count(&position), 2);
        assert!(!is_threefold_repetition(&position));

        for uci in shuffle {
            play(&mut position, uci);
        }
        assert_eq!(repetition_count(&position), 3);
        assert!(is_threefold_repetition(&position));
    }

    #[test]
    fn scan_leaves_position_untouched() {
        let mut position = Position::new_game();
        for uci in ["b1c3", "b8c6", "c3b1", "c6b8"] {
            play(&mut position, uci);
        }
        let before = position.clone();
        repetition_count(&position);
        assert_eq!(position, before);
    }

    #[test]
    fn irreversible_move_resets_the_count() {
        let mut position = Position::new_game();
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8", "e2e3", "e7e6"] {
            play(&mut position, uci);
        }
        // Long history, but nothing since the pawn moves to look back on.
        assert_eq!(repetition_count(&position), 1);

        for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            play(&mut position, uci);
        }
        assert_eq!(repetition_count(&position), 2);
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            play(&mut position, uci);
        }
        assert_eq!(repetition_count(&position), 3);
    }

    #[test]
    fn en_passant_target_is_part_of_the_key() {
        let mut position = Position::new_game();
        for uci in ["e2e4", "e7e5", "g1f3", "g8f6", "f3g1", "f6g8"] {
            play(&mut position, uci);
        }
        // Same placement as after e7e5, but the e6 target has expired.
        assert_eq!(repetition_count(&position), 1);

        for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            play(&mut position, uci);
        }
        assert_eq!(repetition_count(&position), 2);
    }

    #[test]
    fn lost_castling_rights_break_repetition() {
        let mut position =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        for uci in ["e1f1", "e8f8", "f1e1", "f8e8"] {
            play(&mut position, uci);
        }
        // Same placement, but both sides have lost their castling rights.
        assert_eq!(repetition_count(&position), 1);
        for uci in ["e1f1", "e8f8", "f1e1", "f8e8"] {
            play(&mut position, uci);
        }
        assert_eq!(repetition_count(&position), 2);
    }
}
