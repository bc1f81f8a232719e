//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1", "Qh4#"

use gambit_core::{File, Move, MoveFlag, PieceKind, Rank, Square};
use thiserror::Error;

use crate::movegen::{self, MoveList};
use crate::Position;

/// Error type for SAN parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanError {
    #[error("empty SAN string")]
    Empty,

    #[error("invalid SAN format: {0}")]
    InvalidFormat(String),

    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),

    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// Converts a move to SAN notation.
///
/// `position` must be the state before the move, and `m` one of its legal
/// moves. The position is used as scratch space to decide the check suffix
/// and is restored before returning.
pub fn move_to_san(position: &mut Position, m: Move) -> String {
    let mut san = match m.flag() {
        MoveFlag::CastleKingside => "O-O".to_string(),
        MoveFlag::CastleQueenside => "O-O-O".to_string(),
        _ => piece_move_san(position, m),
    };

    position.make_move(m);
    if position.is_check() {
        san.push(if movegen::has_legal_move(position) { '+' } else { '#' });
    }
    position.unmake_move();

    san
}

fn piece_move_san(position: &mut Position, m: Move) -> String {
    let from = m.from();
    let to = m.to();
    let kind = position
        .piece_at(from)
        .map_or(PieceKind::Pawn, |p| p.kind);
    let is_capture = position.piece_at(to).is_some() || m.is_en_passant();

    let mut san = String::new();
    if kind == PieceKind::Pawn {
        if is_capture {
            san.push(from.file().to_char());
        }
    } else {
        san.push(kind.to_char().to_ascii_uppercase());
        san.push_str(&disambiguation(position, m, kind));
    }
    if is_capture {
        san.push('x');
    }
    san.push_str(&to.to_algebraic());
    if let Some(promo) = m.promotion() {
        san.push('=');
        san.push(promo.to_char().to_ascii_uppercase());
    }
    san
}

/// The origin file, rank or square needed to tell `m` apart from other moves
/// of the same piece kind to the same destination.
fn disambiguation(position: &mut Position, m: Move, kind: PieceKind) -> String {
    let from = m.from();
    let rivals: Vec<Square> = movegen::legal_moves(position)
        .iter()
        .filter(|o| o.to() == m.to() && o.from() != from)
        .filter(|o| position.piece_at(o.from()).is_some_and(|p| p.kind == kind))
        .map(|o| o.from())
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.file() != from.file()) {
        from.file().to_string()
    } else if rivals.iter().all(|sq| sq.rank() != from.rank()) {
        from.rank().to_string()
    } else {
        from.to_algebraic()
    }
}

/// Parsed components of a SAN string.
#[derive(Debug, PartialEq, Eq)]
struct ParsedSan {
    kind: PieceKind,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Square,
    promotion: Option<PieceKind>,
}

/// Parses a SAN string and returns the corresponding legal move.
///
/// Check and annotation suffixes (`+`, `#`, `!`, `?`) are ignored, and
/// castling may be written with letter O or digit 0.
pub fn san_to_move(position: &mut Position, san: &str) -> Result<Move, SanError> {
    let trimmed = san.trim().trim_end_matches(['+', '#', '!', '?']);
    if trimmed.is_empty() {
        return Err(SanError::Empty);
    }

    let legal = movegen::legal_moves(position);

    let castle = match trimmed {
        "O-O" | "0-0" => Some(MoveFlag::CastleKingside),
        "O-O-O" | "0-0-0" => Some(MoveFlag::CastleQueenside),
        _ => None,
    };
    if let Some(flag) = castle {
        return legal
            .iter()
            .find(|m| m.flag() == flag)
            .copied()
            .ok_or_else(|| SanError::NoMatchingMove(trimmed.to_string()));
    }

    let parsed = parse_components(trimmed)?;
    find_matching_move(position, &legal, &parsed, trimmed)
}

fn parse_components(san: &str) -> Result<ParsedSan, SanError> {
    let invalid = || SanError::InvalidFormat(san.to_string());

    let (kind, rest) = match san.chars().next() {
        Some(c @ ('N' | 'B' | 'R' | 'Q' | 'K')) => {
            let kind = PieceKind::from_char(c).ok_or_else(invalid)?;
            (kind, &san[1..])
        }
        _ => (PieceKind::Pawn, san),
    };

    // The `=` before a promotion piece is optional ("e8=Q" or "e8Q").
    let (body, promo) = match rest.split_once('=') {
        Some((body, promo)) => (body, Some(promo)),
        None => match rest.char_indices().last() {
            Some((i, c)) if kind == PieceKind::Pawn && c.is_ascii_uppercase() => {
                (&rest[..i], Some(&rest[i..]))
            }
            _ => (rest, None),
        },
    };
    let promotion = match promo {
        Some(promo) => {
            let mut chars = promo.chars();
            let kind = match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_uppercase() => PieceKind::from_char(c)
                    .filter(|k| k.is_promotion_target())
                    .ok_or_else(invalid)?,
                _ => return Err(invalid()),
            };
            Some(kind)
        }
        None => None,
    };

    let squares: Vec<char> = body.chars().filter(|&c| c != 'x').collect();
    if squares.len() < 2 || squares.len() > 4 {
        return Err(invalid());
    }
    let (origin, dest) = squares.split_at(squares.len() - 2);

    let to = Square::new(
        lower_file(dest[0]).ok_or_else(invalid)?,
        Rank::from_char(dest[1]).ok_or_else(invalid)?,
    );

    let (from_file, from_rank) = match origin {
        [] => (None, None),
        &[c] => match (lower_file(c), Rank::from_char(c)) {
            (Some(f), _) => (Some(f), None),
            (None, Some(r)) => (None, Some(r)),
            (None, None) => return Err(invalid()),
        },
        &[f, r] => (
            Some(lower_file(f).ok_or_else(invalid)?),
            Some(Rank::from_char(r).ok_or_else(invalid)?),
        ),
        _ => return Err(invalid()),
    };

    Ok(ParsedSan {
        kind,
        from_file,
        from_rank,
        to,
        promotion,
    })
}

/// Files in SAN are lowercase; uppercase letters name pieces.
fn lower_file(c: char) -> Option<File> {
    if c.is_ascii_lowercase() {
        File::from_char(c)
    } else {
        None
    }
}

fn find_matching_move(
    position: &Position,
    legal: &MoveList,
    parsed: &ParsedSan,
    san: &str,
) -> Result<Move, SanError> {
    let mut matching = legal.iter().copied().filter(|m| {
        m.to() == parsed.to
            && m.promotion() == parsed.promotion
            && position
                .piece_at(m.from())
                .is_some_and(|p| p.kind == parsed.kind)
            && parsed.from_file.map_or(true, |f| m.from().file() == f)
            && parsed.from_rank.map_or(true, |r| m.from().rank() == r)
    });

    match (matching.next(), matching.next()) {
        (Some(m), None) => Ok(m),
        (None, _) => Err(SanError::NoMatchingMove(san.to_string())),
        (Some(_), Some(_)) => Err(SanError::AmbiguousMove(san.to_string())),
    }
}
