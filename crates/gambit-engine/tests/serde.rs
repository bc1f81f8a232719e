#![cfg(feature = "serde")]

use gambit_engine::{Outcome, Position};

#[test]
fn outcome_round_trips_through_json() {
    let mut position = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let outcome = position.classify();

    let json = serde_json::to_string(&outcome).unwrap();
    assert_eq!(json, r#""Stalemate""#);
    assert_eq!(serde_json::from_str::<Outcome>(&json).unwrap(), outcome);
}
