//! Worked rule scenarios, one per documented behaviour.

use crate::domain::board::{Color, Team};
use crate::domain::engine;
use crate::domain::state::{Clue, GameState};
use crate::domain::test_gens::{fixed_board, index_of, with_clue};
use crate::errors::domain::{DomainError, ValidationKind};

#[test]
fn scenario_clue_on_fresh_board() {
    let state = GameState::new(fixed_board());
    assert_eq!(state.current_team, Team::Red);

    let next = engine::submit_clue(&state, "FRUIT", 2).unwrap();
    assert_eq!(next.guesses_remaining, 3);
    assert_eq!(
        next.current_clue,
        Some(Clue {
            word: "FRUIT".into(),
            count: 2
        })
    );
}

#[test]
fn scenario_last_red_agent_wins() {
    let mut state = with_clue(GameState::new(fixed_board()), "FRUIT", 2);
    for _ in 0..8 {
        let i = index_of(&state, Color::Red, 0);
        state.board[i].revealed = true;
    }
    state.red_remaining = 1;
    assert_eq!(state.guesses_remaining, 3);
    assert!(state.check_invariants().is_ok());

    let last = index_of(&state, Color::Red, 0);
    let next = engine::reveal_cell(&state, last).unwrap();
    assert_eq!(next.red_remaining, 0);
    assert_eq!(next.winner, Some(Team::Red));
    assert!(next.check_invariants().is_ok());
}

#[test]
fn scenario_neutral_ends_turn() {
    let state = with_clue(GameState::new(fixed_board()), "FRUIT", 2);
    let neutral = index_of(&state, Color::Neutral, 0);
    let next = engine::reveal_cell(&state, neutral).unwrap();
    assert_eq!(next.current_team, Team::Blue);
    assert_eq!(next.current_clue, None);
    assert_eq!(next.guesses_remaining, 0);
    assert_eq!(next.red_remaining, state.red_remaining);
    assert_eq!(next.blue_remaining, state.blue_remaining);
}

#[test]
fn scenario_blue_hits_assassin() {
    let state = GameState::new(fixed_board());
    let state = engine::end_turn(&state).unwrap();
    let state = with_clue(state, "OCEAN", 1);
    assert_eq!(state.current_team, Team::Blue);

    let assassin = index_of(&state, Color::Assassin, 0);
    let next = engine::reveal_cell(&state, assassin).unwrap();
    assert_eq!(next.winner, Some(Team::Red));
    assert_eq!(next.red_remaining, 9);
    assert_eq!(next.blue_remaining, 8);
}

#[test]
fn scenario_double_clue_rejected() {
    let state = with_clue(GameState::new(fixed_board()), "FRUIT", 2);
    let before = state.clone();
    let err = engine::submit_clue(&state, "VEGETABLE", 1).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::ClueAlreadyActive, _)
    ));
    assert!(err.is_invalid_action());
    assert_eq!(state, before);
}

#[test]
fn state_survives_json_round_trip() {
    let state = with_clue(GameState::new(fixed_board()), "FRUIT", 2);
    let blue = index_of(&state, Color::Blue, 0);
    let state = engine::reveal_cell(&state, blue).unwrap();

    let json = serde_json::to_string(&state).unwrap();
    let back: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
    assert_eq!(
        back.board.iter().map(|c| &c.word).collect::<Vec<_>>(),
        state.board.iter().map(|c| &c.word).collect::<Vec<_>>()
    );
}
