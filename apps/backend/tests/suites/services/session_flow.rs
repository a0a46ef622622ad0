use std::sync::Arc;

use backend_test_support::unique_helpers::unique_game_id;
use codenames_backend::domain::board::{Color, Team};
use codenames_backend::domain::game_transition::GameTransition;
use codenames_backend::errors::ErrorCode;
use codenames_backend::repos::{GameStore, MemoryGameStore};
use codenames_backend::ws::GameHub;
use codenames_backend::{GameSessionService, SessionConfig};

use crate::common::hidden_index;
use crate::support::stores::{DownStore, FailingNotifier};
use crate::support::{service_with, ScriptedGenerator};

fn memory_service() -> (GameSessionService, Arc<MemoryGameStore>, Arc<GameHub>) {
    let store = Arc::new(MemoryGameStore::new());
    let hub = Arc::new(GameHub::default());
    let service = service_with(
        store.clone(),
        hub.clone(),
        Arc::new(ScriptedGenerator::failing()),
    );
    (service, store, hub)
}

#[tokio::test]
async fn create_or_join_creates_once_then_joins() {
    let (service, store, _) = memory_service();
    let id = unique_game_id("join");

    let created = service.create_or_join(&id).await.unwrap();
    assert_eq!(created.version, 1);
    assert_eq!(created.state.current_team, Team::Red);
    assert_eq!(created.state.red_remaining, 9);
    assert_eq!(created.state.blue_remaining, 8);
    created.state.check_invariants().unwrap();

    let joined = service.create_or_join(&id.to_uppercase()).await.unwrap();
    assert_eq!(joined, created);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn seeded_boards_are_reproducible_per_game_id() {
    let (a, _, _) = memory_service();
    let (b, _, _) = memory_service();

    let first = a.create_or_join("same-game").await.unwrap();
    let second = b.create_or_join("same-game").await.unwrap();
    assert_eq!(first.state.board, second.state.board);

    let other = a.create_or_join("other-game").await.unwrap();
    assert_ne!(first.state.board, other.state.board);
}

#[tokio::test]
async fn create_game_generates_a_code() {
    let (service, store, _) = memory_service();
    let record = service.create_game().await.unwrap();

    let parts: Vec<&str> = record.id.split('-').collect();
    assert!(parts.len() >= 2, "unexpected code {}", record.id);
    assert!(store.find(&record.id).await.unwrap().is_some());
}

#[tokio::test]
async fn create_game_survives_code_collisions() {
    let (service, store, _) = memory_service();
    // 10 adjectives x 10 nouns: later codes must collide and fall back to suffixes.
    for _ in 0..120 {
        service.create_game().await.unwrap();
    }
    assert_eq!(store.len(), 120);
}

#[tokio::test]
async fn invalid_game_id_is_rejected_before_the_store() {
    let service = service_with(
        Arc::new(DownStore),
        Arc::new(GameHub::default()),
        Arc::new(ScriptedGenerator::failing()),
    );
    let err = service.create_or_join("not valid!").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidGameId);
    assert_eq!(err.status().as_u16(), 400);
}

#[tokio::test]
async fn small_word_pool_creates_nothing() {
    let store = Arc::new(MemoryGameStore::new());
    let service = GameSessionService::new(
        store.clone(),
        Arc::new(GameHub::default()),
        Arc::new(ScriptedGenerator::failing()),
        (0..24).map(|i| format!("WORD{i}")).collect(),
        SessionConfig::default(),
    );

    let err = service.create_or_join("tiny-pool").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsufficientWords);
    assert!(store.is_empty());
}

#[tokio::test]
async fn unknown_game_is_not_found() {
    let (service, _, _) = memory_service();
    let err = service.reveal("missing-game", 0, None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameNotFound);
    assert_eq!(err.status().as_u16(), 404);
}

#[tokio::test]
async fn clue_then_guesses_play_out_a_turn() {
    let (service, _, _) = memory_service();
    let id = unique_game_id("turn");
    service.create_or_join(&id).await.unwrap();

    let clue = service.submit_clue(&id, "  fruit ", 1, None).await.unwrap();
    assert_eq!(clue.record.version, 2);
    assert_eq!(clue.record.state.guesses_remaining, 2);
    assert_eq!(
        clue.transitions,
        vec![GameTransition::ClueGiven {
            word: "FRUIT".into(),
            count: 1
        }]
    );

    let red = hidden_index(&clue.record.state, Color::Red, 0);
    let first = service.reveal(&id, red, None).await.unwrap();
    assert_eq!(first.record.state.red_remaining, 8);
    assert_eq!(first.record.state.guesses_remaining, 1);
    assert_eq!(first.record.state.current_team, Team::Red);

    let red = hidden_index(&first.record.state, Color::Red, 0);
    let second = service.reveal(&id, red, None).await.unwrap();
    assert_eq!(second.record.state.current_team, Team::Blue);
    assert!(second.record.state.current_clue.is_none());
    assert!(second
        .transitions
        .contains(&GameTransition::TurnPassed { to: Team::Blue }));
    assert_eq!(second.record.version, 4);
}

#[tokio::test]
async fn rule_violations_leave_the_record_untouched() {
    let (service, store, _) = memory_service();
    let id = unique_game_id("rules");
    service.create_or_join(&id).await.unwrap();

    let err = service.reveal(&id, 0, None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoActiveClue);
    assert_eq!(err.status().as_u16(), 409);

    service.submit_clue(&id, "ONE", 1, None).await.unwrap();
    let err = service.submit_clue(&id, "TWO", 1, None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ClueAlreadyActive);

    let err = service.reveal(&id, 25, None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::CellOutOfRange);
    assert_eq!(err.status().as_u16(), 400);

    let stored = store.find(&id).await.unwrap().unwrap();
    assert_eq!(stored.version, 2);
}

#[tokio::test]
async fn empty_manual_clue_is_rejected() {
    let (service, _, _) = memory_service();
    let id = unique_game_id("empty");
    service.create_or_join(&id).await.unwrap();

    let err = service.submit_clue(&id, "   ", 2, None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::EmptyClueWord);
}

#[tokio::test]
async fn manual_counts_outside_the_board_are_rejected() {
    let (service, store, _) = memory_service();
    let id = unique_game_id("count");
    let created = service.create_or_join(&id).await.unwrap();

    for count in [-1, 26, 3_000_000_000] {
        let err = service.submit_clue(&id, "ANIMAL", count, None).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidClueCount);
    }

    let stored = store.find(&id).await.unwrap().unwrap();
    assert_eq!(stored, created);

    let outcome = service.submit_clue(&id, "ZERO", 0, None).await.unwrap();
    assert_eq!(outcome.record.state.guesses_remaining, 1);
}

#[tokio::test]
async fn assassin_ends_the_game_and_freezes_it() {
    let (service, _, _) = memory_service();
    let id = unique_game_id("assassin");
    let created = service.create_or_join(&id).await.unwrap();

    service.submit_clue(&id, "DANGER", 3, None).await.unwrap();
    let assassin = hidden_index(&created.state, Color::Assassin, 0);
    let outcome = service.reveal(&id, assassin, None).await.unwrap();
    assert_eq!(outcome.record.state.winner, Some(Team::Blue));
    assert!(outcome
        .transitions
        .contains(&GameTransition::GameWon { winner: Team::Blue }));

    for err in [
        service.end_turn(&id, None).await.unwrap_err(),
        service.reveal(&id, 0, None).await.unwrap_err(),
        service.submit_clue(&id, "MORE", 1, None).await.unwrap_err(),
    ] {
        assert_eq!(err.code(), ErrorCode::GameOver);
    }
}

#[tokio::test]
async fn if_match_mismatch_is_an_immediate_conflict() {
    let (service, _, _) = memory_service();
    let id = unique_game_id("ifmatch");
    service.create_or_join(&id).await.unwrap();

    let err = service.end_turn(&id, Some(7)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::OptimisticLock);
    assert_eq!(err.status().as_u16(), 409);

    let outcome = service.end_turn(&id, Some(1)).await.unwrap();
    assert_eq!(outcome.record.version, 2);
    assert_eq!(outcome.record.state.current_team, Team::Blue);
}

#[tokio::test]
async fn persisted_record_is_published() {
    let (service, _, hub) = memory_service();
    let id = unique_game_id("publish");
    service.create_or_join(&id).await.unwrap();

    let mut subscription = hub.subscribe(&id);
    let outcome = service.end_turn(&id, None).await.unwrap();

    let published = subscription.next().await.unwrap();
    assert_eq!(*published, outcome.record);
}

#[tokio::test]
async fn notifier_failure_is_retryable_but_the_write_stands() {
    let store = Arc::new(MemoryGameStore::new());
    let service = GameSessionService::new(
        store.clone(),
        Arc::new(FailingNotifier),
        Arc::new(ScriptedGenerator::failing()),
        codenames_backend::domain::words::DEFAULT_WORDS
            .iter()
            .map(|w| w.to_string())
            .collect(),
        SessionConfig::default(),
    );

    let err = service.create_or_join("loud-game").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotifierUnavailable);
    assert_eq!(err.status().as_u16(), 503);
    assert_eq!(store.len(), 1);

    let err = service.end_turn("loud-game", None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotifierUnavailable);
    let stored = store.find("loud-game").await.unwrap().unwrap();
    assert_eq!(stored.version, 2);
    assert_eq!(stored.state.current_team, Team::Blue);
}

#[tokio::test]
async fn store_outage_is_unavailable() {
    let service = service_with(
        Arc::new(DownStore),
        Arc::new(GameHub::default()),
        Arc::new(ScriptedGenerator::failing()),
    );
    let err = service.load("any-game").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::DbUnavailable);
    assert_eq!(err.status().as_u16(), 503);
}
