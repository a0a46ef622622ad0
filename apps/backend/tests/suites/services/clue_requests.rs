use std::sync::Arc;
use std::time::Duration;

use backend_test_support::unique_helpers::unique_game_id;
use codenames_backend::ai::{AiError, RawSuggestion};
use codenames_backend::domain::board::Team;
use codenames_backend::domain::clue_adapter::ClueWarning;
use codenames_backend::domain::game_transition::GameTransition;
use codenames_backend::domain::state::Clue;
use codenames_backend::errors::ErrorCode;
use codenames_backend::repos::MemoryGameStore;
use codenames_backend::ws::GameHub;
use codenames_backend::{GameSessionService, SessionConfig};
use serde_json::json;

use crate::support::{service_with, ScriptedGenerator, TEST_SEED};

fn service(generator: ScriptedGenerator) -> (Arc<GameSessionService>, Arc<ScriptedGenerator>) {
    let generator = Arc::new(generator);
    let service = service_with(
        Arc::new(MemoryGameStore::new()),
        Arc::new(GameHub::default()),
        generator.clone(),
    );
    (Arc::new(service), generator)
}

fn active_clue(outcome: &codenames_backend::MutationOutcome) -> Clue {
    outcome
        .record
        .state
        .current_clue
        .clone()
        .expect("clue is active")
}

#[tokio::test]
async fn generated_text_clue_is_applied() {
    let (service, generator) = service(ScriptedGenerator::text("CLUE: ocean\nCOUNT: 2"));
    let id = unique_game_id("ai-text");
    service.create_or_join(&id).await.unwrap();

    let outcome = service.request_clue(&id).await.unwrap();
    assert_eq!(
        active_clue(&outcome),
        Clue {
            word: "OCEAN".into(),
            count: 2
        }
    );
    assert_eq!(outcome.record.state.guesses_remaining, 3);
    assert_eq!(outcome.warning, None);
    assert_eq!(
        outcome.transitions,
        vec![GameTransition::ClueGiven {
            word: "OCEAN".into(),
            count: 2
        }]
    );
    assert_eq!(generator.teams(), vec![Team::Red]);
}

#[tokio::test]
async fn generated_json_clue_coerces_count() {
    let (service, _) = service(ScriptedGenerator::new(vec![Ok(RawSuggestion::Json(
        json!({"word": " river ", "count": "3"}),
    ))]));
    let id = unique_game_id("ai-json");
    service.create_or_join(&id).await.unwrap();

    let outcome = service.request_clue(&id).await.unwrap();
    assert_eq!(active_clue(&outcome).word, "RIVER");
    assert_eq!(active_clue(&outcome).count, 3);
}

#[tokio::test]
async fn generator_failure_falls_back_to_guess() {
    let (service, _) = service(ScriptedGenerator::new(vec![Err(AiError::Unavailable(
        "connection refused".into(),
    ))]));
    let id = unique_game_id("ai-down");
    service.create_or_join(&id).await.unwrap();

    let outcome = service.request_clue(&id).await.unwrap();
    assert_eq!(
        active_clue(&outcome),
        Clue {
            word: "GUESS".into(),
            count: 1
        }
    );
    assert_eq!(outcome.warning, Some(ClueWarning::GeneratorFailed));
}

#[tokio::test]
async fn unparseable_answer_falls_back_to_think() {
    let (service, _) = service(ScriptedGenerator::text("I would rather not say."));
    let id = unique_game_id("ai-junk");
    service.create_or_join(&id).await.unwrap();

    let outcome = service.request_clue(&id).await.unwrap();
    assert_eq!(active_clue(&outcome).word, "THINK");
    assert_eq!(active_clue(&outcome).count, 1);
    assert_eq!(outcome.warning, Some(ClueWarning::Unparseable));
}

#[tokio::test]
async fn slow_generator_times_out_into_fallback() {
    let generator = Arc::new(
        ScriptedGenerator::text("CLUE: late\nCOUNT: 1").with_delay(Duration::from_millis(500)),
    );
    let service = GameSessionService::new(
        Arc::new(MemoryGameStore::new()),
        Arc::new(GameHub::default()),
        generator,
        codenames_backend::domain::words::DEFAULT_WORDS
            .iter()
            .map(|w| w.to_string())
            .collect(),
        SessionConfig {
            clue_timeout: Duration::from_millis(50),
            base_seed: Some(TEST_SEED),
        },
    );
    let id = unique_game_id("ai-slow");
    service.create_or_join(&id).await.unwrap();

    let outcome = service.request_clue(&id).await.unwrap();
    assert_eq!(active_clue(&outcome).word, "GUESS");
    assert_eq!(outcome.warning, Some(ClueWarning::GeneratorFailed));
}

#[tokio::test]
async fn generator_is_not_called_when_a_clue_is_active() {
    let (service, generator) = service(ScriptedGenerator::text("CLUE: ocean\nCOUNT: 2"));
    let id = unique_game_id("ai-active");
    service.create_or_join(&id).await.unwrap();
    service.submit_clue(&id, "MANUAL", 1, None).await.unwrap();

    let err = service.request_clue(&id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ClueAlreadyActive);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn clue_for_the_wrong_team_is_stale() {
    let (service, _) = service(
        ScriptedGenerator::text("CLUE: ocean\nCOUNT: 2").with_delay(Duration::from_millis(200)),
    );
    let id = unique_game_id("ai-stale");
    service.create_or_join(&id).await.unwrap();

    let task = service.spawn_clue_request(&id);
    tokio::time::sleep(Duration::from_millis(50)).await;
    service.end_turn(&id, None).await.unwrap();

    let err = task.join().await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::StaleClue);
    assert_eq!(err.status().as_u16(), 409);

    let record = service.load(&id).await.unwrap();
    assert_eq!(record.state.current_team, Team::Blue);
    assert!(record.state.current_clue.is_none());
}

#[tokio::test]
async fn manual_clue_wins_over_a_pending_generated_one() {
    let (service, _) = service(
        ScriptedGenerator::text("CLUE: ocean\nCOUNT: 2").with_delay(Duration::from_millis(200)),
    );
    let id = unique_game_id("ai-race");
    service.create_or_join(&id).await.unwrap();

    let task = service.spawn_clue_request(&id);
    tokio::time::sleep(Duration::from_millis(50)).await;
    service.submit_clue(&id, "HUMAN", 1, None).await.unwrap();

    let err = task.join().await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::StaleClue);
    let record = service.load(&id).await.unwrap();
    assert_eq!(record.state.current_clue.unwrap().word, "HUMAN");
}

#[tokio::test]
async fn cancelled_request_never_writes() {
    let (service, generator) = service(
        ScriptedGenerator::text("CLUE: ocean\nCOUNT: 2").with_delay(Duration::from_millis(200)),
    );
    let id = unique_game_id("ai-cancel");
    service.create_or_join(&id).await.unwrap();

    let task = service.spawn_clue_request(&id);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!task.is_finished());
    task.cancel();
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(generator.calls(), 1);
    let record = service.store().find(&id).await.unwrap().unwrap();
    assert_eq!(record.version, 1);
    assert!(record.state.current_clue.is_none());
}

#[tokio::test]
async fn finished_game_does_not_ask_the_generator() {
    let (service, generator) = service(ScriptedGenerator::text("CLUE: ocean\nCOUNT: 2"));
    let id = unique_game_id("ai-over");
    let created = service.create_or_join(&id).await.unwrap();
    service.submit_clue(&id, "RISK", 1, None).await.unwrap();
    let assassin = crate::common::hidden_index(
        &created.state,
        codenames_backend::domain::board::Color::Assassin,
        0,
    );
    service.reveal(&id, assassin, None).await.unwrap();

    let err = service.request_clue(&id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameOver);
    assert_eq!(generator.calls(), 0);
}
