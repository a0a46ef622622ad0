use std::sync::Arc;

use actix_web::http::header::IF_MATCH;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_parts;
use backend_test_support::unique_helpers::unique_game_id;
use serde_json::json;

use crate::support::stores::FailingNotifier;
use crate::support::{memory_state, test_config, ScriptedGenerator};

/// Call `req` and assert the response is ProblemDetails with `code` and `status`.
macro_rules! assert_problem {
    ($app:expr, $req:expr, $code:expr, $status:expr) => {{
        let resp = test::call_service(&$app, $req).await;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = test::read_body(resp).await;
        assert_problem_details_from_parts(status, &headers, &body, $code, $status)
    }};
}

#[actix_web::test]
async fn unknown_game_is_404() {
    let state = memory_state(Arc::new(ScriptedGenerator::failing())).await;
    let app = test::init_service(crate::test_app!(state)).await;

    let problem = assert_problem!(
        app,
        test::TestRequest::get().uri("/api/games/no-such-game").to_request(),
        "GAME_NOT_FOUND",
        StatusCode::NOT_FOUND
    );
    assert!(problem.detail.contains("no-such-game"));
}

#[actix_web::test]
async fn malformed_game_id_is_400() {
    let state = memory_state(Arc::new(ScriptedGenerator::failing())).await;
    let app = test::init_service(crate::test_app!(state)).await;

    assert_problem!(
        app,
        test::TestRequest::put().uri("/api/games/bad_id").to_request(),
        "INVALID_GAME_ID",
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn unknown_view_is_400() {
    let state = memory_state(Arc::new(ScriptedGenerator::failing())).await;
    let app = test::init_service(crate::test_app!(state)).await;

    assert_problem!(
        app,
        test::TestRequest::put()
            .uri("/api/games/view-test?view=referee")
            .to_request(),
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn malformed_bodies_are_400() {
    let state = memory_state(Arc::new(ScriptedGenerator::failing())).await;
    let app = test::init_service(crate::test_app!(state)).await;
    let id = unique_game_id("bodies");
    test::call_service(
        &app,
        test::TestRequest::put().uri(&format!("/api/games/{id}")).to_request(),
    )
    .await;

    assert_problem!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/games/{id}/reveal"))
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST
    );
    assert_problem!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/games/{id}/reveal"))
            .set_json(json!({"index": -1}))
            .to_request(),
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST
    );
    assert_problem!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/games/{id}/clue"))
            .set_json(json!({"word": "MISSING-COUNT"}))
            .to_request(),
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST
    );
    for count in [-1, 26] {
        assert_problem!(
            app,
            test::TestRequest::post()
                .uri(&format!("/api/games/{id}/clue"))
                .set_json(json!({"word": "TREE", "count": count}))
                .to_request(),
            "INVALID_CLUE_COUNT",
            StatusCode::BAD_REQUEST
        );
    }
}

#[actix_web::test]
async fn rule_violations_are_409() {
    let state = memory_state(Arc::new(ScriptedGenerator::failing())).await;
    let app = test::init_service(crate::test_app!(state)).await;
    let id = unique_game_id("rules");
    test::call_service(
        &app,
        test::TestRequest::put().uri(&format!("/api/games/{id}")).to_request(),
    )
    .await;

    assert_problem!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/games/{id}/reveal"))
            .set_json(json!({"index": 3}))
            .to_request(),
        "NO_ACTIVE_CLUE",
        StatusCode::CONFLICT
    );

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/games/{id}/clue"))
            .set_json(json!({"word": "TREE", "count": 1}))
            .to_request(),
    )
    .await;

    assert_problem!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/games/{id}/clue"))
            .set_json(json!({"word": "BUSH", "count": 1}))
            .to_request(),
        "CLUE_ALREADY_ACTIVE",
        StatusCode::CONFLICT
    );
    assert_problem!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/games/{id}/clue/generate"))
            .to_request(),
        "CLUE_ALREADY_ACTIVE",
        StatusCode::CONFLICT
    );
    assert_problem!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/games/{id}/reveal"))
            .set_json(json!({"index": 25}))
            .to_request(),
        "CELL_OUT_OF_RANGE",
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn stale_if_match_is_optimistic_lock() {
    let state = memory_state(Arc::new(ScriptedGenerator::failing())).await;
    let app = test::init_service(crate::test_app!(state)).await;
    let id = unique_game_id("stale");
    test::call_service(
        &app,
        test::TestRequest::put().uri(&format!("/api/games/{id}")).to_request(),
    )
    .await;
    test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/games/{id}/end-turn"))
            .to_request(),
    )
    .await;

    let problem = assert_problem!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/games/{id}/end-turn"))
            .insert_header((IF_MATCH, format!("\"game-{id}-v1\"")))
            .to_request(),
        "OPTIMISTIC_LOCK",
        StatusCode::CONFLICT
    );
    assert!(problem.detail.contains("expected 1"));

    assert_problem!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/games/{id}/clue/generate"))
            .insert_header((IF_MATCH, format!("\"game-{id}-v1\"")))
            .to_request(),
        "OPTIMISTIC_LOCK",
        StatusCode::CONFLICT
    );
}

#[actix_web::test]
async fn unparseable_if_match_is_400() {
    let state = memory_state(Arc::new(ScriptedGenerator::failing())).await;
    let app = test::init_service(crate::test_app!(state)).await;
    let id = unique_game_id("badtag");
    test::call_service(
        &app,
        test::TestRequest::put().uri(&format!("/api/games/{id}")).to_request(),
    )
    .await;

    assert_problem!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/games/{id}/end-turn"))
            .insert_header((IF_MATCH, "\"something-else\""))
            .to_request(),
        "INVALID_HEADER",
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn notifier_outage_is_503() {
    let state = codenames_backend::build_state()
        .with_config(test_config())
        .with_notifier(Arc::new(FailingNotifier))
        .with_generator(Arc::new(ScriptedGenerator::failing()))
        .build()
        .await
        .unwrap();
    let store = state.store().clone();
    let app = test::init_service(crate::test_app!(state)).await;

    assert_problem!(
        app,
        test::TestRequest::put().uri("/api/games/quiet-hub").to_request(),
        "NOTIFIER_UNAVAILABLE",
        StatusCode::SERVICE_UNAVAILABLE
    );
    // The write itself stands.
    assert!(store.find("quiet-hub").await.unwrap().is_some());
}
