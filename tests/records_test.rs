mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use gymtrack::models::{LoggingMode, UserRole};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_records_require_session() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/records?start_date=2026-02-01&end_date=2026-02-28")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_session_token_is_rejected() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(common::request(
            Method::GET,
            "/api/records?start_date=2026-02-01&end_date=2026-02-28",
            "session=not-a-token",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_then_list_same_day() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let user = common::create_test_user(&pool, "alice", UserRole::Member, None).await;
    let cookie = common::session_cookie(&pool, &user).await;
    let squat = common::create_test_workout_type(&pool, "Back Squat", LoggingMode::Sets, [None; 4]).await;

    let response = app
        .clone()
        .oneshot(common::request(
            Method::POST,
            "/api/records",
            &cookie,
            Some(json!({
                "date": "2026-02-14",
                "workout_type_id": squat.id,
                "sets": [
                    {"weight": 60.0, "reps": 5, "is_completed": true},
                    {"weight": null, "reps": null}
                ]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = common::read_json(response).await;
    assert_eq!(created["sets"][1]["weight"], 0.0);
    assert_eq!(created["sets"][1]["reps"], 0);
    assert_eq!(created["sets"][1]["set_number"], 2);

    let response = app
        .oneshot(common::request(
            Method::GET,
            "/api/records?start_date=2026-02-14&end_date=2026-02-14",
            &cookie,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let records = common::read_json(response).await;
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], created["id"]);
    assert_eq!(records[0]["workout_type_name"], "Back Squat");
    assert_eq!(records[0]["logging_mode"], "sets");
    assert_eq!(records[0]["date"], "2026-02-14");
}

#[tokio::test]
async fn test_sets_record_without_sets_gets_one_empty_set() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let user = common::create_test_user(&pool, "alice", UserRole::Member, None).await;
    let cookie = common::session_cookie(&pool, &user).await;
    let bench = common::create_test_workout_type(&pool, "Bench Press", LoggingMode::Sets, [None; 4]).await;

    let response = app
        .oneshot(common::request(
            Method::POST,
            "/api/records",
            &cookie,
            Some(json!({"date": "2026-02-14", "workout_type_id": bench.id, "sets": []})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let record = common::read_json(response).await;
    assert_eq!(
        record["sets"],
        json!([{"set_number": 1, "weight": 0.0, "reps": 0, "is_completed": false}])
    );
}

#[tokio::test]
async fn test_duration_record_defaults_to_30_minutes() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let user = common::create_test_user(&pool, "alice", UserRole::Member, None).await;
    let cookie = common::session_cookie(&pool, &user).await;
    let run = common::create_test_workout_type(&pool, "Treadmill", LoggingMode::Duration, [None; 4]).await;

    let response = app
        .oneshot(common::request(
            Method::POST,
            "/api/records",
            &cookie,
            Some(json!({"date": "2026-02-14", "workout_type_id": run.id})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let record = common::read_json(response).await;
    assert_eq!(record["duration_minutes"], 30);
    assert_eq!(record["is_completed"], false);
    assert_eq!(record["sets"], json!([]));
}

#[tokio::test]
async fn test_payload_not_matching_mode_is_rejected() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let user = common::create_test_user(&pool, "alice", UserRole::Member, None).await;
    let cookie = common::session_cookie(&pool, &user).await;
    let run = common::create_test_workout_type(&pool, "Treadmill", LoggingMode::Duration, [None; 4]).await;

    let response = app
        .clone()
        .oneshot(common::request(
            Method::POST,
            "/api/records",
            &cookie,
            Some(json!({
                "date": "2026-02-14",
                "workout_type_id": run.id,
                "sets": [{"weight": 10.0, "reps": 10}]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(common::request(
            Method::POST,
            "/api/records",
            &cookie,
            Some(json!({"date": "14/02/2026", "text_content": "stretching"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_workout_type_is_not_found() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let user = common::create_test_user(&pool, "alice", UserRole::Member, None).await;
    let cookie = common::session_cookie(&pool, &user).await;

    let response = app
        .oneshot(common::request(
            Method::POST,
            "/api/records",
            &cookie,
            Some(json!({"date": "2026-02-14", "workout_type_id": "missing"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_and_delete_are_owner_only() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let alice = common::create_test_user(&pool, "alice", UserRole::Member, None).await;
    let bob = common::create_test_user(&pool, "bob", UserRole::Member, None).await;
    let alice_cookie = common::session_cookie(&pool, &alice).await;
    let bob_cookie = common::session_cookie(&pool, &bob).await;

    let response = app
        .clone()
        .oneshot(common::request(
            Method::POST,
            "/api/records",
            &alice_cookie,
            Some(json!({"date": "2026-02-14", "text_content": "yoga class"})),
        ))
        .await
        .unwrap();
    let record = common::read_json(response).await;
    let uri = format!("/api/records/{}", record["id"].as_str().unwrap());

    let response = app
        .clone()
        .oneshot(common::request(
            Method::PUT,
            &uri,
            &bob_cookie,
            Some(json!({"text_content": "hijacked"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(common::request(Method::DELETE, &uri, &bob_cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(common::request(
            Method::PUT,
            &uri,
            &alice_cookie,
            Some(json!({"text_content": "hot yoga", "date": "2026-02-15"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = common::read_json(response).await;
    assert_eq!(updated["text_content"], "hot yoga");
    assert_eq!(updated["date"], "2026-02-15");

    let response = app
        .clone()
        .oneshot(common::request(Method::DELETE, &uri, &alice_cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(common::request(Method::DELETE, &uri, &alice_cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_is_scoped_to_caller_and_range() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let alice = common::create_test_user(&pool, "alice", UserRole::Member, None).await;
    let bob = common::create_test_user(&pool, "bob", UserRole::Member, None).await;
    let alice_cookie = common::session_cookie(&pool, &alice).await;
    let bob_cookie = common::session_cookie(&pool, &bob).await;

    for (cookie, date) in [
        (&alice_cookie, "2026-02-01"),
        (&alice_cookie, "2026-02-20"),
        (&alice_cookie, "2026-03-01"),
        (&bob_cookie, "2026-02-10"),
    ] {
        let response = app
            .clone()
            .oneshot(common::request(
                Method::POST,
                "/api/records",
                cookie,
                Some(json!({"date": date, "text_content": "walk"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(common::request(
            Method::GET,
            "/api/records?start_date=2026-02-01&end_date=2026-02-28",
            &alice_cookie,
            None,
        ))
        .await
        .unwrap();
    let records = common::read_json(response).await;
    let dates: Vec<&str> = records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2026-02-20", "2026-02-01"]);

    let response = app
        .oneshot(common::request(
            Method::GET,
            "/api/records?start_date=2026-02-28&end_date=2026-02-01",
            &alice_cookie,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_updating_sets_recomputes_day_completion() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let user = common::create_test_user(&pool, "alice", UserRole::Member, None).await;
    let cookie = common::session_cookie(&pool, &user).await;
    let squat = common::create_test_workout_type(&pool, "Back Squat", LoggingMode::Sets, [None; 4]).await;

    let response = app
        .clone()
        .oneshot(common::request(
            Method::POST,
            "/api/records",
            &cookie,
            Some(json!({"date": "2026-02-03", "workout_type_id": squat.id})),
        ))
        .await
        .unwrap();
    let record = common::read_json(response).await;
    let uri = format!("/api/records/{}", record["id"].as_str().unwrap());

    let calendar_state = |app: axum::Router| {
        let cookie = cookie.clone();
        async move {
            let response = app
                .oneshot(common::request(
                    Method::GET,
                    "/api/calendar?year=2026&month=2",
                    &cookie,
                    None,
                ))
                .await
                .unwrap();
            let body = common::read_json(response).await;
            body["cells"]
                .as_array()
                .unwrap()
                .iter()
                .find(|c| c["date"] == "2026-02-03")
                .unwrap()["completion_state"]
                .clone()
        }
    };
    assert_eq!(calendar_state(app.clone()).await, "incomplete");

    let response = app
        .clone()
        .oneshot(common::request(
            Method::PUT,
            &uri,
            &cookie,
            Some(json!({"sets": [{"weight": null, "reps": 3, "is_completed": true}]})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let expected_sets = json!([{"set_number": 1, "weight": 0.0, "reps": 3, "is_completed": true}]);
    assert_eq!(common::read_json(response).await["sets"], expected_sets);

    let response = app
        .clone()
        .oneshot(common::request(
            Method::GET,
            "/api/records?start_date=2026-02-03&end_date=2026-02-03",
            &cookie,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(common::read_json(response).await[0]["sets"], expected_sets);
    assert_eq!(calendar_state(app.clone()).await, "complete");

    let response = app
        .clone()
        .oneshot(common::request(Method::PUT, &uri, &cookie, Some(json!({"sets": []}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        common::read_json(response).await["sets"],
        json!([{"set_number": 1, "weight": 0.0, "reps": 0, "is_completed": false}])
    );
    assert_eq!(calendar_state(app).await, "incomplete");
}

#[tokio::test]
async fn test_completion_flag_on_create_marks_sets() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let user = common::create_test_user(&pool, "alice", UserRole::Member, None).await;
    let cookie = common::session_cookie(&pool, &user).await;
    let squat = common::create_test_workout_type(&pool, "Back Squat", LoggingMode::Sets, [None; 4]).await;

    let response = app
        .clone()
        .oneshot(common::request(
            Method::POST,
            "/api/records",
            &cookie,
            Some(json!({"date": "2026-02-03", "workout_type_id": squat.id, "is_completed": true})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        common::read_json(response).await["sets"],
        json!([{"set_number": 1, "weight": 0.0, "reps": 0, "is_completed": true}])
    );

    let response = app
        .oneshot(common::request(
            Method::POST,
            "/api/records",
            &cookie,
            Some(json!({"date": "2026-02-03", "text_content": "yoga", "is_completed": true})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_error() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let user = common::create_test_user(&pool, "alice", UserRole::Member, None).await;
    let cookie = common::session_cookie(&pool, &user).await;

    let response = app
        .clone()
        .oneshot(common::request(
            Method::POST,
            "/api/records",
            &cookie,
            Some(json!({"text_content": "no date"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(common::read_text(response).await.contains("date"));

    let response = app
        .oneshot(common::request(
            Method::POST,
            "/api/comments",
            &cookie,
            Some(json!({"text": "no date"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
