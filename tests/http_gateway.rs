//! Runs `HttpGateway` against an in-process fake of the quiz backend.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use quizline::gateway::{GatewayError, HttpGateway, RequestError, SessionGateway};
use quizline::models::{PlayerId, SessionCode};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

#[derive(Clone, Default)]
struct Backend {
    submissions: Arc<Mutex<Vec<Value>>>,
}

async fn create_session(Json(body): Json<Value>) -> impl IntoResponse {
    assert_eq!(body["max_players"], 3);
    Json(json!({ "session_code": "AB12CD" }))
}

async fn join_session(Json(body): Json<Value>) -> impl IntoResponse {
    if body["session_code"] != "AB12CD" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Session not found" })),
        )
            .into_response();
    }
    Json(json!({ "player_id": 7, "session_id": 1 })).into_response()
}

async fn generate_quiz(Json(body): Json<Value>) -> impl IntoResponse {
    if body["topic"] == "nothing" {
        return Json(json!([])).into_response();
    }
    Json(json!([
        { "question": "2 + 2?", "options": ["3", "4"], "answer": "4" },
        { "question": "Capital of France?", "options": ["Paris", "Rome", "Oslo"], "answer": "Paris" }
    ]))
    .into_response()
}

async fn get_quiz(Path(code): Path<String>) -> impl IntoResponse {
    match code.as_str() {
        "AB12CD" => Json(json!([
            { "question": "2 + 2?", "options": ["3", "4"], "answer": "4" }
        ]))
        .into_response(),
        "BROKEN" => Json(json!([
            { "question": "2 + 2?", "options": ["3", "4"], "answer": "5" }
        ]))
        .into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn submit_answer(
    State(backend): State<Backend>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    backend.submissions.lock().unwrap().push(body);
    Json(json!({ "status": "ok" }))
}

async fn results(Path(_code): Path<String>) -> impl IntoResponse {
    // Raw body so key order is exactly what the backend sent.
    (
        [(header::CONTENT_TYPE, "application/json")],
        r#"{"Zed": "Bold", "Ada": null, "Bob": "Calm"}"#,
    )
}

async fn session_status(Path(_code): Path<String>) -> impl IntoResponse {
    Json(json!({
        "players": [
            { "name": "Ada", "completed": true },
            { "name": "Bob", "completed": false }
        ],
        "all_done": false
    }))
}

async fn spawn_backend() -> (HttpGateway, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/create-session", post(create_session))
        .route("/join-session", post(join_session))
        .route("/generate-quiz", post(generate_quiz))
        .route("/get-quiz/{code}", get(get_quiz))
        .route("/submit-answer", post(submit_answer))
        .route("/results/{code}", get(results))
        .route("/session-status/{code}", get(session_status))
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let gateway = HttpGateway::new(base, Duration::from_secs(5)).unwrap();
    (gateway, backend)
}

#[tokio::test]
async fn test_create_join_and_generate() {
    let (gateway, _backend) = spawn_backend().await;

    let code = gateway.create_session(3).await.unwrap();
    assert_eq!(code, SessionCode::new("AB12CD"));

    let player = gateway.join_session("Ada", &code).await.unwrap();
    assert_eq!(player, PlayerId::Number(7));

    let quiz = gateway.generate_quiz("geography").await.unwrap();
    assert_eq!(quiz.len(), 2);
    assert_eq!(quiz[1].text(), "Capital of France?");
    assert_eq!(quiz[1].answer(), "Paris");
}

#[tokio::test]
async fn test_join_unknown_session_carries_backend_message() {
    let (gateway, _backend) = spawn_backend().await;

    let err = gateway
        .join_session("Ada", &SessionCode::new("NOPE"))
        .await
        .unwrap_err();

    match err {
        GatewayError::JoinFailed {
            code,
            source:
                RequestError::Status {
                    status, message, ..
                },
        } => {
            assert_eq!(code.as_str(), "NOPE");
            assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
            assert_eq!(message, "Session not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_quiz_validates_content() {
    let (gateway, _backend) = spawn_backend().await;

    let quiz = gateway.fetch_quiz(&SessionCode::new("AB12CD")).await.unwrap();
    assert_eq!(quiz.len(), 1);

    let err = gateway
        .fetch_quiz(&SessionCode::new("BROKEN"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GatewayError::QuizFetchFailed {
            source: RequestError::InvalidQuiz { .. },
            ..
        }
    ));

    let err = gateway.generate_quiz("nothing").await.unwrap_err();
    assert!(matches!(
        err,
        GatewayError::QuizGenerationFailed {
            source: RequestError::InvalidQuiz { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_status_without_error_body_uses_reason() {
    let (gateway, _backend) = spawn_backend().await;

    let err = gateway
        .fetch_quiz(&SessionCode::new("OTHER"))
        .await
        .unwrap_err();
    match err {
        GatewayError::QuizFetchFailed {
            source: RequestError::Status { message, .. },
            ..
        } => assert_eq!(message, "Internal Server Error"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_submit_answer_sends_null_on_timeout() {
    let (gateway, backend) = spawn_backend().await;
    let player = PlayerId::Number(7);

    gateway
        .submit_answer(&player, Some("4".to_string()))
        .await
        .unwrap();
    gateway.submit_answer(&player, None).await.unwrap();

    let submissions = backend.submissions.lock().unwrap().clone();
    assert_eq!(
        submissions,
        vec![
            json!({ "player_id": 7, "answer": "4" }),
            json!({ "player_id": 7, "answer": null }),
        ]
    );
}

#[tokio::test]
async fn test_results_keep_backend_order() {
    let (gateway, _backend) = spawn_backend().await;

    let results = gateway
        .fetch_results(&SessionCode::new("AB12CD"))
        .await
        .unwrap();
    let rows: Vec<(&str, &str)> = results
        .iter()
        .map(|(player, trait_name)| (player.as_str(), trait_name.as_str()))
        .collect();
    assert_eq!(rows, [("Zed", "Bold"), ("Ada", "unknown"), ("Bob", "Calm")]);
}

#[tokio::test]
async fn test_session_status() {
    let (gateway, _backend) = spawn_backend().await;

    let status = gateway
        .fetch_session_status(&SessionCode::new("AB12CD"))
        .await
        .unwrap();
    assert!(!status.all_done);
    assert_eq!(status.completed_count(), 1);
    assert_eq!(status.players[1].name, "Bob");
}

#[tokio::test]
async fn test_unreachable_backend_is_send_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let gateway = HttpGateway::new(base, Duration::from_secs(2)).unwrap();

    let err = gateway.create_session(2).await.unwrap_err();
    assert!(matches!(
        err,
        GatewayError::SessionCreateFailed(RequestError::Send { .. })
    ));
}

#[tokio::test]
async fn test_stalled_submission_gives_up_at_submit_timeout() {
    let app = Router::new().route(
        "/submit-answer",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(json!({ "status": "ok" }))
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let gateway = HttpGateway::new(base, Duration::from_secs(30))
        .unwrap()
        .with_submit_timeout(Duration::from_millis(200));

    let started = std::time::Instant::now();
    let err = gateway
        .submit_answer(&PlayerId::Number(7), None)
        .await
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(5));
    match err {
        GatewayError::SubmissionFailed(RequestError::Send { source, .. }) => {
            assert!(source.is_timeout())
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
