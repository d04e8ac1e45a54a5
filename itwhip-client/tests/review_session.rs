// itwhip-client/tests/review_session.rs
// Review session against an in-process mock of the admin verification API

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use charge_engine::{ChargePolicy, ChargeSource, WaiveRequest};
use itwhip_client::{
    ClientConfig, ClientError, HttpClient, NoticeKind, ReviewSession, SubmissionOutcome,
    VerificationClient,
};
use serde_json::{Value, json};
use shared::settlement::{ReviewAction, SettlementRequest};

const TOKEN: &str = "test-token";

#[derive(Clone, Default)]
struct Mock {
    gets: Arc<AtomicUsize>,
    posts: Arc<AtomicUsize>,
    last_body: Arc<Mutex<Option<Value>>>,
}

impl Mock {
    fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    fn posts(&self) -> usize {
        self.posts.load(Ordering::SeqCst)
    }

    fn last_body(&self) -> Value {
        self.last_body.lock().unwrap().clone().unwrap_or(Value::Null)
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN))
}

fn review_json(id: &str) -> Value {
    json!({
        "booking": {
            "id": id,
            "bookingCode": "RENT-2001",
            "status": "ACTIVE",
            "tripStatus": "COMPLETED",
            "verificationStatus": "APPROVED",
            "paymentStatus": "AUTHORIZED",
            "tripStartedAt": "2024-01-01T09:00:00Z",
            "tripEndedAt": "2024-01-03T13:30:00Z",
            "startMileage": 1000,
            "endMileage": 1500,
            "fuelLevelStart": "Full",
            "fuelLevelEnd": "Full",
            "endDate": "2024-01-03T10:00:00Z",
            "actualEndTime": "2024-01-03T13:30:00Z",
            "damageReported": false,
            "numberOfDays": 2
        },
        "aiVerification": { "score": 0.93 }
    })
}

async fn get_review(
    State(mock): State<Mock>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    mock.gets.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response();
    }
    match id.as_str() {
        "bk_missing" => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": "Booking not found" }))).into_response()
        }
        _ => Json(review_json(&id)).into_response(),
    }
}

async fn post_action(
    State(mock): State<Mock>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.posts.fetch_add(1, Ordering::SeqCst);
    *mock.last_body.lock().unwrap() = Some(body);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match id.as_str() {
        "bk_declined" => Json(json!({
            "chargeResult": { "status": "failed", "error": "Card declined" }
        }))
        .into_response(),
        "bk_broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => Json(json!({
            "chargeResult": { "status": "success" },
            "paymentResult": { "status": "CAPTURED" },
            "message": "Charges processed"
        }))
        .into_response(),
    }
}

async fn spawn_mock() -> anyhow::Result<(String, Mock)> {
    let mock = Mock::default();
    let app = Router::new()
        .route(
            "/api/admin/rentals/verifications/{id}/approve",
            get(get_review).post(post_action),
        )
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{}", addr), mock))
}

fn client(base_url: &str) -> VerificationClient {
    let config = ClientConfig::new(base_url).with_token(TOKEN).with_timeout(5);
    VerificationClient::new(HttpClient::new(&config).unwrap())
}

async fn load(base_url: &str, id: &str) -> ReviewSession {
    ReviewSession::load(client(base_url), ChargePolicy::default(), id)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_partial_waive_round_trip() -> anyhow::Result<()> {
    itwhip_client::logger::init_logger_with(Some("itwhip_client=debug,charge_engine=debug"), false);
    let (url, mock) = spawn_mock().await?;
    let mut session = load(&url, "bk_ok").await;

    assert_eq!(session.source(), ChargeSource::Telemetry);
    assert_eq!(session.derived_total(), 145.0);
    assert_eq!(mock.gets(), 1);

    let waive = WaiveRequest::amount(session.sheet(), 29.0, "Airport traffic");
    assert_eq!(waive.percentage, 20.0);

    let outcome = session.waive(&waive, "Guest called ahead").await?;
    assert!(matches!(outcome, SubmissionOutcome::Completed(_)));
    assert!(outcome.declined().is_none());
    assert_eq!(outcome.response().message.as_deref(), Some("Charges processed"));

    assert_eq!(mock.posts(), 1);
    let body = mock.last_body();
    assert_eq!(body["action"], "partial_waive");
    assert_eq!(body["waivePercentage"], 20.0);
    assert_eq!(body["waiveReason"], "Airport traffic");
    assert_eq!(body["isPostTrip"], true);
    assert_eq!(body["charges"].as_array().map(Vec::len), Some(2));

    // re-fetched after success
    assert_eq!(mock.gets(), 2);
    let notice = session.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    Ok(())
}

#[tokio::test]
async fn test_empty_waive_reason_makes_no_request() -> anyhow::Result<()> {
    let (url, mock) = spawn_mock().await?;
    let mut session = load(&url, "bk_ok").await;

    let err = session
        .waive(&WaiveRequest::percentage(100.0, "   "), "")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Rejected(_)));
    assert_eq!(session.notice().map(|n| n.kind), Some(NoticeKind::Error));

    // hand-built requests are checked too
    let mut request = SettlementRequest::new(ReviewAction::Waive, "", true);
    request.waive_percentage = Some(100.0);
    request.waive_reason = Some(String::new());
    let err = client(&url).submit("bk_ok", &request).await.unwrap_err();
    assert!(err.is_local());

    assert_eq!(mock.posts(), 0);
    Ok(())
}

#[tokio::test]
async fn test_charge_failure_is_reported_separately() -> anyhow::Result<()> {
    let (url, mock) = spawn_mock().await?;
    let mut session = load(&url, "bk_declined").await;
    session.set_adjusted_amount(1, 60.0)?;
    let before = session.sheet().clone();

    let outcome = session.process_charges("").await?;
    let declined = outcome.declined().unwrap();
    assert_eq!(declined.code, shared::ErrorCode::ChargeDeclined);
    assert_eq!(declined.http_status(), axum::http::StatusCode::PAYMENT_REQUIRED);
    match outcome {
        SubmissionOutcome::ChargeFailed { reason, .. } => assert_eq!(reason, "Card declined"),
        other => panic!("expected charge failure, got {:?}", other),
    }

    let notice = session.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::ChargeFailed);
    assert!(notice.message.contains("Card declined"));
    assert_eq!(session.sheet(), &before);
    assert_eq!(mock.posts(), 1);
    assert_eq!(mock.gets(), 1);

    let body = mock.last_body();
    assert_eq!(body["action"], "process_charges");
    assert_eq!(body["charges"][1]["adjustedAmount"], 60.0);
    Ok(())
}

#[tokio::test]
async fn test_server_error_leaves_state_untouched() -> anyhow::Result<()> {
    let (url, mock) = spawn_mock().await?;
    let mut session = load(&url, "bk_broken").await;
    session.toggle_inclusion(0)?;
    let before = session.sheet().clone();

    let err = session.process_charges("").await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 500, .. }));
    assert_eq!(session.sheet(), &before);
    assert_eq!(session.booking().id, "bk_broken");

    let notice = session.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(!notice.message.is_empty());
    session.dismiss_notice();
    assert!(session.notice().is_none());
    assert_eq!(mock.posts(), 1);
    Ok(())
}

#[tokio::test]
async fn test_missing_booking() -> anyhow::Result<()> {
    let (url, _mock) = spawn_mock().await?;
    let result = ReviewSession::load(client(&url), ChargePolicy::default(), "bk_missing").await;

    match result {
        Err(err @ ClientError::BookingNotFound { .. }) => {
            assert_eq!(err.code(), shared::ErrorCode::BookingNotFound);
            let ClientError::BookingNotFound { booking_id, message } = err else {
                unreachable!()
            };
            assert_eq!(booking_id, "bk_missing");
            assert_eq!(message, "Booking not found");
        }
        Err(other) => panic!("expected booking not found, got {:?}", other),
        Ok(_) => panic!("expected booking not found"),
    }
    Ok(())
}

#[tokio::test]
async fn test_unsafe_booking_id_makes_no_request() -> anyhow::Result<()> {
    let (url, mock) = spawn_mock().await?;
    let client = client(&url);
    let request = charge_engine::submission::approve("", true);

    for id in ["", "bk_1?x=1", "bk_1/../bk_2", "bk_1#approve"] {
        let err = client.submit(id, &request).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidBookingId(_)), "{:?}", id);
        assert!(err.is_local());
        assert!(client.fetch_review(id).await.is_err());
    }
    let load = ReviewSession::load(client.clone(), ChargePolicy::default(), "bk 1").await;
    assert!(matches!(load, Err(ClientError::InvalidBookingId(_))));

    assert_eq!(mock.gets(), 0);
    assert_eq!(mock.posts(), 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() -> anyhow::Result<()> {
    let (url, _mock) = spawn_mock().await?;
    let anonymous = VerificationClient::new(HttpClient::new(&ClientConfig::new(&url))?);

    let err = anonymous.fetch_review("bk_ok").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert_eq!(err.code(), shared::ErrorCode::NotAuthenticated);
    Ok(())
}
