// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::{Datelike, Local};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strava_dashboard::config::Config;
use strava_dashboard::routes::create_router;
use strava_dashboard::services::DashboardService;
use strava_dashboard::AppState;

pub const MOCK_ACCESS_TOKEN: &str = "mock-access-token";

/// How the mock token endpoint answers.
#[allow(dead_code)]
#[derive(Clone, Copy)]
pub enum TokenBehavior {
    Ok,
    Status(StatusCode),
    MissingAccessToken,
}

/// Shared state and counters of the mock Strava server.
pub struct MockStrava {
    token: TokenBehavior,
    page_size: Box<dyn Fn(u32) -> usize + Send + Sync>,
    pub fail_page: Mutex<Option<u32>>,
    pub fail_tokens: AtomicBool,
    /// Delay before the token endpoint answers.
    pub token_delay: Mutex<Option<Duration>>,
    /// Fields overwritten in every served activity.
    pub activity_overrides: Mutex<Vec<(&'static str, Value)>>,
    pub token_calls: AtomicUsize,
    pub page_calls: AtomicUsize,
    pub pages_requested: Mutex<Vec<(u32, u32)>>,
}

impl MockStrava {
    #[allow(dead_code)]
    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }
}

/// A running mock server plus a config pointed at it.
pub struct MockServer {
    pub state: Arc<MockStrava>,
    pub config: Config,
}

/// Start a mock Strava API on a random local port.
///
/// `page_size(page)` gives the number of activities returned for each page.
#[allow(dead_code)]
pub async fn spawn_mock_strava<F>(token: TokenBehavior, page_size: F) -> MockServer
where
    F: Fn(u32) -> usize + Send + Sync + 'static,
{
    let state = Arc::new(MockStrava {
        token,
        page_size: Box::new(page_size),
        fail_page: Mutex::new(None),
        fail_tokens: AtomicBool::new(false),
        token_delay: Mutex::new(None),
        activity_overrides: Mutex::new(Vec::new()),
        token_calls: AtomicUsize::new(0),
        page_calls: AtomicUsize::new(0),
        pages_requested: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/oauth/token", post(mock_token))
        .route("/api/v3/athlete/activities", get(mock_activities))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let mut config = Config::test_default();
    config.strava_oauth_url = format!("http://{}/oauth/token", addr);
    config.strava_api_url = format!("http://{}/api/v3", addr);

    MockServer { state, config }
}

async fn mock_token(
    State(state): State<Arc<MockStrava>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.token_calls.fetch_add(1, Ordering::SeqCst);

    let delay = *state.token_delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    if form.get("grant_type").map(String::as_str) != Some("refresh_token")
        || form.get("refresh_token").map(String::as_str) != Some("test_refresh_token")
        || form.get("client_id").map(String::as_str) != Some("test_client_id")
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Bad Request", "errors": [{ "code": "invalid" }] })),
        )
            .into_response();
    }

    if state.fail_tokens.load(Ordering::SeqCst) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "message": "temporarily unavailable" })),
        )
            .into_response();
    }

    match state.token {
        TokenBehavior::Ok => Json(json!({
            "token_type": "Bearer",
            "access_token": MOCK_ACCESS_TOKEN,
            "refresh_token": "test_refresh_token",
            "expires_at": 1_900_000_000,
        }))
        .into_response(),
        TokenBehavior::Status(status) => (
            status,
            Json(json!({ "message": "Authorization Error", "errors": [{ "code": "invalid" }] })),
        )
            .into_response(),
        TokenBehavior::MissingAccessToken => {
            Json(json!({ "token_type": "Bearer", "expires_at": 1_900_000_000 })).into_response()
        }
    }
}

async fn mock_activities(
    State(state): State<Arc<MockStrava>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.page_calls.fetch_add(1, Ordering::SeqCst);

    let expected = format!("Bearer {}", MOCK_ACCESS_TOKEN);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str());
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Authorization Error" })),
        )
            .into_response();
    }

    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let per_page: u32 = params
        .get("per_page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(30);
    state.pages_requested.lock().unwrap().push((page, per_page));

    if *state.fail_page.lock().unwrap() == Some(page) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Something went wrong" })),
        )
            .into_response();
    }

    let count = (state.page_size)(page);
    let overrides = state.activity_overrides.lock().unwrap().clone();
    let activities: Vec<Value> = (0..count)
        .map(|i| {
            let id = u64::from(page) * 1000 + i as u64;
            let month = (i % 12) + 1;
            let mut activity = run_json(
                id,
                &format!("{}-{:02}-05T07:30:00Z", this_year(), month),
                5000.0,
                1500,
                Some(140.0 + (i % 50) as f64),
            );
            for (key, value) in &overrides {
                activity[*key] = value.clone();
            }
            activity
        })
        .collect();

    Json(activities).into_response()
}

/// Current calendar year, as the dashboard sees it.
#[allow(dead_code)]
pub fn this_year() -> i32 {
    Local::now().year()
}

/// Strava summary-activity JSON for a run.
#[allow(dead_code)]
pub fn run_json(id: u64, start_local: &str, distance: f64, moving_time: i64, hr: Option<f64>) -> Value {
    let mut activity = json!({
        "id": id,
        "name": format!("Run {}", id),
        "sport_type": "Run",
        "start_date": start_local,
        "start_date_local": start_local,
        "distance": distance,
        "moving_time": moving_time,
        "elapsed_time": moving_time + 60,
        "total_elevation_gain": 25.0,
        "start_latlng": [51.5 + (id % 10) as f64 * 0.01, -0.12],
    });
    if let Some(hr) = hr {
        activity["average_heartrate"] = json!(hr);
    }
    activity
}

/// Create a test app around a fixed activity snapshot (no upstream calls).
#[allow(dead_code)]
pub fn create_test_app(activities: Vec<Value>) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let activities = activities
        .into_iter()
        .map(|v| serde_json::from_value(v).expect("valid activity json"))
        .collect();
    let dashboard = Arc::new(DashboardService::with_snapshot(None, false, activities));

    let state = Arc::new(AppState { config, dashboard });

    (create_router(state.clone()), state)
}
