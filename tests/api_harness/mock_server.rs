//! Local stand-in for the mock REST API
//!
//! Serves `GET/POST /Food` and `PUT/DELETE /Food/{id}` from memory on an
//! ephemeral port. Failures, raw bodies and latency can be injected, and the
//! last request's `Content-Type` and body are recorded for inspection.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use foodwagen::core::field::coerce_text;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct MockState {
    pub records: Vec<Value>,
    pub next_id: u64,
    /// Status returned by the next request instead of its normal response
    pub fail_next: Option<u16>,
    /// Body returned with 200 by the next request
    ///
    /// Reads and writes answer with it instead of touching the records; a
    /// delete still removes its record first.
    pub raw_body_next: Option<String>,
    pub latency: Duration,
    pub list_calls: usize,
    pub last_content_type: Option<String>,
    pub last_body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn with_records(records: Vec<Value>) -> Self {
        let mock = Self::default();
        mock.with(|s| s.records = records);
        mock
    }

    /// Run `f` with exclusive access to the server state
    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    /// Serve on 127.0.0.1 with an ephemeral port
    pub async fn spawn(&self) -> SocketAddr {
        let app = Router::new()
            .route("/Food", get(list_foods).post(create_food))
            .route("/Food/{id}", put(update_food).delete(delete_food))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }
}

/// Apply latency and injected failures shared by every route
async fn intercept(mock: &MockApi, headers: &HeaderMap) -> Option<Response> {
    let latency = mock.with(|s| {
        s.last_content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        s.latency
    });
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }

    mock.with(|s| {
        s.fail_next.take().map(|status| {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, "\"injected failure\"").into_response()
        })
    })
}

/// Take the injected raw body, if any
fn raw_body(mock: &MockApi) -> Option<Response> {
    mock.with(|s| s.raw_body_next.take())
        .map(|body| ([(CONTENT_TYPE, "application/json")], body).into_response())
}

fn position(records: &[Value], id: &str) -> Option<usize> {
    records
        .iter()
        .position(|r| r.get("id").and_then(coerce_text).as_deref() == Some(id))
}

async fn list_foods(State(mock): State<MockApi>, headers: HeaderMap) -> Response {
    mock.with(|s| s.list_calls += 1);
    if let Some(response) = intercept(&mock, &headers).await {
        return response;
    }
    if let Some(response) = raw_body(&mock) {
        return response;
    }
    Json(mock.with(|s| s.records.clone())).into_response()
}

async fn create_food(
    State(mock): State<MockApi>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.with(|s| s.last_body = Some(body.clone()));
    if let Some(response) = intercept(&mock, &headers).await {
        return response;
    }
    if let Some(response) = raw_body(&mock) {
        return response;
    }
    let record = mock.with(|s| {
        s.next_id += 1;
        let mut record = body;
        record["id"] = json!(s.next_id.to_string());
        record["createdAt"] = json!(chrono::Utc::now().to_rfc3339());
        s.records.push(record.clone());
        record
    });
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update_food(
    State(mock): State<MockApi>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.with(|s| s.last_body = Some(body.clone()));
    if let Some(response) = intercept(&mock, &headers).await {
        return response;
    }
    if let Some(response) = raw_body(&mock) {
        return response;
    }
    mock.with(|s| match position(&s.records, &id) {
        Some(index) => {
            if let (Value::Object(existing), Value::Object(fields)) = (&mut s.records[index], body) {
                existing.extend(fields);
            }
            Json(s.records[index].clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "\"Not found\"").into_response(),
    })
}

async fn delete_food(
    State(mock): State<MockApi>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Some(response) = intercept(&mock, &headers).await {
        return response;
    }
    let removed = mock.with(|s| position(&s.records, &id).map(|index| s.records.remove(index)));
    match removed {
        Some(record) => raw_body(&mock).unwrap_or_else(|| Json(record).into_response()),
        None => (StatusCode::NOT_FOUND, "\"Not found\"").into_response(),
    }
}
