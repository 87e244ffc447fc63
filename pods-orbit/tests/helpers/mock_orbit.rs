//! Mock Orbit members API
//!
//! Serves `GET /api/v1/{workspace}/members?page=N` from a fixed list of
//! pages, linking each page to the next, and
//! `GET /api/v1/{workspace}/members/{id}` from the same records. Every
//! request is recorded with its Authorization header.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub page: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct MockState {
    base_url: String,
    pages: Arc<Vec<Vec<Value>>>,
    fail_page: Option<(usize, StatusCode)>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockOrbit {
    /// API base to hand to `OrbitClientConfig::api_base`
    pub api_base: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    server: tokio::task::JoinHandle<()>,
}

impl MockOrbit {
    /// Serve `pages` (page 1 first)
    pub async fn start(pages: Vec<Vec<Value>>) -> Self {
        Self::start_inner(pages, None).await
    }

    /// Serve `pages`, but answer page `failing_page` (1-based) with `status`
    pub async fn start_failing(pages: Vec<Vec<Value>>, failing_page: usize, status: StatusCode) -> Self {
        Self::start_inner(pages, Some((failing_page, status))).await
    }

    async fn start_inner(pages: Vec<Vec<Value>>, fail_page: Option<(usize, StatusCode)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let state = MockState {
            base_url: base_url.clone(),
            pages: Arc::new(pages),
            fail_page,
            requests: Arc::clone(&requests),
        };

        let router = Router::new()
            .route("/api/v1/:workspace/members", get(list_members))
            .route("/api/v1/:workspace/members/:id", get(get_member))
            .with_state(state);

        let server = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            api_base: format!("{}/api/v1", base_url),
            requests,
            server,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockOrbit {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn record(state: &MockState, path: String, page: Option<String>, headers: &HeaderMap) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push(RecordedRequest {
        path,
        page,
        authorization,
    });
}

async fn list_members(
    State(state): State<MockState>,
    Path(workspace): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let page_param = query.get("page").cloned();
    record(
        &state,
        format!("/api/v1/{}/members", workspace),
        page_param.clone(),
        &headers,
    );

    let page: usize = page_param.as_deref().and_then(|p| p.parse().ok()).unwrap_or(1);

    if let Some((failing, status)) = state.fail_page {
        if failing == page {
            return (status, "upstream unavailable").into_response();
        }
    }

    let data = state.pages.get(page - 1).cloned().unwrap_or_default();
    let next = if page < state.pages.len() {
        Value::String(format!(
            "{}/api/v1/{}/members?page={}",
            state.base_url,
            workspace,
            page + 1
        ))
    } else {
        Value::Null
    };

    Json(json!({ "data": data, "links": { "next": next } })).into_response()
}

async fn get_member(
    State(state): State<MockState>,
    Path((workspace, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    record(&state, format!("/api/v1/{}/members/{}", workspace, id), None, &headers);

    let found = state
        .pages
        .iter()
        .flatten()
        .find(|m| m.get("id").and_then(Value::as_str) == Some(id.as_str()))
        .cloned();

    match found {
        Some(member) => Json(json!({ "data": member })).into_response(),
        None => (StatusCode::NOT_FOUND, "member not found").into_response(),
    }
}
