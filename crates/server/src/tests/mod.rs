// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router-level tests driven through `tower::ServiceExt::oneshot`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod auth_tests;
mod workflow_tests;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use freight_desk_api::DeliveryJob;
use freight_desk_persistence::{MIN_HASH_COST, Persistence};
use serde_json::Value;
use tokio::sync::{Mutex, mpsc};
use tower::ServiceExt;

use crate::AppState;
use crate::delivery::ChannelQueue;
use crate::live::LiveEventBroadcaster;
use crate::routes::build_router;

pub const ADMIN: (&str, &str) = ("admin@freight.com", "admin123");
pub const SALES: (&str, &str) = ("sales@freight.com", "sales123");
pub const PRICING: (&str, &str) = ("pricing@freight.com", "pricing123");
pub const CSE: (&str, &str) = ("cse@freight.com", "cse12345");

/// A router over a freshly seeded in-memory store.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub jobs: mpsc::UnboundedReceiver<DeliveryJob>,
}

pub fn test_app() -> TestApp {
    let mut persistence = Persistence::new_in_memory()
        .and_then(|persistence| persistence.with_hash_cost(MIN_HASH_COST))
        .expect("Failed to create in-memory persistence");
    persistence.seed_demo_data().expect("Failed to seed");
    let (queue, jobs) = ChannelQueue::new();
    let state = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        queue: Arc::new(queue),
        live: Arc::new(LiveEventBroadcaster::new()),
    };
    TestApp {
        router: build_router(state.clone()),
        state,
        jobs,
    }
}

/// Sends one request and decodes the JSON body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Logs in and returns the access token.
pub async fn login(app: &Router, (email, password): (&str, &str)) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {email}: {body}");
    body["accessToken"].as_str().unwrap().to_string()
}
