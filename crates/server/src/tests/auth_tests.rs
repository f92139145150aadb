// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;
use freight_desk_api::DeliveryJob;
use serde_json::json;

use super::{ADMIN, CSE, PRICING, SALES, login, send, test_app};

#[tokio::test]
async fn test_health_reports_ok() {
    let app = test_app();

    let (status, body) = send(&app.router, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_login_returns_tokens_and_user() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": SALES.0, "password": SALES.1 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["accessToken"].is_string());
    assert!(body["refreshToken"].is_string());
    assert_eq!(body["user"]["email"], SALES.0);
    assert_eq!(body["user"]["role"], "SALES");
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_bad_credentials_are_unauthorized() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": SALES.0, "password": "wrong" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_missing_or_malformed_token_is_rejected() {
    let app = test_app();

    let (status, body) = send(&app.router, "GET", "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing Authorization header");

    let (status, _) = send(&app.router, "GET", "/auth/me", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_lists_capabilities() {
    let app = test_app();
    let token = login(&app.router, PRICING).await;

    let (status, body) = send(&app.router, "GET", "/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], PRICING.0);
    assert_eq!(body["capabilities"]["canRespondToRateRequest"], true);
    assert_eq!(body["capabilities"]["canCreateRateRequest"], false);
}

#[tokio::test]
async fn test_refresh_then_logout_revokes_access() {
    let app = test_app();
    let (_, session) = send(
        &app.router,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": CSE.0, "password": CSE.1 })),
    )
    .await;

    let (status, refreshed) = send(
        &app.router,
        "POST",
        "/auth/refresh",
        None,
        Some(json!({ "refreshToken": session["refreshToken"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = refreshed["accessToken"].as_str().unwrap().to_string();

    let (status, _) = send(&app.router, "POST", "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app.router, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_password_reset_over_http() {
    let mut app = test_app();

    let (status, _) = send(
        &app.router,
        "POST",
        "/auth/reset/request-otp",
        None,
        Some(json!({ "email": SALES.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let DeliveryJob::Direct(message) = app.jobs.try_recv().unwrap() else {
        panic!("expected a direct email");
    };
    let otp: String = message
        .body
        .split_whitespace()
        .map(|word| word.trim_end_matches('.'))
        .find(|word| word.len() == 6 && word.chars().all(|c| c.is_ascii_digit()))
        .unwrap()
        .to_string();

    let (status, body) = send(
        &app.router,
        "POST",
        "/auth/reset/confirm",
        None,
        Some(json!({ "email": SALES.0, "otp": "abc", "newPassword": "Harbour2026" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid OTP format");

    let (status, _) = send(
        &app.router,
        "POST",
        "/auth/reset/confirm",
        None,
        Some(json!({ "email": SALES.0, "otp": otp, "newPassword": "Harbour2026" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    login(&app.router, (SALES.0, "Harbour2026")).await;
}

#[tokio::test]
async fn test_user_management_is_admin_only() {
    let app = test_app();
    let admin = login(&app.router, ADMIN).await;
    let sales = login(&app.router, SALES).await;

    let (status, users) = send(&app.router, "GET", "/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 6);

    let (status, body) = send(&app.router, "GET", "/users", Some(&sales), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], true);

    let (status, created) = send(
        &app.router,
        "POST",
        "/users",
        Some(&admin),
        Some(json!({
            "email": "ops2@freight.com",
            "name": "Kasun Silva",
            "role": "CSE",
            "password": "Harbour2026",
            "sbuId": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["role"], "CSE");
}
