// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication, password reset and user management routes.

use axum::{Json, extract::State as AxumState, http::StatusCode};
use freight_desk_api::{
    ConfirmOtpRequest, CreateUserRequest, LoginRequest, LoginResponse, MeResponse,
    MessageResponse, RefreshRequest, RefreshResponse, RequestOtpRequest,
    handlers::{auth, users},
};
use freight_desk_persistence::UserData;
use tracing::info;

use super::http_cause;
use crate::AppState;
use crate::error::HttpError;
use crate::session::SessionUser;

/// Handler for POST /auth/login endpoint.
pub async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(email = %req.email, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = auth::login(&mut persistence, &req, http_cause("Login"))?;
    drop(persistence);

    info!(user_id = response.user.user_id, "Login succeeded");
    Ok(Json(response))
}

/// Handler for POST /auth/refresh endpoint.
pub async fn handle_refresh(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RefreshResponse = auth::refresh(&mut persistence, &req)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST /auth/logout endpoint.
///
/// Revokes every session held by the caller.
pub async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(user_id = actor.user_id, "Handling logout request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = auth::logout(&mut persistence, &actor, http_cause("Logout"))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET /auth/me endpoint.
#[allow(clippy::unused_async)]
pub async fn handle_me(SessionUser(actor, user): SessionUser) -> Json<MeResponse> {
    Json(auth::me(&actor, user))
}

/// Handler for POST /auth/reset/request-otp endpoint.
pub async fn handle_request_otp(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RequestOtpRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(email = %req.email, "Handling password reset code request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse =
        auth::request_otp(&mut persistence, app_state.queue.as_ref(), &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST /auth/reset/confirm endpoint.
pub async fn handle_confirm_otp(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ConfirmOtpRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(email = %req.email, "Handling password reset confirmation");

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse =
        auth::confirm_otp(&mut persistence, &req, http_cause("Password reset"))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET /users endpoint.
pub async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<Vec<UserData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let users: Vec<UserData> = users::list_users(&mut persistence, &actor)?;
    drop(persistence);
    Ok(Json(users))
}

/// Handler for POST /users endpoint.
pub async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserData>), HttpError> {
    info!(user_id = actor.user_id, email = %req.email, role = %req.role, "Handling create user request");

    let mut persistence = app_state.persistence.lock().await;
    let user: UserData = users::create_user(&mut persistence, &actor, &req)?;
    drop(persistence);

    info!(created_user_id = user.user_id, "Created user");
    Ok((StatusCode::CREATED, Json(user)))
}
