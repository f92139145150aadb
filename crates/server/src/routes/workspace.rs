// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-user workspace routes: sales activities, the in-app inbox and the
//! dashboard.

use axum::{
    Json,
    extract::{Path, State as AxumState},
    http::StatusCode,
};
use freight_desk_api::{
    CreateActivityRequest, DashboardResponse, MarkAllReadResponse, UpdateActivityRequest,
    handlers::{activities, dashboard, notifications},
};
use freight_desk_persistence::{ActivityData, NotificationData};
use tracing::info;

use crate::AppState;
use crate::error::HttpError;
use crate::session::SessionUser;

/// Handler for POST /activities endpoint.
pub async fn handle_create_activity(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Json(req): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<ActivityData>), HttpError> {
    info!(user_id = actor.user_id, activity_type = ?req.activity_type, "Handling create activity");

    let mut persistence = app_state.persistence.lock().await;
    let activity: ActivityData = activities::create_activity(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(activity)))
}

/// Handler for GET /activities endpoint.
pub async fn handle_list_activities(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<Vec<ActivityData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let list: Vec<ActivityData> = activities::list_activities(&mut persistence, &actor)?;
    drop(persistence);
    Ok(Json(list))
}

/// Handler for GET /activities/{id} endpoint.
pub async fn handle_get_activity(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<ActivityData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let activity: ActivityData = activities::get_activity(&mut persistence, id)?;
    drop(persistence);
    Ok(Json(activity))
}

/// Handler for PATCH /activities/{id} endpoint.
pub async fn handle_update_activity(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateActivityRequest>,
) -> Result<Json<ActivityData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let activity: ActivityData = activities::update_activity(&mut persistence, &actor, id, &req)?;
    drop(persistence);
    Ok(Json(activity))
}

/// Handler for DELETE /activities/{id} endpoint.
pub async fn handle_delete_activity(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    activities::delete_activity(&mut persistence, &actor, id)?;
    drop(persistence);
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /notifications endpoint.
pub async fn handle_list_notifications(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<Vec<NotificationData>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let inbox: Vec<NotificationData> = notifications::list_notifications(&mut persistence, &actor)?;
    drop(persistence);
    Ok(Json(inbox))
}

/// Handler for PATCH /notifications/{id}/read endpoint.
pub async fn handle_mark_read(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(id): Path<i64>,
) -> Result<Json<NotificationData>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let notification: NotificationData =
        notifications::mark_notification_read(&mut persistence, &actor, id)?;
    drop(persistence);
    Ok(Json(notification))
}

/// Handler for POST /notifications/read-all endpoint.
pub async fn handle_mark_all_read(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<MarkAllReadResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MarkAllReadResponse =
        notifications::mark_all_notifications_read(&mut persistence, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET /dashboard endpoint.
pub async fn handle_dashboard(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<DashboardResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: DashboardResponse = dashboard::dashboard(&mut persistence, &actor)?;
    drop(persistence);
    Ok(Json(response))
}
