use axum::{Json, extract::State};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::common::AppState;
use crate::entity::device_logs::{self, RelayAction};
use crate::entity::relay_status;
use crate::error::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct RelayState {
    #[serde(rename = "isOn")]
    pub is_on: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: RelayState,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogEntryResponse {
    pub action: RelayAction,
    pub timestamp: chrono::DateTime<chrono::FixedOffset>,
}

/// Append an audit entry for a relay transition. Runs on every call, even
/// when the state write was a no-op: the trail records attempts, not just
/// effective changes.
async fn append_log(state: &AppState, caller: &AuthUser, action: RelayAction) -> AppResult<()> {
    let now = Utc::now()
        .with_timezone(&state.config.log_timezone)
        .fixed_offset();

    device_logs::ActiveModel {
        action: Set(action),
        user_email: Set(caller.email.clone()),
        enroll_id: Set(state.config.relay_enroll_id.clone()),
        logged_at: Set(now),
        ..Default::default()
    }
    .insert(&*state.db)
    .await?;

    Ok(())
}

/// Turn the relay on
///
/// Idempotent: inserting the sentinel row is a no-op when it already
/// exists. The audit entry is appended unconditionally.
#[utoipa::path(
    post,
    path = "/turn-on",
    responses(
        (status = 200, description = "Relay is on", body = StatusResponse),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Invalid or expired token"),
    ),
    tag = "relay"
)]
pub async fn turn_on(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<StatusResponse>> {
    relay_status::Entity::insert(relay_status::ActiveModel {
        id: Set(relay_status::SENTINEL_ID),
    })
    .on_conflict(
        OnConflict::column(relay_status::Column::Id)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(&*state.db)
    .await?;

    append_log(&state, &caller, RelayAction::TurnOn).await?;

    tracing::info!(user = %caller.email, "Relay turned on");

    Ok(Json(StatusResponse {
        status: RelayState { is_on: true },
    }))
}

/// Turn the relay off
///
/// Idempotent: deleting the sentinel row is a no-op when it is already
/// absent. The audit entry is appended unconditionally.
#[utoipa::path(
    post,
    path = "/turn-off",
    responses(
        (status = 200, description = "Relay is off", body = StatusResponse),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Invalid or expired token"),
    ),
    tag = "relay"
)]
pub async fn turn_off(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<StatusResponse>> {
    relay_status::Entity::delete_by_id(relay_status::SENTINEL_ID)
        .exec(&*state.db)
        .await?;

    append_log(&state, &caller, RelayAction::TurnOff).await?;

    tracing::info!(user = %caller.email, "Relay turned off");

    Ok(Json(StatusResponse {
        status: RelayState { is_on: false },
    }))
}

/// Read the relay state
///
/// Unauthenticated: the state is encoded by the presence of the sentinel
/// row.
#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Current relay state", body = StatusResponse),
    ),
    tag = "relay"
)]
pub async fn status(State(state): State<AppState>) -> AppResult<Json<StatusResponse>> {
    let is_on = relay_status::Entity::find_by_id(relay_status::SENTINEL_ID)
        .one(&*state.db)
        .await?
        .is_some();

    Ok(Json(StatusResponse {
        status: RelayState { is_on },
    }))
}

/// List the caller's relay actions, most recent first
#[utoipa::path(
    get,
    path = "/logs",
    responses(
        (status = 200, description = "Audit entries for the caller", body = Vec<LogEntryResponse>),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Invalid or expired token"),
    ),
    tag = "relay"
)]
pub async fn logs(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Vec<LogEntryResponse>>> {
    let entries = device_logs::Entity::find()
        .filter(device_logs::Column::UserEmail.eq(&caller.email))
        .order_by_desc(device_logs::Column::LoggedAt)
        .order_by_desc(device_logs::Column::Id)
        .all(&*state.db)
        .await?;

    let response: Vec<LogEntryResponse> = entries
        .into_iter()
        .map(|e| LogEntryResponse {
            action: e.action,
            timestamp: e.logged_at,
        })
        .collect();

    Ok(Json(response))
}
