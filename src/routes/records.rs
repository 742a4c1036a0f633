use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::AppState;
use crate::entity::data_records;
use crate::error::{AppError, AppJson, AppResult};

/// Clients send either a bare `{value}` or a larger form payload; only
/// `value` is persisted, the rest is ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveRequest {
    pub value: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordResponse {
    pub id: i32,
    pub value: String,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<data_records::Model> for RecordResponse {
    fn from(m: data_records::Model) -> Self {
        Self {
            id: m.id,
            value: m.value,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListResponse {
    pub data: Vec<RecordResponse>,
    pub total: usize,
}

/// Save a generic data record
#[utoipa::path(
    post,
    path = "/save-data",
    request_body = SaveRequest,
    responses(
        (status = 201, description = "Record created", body = RecordResponse),
        (status = 400, description = "Missing value"),
    ),
    tag = "records"
)]
pub async fn save(
    State(state): State<AppState>,
    AppJson(body): AppJson<SaveRequest>,
) -> AppResult<(StatusCode, Json<RecordResponse>)> {
    let Some(value) = body.value.filter(|v| !v.is_empty()) else {
        return Err(AppError::Validation("value is required".to_string()));
    };

    let now = Utc::now()
        .with_timezone(&state.config.log_timezone)
        .fixed_offset();

    let created = data_records::ActiveModel {
        value: Set(value),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&*state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List all data records in creation order
#[utoipa::path(
    get,
    path = "/get-data",
    responses(
        (status = 200, description = "Records retrieved", body = ListResponse),
    ),
    tag = "records"
)]
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ListResponse>> {
    let data: Vec<RecordResponse> = data_records::Entity::find()
        .order_by_asc(data_records::Column::Id)
        .all(&*state.db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let total = data.len();

    Ok(Json(ListResponse { data, total }))
}
