use axum::{Json, extract::State, http::StatusCode};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{hash_password, verify_password};
use crate::common::AppState;
use crate::entity::users;
use crate::error::{AppError, AppJson, AppResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
}

fn require_fields(body: CredentialsRequest) -> AppResult<(String, String)> {
    match (body.email, body.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            Ok((email, password))
        }
        _ => Err(AppError::Validation(
            "email and password are required".to_string(),
        )),
    }
}

/// Register a new user
///
/// Stores the bcrypt hash of the password, never the clear text. No token
/// is issued; the client logs in separately.
#[utoipa::path(
    post,
    path = "/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Missing email or password"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "credentials"
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let (email, password) = require_fields(body)?;

    let password_hash = hash_password(&password)?;

    let user = users::ActiveModel {
        email: Set(email.clone()),
        password_hash: Set(password_hash),
        ..Default::default()
    };

    match user.insert(&*state.db).await {
        Ok(created) => {
            tracing::info!(user_id = created.id, "User registered");
            Ok((
                StatusCode::CREATED,
                Json(RegisterResponse {
                    message: "user registered".to_string(),
                }),
            ))
        }
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::Conflict(
                "email already registered".to_string(),
            )),
            _ => Err(e.into()),
        },
    }
}

/// Log in with email and password
///
/// Unknown email and wrong password yield the same 401 body, so the
/// response does not reveal which accounts exist.
#[utoipa::path(
    post,
    path = "/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "credentials"
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<CredentialsRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (email, password) = require_fields(body)?;

    let user = users::Entity::find()
        .filter(users::Column::Email.eq(&email))
        .one(&*state.db)
        .await?;

    let Some(user) = user else {
        tracing::debug!("Login failed: unknown email");
        return Err(AppError::Unauthorized("invalid credentials".to_string()));
    };

    if !verify_password(&password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "Login failed: wrong password");
        return Err(AppError::Unauthorized("invalid credentials".to_string()));
    }

    let token = state
        .tokens
        .issue(user.id, &user.email)
        .map_err(|e| AppError::Internal(format!("token issuance failed: {e}")))?;

    tracing::info!(user_id = user.id, "Login succeeded");

    Ok(Json(LoginResponse {
        token,
        email: user.email,
    }))
}
