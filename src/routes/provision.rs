use axum::{Json, extract::State, http::StatusCode};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::AppState;
use crate::error::{AppError, AppResult};

/// Fixed column sets for every provisionable table. Mirrors the init
/// migration, indexes included; `IF NOT EXISTS` keeps re-provisioning a
/// no-op so existing rows are never touched.
const DATA_TABLE: (&str, &[&str]) = (
    "data_records",
    &["CREATE TABLE IF NOT EXISTS data_records (
        id SERIAL PRIMARY KEY,
        value TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )"],
);

const DEVICE_TABLES: &[(&str, &[&str])] = &[
    (
        "users",
        &["CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            email VARCHAR(254) NOT NULL UNIQUE,
            password_hash VARCHAR(128) NOT NULL,
            created_at TIMESTAMPTZ DEFAULT NOW()
        )"],
    ),
    (
        "relay_status",
        &["CREATE TABLE IF NOT EXISTS relay_status (
            id INTEGER PRIMARY KEY
        )"],
    ),
    (
        "device_logs",
        &[
            "CREATE TABLE IF NOT EXISTS device_logs (
                id SERIAL PRIMARY KEY,
                action VARCHAR(16) NOT NULL,
                user_email VARCHAR(254) NOT NULL,
                enroll_id VARCHAR(64) NOT NULL,
                logged_at TIMESTAMPTZ NOT NULL
            )",
            "CREATE INDEX IF NOT EXISTS idx_device_logs_user_time
                ON device_logs (user_email, logged_at DESC)",
        ],
    ),
];

#[derive(Debug, Serialize, ToSchema)]
pub struct TableStatus {
    pub table: String,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
}

async fn table_exists(db: &DatabaseConnection, name: &str) -> AppResult<bool> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        "SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = $1
        ) AS present",
        [name.into()],
    );

    let row = db
        .query_one(stmt)
        .await?
        .ok_or_else(|| AppError::Internal("table existence query returned no row".to_string()))?;

    Ok(row.try_get::<bool>("", "present")?)
}

async fn ensure_tables(
    db: &DatabaseConnection,
    tables: &[(&str, &[&str])],
) -> AppResult<(StatusCode, Vec<TableStatus>)> {
    let mut statuses = Vec::with_capacity(tables.len());
    let mut any_created = false;

    for (name, ddl) in tables {
        let existed = table_exists(db, name).await?;
        if !existed {
            for stmt in *ddl {
                db.execute_unprepared(stmt).await?;
            }
            tracing::info!(table = name, "Table created");
            any_created = true;
        }
        statuses.push(TableStatus {
            table: (*name).to_string(),
            status: if existed { "already existed" } else { "created" }.to_string(),
        });
    }

    let code = if any_created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((code, statuses))
}

/// Provision the generic data table
///
/// Idempotent: reports "already existed" on repeat calls and never alters
/// or destroys existing rows.
#[utoipa::path(
    post,
    path = "/create-table",
    responses(
        (status = 201, description = "Table created", body = Vec<TableStatus>),
        (status = 200, description = "Table already existed", body = Vec<TableStatus>),
    ),
    tag = "provisioning"
)]
pub async fn create_data_table(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<TableStatus>>)> {
    let (code, statuses) = ensure_tables(&state.db, &[DATA_TABLE]).await?;
    Ok((code, Json(statuses)))
}

/// Provision the user, relay state, and device log tables
#[utoipa::path(
    post,
    path = "/create-device-tables",
    responses(
        (status = 201, description = "At least one table created", body = Vec<TableStatus>),
        (status = 200, description = "All tables already existed", body = Vec<TableStatus>),
    ),
    tag = "provisioning"
)]
pub async fn create_device_tables(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<TableStatus>>)> {
    let (code, statuses) = ensure_tables(&state.db, DEVICE_TABLES).await?;
    Ok((code, Json(statuses)))
}

/// Drop the generic data table
#[utoipa::path(
    post,
    path = "/delete-table",
    responses(
        (status = 200, description = "Table dropped", body = DeleteResponse),
        (status = 404, description = "Table already absent"),
    ),
    tag = "provisioning"
)]
pub async fn delete_data_table(
    State(state): State<AppState>,
) -> AppResult<Json<DeleteResponse>> {
    let (name, _) = DATA_TABLE;

    if !table_exists(&state.db, name).await? {
        return Err(AppError::NotFound(format!("table {name} does not exist")));
    }

    state
        .db
        .execute_unprepared(&format!("DROP TABLE {name}"))
        .await?;

    tracing::warn!(table = name, "Table dropped");

    Ok(Json(DeleteResponse {
        message: format!("table {name} dropped"),
    }))
}

#[cfg(test)]
mod tests {
    use super::{DATA_TABLE, DEVICE_TABLES};

    #[test]
    fn device_tables_cover_the_migration_set() {
        let names: Vec<&str> = DEVICE_TABLES.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["users", "relay_status", "device_logs"]);
        assert_eq!(DATA_TABLE.0, "data_records");
    }

    #[test]
    fn device_log_ddl_recreates_user_time_index() {
        let (_, ddl) = DEVICE_TABLES
            .iter()
            .find(|(n, _)| *n == "device_logs")
            .unwrap();
        assert!(
            ddl.iter()
                .any(|s| s.contains("CREATE INDEX IF NOT EXISTS idx_device_logs_user_time"))
        );
    }

    #[test]
    fn all_ddl_is_idempotent() {
        let all = DEVICE_TABLES.iter().chain(std::iter::once(&DATA_TABLE));
        for (_, ddl) in all {
            assert!(ddl[0].contains("CREATE TABLE IF NOT EXISTS"));
        }
    }
}
