//! Handler-level tests for the relay state machine, driven against a mock
//! database connection.
//!
//! Run with: cargo test --test relay_test

use axum::extract::State;
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};

use relay_api::auth::AuthUser;
use relay_api::common::AppState;
use relay_api::config::{Config, Deployment};
use relay_api::entity::device_logs::{self, RelayAction};
use relay_api::routes::relay;

fn test_state(db: DatabaseConnection) -> AppState {
    let config = Config {
        database_url: "postgres://unused".to_string(),
        jwt_secret: "relay-test-secret".to_string(),
        token_ttl_hours: 2,
        relay_enroll_id: "relay-01".to_string(),
        log_timezone: chrono_tz::Tz::America__Mexico_City,
        api_host: "127.0.0.1".to_string(),
        api_port: 3000,
        deployment: Deployment::Local,
    };
    AppState::new(db, config)
}

fn caller(email: &str) -> AuthUser {
    AuthUser {
        id: 1,
        email: email.to_string(),
    }
}

fn log_row(id: i32, action: RelayAction, email: &str) -> device_logs::Model {
    device_logs::Model {
        id,
        action,
        user_email: email.to_string(),
        enroll_id: "relay-01".to_string(),
        logged_at: Utc::now().fixed_offset(),
    }
}

#[tokio::test]
async fn double_turn_on_keeps_one_row_but_logs_twice() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            // First call inserts the sentinel row
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            // Second call conflicts and inserts nothing
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .append_query_results([
            vec![log_row(1, RelayAction::TurnOn, "a@x.com")],
            vec![log_row(2, RelayAction::TurnOn, "a@x.com")],
        ])
        .into_connection();
    let state = test_state(db);

    let first = relay::turn_on(State(state.clone()), caller("a@x.com"))
        .await
        .unwrap();
    assert!(first.0.status.is_on);

    let second = relay::turn_on(State(state.clone()), caller("a@x.com"))
        .await
        .unwrap();
    assert!(second.0.status.is_on);

    let log = format!("{:?}", std::sync::Arc::try_unwrap(state.db).unwrap().into_transaction_log());

    // The sentinel write is an insert-or-ignore, never a failing insert
    assert_eq!(log.matches("ON CONFLICT").count(), 2);
    assert_eq!(log.matches("DO NOTHING").count(), 2);

    // Both calls appended an audit entry even though only one changed state
    assert_eq!(log.matches("device_logs").count(), 2);
}

#[tokio::test]
async fn turn_off_when_already_off_still_logs() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            // Delete finds nothing to remove
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .append_query_results([vec![log_row(1, RelayAction::TurnOff, "a@x.com")]])
        .into_connection();
    let state = test_state(db);

    let response = relay::turn_off(State(state.clone()), caller("a@x.com"))
        .await
        .unwrap();
    assert!(!response.0.status.is_on);

    let log = format!("{:?}", std::sync::Arc::try_unwrap(state.db).unwrap().into_transaction_log());
    assert_eq!(log.matches("DELETE").count(), 1);
    assert_eq!(log.matches("device_logs").count(), 1);
}

#[tokio::test]
async fn logs_filter_by_caller_email_newest_first() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            log_row(2, RelayAction::TurnOff, "a@x.com"),
            log_row(1, RelayAction::TurnOn, "a@x.com"),
        ]])
        .into_connection();
    let state = test_state(db);

    let response = relay::logs(State(state.clone()), caller("a@x.com"))
        .await
        .unwrap();

    assert_eq!(response.0.len(), 2);
    assert_eq!(response.0[0].action, RelayAction::TurnOff);
    assert_eq!(response.0[1].action, RelayAction::TurnOn);

    // The query is scoped to the caller and ordered newest first
    let log = format!("{:?}", std::sync::Arc::try_unwrap(state.db).unwrap().into_transaction_log());
    assert!(log.contains("user_email"));
    assert!(log.contains("a@x.com"));
    assert!(log.contains("DESC"));
}

#[tokio::test]
async fn status_reads_sentinel_row_presence() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([
            vec![relay_api::entity::relay_status::Model { id: 1 }],
            Vec::<relay_api::entity::relay_status::Model>::new(),
        ])
        .into_connection();
    let state = test_state(db);

    let on = relay::status(State(state.clone())).await.unwrap();
    assert!(on.0.status.is_on);

    let off = relay::status(State(state)).await.unwrap();
    assert!(!off.0.status.is_on);
}
