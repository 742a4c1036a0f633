//! Handler-level tests for registration and login, driven against a mock
//! database connection.
//!
//! Run with: cargo test --test credentials_test

use axum::extract::State;
use axum::http::StatusCode;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

use relay_api::common::AppState;
use relay_api::config::{Config, Deployment};
use relay_api::entity::users;
use relay_api::error::{AppError, AppJson};
use relay_api::routes::credentials::{self, CredentialsRequest};

fn test_state(db: DatabaseConnection) -> AppState {
    let config = Config {
        database_url: "postgres://unused".to_string(),
        jwt_secret: "credentials-test-secret".to_string(),
        token_ttl_hours: 2,
        relay_enroll_id: "relay-01".to_string(),
        log_timezone: chrono_tz::Tz::America__Mexico_City,
        api_host: "127.0.0.1".to_string(),
        api_port: 3000,
        deployment: Deployment::Local,
    };
    AppState::new(db, config)
}

fn body(email: Option<&str>, password: Option<&str>) -> AppJson<CredentialsRequest> {
    AppJson(CredentialsRequest {
        email: email.map(str::to_string),
        password: password.map(str::to_string),
    })
}

fn stored_user(id: i32, email: &str, password: &str) -> users::Model {
    users::Model {
        id,
        email: email.to_string(),
        // Low cost to keep the test fast; production path uses DEFAULT_COST
        password_hash: bcrypt::hash(password, 4).unwrap(),
        created_at: None,
    }
}

#[tokio::test]
async fn register_then_login_roundtrips_the_subject_email() {
    let user = stored_user(1, "a@x.com", "pw123");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([
            // register: insert returning the created user
            vec![user.clone()],
            // login: lookup by email
            vec![user],
        ])
        .into_connection();
    let state = test_state(db);

    let (code, _) = credentials::register(State(state.clone()), body(Some("a@x.com"), Some("pw123")))
        .await
        .unwrap();
    assert_eq!(code, StatusCode::CREATED);

    let response = credentials::login(State(state.clone()), body(Some("a@x.com"), Some("pw123")))
        .await
        .unwrap();
    assert_eq!(response.0.email, "a@x.com");

    // The issued token decodes back to the registered subject
    let claims = state.tokens.verify(&response.0.token).unwrap();
    assert_eq!(claims.sub, 1);
    assert_eq!(claims.email, "a@x.com");
}

#[tokio::test]
async fn missing_fields_are_rejected_before_touching_the_store() {
    let state = test_state(DatabaseConnection::default());

    for (email, password) in [(None, Some("pw123")), (Some("a@x.com"), None), (None, None)] {
        let err = credentials::register(State(state.clone()), body(email, password))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = credentials::login(State(state.clone()), body(email, password))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

#[tokio::test]
async fn unknown_email_and_wrong_password_fail_alike() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([
            // Unknown email: lookup returns nothing
            Vec::<users::Model>::new(),
            // Wrong password: lookup succeeds, hash comparison fails
            vec![stored_user(1, "a@x.com", "pw123")],
        ])
        .into_connection();
    let state = test_state(db);

    let unknown = credentials::login(State(state.clone()), body(Some("b@x.com"), Some("pw123")))
        .await
        .unwrap_err();
    let wrong = credentials::login(State(state), body(Some("a@x.com"), Some("nope")))
        .await
        .unwrap_err();

    assert!(matches!(unknown, AppError::Unauthorized(_)));
    assert!(matches!(wrong, AppError::Unauthorized(_)));

    // Neither failure reveals which accounts exist
    assert_eq!(unknown.to_string(), wrong.to_string());
}
