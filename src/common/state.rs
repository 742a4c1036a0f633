use chrono::Duration;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    // Arc because `DatabaseConnection` is not `Clone` when sea-orm's
    // `mock` feature is enabled (as it is for tests).
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<Config>,
    pub tokens: TokenService,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let tokens = TokenService::new(
            &config.jwt_secret,
            Duration::hours(config.token_ttl_hours),
        );

        Self {
            db: Arc::new(db),
            config: Arc::new(config),
            tokens,
        }
    }
}
