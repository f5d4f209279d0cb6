pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod store;
pub mod utils;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::middleware::rate_limit::LoginThrottle;

pub use config::Config;
pub use error::{AppError, AppResult, ConstraintViolation};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub login_throttle: Arc<LoginThrottle>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let login_throttle = Arc::new(LoginThrottle::per_minute(
            config.login_attempts_per_minute,
        ));
        Self {
            db,
            config,
            login_throttle,
        }
    }
}
