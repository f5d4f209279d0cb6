use std::env;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Mark session cookies `Secure`; enable behind TLS
    pub secure_cookies: bool,
    pub login_attempts_per_minute: u32,
    pub admin_seed: Option<AdminSeed>,
}

/// Admin account created at start-up when all four variables are set
#[derive(Clone, Debug)]
pub struct AdminSeed {
    pub user_id: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

fn required(key: &str) -> AppResult<String> {
    env::var(key).map_err(|_| AppError::Config(format!("{} must be set", key)))
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let admin_seed = match (
            env::var("ADMIN_USER_ID"),
            env::var("ADMIN_EMAIL"),
            env::var("ADMIN_PHONE"),
            env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(user_id), Ok(email), Ok(phone), Ok(password)) => Some(AdminSeed {
                user_id,
                email,
                phone,
                password,
            }),
            (Err(_), Err(_), Err(_), Err(_)) => None,
            _ => {
                return Err(AppError::Config(
                    "ADMIN_USER_ID, ADMIN_EMAIL, ADMIN_PHONE and ADMIN_PASSWORD must be set together"
                        .to_string(),
                ));
            }
        };

        let config = Self {
            database_url: required("DATABASE_URL")?,
            session_secret: required("SESSION_SECRET")?,
            session_ttl_hours: parsed_or("SESSION_TTL_HOURS", 24)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: parsed_or("SERVER_PORT", 3000)?,
            secure_cookies: parsed_or("SECURE_COOKIES", false)?,
            login_attempts_per_minute: parsed_or("LOGIN_ATTEMPTS_PER_MINUTE", 10)?,
            admin_seed,
        };

        if config.session_ttl_hours <= 0 {
            return Err(AppError::Config(
                "SESSION_TTL_HOURS must be positive".to_string(),
            ));
        }
        if config.login_attempts_per_minute == 0 {
            return Err(AppError::Config(
                "LOGIN_ATTEMPTS_PER_MINUTE must be positive".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
