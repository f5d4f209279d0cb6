use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, QueryFilter};

use crate::config::{AdminSeed, Config};
use crate::entities::user;
use crate::error::{AppError, AppResult};
use crate::store::{self, user::NewUser};
use crate::utils::password;

pub async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options.sqlx_logging(false);

    Database::connect(options)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to connect to database: {}", e)))
}

/// Bring the schema up to date
pub async fn migrate(db: &DatabaseConnection) -> AppResult<()> {
    Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to run migrations: {}", e)))
}

/// Create the admin account unless its id or email is already taken.
///
/// Returns whether an account was created.
pub async fn seed_admin(db: &DatabaseConnection, seed: &AdminSeed) -> AppResult<bool> {
    let email_taken = user::Entity::find()
        .filter(user::Column::Email.eq(seed.email.trim().to_lowercase()))
        .one(db)
        .await?
        .is_some();
    if email_taken {
        return Ok(false);
    }

    match store::user::find(db, seed.user_id.trim()).await {
        Ok(_) => return Ok(false),
        Err(AppError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }

    let admin = NewUser {
        user_id: seed.user_id.clone(),
        name: "Administrator".to_string(),
        phone: seed.phone.clone(),
        date_of_birth: NaiveDate::default(),
        email: seed.email.clone(),
        gender: "Other".to_string(),
        street: "N/A".to_string(),
        area: "N/A".to_string(),
        city: "N/A".to_string(),
        is_admin: true,
        verification_status: "Verified".to_string(),
        password_hash: password::hash_password(&seed.password)?,
    };

    store::user::insert(db, admin).await?;
    tracing::info!(user_id = %seed.user_id, "Admin account created");
    Ok(true)
}
