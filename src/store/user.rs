use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;

use crate::entities::user::{self, VerificationStatus};
use crate::error::{AppError, AppResult, ConstraintViolation};
use crate::store::cascade::{self, DeletionSummary};
use crate::store::validate;

pub const USER_ID_MAX: usize = 8;
pub const PHONE_MAX: usize = 11;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
    pub gender: String,
    pub street: String,
    pub area: String,
    pub city: String,
    pub is_admin: bool,
    pub verification_status: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub street: Option<String>,
    pub area: Option<String>,
    pub city: Option<String>,
    pub is_admin: Option<bool>,
    pub verification_status: Option<String>,
}

async fn ensure_unique<C: ConnectionTrait>(
    conn: &C,
    column: user::Column,
    field: &'static str,
    value: &str,
    except: Option<&str>,
) -> AppResult<()> {
    let mut query = user::Entity::find().filter(column.eq(value));
    if let Some(user_id) = except {
        query = query.filter(user::Column::UserId.ne(user_id));
    }

    if query.one(conn).await?.is_some() {
        return Err(ConstraintViolation::Unique {
            field,
            value: value.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Insert a user, enforcing key, phone and email uniqueness
pub async fn insert(db: &DatabaseConnection, new: NewUser) -> AppResult<user::Model> {
    let user_id = validate::text("user_id", &new.user_id, USER_ID_MAX)?;
    if user_id.contains('@') {
        // Login identifiers containing '@' are read as emails
        return Err(ConstraintViolation::Invalid {
            field: "user_id",
            reason: "must not contain '@'".to_string(),
        }
        .into());
    }
    let name = validate::text("name", &new.name, 100)?;
    let phone = validate::phone("phone", &new.phone, PHONE_MAX)?;
    let email = validate::email("email", &new.email)?;
    let gender = validate::text("gender", &new.gender, 10)?;
    let street = validate::text("street", &new.street, 100)?;
    let area = validate::text("area", &new.area, 50)?;
    let city = validate::text("city", &new.city, 50)?;
    let verification_status: VerificationStatus =
        validate::choice("verification_status", &new.verification_status)?;

    let txn = db.begin().await?;

    if user::Entity::find_by_id(user_id.clone())
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(ConstraintViolation::Unique {
            field: "user_id",
            value: user_id,
        }
        .into());
    }
    ensure_unique(&txn, user::Column::Phone, "phone", &phone, None).await?;
    ensure_unique(&txn, user::Column::Email, "email", &email, None).await?;

    let model = user::ActiveModel {
        user_id: Set(user_id),
        name: Set(name),
        phone: Set(phone),
        date_of_birth: Set(new.date_of_birth),
        email: Set(email),
        gender: Set(gender),
        street: Set(street),
        area: Set(area),
        city: Set(city),
        is_admin: Set(new.is_admin),
        verification_status: Set(verification_status),
        password_hash: Set(new.password_hash),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(user_id = %model.user_id, "User created");
    Ok(model)
}

/// Apply changes to a user, re-validating every changed field
pub async fn update(
    db: &DatabaseConnection,
    user_id: &str,
    changes: UserChanges,
) -> AppResult<user::Model> {
    let txn = db.begin().await?;

    let existing = user::Entity::find_by_id(user_id.to_string())
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut active: user::ActiveModel = existing.into();

    if let Some(name) = changes.name {
        active.name = Set(validate::text("name", &name, 100)?);
    }

    if let Some(phone) = changes.phone {
        let phone = validate::phone("phone", &phone, PHONE_MAX)?;
        ensure_unique(&txn, user::Column::Phone, "phone", &phone, Some(user_id)).await?;
        active.phone = Set(phone);
    }

    if let Some(email) = changes.email {
        let email = validate::email("email", &email)?;
        ensure_unique(&txn, user::Column::Email, "email", &email, Some(user_id)).await?;
        active.email = Set(email);
    }

    if let Some(date_of_birth) = changes.date_of_birth {
        active.date_of_birth = Set(date_of_birth);
    }

    if let Some(gender) = changes.gender {
        active.gender = Set(validate::text("gender", &gender, 10)?);
    }

    if let Some(street) = changes.street {
        active.street = Set(validate::text("street", &street, 100)?);
    }

    if let Some(area) = changes.area {
        active.area = Set(validate::text("area", &area, 50)?);
    }

    if let Some(city) = changes.city {
        active.city = Set(validate::text("city", &city, 50)?);
    }

    if let Some(is_admin) = changes.is_admin {
        active.is_admin = Set(is_admin);
    }

    if let Some(status) = changes.verification_status {
        let status: VerificationStatus = validate::choice("verification_status", &status)?;
        active.verification_status = Set(status);
    }

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    Ok(updated)
}

pub async fn set_password_hash(
    db: &DatabaseConnection,
    user_id: &str,
    password_hash: String,
) -> AppResult<()> {
    let existing = find(db, user_id).await?;
    let mut active: user::ActiveModel = existing.into();
    active.password_hash = Set(password_hash);
    active.update(db).await?;
    Ok(())
}

/// Delete a user together with their takes, bookings, OTPs and sessions
pub async fn delete(db: &DatabaseConnection, user_id: &str) -> AppResult<DeletionSummary> {
    let txn = db.begin().await?;

    if user::Entity::find_by_id(user_id.to_string())
        .one(&txn)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let mut summary = DeletionSummary::default();
    cascade::user(&txn, user_id, &mut summary).await?;
    txn.commit().await?;

    tracing::info!(user_id, removed = summary.total(), "User deleted");
    Ok(summary)
}

pub async fn find(db: &DatabaseConnection, user_id: &str) -> AppResult<user::Model> {
    user::Entity::find_by_id(user_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn list(db: &DatabaseConnection) -> AppResult<Vec<user::Model>> {
    Ok(user::Entity::find()
        .order_by_asc(user::Column::UserId)
        .all(db)
        .await?)
}
