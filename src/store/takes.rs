use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::entities::takes;
use crate::error::{AppError, AppResult, ConstraintViolation};
use crate::store::{ensure_service, ensure_user};

#[derive(Debug, Clone)]
pub struct NewTakes {
    pub user_id: String,
    pub service_id: i32,
    /// Defaults to now
    pub date_taken: Option<NaiveDate>,
    pub time_taken: Option<NaiveTime>,
}

/// Record that a user takes a service. The (user, service) pair may appear once.
pub async fn insert(db: &DatabaseConnection, new: NewTakes) -> AppResult<takes::Model> {
    let txn = db.begin().await?;

    ensure_user(&txn, &new.user_id).await?;
    ensure_service(&txn, new.service_id).await?;

    if takes::Entity::find_by_id((new.user_id.clone(), new.service_id))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(ConstraintViolation::Unique {
            field: "(user_id, service_id)",
            value: format!("({}, {})", new.user_id, new.service_id),
        }
        .into());
    }

    let now = Utc::now();
    let model = takes::ActiveModel {
        user_id: Set(new.user_id),
        service_id: Set(new.service_id),
        date_taken: Set(new.date_taken.unwrap_or_else(|| now.date_naive())),
        time_taken: Set(new.time_taken.unwrap_or_else(|| now.time())),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(model)
}

pub async fn delete(db: &DatabaseConnection, user_id: &str, service_id: i32) -> AppResult<()> {
    let result = takes::Entity::delete_by_id((user_id.to_string(), service_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Service subscription not found".to_string()));
    }
    Ok(())
}

pub async fn list_for_user(db: &DatabaseConnection, user_id: &str) -> AppResult<Vec<takes::Model>> {
    Ok(takes::Entity::find()
        .filter(takes::Column::UserId.eq(user_id))
        .order_by_asc(takes::Column::ServiceId)
        .all(db)
        .await?)
}
