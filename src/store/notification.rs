use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::Deserialize;

use crate::entities::notification;
use crate::error::{AppError, AppResult, ConstraintViolation};
use crate::store::validate;

#[derive(Debug, Clone, Deserialize)]
pub struct NewNotification {
    pub send_time: DateTime<Utc>,
    pub receive_time: DateTime<Utc>,
    pub message: String,
}

pub async fn insert(
    db: &DatabaseConnection,
    new: NewNotification,
) -> AppResult<notification::Model> {
    let message = validate::text("message", &new.message, 255)?;
    if new.receive_time < new.send_time {
        return Err(ConstraintViolation::Invalid {
            field: "receive_time",
            reason: "must not precede send_time".to_string(),
        }
        .into());
    }

    let model = notification::ActiveModel {
        send_time: Set(new.send_time.into()),
        receive_time: Set(new.receive_time.into()),
        message: Set(message),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(model)
}

pub async fn delete(db: &DatabaseConnection, notification_id: i32) -> AppResult<()> {
    let result = notification::Entity::delete_by_id(notification_id)
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }
    Ok(())
}

/// Newest first
pub async fn list(db: &DatabaseConnection) -> AppResult<Vec<notification::Model>> {
    Ok(notification::Entity::find()
        .order_by_desc(notification::Column::SendTime)
        .all(db)
        .await?)
}
