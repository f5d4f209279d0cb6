use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;

use crate::entities::driver;
use crate::error::{AppError, AppResult, ConstraintViolation};
use crate::store::{ensure_service, validate};

#[derive(Debug, Clone, Deserialize)]
pub struct NewDriver {
    pub license_no: String,
    pub service_id: i32,
    pub name: String,
    pub phone: String,
    pub schedule: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverChanges {
    pub service_id: Option<i32>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub schedule: Option<String>,
}

pub async fn insert(db: &DatabaseConnection, new: NewDriver) -> AppResult<driver::Model> {
    let license_no = validate::text("license_no", &new.license_no, 20)?;
    let name = validate::text("name", &new.name, 100)?;
    let phone = validate::phone("phone", &new.phone, 11)?;
    let schedule = validate::text("schedule", &new.schedule, 100)?;

    let txn = db.begin().await?;

    ensure_service(&txn, new.service_id).await?;
    if driver::Entity::find_by_id(license_no.clone())
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(ConstraintViolation::Unique {
            field: "license_no",
            value: license_no,
        }
        .into());
    }

    let model = driver::ActiveModel {
        license_no: Set(license_no),
        service_id: Set(new.service_id),
        name: Set(name),
        phone: Set(phone),
        schedule: Set(schedule),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    license_no: &str,
    changes: DriverChanges,
) -> AppResult<driver::Model> {
    let txn = db.begin().await?;

    let existing = driver::Entity::find_by_id(license_no.to_string())
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;

    let mut active: driver::ActiveModel = existing.into();

    if let Some(service_id) = changes.service_id {
        ensure_service(&txn, service_id).await?;
        active.service_id = Set(service_id);
    }
    if let Some(name) = changes.name {
        active.name = Set(validate::text("name", &name, 100)?);
    }
    if let Some(phone) = changes.phone {
        active.phone = Set(validate::phone("phone", &phone, 11)?);
    }
    if let Some(schedule) = changes.schedule {
        active.schedule = Set(validate::text("schedule", &schedule, 100)?);
    }

    let updated = active.update(&txn).await?;
    txn.commit().await?;
    Ok(updated)
}

pub async fn delete(db: &DatabaseConnection, license_no: &str) -> AppResult<()> {
    let result = driver::Entity::delete_by_id(license_no.to_string())
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Driver not found".to_string()));
    }
    Ok(())
}

pub async fn list_for_service(
    db: &DatabaseConnection,
    service_id: i32,
) -> AppResult<Vec<driver::Model>> {
    Ok(driver::Entity::find()
        .filter(driver::Column::ServiceId.eq(service_id))
        .order_by_asc(driver::Column::LicenseNo)
        .all(db)
        .await?)
}
