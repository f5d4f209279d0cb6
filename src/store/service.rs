use sea_orm::{
    prelude::Decimal, ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;

use crate::entities::service::{self, ServiceType};
use crate::error::{AppError, AppResult, ConstraintViolation};
use crate::store::cascade::{self, DeletionSummary};
use crate::store::{nullable, validate};

#[derive(Debug, Clone, Deserialize)]
pub struct NewService {
    pub route_name: String,
    pub start_location: String,
    pub end_location: String,
    pub cost: Decimal,
    pub pickup: String,
    pub dropoff: String,
    #[serde(default)]
    pub bus_id: Option<i32>,
    #[serde(default)]
    pub carpool_id: Option<i32>,
    pub vehicle_type: String,
    pub all_possible_pickup_location: String,
    pub frequency: String,
    pub stoppage: String,
    pub available_time: String,
    pub service_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceChanges {
    pub route_name: Option<String>,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    pub cost: Option<Decimal>,
    pub pickup: Option<String>,
    pub dropoff: Option<String>,
    /// `null` clears the column
    #[serde(default, deserialize_with = "nullable")]
    pub bus_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub carpool_id: Option<Option<i32>>,
    pub vehicle_type: Option<String>,
    pub all_possible_pickup_location: Option<String>,
    pub frequency: Option<String>,
    pub stoppage: Option<String>,
    pub available_time: Option<String>,
    pub service_type: Option<String>,
}

/// Fits a NUMERIC(10, 2) column and is never negative.
fn cost(value: Decimal) -> Result<Decimal, ConstraintViolation> {
    let invalid = |reason: &str| ConstraintViolation::Invalid {
        field: "cost",
        reason: reason.to_string(),
    };

    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid("must not be negative"));
    }
    if value.normalize().scale() > 2 {
        return Err(invalid("at most 2 decimal places"));
    }
    if value >= Decimal::new(100_000_000, 0) {
        return Err(invalid("at most 8 integer digits"));
    }
    Ok(value)
}

pub async fn insert(db: &DatabaseConnection, new: NewService) -> AppResult<service::Model> {
    let service_type: ServiceType = validate::choice("service_type", &new.service_type)?;

    let model = service::ActiveModel {
        route_name: Set(validate::text("route_name", &new.route_name, 100)?),
        start_location: Set(validate::text("start_location", &new.start_location, 100)?),
        end_location: Set(validate::text("end_location", &new.end_location, 100)?),
        cost: Set(cost(new.cost)?),
        pickup: Set(validate::text("pickup", &new.pickup, 100)?),
        dropoff: Set(validate::text("dropoff", &new.dropoff, 100)?),
        bus_id: Set(new.bus_id),
        carpool_id: Set(new.carpool_id),
        vehicle_type: Set(validate::text("vehicle_type", &new.vehicle_type, 50)?),
        all_possible_pickup_location: Set(validate::text(
            "all_possible_pickup_location",
            &new.all_possible_pickup_location,
            255,
        )?),
        frequency: Set(validate::text("frequency", &new.frequency, 50)?),
        stoppage: Set(validate::text("stoppage", &new.stoppage, 255)?),
        available_time: Set(validate::text("available_time", &new.available_time, 50)?),
        service_type: Set(service_type),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(service_id = model.service_id, route = %model.route_name, "Service created");
    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    service_id: i32,
    changes: ServiceChanges,
) -> AppResult<service::Model> {
    let existing = find(db, service_id).await?;
    let mut active: service::ActiveModel = existing.into();

    if let Some(v) = changes.route_name {
        active.route_name = Set(validate::text("route_name", &v, 100)?);
    }
    if let Some(v) = changes.start_location {
        active.start_location = Set(validate::text("start_location", &v, 100)?);
    }
    if let Some(v) = changes.end_location {
        active.end_location = Set(validate::text("end_location", &v, 100)?);
    }
    if let Some(v) = changes.cost {
        active.cost = Set(cost(v)?);
    }
    if let Some(v) = changes.pickup {
        active.pickup = Set(validate::text("pickup", &v, 100)?);
    }
    if let Some(v) = changes.dropoff {
        active.dropoff = Set(validate::text("dropoff", &v, 100)?);
    }
    if let Some(v) = changes.bus_id {
        active.bus_id = Set(v);
    }
    if let Some(v) = changes.carpool_id {
        active.carpool_id = Set(v);
    }
    if let Some(v) = changes.vehicle_type {
        active.vehicle_type = Set(validate::text("vehicle_type", &v, 50)?);
    }
    if let Some(v) = changes.all_possible_pickup_location {
        active.all_possible_pickup_location =
            Set(validate::text("all_possible_pickup_location", &v, 255)?);
    }
    if let Some(v) = changes.frequency {
        active.frequency = Set(validate::text("frequency", &v, 50)?);
    }
    if let Some(v) = changes.stoppage {
        active.stoppage = Set(validate::text("stoppage", &v, 255)?);
    }
    if let Some(v) = changes.available_time {
        active.available_time = Set(validate::text("available_time", &v, 50)?);
    }
    if let Some(v) = changes.service_type {
        let service_type: ServiceType = validate::choice("service_type", &v)?;
        active.service_type = Set(service_type);
    }

    Ok(active.update(db).await?)
}

/// Delete a service and everything hanging off it, all or nothing
pub async fn delete(db: &DatabaseConnection, service_id: i32) -> AppResult<DeletionSummary> {
    let txn = db.begin().await?;

    if service::Entity::find_by_id(service_id)
        .one(&txn)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Service not found".to_string()));
    }

    let mut summary = DeletionSummary::default();
    cascade::service(&txn, service_id, &mut summary).await?;
    txn.commit().await?;

    tracing::info!(
        service_id,
        drivers = summary.drivers,
        bookings = summary.bookings,
        feedback = summary.feedback,
        removed = summary.total(),
        "Service deleted"
    );
    Ok(summary)
}

pub async fn find(db: &DatabaseConnection, service_id: i32) -> AppResult<service::Model> {
    service::Entity::find_by_id(service_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))
}

pub async fn list(db: &DatabaseConnection) -> AppResult<Vec<service::Model>> {
    Ok(service::Entity::find()
        .order_by_asc(service::Column::ServiceId)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_bounds() {
        assert!(cost(Decimal::new(4550, 2)).is_ok());
        assert!(cost(Decimal::ZERO).is_ok());
        assert!(cost(Decimal::new(-1, 0)).is_err());
        assert!(cost(Decimal::new(12345, 3)).is_err());
        // Trailing zeros do not count as precision
        assert!(cost(Decimal::new(12500, 3)).is_ok());
        assert!(cost(Decimal::new(100_000_000, 0)).is_err());
        assert!(cost(Decimal::new(9_999_999_999, 2)).is_ok());
    }

    #[test]
    fn test_changes_distinguish_null_from_absent() {
        let changes: ServiceChanges =
            serde_json::from_str(r#"{"bus_id": null, "route_name": "Loop"}"#).unwrap();
        assert_eq!(changes.bus_id, Some(None));
        assert_eq!(changes.carpool_id, None);

        let changes: ServiceChanges = serde_json::from_str(r#"{"carpool_id": 4}"#).unwrap();
        assert_eq!(changes.carpool_id, Some(Some(4)));
        assert_eq!(changes.bus_id, None);
    }
}
