use chrono::{NaiveDate, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;

use crate::entities::booking;
use crate::error::{AppError, AppResult};
use crate::store::cascade::{self, DeletionSummary};
use crate::store::{ensure_service, ensure_user, validate};

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: String,
    pub service_id: i32,
    pub route_id: i32,
    pub seat_no: String,
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub seat_availability: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingChanges {
    pub route_id: Option<i32>,
    pub seat_no: Option<String>,
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub seat_availability: Option<String>,
}

pub async fn insert(db: &DatabaseConnection, new: NewBooking) -> AppResult<booking::Model> {
    let seat_no = validate::text("seat_no", &new.seat_no, 10)?;
    let name = validate::text("name", &new.name, 100)?;
    let seat_availability = validate::text("seat_availability", &new.seat_availability, 20)?;

    let txn = db.begin().await?;

    ensure_user(&txn, &new.user_id).await?;
    ensure_service(&txn, new.service_id).await?;

    let model = booking::ActiveModel {
        user_id: Set(new.user_id),
        service_id: Set(new.service_id),
        route_id: Set(new.route_id),
        seat_no: Set(seat_no),
        name: Set(name),
        date: Set(new.date),
        time: Set(new.time),
        seat_availability: Set(seat_availability),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        booking_id = model.booking_id,
        user_id = %model.user_id,
        service_id = model.service_id,
        "Booking created"
    );
    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    booking_id: i32,
    changes: BookingChanges,
) -> AppResult<booking::Model> {
    let existing = find(db, booking_id).await?;
    let mut active: booking::ActiveModel = existing.into();

    if let Some(route_id) = changes.route_id {
        active.route_id = Set(route_id);
    }
    if let Some(seat_no) = changes.seat_no {
        active.seat_no = Set(validate::text("seat_no", &seat_no, 10)?);
    }
    if let Some(name) = changes.name {
        active.name = Set(validate::text("name", &name, 100)?);
    }
    if let Some(date) = changes.date {
        active.date = Set(date);
    }
    if let Some(time) = changes.time {
        active.time = Set(time);
    }
    if let Some(seat_availability) = changes.seat_availability {
        active.seat_availability =
            Set(validate::text("seat_availability", &seat_availability, 20)?);
    }

    Ok(active.update(db).await?)
}

/// Delete a booking and its OTPs
pub async fn delete(db: &DatabaseConnection, booking_id: i32) -> AppResult<DeletionSummary> {
    let txn = db.begin().await?;

    if booking::Entity::find_by_id(booking_id)
        .one(&txn)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }

    let mut summary = DeletionSummary::default();
    cascade::bookings(&txn, vec![booking_id], &mut summary).await?;
    txn.commit().await?;

    tracing::info!(booking_id, otps = summary.otps, "Booking deleted");
    Ok(summary)
}

pub async fn find(db: &DatabaseConnection, booking_id: i32) -> AppResult<booking::Model> {
    booking::Entity::find_by_id(booking_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

pub async fn list(db: &DatabaseConnection) -> AppResult<Vec<booking::Model>> {
    Ok(booking::Entity::find()
        .order_by_asc(booking::Column::BookingId)
        .all(db)
        .await?)
}

pub async fn list_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> AppResult<Vec<booking::Model>> {
    Ok(booking::Entity::find()
        .filter(booking::Column::UserId.eq(user_id))
        .order_by_asc(booking::Column::BookingId)
        .all(db)
        .await?)
}
