//! Dependency-ordered deletes.
//!
//! These helpers never open or commit a transaction themselves; callers run
//! them on a `DatabaseTransaction` so a failure at any step rolls back every
//! row removed before it.

use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
};
use serde::Serialize;

use crate::entities::{
    booking, driver, feedback, incident, lost_found, otp, service, session, takes, user,
};

/// Rows removed by one cascading delete, per table.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionSummary {
    pub users: u64,
    pub services: u64,
    pub drivers: u64,
    pub takes: u64,
    pub bookings: u64,
    pub otps: u64,
    pub lost_found: u64,
    pub incidents: u64,
    pub feedback: u64,
    pub sessions: u64,
}

impl DeletionSummary {
    pub fn total(&self) -> u64 {
        self.users
            + self.services
            + self.drivers
            + self.takes
            + self.bookings
            + self.otps
            + self.lost_found
            + self.incidents
            + self.feedback
            + self.sessions
    }
}

pub(crate) async fn bookings<C: ConnectionTrait>(
    conn: &C,
    booking_ids: Vec<i32>,
    summary: &mut DeletionSummary,
) -> Result<(), DbErr> {
    if booking_ids.is_empty() {
        return Ok(());
    }

    summary.otps += otp::Entity::delete_many()
        .filter(otp::Column::BookingId.is_in(booking_ids.clone()))
        .exec(conn)
        .await?
        .rows_affected;

    summary.bookings += booking::Entity::delete_many()
        .filter(booking::Column::BookingId.is_in(booking_ids))
        .exec(conn)
        .await?
        .rows_affected;

    Ok(())
}

/// Service is the hub: drivers, takes, bookings (and their OTPs), lost & found,
/// incidents and feedback all go with it.
pub(crate) async fn service<C: ConnectionTrait>(
    conn: &C,
    service_id: i32,
    summary: &mut DeletionSummary,
) -> Result<(), DbErr> {
    let booking_ids: Vec<i32> = booking::Entity::find()
        .select_only()
        .column(booking::Column::BookingId)
        .filter(booking::Column::ServiceId.eq(service_id))
        .into_tuple()
        .all(conn)
        .await?;
    bookings(conn, booking_ids, summary).await?;

    summary.takes += takes::Entity::delete_many()
        .filter(takes::Column::ServiceId.eq(service_id))
        .exec(conn)
        .await?
        .rows_affected;

    summary.drivers += driver::Entity::delete_many()
        .filter(driver::Column::ServiceId.eq(service_id))
        .exec(conn)
        .await?
        .rows_affected;

    summary.lost_found += lost_found::Entity::delete_many()
        .filter(lost_found::Column::ServiceId.eq(service_id))
        .exec(conn)
        .await?
        .rows_affected;

    summary.incidents += incident::Entity::delete_many()
        .filter(incident::Column::ServiceId.eq(service_id))
        .exec(conn)
        .await?
        .rows_affected;

    summary.feedback += feedback::Entity::delete_many()
        .filter(feedback::Column::ServiceId.eq(service_id))
        .exec(conn)
        .await?
        .rows_affected;

    summary.services += service::Entity::delete_by_id(service_id)
        .exec(conn)
        .await?
        .rows_affected;

    Ok(())
}

pub(crate) async fn user<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    summary: &mut DeletionSummary,
) -> Result<(), DbErr> {
    let booking_ids: Vec<i32> = booking::Entity::find()
        .select_only()
        .column(booking::Column::BookingId)
        .filter(booking::Column::UserId.eq(user_id))
        .into_tuple()
        .all(conn)
        .await?;
    bookings(conn, booking_ids, summary).await?;

    summary.takes += takes::Entity::delete_many()
        .filter(takes::Column::UserId.eq(user_id))
        .exec(conn)
        .await?
        .rows_affected;

    summary.sessions += session::Entity::delete_many()
        .filter(session::Column::UserId.eq(user_id))
        .exec(conn)
        .await?
        .rows_affected;

    summary.users += user::Entity::delete_by_id(user_id.to_string())
        .exec(conn)
        .await?
        .rows_affected;

    Ok(())
}
