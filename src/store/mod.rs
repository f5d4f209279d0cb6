//! Schema & integrity layer.
//!
//! Every write goes through here: field checks, uniqueness and reference
//! checks run inside the same transaction as the write itself, and deletes
//! walk the dependency graph before removing the target row.

pub mod booking;
pub mod cascade;
pub mod driver;
pub mod notification;
pub mod otp;
pub mod report;
pub mod service;
pub mod takes;
pub mod user;
pub mod validate;

use sea_orm::{ConnectionTrait, EntityTrait};
use serde::{Deserialize, Deserializer};

use crate::entities;
use crate::error::{AppResult, ConstraintViolation};

pub use cascade::DeletionSummary;

/// For nullable columns in change sets: an absent field stays `None`, an
/// explicit `null` becomes `Some(None)`. Use with `#[serde(default)]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) async fn ensure_user<C: ConnectionTrait>(conn: &C, user_id: &str) -> AppResult<()> {
    if entities::user::Entity::find_by_id(user_id.to_string())
        .one(conn)
        .await?
        .is_none()
    {
        return Err(ConstraintViolation::MissingReference {
            entity: "user",
            key: user_id.to_string(),
        }
        .into());
    }
    Ok(())
}

pub(crate) async fn ensure_service<C: ConnectionTrait>(conn: &C, service_id: i32) -> AppResult<()> {
    if entities::service::Entity::find_by_id(service_id)
        .one(conn)
        .await?
        .is_none()
    {
        return Err(ConstraintViolation::MissingReference {
            entity: "service",
            key: service_id.to_string(),
        }
        .into());
    }
    Ok(())
}

pub(crate) async fn ensure_booking<C: ConnectionTrait>(conn: &C, booking_id: i32) -> AppResult<()> {
    if entities::booking::Entity::find_by_id(booking_id)
        .one(conn)
        .await?
        .is_none()
    {
        return Err(ConstraintViolation::MissingReference {
            entity: "booking",
            key: booking_id.to_string(),
        }
        .into());
    }
    Ok(())
}
