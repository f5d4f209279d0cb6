use chrono::Utc;
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use subtle::ConstantTimeEq;

use crate::entities::otp::{self, OtpStatus};
use crate::error::{AppError, AppResult, ConstraintViolation};
use crate::store::ensure_booking;

pub const CODE_LEN: usize = 6;

/// An OTP row plus its plaintext code, which is only ever handed out here.
#[derive(Debug, Clone)]
pub struct IssuedOtp {
    pub otp: otp::Model,
    pub code: String,
}

fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", n)
}

fn check_code_format(code: &str) -> Result<(), ConstraintViolation> {
    if code.len() != CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConstraintViolation::Invalid {
            field: "code",
            reason: format!("must be exactly {} digits", CODE_LEN),
        });
    }
    Ok(())
}

/// Issue a fresh pending OTP for a booking
pub async fn issue(db: &DatabaseConnection, booking_id: i32) -> AppResult<IssuedOtp> {
    let txn = db.begin().await?;
    ensure_booking(&txn, booking_id).await?;

    let code = generate_code();
    let now = Utc::now();
    let model = otp::ActiveModel {
        booking_id: Set(booking_id),
        code: Set(code.clone()),
        status: Set(OtpStatus::Pending),
        date: Set(now.date_naive()),
        time: Set(now.time()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::debug!(booking_id, otp_id = model.otp_id, "OTP issued");
    Ok(IssuedOtp { otp: model, code })
}

/// Check a code against the newest pending OTP of a booking and mark it verified
pub async fn verify(db: &DatabaseConnection, booking_id: i32, code: &str) -> AppResult<otp::Model> {
    let code = code.trim();
    check_code_format(code)?;

    let pending = otp::Entity::find()
        .filter(otp::Column::BookingId.eq(booking_id))
        .filter(otp::Column::Status.eq(OtpStatus::Pending))
        .order_by_desc(otp::Column::OtpId)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("No pending OTP for this booking".to_string()))?;

    if !bool::from(code.as_bytes().ct_eq(pending.code.as_bytes())) {
        tracing::warn!(booking_id, otp_id = pending.otp_id, "OTP mismatch");
        return Err(AppError::BadRequest("Invalid OTP code".to_string()));
    }

    let mut active: otp::ActiveModel = pending.into();
    active.status = Set(OtpStatus::Verified);
    Ok(active.update(db).await?)
}

pub async fn list_for_booking(db: &DatabaseConnection, booking_id: i32) -> AppResult<Vec<otp::Model>> {
    Ok(otp::Entity::find()
        .filter(otp::Column::BookingId.eq(booking_id))
        .order_by_asc(otp::Column::OtpId)
        .all(db)
        .await?)
}
