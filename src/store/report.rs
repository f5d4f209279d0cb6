//! Per-service reports: lost & found items, incidents and rider feedback.

use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;

use crate::entities::feedback::{self, MAX_RATING, MIN_RATING};
use crate::entities::incident;
use crate::entities::lost_found::{self, YesNo};
use crate::error::{AppError, AppResult};
use crate::store::{ensure_service, validate};

// ============ Lost & Found ============

#[derive(Debug, Clone, Deserialize)]
pub struct NewLostFound {
    pub reporter_name: String,
    pub item_name: String,
    pub found: String,
    pub lost: String,
    pub location_reported: String,
    pub date_reported: Option<NaiveDate>,
    pub reporter_contact: String,
    pub item_details: String,
}

pub async fn insert_lost_found(
    db: &DatabaseConnection,
    service_id: i32,
    new: NewLostFound,
) -> AppResult<lost_found::Model> {
    let found: YesNo = validate::choice("found", &new.found)?;
    let lost: YesNo = validate::choice("lost", &new.lost)?;
    let reporter_name = validate::text("reporter_name", &new.reporter_name, 100)?;
    let item_name = validate::text("item_name", &new.item_name, 100)?;
    let location_reported = validate::text("location_reported", &new.location_reported, 100)?;
    let reporter_contact = validate::phone("reporter_contact", &new.reporter_contact, 11)?;
    let item_details = validate::text("item_details", &new.item_details, 255)?;

    let txn = db.begin().await?;
    ensure_service(&txn, service_id).await?;

    let model = lost_found::ActiveModel {
        service_id: Set(service_id),
        reporter_name: Set(reporter_name),
        item_name: Set(item_name),
        found: Set(found),
        lost: Set(lost),
        location_reported: Set(location_reported),
        date_reported: Set(new.date_reported.unwrap_or_else(|| Utc::now().date_naive())),
        reporter_contact: Set(reporter_contact),
        item_details: Set(item_details),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(model)
}

/// Flag an item as recovered
pub async fn mark_found(db: &DatabaseConnection, item_id: i32) -> AppResult<lost_found::Model> {
    let item = lost_found::Entity::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

    let mut active: lost_found::ActiveModel = item.into();
    active.found = Set(YesNo::Yes);
    active.lost = Set(YesNo::No);
    Ok(active.update(db).await?)
}

pub async fn delete_lost_found(db: &DatabaseConnection, item_id: i32) -> AppResult<()> {
    let result = lost_found::Entity::delete_by_id(item_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Item not found".to_string()));
    }
    Ok(())
}

pub async fn list_lost_found(
    db: &DatabaseConnection,
    service_id: i32,
) -> AppResult<Vec<lost_found::Model>> {
    Ok(lost_found::Entity::find()
        .filter(lost_found::Column::ServiceId.eq(service_id))
        .order_by_desc(lost_found::Column::ItemId)
        .all(db)
        .await?)
}

// ============ Incidents ============

#[derive(Debug, Clone, Deserialize)]
pub struct NewIncident {
    pub location: String,
    pub reporter_name: String,
    pub reporter_contact: String,
    pub incident_type: String,
    #[serde(default = "default_incident_status")]
    pub status: String,
    pub description: String,
    pub title: String,
}

fn default_incident_status() -> String {
    "Open".to_string()
}

pub async fn insert_incident(
    db: &DatabaseConnection,
    service_id: i32,
    new: NewIncident,
) -> AppResult<incident::Model> {
    let location = validate::text("location", &new.location, 100)?;
    let reporter_name = validate::text("reporter_name", &new.reporter_name, 100)?;
    let reporter_contact = validate::phone("reporter_contact", &new.reporter_contact, 11)?;
    let incident_type = validate::text("incident_type", &new.incident_type, 50)?;
    let status = validate::text("status", &new.status, 20)?;
    let description = validate::text("description", &new.description, 255)?;
    let title = validate::text("title", &new.title, 100)?;

    let txn = db.begin().await?;
    ensure_service(&txn, service_id).await?;

    let model = incident::ActiveModel {
        service_id: Set(service_id),
        location: Set(location),
        reporter_name: Set(reporter_name),
        reporter_contact: Set(reporter_contact),
        incident_type: Set(incident_type),
        status: Set(status),
        description: Set(description),
        title: Set(title),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        incident_id = model.incident_id,
        service_id,
        incident_type = %model.incident_type,
        "Incident reported"
    );
    Ok(model)
}

pub async fn update_incident_status(
    db: &DatabaseConnection,
    incident_id: i32,
    status: &str,
) -> AppResult<incident::Model> {
    let status = validate::text("status", status, 20)?;

    let existing = incident::Entity::find_by_id(incident_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Incident not found".to_string()))?;

    let mut active: incident::ActiveModel = existing.into();
    active.status = Set(status);
    Ok(active.update(db).await?)
}

pub async fn delete_incident(db: &DatabaseConnection, incident_id: i32) -> AppResult<()> {
    let result = incident::Entity::delete_by_id(incident_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Incident not found".to_string()));
    }
    Ok(())
}

pub async fn list_incidents(
    db: &DatabaseConnection,
    service_id: i32,
) -> AppResult<Vec<incident::Model>> {
    Ok(incident::Entity::find()
        .filter(incident::Column::ServiceId.eq(service_id))
        .order_by_desc(incident::Column::IncidentId)
        .all(db)
        .await?)
}

// ============ Feedback ============

#[derive(Debug, Clone, Deserialize)]
pub struct NewFeedback {
    pub ratings: i32,
    pub comment: String,
    #[serde(default = "default_feedback_status")]
    pub status: String,
    pub category: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

fn default_feedback_status() -> String {
    "Submitted".to_string()
}

/// Insert feedback; ratings outside 1..=5 are rejected, never clamped
pub async fn insert_feedback(
    db: &DatabaseConnection,
    service_id: i32,
    new: NewFeedback,
) -> AppResult<feedback::Model> {
    validate::range(
        "ratings",
        new.ratings as i64,
        MIN_RATING as i64,
        MAX_RATING as i64,
    )?;
    let comment = validate::text("comment", &new.comment, 255)?;
    let status = validate::text("status", &new.status, 20)?;
    let category = validate::text("category", &new.category, 50)?;

    let txn = db.begin().await?;
    ensure_service(&txn, service_id).await?;

    let now = Utc::now();
    let model = feedback::ActiveModel {
        service_id: Set(service_id),
        ratings: Set(new.ratings),
        comment: Set(comment),
        status: Set(status),
        date: Set(new.date.unwrap_or_else(|| now.date_naive())),
        time: Set(new.time.unwrap_or_else(|| now.time())),
        category: Set(category),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(model)
}

pub async fn delete_feedback(db: &DatabaseConnection, feedback_id: i32) -> AppResult<()> {
    let result = feedback::Entity::delete_by_id(feedback_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Feedback not found".to_string()));
    }
    Ok(())
}

pub async fn list_feedback(
    db: &DatabaseConnection,
    service_id: i32,
) -> AppResult<Vec<feedback::Model>> {
    Ok(feedback::Entity::find()
        .filter(feedback::Column::ServiceId.eq(service_id))
        .order_by_desc(feedback::Column::FeedbackId)
        .all(db)
        .await?)
}

/// Mean rating of a service, `None` when nobody has rated it yet
pub fn average_rating(entries: &[feedback::Model]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let sum: i64 = entries.iter().map(|f| f.ratings as i64).sum();
    Some(sum as f64 / entries.len() as f64)
}
