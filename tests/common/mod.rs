#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

use commutex_inventory::{
    config::Config,
    db,
    entities::{booking, service, user},
    store::{
        self, booking::NewBooking, driver::NewDriver, report::NewFeedback, service::NewService,
        user::NewUser,
    },
    utils::password::hash_password,
};

pub const PASSWORD: &str = "s3cret-pass";

/// A migrated SQLite database living in its own temp directory
pub struct TestDb {
    pub db: DatabaseConnection,
    pub config: Config,
    _dir: TempDir,
}

pub async fn setup() -> TestDb {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("commutex.sqlite");
    let database_url = format!("sqlite://{}?mode=rwc", path.display());

    let config = Config {
        database_url,
        session_secret: "test-session-secret".to_string(),
        session_ttl_hours: 24,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        secure_cookies: false,
        login_attempts_per_minute: 100,
        admin_seed: None,
    };

    let db = db::connect(&config).await.expect("failed to connect");
    db::migrate(&db).await.expect("failed to migrate");

    TestDb {
        db,
        config,
        _dir: dir,
    }
}

pub fn new_user(user_id: &str, phone: &str, email: &str) -> NewUser {
    NewUser {
        user_id: user_id.to_string(),
        name: format!("Rider {}", user_id),
        phone: phone.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1995, 4, 12).expect("valid date"),
        email: email.to_string(),
        gender: "Female".to_string(),
        street: "12 Lake Road".to_string(),
        area: "Dhanmondi".to_string(),
        city: "Dhaka".to_string(),
        is_admin: false,
        verification_status: "Pending".to_string(),
        password_hash: "not-a-real-hash".to_string(),
    }
}

/// Insert a user with a real password hash of `PASSWORD`
pub async fn user_with_password(
    db: &DatabaseConnection,
    user_id: &str,
    phone: &str,
    email: &str,
    is_admin: bool,
) -> user::Model {
    let mut new = new_user(user_id, phone, email);
    new.is_admin = is_admin;
    new.password_hash = hash_password(PASSWORD).expect("hash");
    store::user::insert(db, new).await.expect("insert user")
}

pub async fn user(db: &DatabaseConnection, user_id: &str, phone: &str, email: &str) -> user::Model {
    store::user::insert(db, new_user(user_id, phone, email))
        .await
        .expect("insert user")
}

pub fn new_service(route_name: &str) -> NewService {
    NewService {
        route_name: route_name.to_string(),
        start_location: "Mirpur 10".to_string(),
        end_location: "Motijheel".to_string(),
        cost: Decimal::new(4550, 2),
        pickup: "Mirpur 10 Circle".to_string(),
        dropoff: "Shapla Chattar".to_string(),
        bus_id: Some(7),
        carpool_id: None,
        vehicle_type: "AC Bus".to_string(),
        all_possible_pickup_location: "Mirpur 10, Kazipara, Shewrapara".to_string(),
        frequency: "Every 20 minutes".to_string(),
        stoppage: "Farmgate, Karwan Bazar".to_string(),
        available_time: "06:00-22:00".to_string(),
        service_type: "Bus".to_string(),
    }
}

pub async fn service(db: &DatabaseConnection, route_name: &str) -> service::Model {
    store::service::insert(db, new_service(route_name))
        .await
        .expect("insert service")
}

pub async fn driver(db: &DatabaseConnection, license_no: &str, service_id: i32, phone: &str) {
    store::driver::insert(
        db,
        NewDriver {
            license_no: license_no.to_string(),
            service_id,
            name: "Karim".to_string(),
            phone: phone.to_string(),
            schedule: "Morning shift".to_string(),
        },
    )
    .await
    .expect("insert driver");
}

pub async fn booking(db: &DatabaseConnection, user_id: &str, service_id: i32) -> booking::Model {
    store::booking::insert(
        db,
        NewBooking {
            user_id: user_id.to_string(),
            service_id,
            route_id: 1,
            seat_no: "A3".to_string(),
            name: "Rider".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date"),
            time: NaiveTime::from_hms_opt(8, 30, 0).expect("valid time"),
            seat_availability: "Booked".to_string(),
        },
    )
    .await
    .expect("insert booking")
}

pub fn new_feedback(ratings: i32) -> NewFeedback {
    NewFeedback {
        ratings,
        comment: "Clean and on time".to_string(),
        status: "Submitted".to_string(),
        category: "Punctuality".to_string(),
        date: None,
        time: None,
    }
}
