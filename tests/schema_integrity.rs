mod common;

use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};

use commutex_inventory::{
    config::AdminSeed,
    db,
    entities::{
        booking, driver, feedback, otp, otp::OtpStatus, session, takes, user::VerificationStatus,
    },
    session::{self as sessions, Identity},
    store::{self, service::ServiceChanges, takes::NewTakes, user::UserChanges},
    AppError, ConstraintViolation,
};

fn assert_unique(result: Result<impl std::fmt::Debug, AppError>, expected_field: &str) {
    match result {
        Err(AppError::ConstraintViolation(ConstraintViolation::Unique { field, .. })) => {
            assert_eq!(field, expected_field)
        }
        other => panic!("expected unique violation on {expected_field}, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_user_keys_are_rejected() {
    let t = common::setup().await;
    common::user(&t.db, "u001", "01710000001", "rahim@example.com").await;

    assert_unique(
        store::user::insert(
            &t.db,
            common::new_user("u002", "01710000002", "Rahim@Example.com"),
        )
        .await,
        "email",
    );
    assert_unique(
        store::user::insert(
            &t.db,
            common::new_user("u002", "01710000001", "karim@example.com"),
        )
        .await,
        "phone",
    );
    assert_unique(
        store::user::insert(
            &t.db,
            common::new_user("u001", "01710000009", "other@example.com"),
        )
        .await,
        "user_id",
    );

    assert_eq!(store::user::list(&t.db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_cannot_steal_another_users_email() {
    let t = common::setup().await;
    common::user(&t.db, "u001", "01710000001", "rahim@example.com").await;
    common::user(&t.db, "u002", "01710000002", "karim@example.com").await;

    let changes = UserChanges {
        email: Some("rahim@example.com".to_string()),
        ..Default::default()
    };
    assert_unique(store::user::update(&t.db, "u002", changes).await, "email");

    // Keeping your own email is not a conflict
    let same = UserChanges {
        email: Some("karim@example.com".to_string()),
        name: Some("Karim Uddin".to_string()),
        ..Default::default()
    };
    let updated = store::user::update(&t.db, "u002", same).await.unwrap();
    assert_eq!(updated.name, "Karim Uddin");
}

#[tokio::test]
async fn takes_pair_is_unique() {
    let t = common::setup().await;
    common::user(&t.db, "u001", "01710000001", "rahim@example.com").await;
    let service = common::service(&t.db, "Mirpur Express").await;

    let take = || NewTakes {
        user_id: "u001".to_string(),
        service_id: service.service_id,
        date_taken: None,
        time_taken: None,
    };

    store::takes::insert(&t.db, take()).await.unwrap();
    assert_unique(
        store::takes::insert(&t.db, take()).await,
        "(user_id, service_id)",
    );
    assert_eq!(takes::Entity::find().count(&t.db).await.unwrap(), 1);
}

#[tokio::test]
async fn references_must_exist() {
    let t = common::setup().await;
    common::user(&t.db, "u001", "01710000001", "rahim@example.com").await;

    let result = store::takes::insert(
        &t.db,
        NewTakes {
            user_id: "u001".to_string(),
            service_id: 999,
            date_taken: None,
            time_taken: None,
        },
    )
    .await;

    assert!(matches!(
        result,
        Err(AppError::ConstraintViolation(
            ConstraintViolation::MissingReference { entity: "service", .. }
        ))
    ));
}

#[tokio::test]
async fn ratings_outside_one_to_five_are_rejected() {
    let t = common::setup().await;
    let service = common::service(&t.db, "Mirpur Express").await;

    for bad in [0, 6, -3] {
        let result =
            store::report::insert_feedback(&t.db, service.service_id, common::new_feedback(bad))
                .await;
        assert!(
            matches!(
                result,
                Err(AppError::ConstraintViolation(
                    ConstraintViolation::OutOfRange { field: "ratings", .. }
                ))
            ),
            "rating {bad} was accepted"
        );
    }

    for good in [1, 5] {
        store::report::insert_feedback(&t.db, service.service_id, common::new_feedback(good))
            .await
            .unwrap();
    }

    let entries = store::report::list_feedback(&t.db, service.service_id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(store::report::average_rating(&entries), Some(3.0));
}

#[tokio::test]
async fn choice_fields_reject_unknown_values() {
    let t = common::setup().await;

    let mut new = common::new_service("Uttara Carpool");
    new.service_type = "Helicopter".to_string();
    let result = store::service::insert(&t.db, new).await;

    match result {
        Err(AppError::ConstraintViolation(ConstraintViolation::Choice { field, allowed, .. })) => {
            assert_eq!(field, "service_type");
            assert!(allowed.contains(&"Public Transport".to_string()));
        }
        other => panic!("expected choice violation, got {other:?}"),
    }

    let mut new = common::new_service("Uttara Transit");
    new.service_type = "Public Transport".to_string();
    store::service::insert(&t.db, new).await.unwrap();
}

#[tokio::test]
async fn deleting_a_service_removes_its_dependents() {
    let t = common::setup().await;
    common::user(&t.db, "u001", "01710000001", "rahim@example.com").await;
    let service = common::service(&t.db, "Mirpur Express").await;
    let other = common::service(&t.db, "Gulshan Loop").await;

    common::driver(&t.db, "DL-1001", service.service_id, "01810000001").await;
    common::driver(&t.db, "DL-2002", other.service_id, "01810000002").await;
    let booking = common::booking(&t.db, "u001", service.service_id).await;
    store::otp::issue(&t.db, booking.booking_id).await.unwrap();
    store::report::insert_feedback(&t.db, service.service_id, common::new_feedback(4))
        .await
        .unwrap();

    let summary = store::service::delete(&t.db, service.service_id)
        .await
        .unwrap();

    assert_eq!(summary.services, 1);
    assert_eq!(summary.drivers, 1);
    assert_eq!(summary.bookings, 1);
    assert_eq!(summary.otps, 1);
    assert_eq!(summary.feedback, 1);

    assert!(matches!(
        store::service::find(&t.db, service.service_id).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(booking::Entity::find().count(&t.db).await.unwrap(), 0);
    assert_eq!(otp::Entity::find().count(&t.db).await.unwrap(), 0);
    assert_eq!(feedback::Entity::find().count(&t.db).await.unwrap(), 0);

    // The other service keeps its driver
    let remaining = driver::Entity::find().all(&t.db).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].license_no, "DL-2002");
}

#[tokio::test]
async fn failed_cascade_leaves_everything_in_place() {
    let t = common::setup().await;
    common::user(&t.db, "u001", "01710000001", "rahim@example.com").await;
    let service = common::service(&t.db, "Mirpur Express").await;
    common::driver(&t.db, "DL-1001", service.service_id, "01810000001").await;
    let booking = common::booking(&t.db, "u001", service.service_id).await;
    store::report::insert_feedback(&t.db, service.service_id, common::new_feedback(4))
        .await
        .unwrap();

    // Feedback goes after drivers and bookings, so this fails mid-cascade
    t.db.execute_unprepared(
        "CREATE TRIGGER feedback_locked BEFORE DELETE ON feedback \
         BEGIN SELECT RAISE(ABORT, 'feedback is locked'); END;",
    )
    .await
    .unwrap();

    assert!(store::service::delete(&t.db, service.service_id).await.is_err());

    assert!(store::service::find(&t.db, service.service_id).await.is_ok());
    assert!(store::booking::find(&t.db, booking.booking_id).await.is_ok());
    assert_eq!(driver::Entity::find().count(&t.db).await.unwrap(), 1);
    assert_eq!(feedback::Entity::find().count(&t.db).await.unwrap(), 1);
}

#[tokio::test]
async fn deleting_a_booking_removes_its_otps() {
    let t = common::setup().await;
    common::user(&t.db, "u001", "01710000001", "rahim@example.com").await;
    let service = common::service(&t.db, "Mirpur Express").await;
    let booking = common::booking(&t.db, "u001", service.service_id).await;
    store::otp::issue(&t.db, booking.booking_id).await.unwrap();
    store::otp::issue(&t.db, booking.booking_id).await.unwrap();

    let summary = store::booking::delete(&t.db, booking.booking_id)
        .await
        .unwrap();
    assert_eq!(summary.bookings, 1);
    assert_eq!(summary.otps, 2);
    assert_eq!(otp::Entity::find().count(&t.db).await.unwrap(), 0);

    assert!(matches!(
        store::booking::delete(&t.db, booking.booking_id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn otp_verification_flow() {
    let t = common::setup().await;
    common::user(&t.db, "u001", "01710000001", "rahim@example.com").await;
    let service = common::service(&t.db, "Mirpur Express").await;
    let booking = common::booking(&t.db, "u001", service.service_id).await;

    let issued = store::otp::issue(&t.db, booking.booking_id).await.unwrap();
    assert_eq!(issued.otp.status, OtpStatus::Pending);

    let wrong = if issued.code == "000000" { "111111" } else { "000000" };
    assert!(matches!(
        store::otp::verify(&t.db, booking.booking_id, wrong).await,
        Err(AppError::BadRequest(_))
    ));
    let still_pending = store::otp::list_for_booking(&t.db, booking.booking_id)
        .await
        .unwrap();
    assert_eq!(still_pending[0].status, OtpStatus::Pending);

    let verified = store::otp::verify(&t.db, booking.booking_id, &issued.code)
        .await
        .unwrap();
    assert_eq!(verified.status, OtpStatus::Verified);

    // Nothing left to verify
    assert!(matches!(
        store::otp::verify(&t.db, booking.booking_id, &issued.code).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn deleting_a_user_removes_bookings_takes_and_sessions() {
    let t = common::setup().await;
    let user = common::user(&t.db, "u001", "01710000001", "rahim@example.com").await;
    common::user(&t.db, "u002", "01710000002", "karim@example.com").await;
    let service = common::service(&t.db, "Mirpur Express").await;

    common::booking(&t.db, "u001", service.service_id).await;
    common::booking(&t.db, "u002", service.service_id).await;
    store::takes::insert(
        &t.db,
        NewTakes {
            user_id: "u001".to_string(),
            service_id: service.service_id,
            date_taken: None,
            time_taken: None,
        },
    )
    .await
    .unwrap();
    sessions::establish_session(&t.db, &t.config, &Identity::from(user))
        .await
        .unwrap();

    let summary = store::user::delete(&t.db, "u001").await.unwrap();
    assert_eq!(summary.users, 1);
    assert_eq!(summary.bookings, 1);
    assert_eq!(summary.takes, 1);
    assert_eq!(summary.sessions, 1);

    assert_eq!(booking::Entity::find().count(&t.db).await.unwrap(), 1);
    assert_eq!(session::Entity::find().count(&t.db).await.unwrap(), 0);
    // The service itself is untouched
    assert!(store::service::find(&t.db, service.service_id).await.is_ok());
}

#[tokio::test]
async fn notifications_cannot_arrive_before_they_are_sent() {
    use chrono::{Duration, Utc};
    use commutex_inventory::store::notification::NewNotification;

    let t = common::setup().await;
    let now = Utc::now();

    let backwards = NewNotification {
        send_time: now,
        receive_time: now - Duration::minutes(5),
        message: "Route 7 delayed".to_string(),
    };
    assert!(matches!(
        store::notification::insert(&t.db, backwards).await,
        Err(AppError::ConstraintViolation(_))
    ));

    let ok = NewNotification {
        send_time: now,
        receive_time: now + Duration::seconds(2),
        message: "Route 7 delayed".to_string(),
    };
    store::notification::insert(&t.db, ok).await.unwrap();
    assert_eq!(store::notification::list(&t.db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn user_ids_cannot_look_like_emails() {
    let t = common::setup().await;
    common::user(&t.db, "zz", "01710000001", "a@b.co").await;

    let result = store::user::insert(
        &t.db,
        common::new_user("a@b.co", "01710000002", "other@example.com"),
    )
    .await;
    assert!(matches!(
        result,
        Err(AppError::ConstraintViolation(ConstraintViolation::Invalid { field: "user_id", .. }))
    ));
    assert_eq!(store::user::list(&t.db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_revalidates_choice_fields() {
    let t = common::setup().await;
    common::user(&t.db, "u001", "01710000001", "rahim@example.com").await;

    let changes = UserChanges {
        verification_status: Some("Approved".to_string()),
        ..Default::default()
    };
    match store::user::update(&t.db, "u001", changes).await {
        Err(AppError::ConstraintViolation(ConstraintViolation::Choice { field, allowed, .. })) => {
            assert_eq!(field, "verification_status");
            assert_eq!(allowed, vec!["Verified".to_string(), "Pending".to_string()]);
        }
        other => panic!("expected choice violation, got {other:?}"),
    }

    let unchanged = store::user::find(&t.db, "u001").await.unwrap();
    assert_eq!(unchanged.verification_status, VerificationStatus::Pending);

    let changes = UserChanges {
        verification_status: Some("Verified".to_string()),
        ..Default::default()
    };
    let updated = store::user::update(&t.db, "u001", changes).await.unwrap();
    assert_eq!(updated.verification_status, VerificationStatus::Verified);
}

#[tokio::test]
async fn service_update_can_clear_nullable_ids() {
    let t = common::setup().await;
    let service = common::service(&t.db, "Mirpur Express").await;
    assert_eq!(service.bus_id, Some(7));

    let changes: ServiceChanges =
        serde_json::from_str(r#"{"bus_id": null, "carpool_id": 12}"#).unwrap();
    let updated = store::service::update(&t.db, service.service_id, changes)
        .await
        .unwrap();
    assert_eq!(updated.bus_id, None);
    assert_eq!(updated.carpool_id, Some(12));

    // Absent fields leave the columns alone
    let changes: ServiceChanges = serde_json::from_str(r#"{"frequency": "Hourly"}"#).unwrap();
    let updated = store::service::update(&t.db, service.service_id, changes)
        .await
        .unwrap();
    assert_eq!(updated.bus_id, None);
    assert_eq!(updated.carpool_id, Some(12));
    assert_eq!(updated.frequency, "Hourly");
}

#[tokio::test]
async fn admin_seed_runs_once_with_its_own_phone() {
    let t = common::setup().await;
    // A rider already holds the placeholder number some seeds would use
    common::user(&t.db, "u001", "00000000000", "rahim@example.com").await;

    let seed = AdminSeed {
        user_id: "admin".to_string(),
        email: "Admin@Example.com".to_string(),
        phone: "01999999999".to_string(),
        password: common::PASSWORD.to_string(),
    };

    assert!(db::seed_admin(&t.db, &seed).await.unwrap());
    let admin = store::user::find(&t.db, "admin").await.unwrap();
    assert!(admin.is_admin);
    assert_eq!(admin.phone, "01999999999");
    assert_eq!(admin.verification_status, VerificationStatus::Verified);

    assert!(!db::seed_admin(&t.db, &seed).await.unwrap());

    // An existing id is enough to skip, whatever the email
    let same_id = AdminSeed {
        email: "root@example.com".to_string(),
        ..seed
    };
    assert!(!db::seed_admin(&t.db, &same_id).await.unwrap());
    assert_eq!(store::user::list(&t.db).await.unwrap().len(), 2);
}
