mod common;

use std::time::Instant;

use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use commutex_inventory::{
    entities::{session as session_row, user, user::VerificationStatus},
    session::{self, Identity, SessionState},
    utils::jwt::create_token,
    AppError,
};

#[tokio::test]
async fn authenticate_by_user_id_or_email() {
    let t = common::setup().await;
    common::user_with_password(&t.db, "u001", "01710000001", "rahim@example.com", false).await;

    let by_id = session::authenticate(&t.db, "u001", common::PASSWORD)
        .await
        .unwrap();
    assert_eq!(by_id.user_id, "u001");
    assert!(!by_id.is_admin);

    let by_email = session::authenticate(&t.db, " Rahim@Example.com ", common::PASSWORD)
        .await
        .unwrap();
    assert_eq!(by_email, by_id);
}

#[tokio::test]
async fn wrong_secret_and_unknown_identifier_fail_alike() {
    let t = common::setup().await;
    common::user_with_password(&t.db, "u001", "01710000001", "rahim@example.com", false).await;

    let started = Instant::now();
    let wrong_secret = session::authenticate(&t.db, "u001", "not-the-password").await;
    let wrong_secret_took = started.elapsed();

    let started = Instant::now();
    let unknown = session::authenticate(&t.db, "nobody", "not-the-password").await;
    let unknown_took = started.elapsed();

    assert!(matches!(wrong_secret, Err(AppError::InvalidCredentials)));
    assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
    assert_eq!(
        AppError::InvalidCredentials.to_string(),
        "Login failed. Please check your username/password."
    );

    // Both paths pay for a full hash verification
    assert!(unknown_took * 4 >= wrong_secret_took);
}

#[tokio::test]
async fn session_resolves_until_ended() {
    let t = common::setup().await;
    let user =
        common::user_with_password(&t.db, "u001", "01710000001", "rahim@example.com", true).await;
    let identity = Identity::from(user);

    let issued = session::establish_session(&t.db, &t.config, &identity)
        .await
        .unwrap();
    assert!(issued.expires_at > Utc::now() + Duration::hours(23));

    let ctx = session::resolve(&t.db, &t.config, &issued.token)
        .await
        .unwrap();
    assert_eq!(ctx.session_id, issued.session_id);
    assert_eq!(ctx.identity, identity);
    assert!(ctx.identity.is_admin);

    session::end_session(&t.db, issued.session_id).await.unwrap();
    assert!(matches!(
        session::resolve(&t.db, &t.config, &issued.token).await,
        Err(AppError::SessionExpired)
    ));

    // Ending twice is harmless
    session::end_session(&t.db, issued.session_id).await.unwrap();
}

#[tokio::test]
async fn each_login_gets_its_own_session() {
    let t = common::setup().await;
    let user =
        common::user_with_password(&t.db, "u001", "01710000001", "rahim@example.com", false).await;
    let identity = Identity::from(user);

    let first = session::establish_session(&t.db, &t.config, &identity)
        .await
        .unwrap();
    let second = session::establish_session(&t.db, &t.config, &identity)
        .await
        .unwrap();
    assert_ne!(first.session_id, second.session_id);

    session::end_session(&t.db, first.session_id).await.unwrap();
    assert!(session::resolve(&t.db, &t.config, &second.token).await.is_ok());
}

#[tokio::test]
async fn expired_session_row_reads_as_expired() {
    let t = common::setup().await;
    let user =
        common::user_with_password(&t.db, "u001", "01710000001", "rahim@example.com", false).await;
    let identity = Identity::from(user);

    let issued = session::establish_session(&t.db, &t.config, &identity)
        .await
        .unwrap();

    // Backdate the row; the token itself is still within its lifetime
    let row = session_row::Entity::find_by_id(issued.session_id)
        .one(&t.db)
        .await
        .unwrap()
        .unwrap();
    let mut active: session_row::ActiveModel = row.into();
    active.expires_at = Set((Utc::now() - Duration::minutes(1)).into());
    active.update(&t.db).await.unwrap();

    assert!(matches!(
        session::resolve(&t.db, &t.config, &issued.token).await,
        Err(AppError::SessionExpired)
    ));
    assert_eq!(session::purge_expired(&t.db).await.unwrap(), 1);
}

#[tokio::test]
async fn stale_or_foreign_tokens_read_as_anonymous() {
    let t = common::setup().await;
    let user =
        common::user_with_password(&t.db, "u001", "01710000001", "rahim@example.com", false).await;
    let identity = Identity::from(user);

    let state = session::current_session(&t.db, &t.config, None).await.unwrap();
    assert!(matches!(state, SessionState::Anonymous));

    let garbage = session::current_session(&t.db, &t.config, Some("not.a.token"))
        .await
        .unwrap();
    assert!(!garbage.is_authenticated());

    // Signed with someone else's secret
    let now = Utc::now();
    let foreign = create_token(
        "u001",
        uuid::Uuid::new_v4(),
        now,
        now + Duration::hours(1),
        "some-other-secret",
    )
    .unwrap();
    let state = session::current_session(&t.db, &t.config, Some(&foreign))
        .await
        .unwrap();
    assert!(state.identity().is_none());

    let issued = session::establish_session(&t.db, &t.config, &identity)
        .await
        .unwrap();
    let state = session::current_session(&t.db, &t.config, Some(&issued.token))
        .await
        .unwrap();
    assert_eq!(state.identity(), Some(&identity));

    session::end_session(&t.db, issued.session_id).await.unwrap();
    let state = session::current_session(&t.db, &t.config, Some(&issued.token))
        .await
        .unwrap();
    assert!(!state.is_authenticated());
}

#[tokio::test]
async fn email_login_never_resolves_to_a_user_id() {
    let t = common::setup().await;
    common::user_with_password(&t.db, "zz", "01710000001", "a@b.co", false).await;

    // A row whose id equals the victim's email, written past the store checks
    user::ActiveModel {
        user_id: Set("a@b.co".to_string()),
        name: Set("Mallory".to_string()),
        phone: Set("01710000002".to_string()),
        date_of_birth: Set(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()),
        email: Set("mallory@example.com".to_string()),
        gender: Set("Other".to_string()),
        street: Set("1 Side Street".to_string()),
        area: Set("Banani".to_string()),
        city: Set("Dhaka".to_string()),
        is_admin: Set(false),
        verification_status: Set(VerificationStatus::Pending),
        password_hash: Set("not-a-real-hash".to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&t.db)
    .await
    .unwrap();

    let identity = session::authenticate(&t.db, "a@b.co", common::PASSWORD)
        .await
        .unwrap();
    assert_eq!(identity.user_id, "zz");
}

#[tokio::test]
async fn ending_other_sessions_keeps_the_current_one() {
    let t = common::setup().await;
    let rahim =
        common::user_with_password(&t.db, "u001", "01710000001", "rahim@example.com", false).await;
    let karim =
        common::user_with_password(&t.db, "u002", "01710000002", "karim@example.com", false).await;
    let rahim = Identity::from(rahim);
    let karim = Identity::from(karim);

    let current = session::establish_session(&t.db, &t.config, &rahim)
        .await
        .unwrap();
    let stolen = session::establish_session(&t.db, &t.config, &rahim)
        .await
        .unwrap();
    let unrelated = session::establish_session(&t.db, &t.config, &karim)
        .await
        .unwrap();

    let ended = session::end_other_sessions(&t.db, "u001", current.session_id)
        .await
        .unwrap();
    assert_eq!(ended, 1);

    assert!(session::resolve(&t.db, &t.config, &current.token).await.is_ok());
    assert!(matches!(
        session::resolve(&t.db, &t.config, &stolen.token).await,
        Err(AppError::SessionExpired)
    ));
    assert!(session::resolve(&t.db, &t.config, &unrelated.token).await.is_ok());
}
