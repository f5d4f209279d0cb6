use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{auth, bookings, notifications, reports, services, users};
use crate::middleware::auth::{auth_middleware, require_admin};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Session pages; anonymous or authenticated
    let session_routes = Router::new()
        .route("/", get(auth::landing))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout));

    // Any authenticated user
    let member_routes = Router::new()
        // Profile
        .route("/me", get(users::me).put(users::update_me))
        .route("/me/password", put(users::change_password))
        // Services and their reports
        .route("/services", get(services::list_services))
        .route("/services/{id}", get(services::get_service))
        .route("/services/{id}/drivers", get(services::list_drivers))
        .route(
            "/services/{id}/feedback",
            get(reports::list_feedback).post(reports::create_feedback),
        )
        .route(
            "/services/{id}/incidents",
            get(reports::list_incidents).post(reports::report_incident),
        )
        .route(
            "/services/{id}/lost-found",
            get(reports::list_lost_found).post(reports::report_lost_found),
        )
        .route("/lost-found/{id}/found", put(reports::mark_found))
        // Subscriptions
        .route("/takes", get(bookings::list_takes).post(bookings::take_service))
        .route("/takes/{service_id}", delete(bookings::leave_service))
        // Bookings and OTPs
        .route(
            "/bookings",
            get(bookings::my_bookings).post(bookings::create_booking),
        )
        .route(
            "/bookings/{id}",
            put(bookings::update_booking).delete(bookings::cancel_booking),
        )
        .route(
            "/bookings/{id}/otp",
            get(bookings::list_otps).post(bookings::issue_otp),
        )
        .route("/bookings/{id}/otp/verify", post(bookings::verify_otp))
        .route("/notifications", get(notifications::list_notifications))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Admin routes (requires auth + admin flag)
    let admin_routes = Router::new()
        // Service inventory
        .route("/services", post(services::create_service))
        .route(
            "/services/{id}",
            put(services::update_service).delete(services::delete_service),
        )
        .route("/drivers", post(services::create_driver))
        .route(
            "/drivers/{license_no}",
            put(services::update_driver).delete(services::delete_driver),
        )
        // Reports
        .route("/incidents/{id}", delete(reports::delete_incident))
        .route("/incidents/{id}/status", put(reports::update_incident_status))
        .route("/feedback/{id}", delete(reports::delete_feedback))
        .route("/lost-found/{id}", delete(reports::delete_lost_found))
        // Notifications
        .route("/notifications", post(notifications::create_notification))
        .route(
            "/notifications/{id}",
            delete(notifications::delete_notification),
        )
        // User management
        .route("/users", get(users::list_users))
        .route(
            "/users/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .route("/bookings", get(bookings::list_all_bookings))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(session_routes)
        .nest("/api", member_routes)
        .nest("/api/admin", admin_routes)
        .with_state(state)
}
