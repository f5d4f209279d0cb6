pub mod auth;
pub mod bookings;
pub mod notifications;
pub mod reports;
pub mod services;
pub mod users;
