pub mod booking;
pub mod driver;
pub mod feedback;
pub mod incident;
pub mod lost_found;
pub mod notification;
pub mod otp;
pub mod service;
pub mod session;
pub mod takes;
pub mod user;
