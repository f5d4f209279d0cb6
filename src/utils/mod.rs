pub mod flash;
pub mod jwt;
pub mod password;
