pub mod auth;
pub mod dashboard;
pub mod profile;
pub mod records;
pub mod theme;
