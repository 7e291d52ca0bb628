pub mod catalog;
pub mod clients;
pub mod finance;
pub mod health;
pub mod orders;
pub mod settings;
pub mod users;

pub use health::{api_health, health_check, metrics, readiness_check};
