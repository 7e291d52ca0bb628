//! Order Service - clients, service catalog, orders with payment and delivery
//! status, user accounts and receipt settings over a PostgreSQL store.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

pub use startup::{build_router, AppState, Application};
