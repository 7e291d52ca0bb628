//! Domain models for order-service.

mod catalog;
mod client;
mod order;
mod user;

pub use catalog::{CatalogService, CreateCatalogService};
pub use client::{Client, WriteClient};
pub use order::{Order, WriteOrder};
pub use order_types::{LineItem, PaymentStatus, Role, ServiceStatus, ADMIN_USERNAME};
pub use user::{CreateUser, User};
