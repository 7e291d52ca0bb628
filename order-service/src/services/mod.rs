pub mod database;
pub mod finance;
pub mod metrics;
pub mod receipt;

pub use database::Database;
pub use finance::{summarize, DateWindow, FinanceSummary, Period};
pub use receipt::build_receipt;
