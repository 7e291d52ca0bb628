//! order-types: wire types shared by the order service and its clients.
//!
//! Wire names follow the browser client (`clienteId`, `valorTotal`, ...).
//! Request bodies reject unknown fields, and money must be a well-formed
//! non-negative number that fits the store: at most two decimal places and
//! below [`AMOUNT_LIMIT`].

pub mod catalog;
pub mod client;
pub mod finance;
pub mod order;
pub mod receipt;
pub mod settings;
pub mod status;
pub mod user;

pub use catalog::{ServiceRequest, ServiceResponse};
pub use client::{ClientRequest, ClientResponse};
pub use finance::{FinanceSummary, Period};
pub use order::{LineItem, LineItemRequest, OrderRequest, OrderResponse};
pub use receipt::{BusinessHeader, ReceiptClient, ReceiptSnapshot};
pub use settings::SettingsPayload;
pub use status::{PaymentStatus, ServiceStatus};
pub use user::{
    ChangePasswordRequest, CreateUserRequest, LoginRequest, LoginResponse, Role, UserResponse,
    ADMIN_USERNAME,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::ValidationError;

/// Money columns are `NUMERIC(12, 2)`: amounts must stay below 10^10.
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// Decimal places a stored amount keeps.
pub const AMOUNT_SCALE: u32 = 2;

/// Body returned by deletes and other acknowledgements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Amount accepted on the wire: non-negative, two decimal places at most,
/// below [`AMOUNT_LIMIT`]. Trailing zeros (`5.500`) are fine.
pub(crate) fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(amount_error("non_negative", "Amount must not be negative"));
    }
    if value.normalize().scale() > AMOUNT_SCALE {
        return Err(amount_error("amount_scale", "Amount must have at most two decimal places"));
    }
    if *value >= AMOUNT_LIMIT {
        return Err(amount_error("amount_range", "Amount is too large"));
    }
    Ok(())
}

fn amount_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}
