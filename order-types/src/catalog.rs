use crate::validate_amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ServiceRequest {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[serde(rename = "valor")]
    #[validate(custom(function = "validate_amount"))]
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceResponse {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "valor", with = "rust_decimal::serde::float")]
    pub price: Decimal,
}
