//! Receipt snapshot: everything a receipt renderer needs for one order.

use crate::order::LineItem;
use crate::settings::SettingsPayload;
use crate::status::PaymentStatus;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_BUSINESS_NAME: &str = "COSTURACERTA";
pub const DEFAULT_TAGLINE: &str = "Comprovante de Serviço Profissional";
pub const MISSING_PAYMENT_METHOD: &str = "-";
pub const UNKNOWN_CLIENT: &str = "Cliente não encontrado";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessHeader {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "slogan")]
    pub tagline: String,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "endereco")]
    pub address: Option<String>,
    pub cnpj: Option<String>,
    pub logo: Option<String>,
}

impl BusinessHeader {
    pub fn from_settings(settings: &SettingsPayload) -> Self {
        let owned = |key: &str| settings.get(key).map(str::to_string);
        BusinessHeader {
            name: owned("receipt_name").unwrap_or_else(|| DEFAULT_BUSINESS_NAME.to_string()),
            tagline: owned("receipt_tagline").unwrap_or_else(|| DEFAULT_TAGLINE.to_string()),
            phone: owned("receipt_phone"),
            address: owned("receipt_address"),
            cnpj: owned("receipt_cnpj"),
            logo: owned("system_logo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptClient {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
}

impl ReceiptClient {
    pub fn unknown() -> Self {
        ReceiptClient {
            name: UNKNOWN_CLIENT.to_string(),
            phone: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptSnapshot {
    #[serde(rename = "empresa")]
    pub business: BusinessHeader,
    #[serde(rename = "cliente")]
    pub client: ReceiptClient,
    #[serde(rename = "pedidoId")]
    pub order_id: Uuid,
    #[serde(rename = "dataCriacao")]
    pub created_utc: DateTime<Utc>,
    #[serde(rename = "itens")]
    pub items: Vec<LineItem>,
    #[serde(rename = "formaPagamento")]
    pub payment_method: String,
    #[serde(rename = "statusPagamento")]
    pub payment_status: PaymentStatus,
    /// Only set once the order is paid.
    #[serde(rename = "dataPagamento")]
    pub payment_date: Option<NaiveDate>,
    #[serde(rename = "valorTotal", with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(rename = "valorPago", with = "rust_decimal::serde::float")]
    pub amount_paid: Decimal,
    #[serde(rename = "saldo", with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}
