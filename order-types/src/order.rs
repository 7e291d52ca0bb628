use crate::status::{PaymentStatus, ServiceStatus};
use crate::validate_amount;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Line item as stored on an order.
///
/// Description and price are copied from the catalog when the item is added,
/// so deleting a catalog entry never touches existing orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "preco", with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LineItemRequest {
    #[serde(rename = "descricao", default)]
    #[validate(length(max = 500, message = "Item description is too long"))]
    pub description: String,

    #[serde(rename = "preco")]
    #[validate(custom(function = "validate_amount"))]
    pub price: Decimal,
}

impl From<LineItemRequest> for LineItem {
    fn from(item: LineItemRequest) -> Self {
        LineItem {
            description: item.description,
            price: item.price,
        }
    }
}

/// Order body for create and full replacement.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct OrderRequest {
    #[serde(rename = "clienteId")]
    pub client_id: Uuid,

    #[serde(rename = "descricao", default)]
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,

    #[serde(rename = "itens", default)]
    #[validate(nested)]
    pub items: Vec<LineItemRequest>,

    #[serde(rename = "dataEntrega", default)]
    pub delivery_date: Option<NaiveDate>,

    #[serde(rename = "statusServico", default)]
    pub service_status: ServiceStatus,

    #[serde(rename = "statusPagamento", default)]
    pub payment_status: PaymentStatus,

    #[serde(rename = "valorTotal")]
    #[validate(custom(function = "validate_amount"))]
    pub total: Decimal,

    #[serde(rename = "valorPago", default)]
    #[validate(custom(function = "validate_amount"))]
    pub amount_paid: Decimal,

    #[serde(rename = "formaPagamento", default)]
    #[validate(length(max = 50, message = "Payment method is too long"))]
    pub payment_method: Option<String>,

    #[serde(rename = "fotos", default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderResponse {
    pub id: Uuid,
    #[serde(rename = "clienteId")]
    pub client_id: Uuid,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "itens")]
    pub items: Vec<LineItem>,
    #[serde(rename = "dataCriacao")]
    pub created_utc: DateTime<Utc>,
    #[serde(rename = "dataEntrega")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(rename = "statusServico")]
    pub service_status: ServiceStatus,
    #[serde(rename = "statusPagamento")]
    pub payment_status: PaymentStatus,
    #[serde(rename = "valorTotal", with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(rename = "valorPago", with = "rust_decimal::serde::float")]
    pub amount_paid: Decimal,
    #[serde(rename = "formaPagamento")]
    pub payment_method: Option<String>,
    #[serde(rename = "fotos")]
    pub photos: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn body() -> serde_json::Value {
        json!({
            "clienteId": "7f0a3c1e-2d4b-4b8e-9c6a-1f2e3d4c5b6a",
            "itens": [
                {"descricao": "Barra", "preco": 10.0},
                {"descricao": "Ajuste", "preco": "5.50"}
            ],
            "valorTotal": 15.5,
            "valorPago": 5
        })
    }

    #[test]
    fn defaults_apply_to_new_orders() {
        let req: OrderRequest = serde_json::from_value(body()).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.service_status, ServiceStatus::InProgress);
        assert_eq!(req.payment_status, PaymentStatus::Unpaid);
        assert_eq!(req.items[1].price, Decimal::from_str("5.50").unwrap());
        assert!(req.photos.is_empty());
    }

    #[test]
    fn comma_decimals_are_rejected_on_the_wire() {
        let mut value = body();
        value["valorPago"] = json!("5,00");
        assert!(serde_json::from_value::<OrderRequest>(value).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut value = body();
        value["desconto"] = json!(3);
        assert!(serde_json::from_value::<OrderRequest>(value).is_err());
    }

    #[test]
    fn negative_prices_fail_validation() {
        let mut value = body();
        value["itens"][0]["preco"] = json!(-1);
        let req: OrderRequest = serde_json::from_value(value).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn amounts_that_would_be_rounded_fail_validation() {
        let mut value = body();
        value["valorTotal"] = json!("10.005");
        let req: OrderRequest = serde_json::from_value(value).unwrap();
        assert!(req.validate().is_err());

        let mut value = body();
        value["itens"][1]["preco"] = json!("5.505");
        let req: OrderRequest = serde_json::from_value(value).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn amounts_beyond_the_column_fail_validation() {
        let mut value = body();
        value["valorPago"] = json!(100000000000u64);
        let req: OrderRequest = serde_json::from_value(value).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("amount_paid"));
    }

    #[test]
    fn long_payment_method_fails_validation() {
        let mut value = body();
        value["formaPagamento"] = json!("x".repeat(51));
        let req: OrderRequest = serde_json::from_value(value).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut value = body();
        value["statusServico"] = json!("ENTREGUE");
        assert!(serde_json::from_value::<OrderRequest>(value).is_err());
    }

    #[test]
    fn line_items_use_wire_names_and_numbers() {
        let item = LineItem::from(LineItemRequest {
            description: "Barra".to_string(),
            price: Decimal::from_str("15.5").unwrap(),
        });
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["descricao"], "Barra");
        assert_eq!(json["preco"], 15.5);
    }
}
