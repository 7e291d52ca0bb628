//! Editable order with live status derivation.
//!
//! Prices and the paid amount are kept as the text typed by the user. Every
//! change to either re-runs the derivation, so `total()` and
//! `payment_status()` always reflect the current items. Submission is strict:
//! see [`OrderDraft::to_request`].

use crate::error::DraftError;
use chrono::NaiveDate;
use order_types::status::{derive, parse_amount, parse_amount_strict};
use order_types::{
    LineItemRequest, OrderRequest, OrderResponse, PaymentStatus, ServiceResponse, ServiceStatus,
};
use rust_decimal::Decimal;
use uuid::Uuid;

pub const DEFAULT_PAYMENT_METHOD: &str = "Dinheiro";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftItem {
    pub description: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    client_id: Option<Uuid>,
    description: String,
    items: Vec<DraftItem>,
    delivery_date: Option<NaiveDate>,
    service_status: ServiceStatus,
    payment_status: PaymentStatus,
    total: Decimal,
    paid: String,
    payment_method: String,
    photos: Vec<String>,
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderDraft {
    /// Blank order: one empty item, nothing paid, paid in cash.
    pub fn new() -> Self {
        Self {
            client_id: None,
            description: String::new(),
            items: vec![DraftItem::default()],
            delivery_date: None,
            service_status: ServiceStatus::InProgress,
            payment_status: PaymentStatus::Unpaid,
            total: Decimal::ZERO,
            paid: String::new(),
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
            photos: Vec::new(),
        }
    }

    /// Draft for editing a stored order.
    ///
    /// Stored total and status are kept as-is until the first edit, so an
    /// order settled through the pay action still shows as paid.
    pub fn from_order(order: &OrderResponse) -> Self {
        Self {
            client_id: Some(order.client_id),
            description: order.description.clone().unwrap_or_default(),
            items: order
                .items
                .iter()
                .map(|item| DraftItem {
                    description: item.description.clone(),
                    price: item.price.normalize().to_string(),
                })
                .collect(),
            delivery_date: order.delivery_date,
            service_status: order.service_status,
            payment_status: order.payment_status,
            total: order.total,
            paid: order.amount_paid.normalize().to_string(),
            payment_method: order
                .payment_method
                .clone()
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            photos: order.photos.clone(),
        }
    }

    fn recalculate(&mut self) {
        let derivation = derive(self.items.iter().map(|i| i.price.as_str()), &self.paid);
        self.total = derivation.total;
        self.payment_status = derivation.payment_status;
    }

    pub fn client_id(&self) -> Option<Uuid> {
        self.client_id
    }

    pub fn items(&self) -> &[DraftItem] {
        &self.items
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn paid(&self) -> &str {
        &self.paid
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn service_status(&self) -> ServiceStatus {
        self.service_status
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn photos(&self) -> &[String] {
        &self.photos
    }

    /// Amount still owed, never negative.
    pub fn remaining(&self) -> Decimal {
        self.total
            .saturating_sub(parse_amount(&self.paid))
            .max(Decimal::ZERO)
    }

    pub fn set_client(&mut self, client_id: Uuid) {
        self.client_id = Some(client_id);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_delivery_date(&mut self, date: Option<NaiveDate>) {
        self.delivery_date = date;
    }

    pub fn set_service_status(&mut self, status: ServiceStatus) {
        self.service_status = status;
    }

    pub fn set_payment_method(&mut self, method: impl Into<String>) {
        self.payment_method = method.into();
    }

    pub fn add_item(&mut self) {
        self.items.push(DraftItem::default());
        self.recalculate();
    }

    /// Append a copy of a catalog entry as a line item.
    pub fn add_service_item(&mut self, service: &ServiceResponse) {
        self.items.push(DraftItem {
            description: service.name.clone(),
            price: service.price.normalize().to_string(),
        });
        self.recalculate();
    }

    /// Returns false when `index` is out of range.
    pub fn remove_item(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        self.recalculate();
        true
    }

    pub fn set_item_description(&mut self, index: usize, description: impl Into<String>) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.description = description.into();
                true
            }
            None => false,
        }
    }

    pub fn set_item_price(&mut self, index: usize, price: impl Into<String>) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.price = price.into();
                self.recalculate();
                true
            }
            None => false,
        }
    }

    pub fn set_paid(&mut self, paid: impl Into<String>) {
        self.paid = paid.into();
        self.recalculate();
    }

    pub fn add_photo(&mut self, data_url: impl Into<String>) {
        self.photos.push(data_url.into());
    }

    pub fn remove_photo(&mut self, index: usize) -> bool {
        if index >= self.photos.len() {
            return false;
        }
        self.photos.remove(index);
        true
    }

    /// Build the submission payload.
    ///
    /// Unlike the live derivation, text that is not a number is an error here
    /// rather than zero. Empty text is still zero.
    pub fn to_request(&self) -> Result<OrderRequest, DraftError> {
        let client_id = self.client_id.ok_or(DraftError::MissingClient)?;

        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                Ok(LineItemRequest {
                    description: item.description.clone(),
                    price: strict_amount(&format!("itens[{}].preco", i), &item.price)?,
                })
            })
            .collect::<Result<Vec<_>, DraftError>>()?;

        let amount_paid = strict_amount("valorPago", &self.paid)?;
        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        let payment_method = Some(self.payment_method.trim())
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        Ok(OrderRequest {
            client_id,
            description,
            items,
            delivery_date: self.delivery_date,
            service_status: self.service_status,
            payment_status: self.payment_status,
            total: self.total,
            amount_paid,
            payment_method,
            photos: self.photos.clone(),
        })
    }
}

fn strict_amount(field: &str, raw: &str) -> Result<Decimal, DraftError> {
    let value = parse_amount_strict(raw).ok_or_else(|| DraftError::InvalidAmount {
        field: field.to_string(),
        value: raw.to_string(),
    })?;
    if value < Decimal::ZERO {
        return Err(DraftError::NegativeAmount {
            field: field.to_string(),
        });
    }
    Ok(value)
}
