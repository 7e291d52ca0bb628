//! Order (pedido) model.

use chrono::{DateTime, NaiveDate, Utc};
use order_types::{LineItem, OrderRequest, OrderResponse, PaymentStatus, ServiceStatus};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Order row.
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub order_id: Uuid,
    pub client_id: Uuid,
    pub description: Option<String>,
    pub items: Json<Vec<LineItem>>,
    pub created_utc: DateTime<Utc>,
    pub delivery_date: Option<NaiveDate>,
    pub service_status: String,
    pub payment_status: String,
    pub total: Decimal,
    pub amount_paid: Decimal,
    pub payment_method: Option<String>,
    pub photos: Vec<String>,
}

impl Order {
    pub fn service_status(&self) -> ServiceStatus {
        ServiceStatus::from_string(&self.service_status)
    }

    pub fn payment_status(&self) -> PaymentStatus {
        PaymentStatus::from_string(&self.payment_status)
    }

    /// Amount still owed, never negative.
    pub fn balance(&self) -> Decimal {
        self.total
            .saturating_sub(self.amount_paid)
            .max(Decimal::ZERO)
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let service_status = order.service_status();
        let payment_status = order.payment_status();

        OrderResponse {
            id: order.order_id,
            client_id: order.client_id,
            description: order.description,
            items: order.items.0,
            created_utc: order.created_utc,
            delivery_date: order.delivery_date,
            service_status,
            payment_status,
            total: order.total,
            amount_paid: order.amount_paid,
            payment_method: order.payment_method,
            photos: order.photos,
        }
    }
}

/// Full order contents written on create and on replacement.
///
/// Totals and statuses are persisted exactly as given.
#[derive(Debug, Clone)]
pub struct WriteOrder {
    pub client_id: Uuid,
    pub description: Option<String>,
    pub items: Vec<LineItem>,
    pub delivery_date: Option<NaiveDate>,
    pub service_status: ServiceStatus,
    pub payment_status: PaymentStatus,
    pub total: Decimal,
    pub amount_paid: Decimal,
    pub payment_method: Option<String>,
    pub photos: Vec<String>,
}

impl From<OrderRequest> for WriteOrder {
    fn from(req: OrderRequest) -> Self {
        WriteOrder {
            client_id: req.client_id,
            description: req.description,
            items: req.items.into_iter().map(LineItem::from).collect(),
            delivery_date: req.delivery_date,
            service_status: req.service_status,
            payment_status: req.payment_status,
            total: req.total,
            amount_paid: req.amount_paid,
            payment_method: req.payment_method,
            photos: req.photos,
        }
    }
}
