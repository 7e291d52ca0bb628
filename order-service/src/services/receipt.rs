//! Receipt assembly from an order, its client and the business settings.

use crate::models::{Client, Order, PaymentStatus};
use order_types::receipt::MISSING_PAYMENT_METHOD;
use order_types::{BusinessHeader, ReceiptClient, ReceiptSnapshot, SettingsPayload};

/// Receipt for `order`. A missing client (deleted or never found) is
/// printed as unknown rather than failing the request.
pub fn build_receipt(order: Order, client: Option<Client>, settings: &SettingsPayload) -> ReceiptSnapshot {
    let payment_status = order.payment_status();
    let balance = order.balance();

    let client = client.map_or_else(ReceiptClient::unknown, |c| ReceiptClient {
        name: c.name,
        phone: c.phone,
    });

    ReceiptSnapshot {
        business: BusinessHeader::from_settings(settings),
        client,
        order_id: order.order_id,
        created_utc: order.created_utc,
        payment_method: order
            .payment_method
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| MISSING_PAYMENT_METHOD.to_string()),
        payment_date: match payment_status {
            PaymentStatus::Paid => order.delivery_date,
            _ => None,
        },
        payment_status,
        items: order.items.0,
        total: order.total,
        amount_paid: order.amount_paid,
        balance,
    }
}
