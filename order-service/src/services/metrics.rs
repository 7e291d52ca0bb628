//! Domain metrics for order-service.
//!
//! Recorded through the `metrics` facade; the Prometheus recorder is installed
//! by `service_core::observability::init_metrics` and rendered on `/metrics`.

use metrics::{counter, histogram};
use std::time::Instant;

/// Times one database operation into `order_db_query_duration_seconds`.
pub struct QueryTimer {
    operation: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    pub fn observe_duration(self) {
        histogram!("order_db_query_duration_seconds", "operation" => self.operation)
            .record(self.start.elapsed().as_secs_f64());
    }
}

pub fn record_order_created(payment_status: &str) {
    counter!("order_orders_created_total", "payment_status" => payment_status.to_string())
        .increment(1);
}

pub fn record_order_updated() {
    counter!("order_orders_updated_total").increment(1);
}

/// `transition` is `withdraw` or `pay`.
pub fn record_transition(transition: &'static str) {
    counter!("order_transitions_total", "transition" => transition).increment(1);
}

pub fn record_client_delete_refused() {
    counter!("order_client_delete_refused_total").increment(1);
}

/// `outcome` is `success` or `failure`.
pub fn record_login(outcome: &'static str) {
    counter!("order_logins_total", "outcome" => outcome).increment(1);
}
