//! Finance summary over orders.

use crate::models::{Order, PaymentStatus};
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub use order_types::{FinanceSummary, Period};

/// Label used for paid orders without a payment method.
pub const UNSPECIFIED_METHOD: &str = "Outros";

/// Inclusive creation-date window. `None` bounds are open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    /// Resolve a period against `today` (UTC).
    ///
    /// Weeks start on Sunday. A custom range needs both bounds; otherwise it
    /// selects everything.
    pub fn resolve(
        period: Period,
        today: NaiveDate,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        match period {
            Period::Total => DateWindow::default(),
            Period::Hoje => DateWindow {
                start: Some(today),
                end: None,
            },
            Period::Semana => {
                let offset = i64::from(today.weekday().num_days_from_sunday());
                DateWindow {
                    start: Some(today - Duration::days(offset)),
                    end: None,
                }
            }
            Period::Mes => DateWindow {
                start: today.with_day(1),
                end: None,
            },
            Period::Personalizado => match (start, end) {
                (Some(start), Some(end)) => DateWindow {
                    start: Some(start),
                    end: Some(end),
                },
                _ => DateWindow::default(),
            },
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

pub fn summarize(orders: &[Order], window: DateWindow) -> FinanceSummary {
    let mut total_billed = Decimal::ZERO;
    let mut total_received = Decimal::ZERO;
    let mut total_receivable = Decimal::ZERO;
    let mut pending = 0;
    let mut count = 0;
    let mut paid_by_method: BTreeMap<String, Decimal> = BTreeMap::new();

    for order in orders
        .iter()
        .filter(|o| window.contains(o.created_utc.date_naive()))
    {
        count += 1;
        total_billed += order.total;
        total_received += order.amount_paid;
        total_receivable += order.total - order.amount_paid;

        if order.payment_status() == PaymentStatus::Paid {
            let method = order
                .payment_method
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(UNSPECIFIED_METHOD);
            *paid_by_method.entry(method.to_string()).or_default() += order.total;
        } else {
            pending += 1;
        }
    }

    FinanceSummary {
        total_billed,
        total_received,
        total_receivable,
        pending,
        count,
        by_payment_method: paid_by_method
            .into_iter()
            .map(|(method, total)| (method, total.to_f64().unwrap_or_default()))
            .collect(),
    }
}
