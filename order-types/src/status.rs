//! Payment and service status of an order, and the derivation of the payment
//! status from line items and the amount paid.
//!
//! The derivation works on text exactly as typed into the order form
//! (`"10,50"`, `"7.25"`, `"1e3"`, `""`). It never fails: anything that does not
//! start with a representable number counts as zero, and sums saturate at
//! `Decimal::MAX` instead of overflowing. Strict parsing for submitted payloads
//! lives in [`parse_amount_strict`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Payment status (`statusPagamento`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "A_PAGAR")]
    Unpaid,
    #[serde(rename = "PARCIAL")]
    Partial,
    #[serde(rename = "PAGO")]
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "A_PAGAR",
            PaymentStatus::Partial => "PARCIAL",
            PaymentStatus::Paid => "PAGO",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "PARCIAL" => PaymentStatus::Partial,
            "PAGO" => PaymentStatus::Paid,
            _ => PaymentStatus::Unpaid,
        }
    }

    /// Status implied by an order total and the amount received.
    ///
    /// A zero total is never paid or partial, even if money was recorded
    /// (e.g. every item removed after a deposit).
    pub fn derive(total: Decimal, paid: Decimal) -> Self {
        if total <= Decimal::ZERO || paid <= Decimal::ZERO {
            PaymentStatus::Unpaid
        } else if paid >= total {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Partial
        }
    }
}

/// Production/delivery status (`statusServico`).
///
/// `Withdrawn` is where orders normally end, but a later full update may move
/// an order out of it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ServiceStatus {
    #[default]
    #[serde(rename = "EM_ANDAMENTO")]
    InProgress,
    #[serde(rename = "PROVA")]
    Fitting,
    #[serde(rename = "PRONTO")]
    Ready,
    #[serde(rename = "RETIRADO")]
    Withdrawn,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::InProgress => "EM_ANDAMENTO",
            ServiceStatus::Fitting => "PROVA",
            ServiceStatus::Ready => "PRONTO",
            ServiceStatus::Withdrawn => "RETIRADO",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "PROVA" => ServiceStatus::Fitting,
            "PRONTO" => ServiceStatus::Ready,
            "RETIRADO" => ServiceStatus::Withdrawn,
            _ => ServiceStatus::InProgress,
        }
    }
}

/// Result of deriving totals for an order draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Derivation {
    pub total: Decimal,
    pub paid: Decimal,
    pub payment_status: PaymentStatus,
}

/// Sum the item prices and derive the payment status for `paid`.
pub fn derive<'a, I>(prices: I, paid: &str) -> Derivation
where
    I: IntoIterator<Item = &'a str>,
{
    let total = prices
        .into_iter()
        .map(parse_amount)
        .fold(Decimal::ZERO, Decimal::saturating_add);
    let paid = parse_amount(paid);

    Derivation {
        total,
        paid,
        payment_status: PaymentStatus::derive(total, paid),
    }
}

/// Lenient amount parsing used while an order is being edited.
///
/// The first decimal comma becomes a period, then the longest leading
/// `[+-]digits[.digits][e[+-]digits]` prefix is read. Anything else, including
/// a number too large for a `Decimal`, is zero.
pub fn parse_amount(raw: &str) -> Decimal {
    let normalized = raw.trim_start().replacen(',', ".", 1);

    to_decimal(numeric_prefix(&normalized)).unwrap_or(Decimal::ZERO)
}

/// Strict amount parsing for submitted values.
///
/// Empty text is zero. Otherwise the whole (trimmed) text must be a number,
/// with a comma or a period as decimal separator.
pub fn parse_amount_strict(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }

    let normalized = trimmed.replacen(',', ".", 1);
    if numeric_prefix(&normalized).len() != normalized.len() {
        return None;
    }

    to_decimal(&normalized)
}

fn to_decimal(prefix: &str) -> Option<Decimal> {
    if prefix.is_empty() {
        return None;
    }

    let (mantissa, exponent) = match prefix.find(|c: char| c == 'e' || c == 'E') {
        Some(at) => (&prefix[..at], prefix[at + 1..].parse::<i32>().ok()?),
        None => (prefix, 0),
    };

    let (negative, unsigned) = match mantissa.as_bytes()[0] {
        b'-' => (true, &mantissa[1..]),
        b'+' => (false, &mantissa[1..]),
        _ => (false, mantissa),
    };

    // ".5" is accepted as 0.5
    let value = if unsigned.starts_with('.') {
        Decimal::from_str(&format!("0{}", unsigned)).ok()?
    } else {
        Decimal::from_str(unsigned).ok()?
    };

    let value = scale_by_power_of_ten(value, exponent)?;
    Some(if negative { -value } else { value })
}

/// `value * 10^exponent`, or `None` when the result does not fit.
fn scale_by_power_of_ten(mut value: Decimal, exponent: i32) -> Option<Decimal> {
    for _ in 0..exponent.unsigned_abs() {
        if value.is_zero() {
            break;
        }
        value = if exponent > 0 {
            value.checked_mul(Decimal::TEN)?
        } else {
            value.checked_div(Decimal::TEN)?
        };
    }
    Some(value)
}

fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return "";
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn parses_comma_and_period_decimals() {
        assert_eq!(parse_amount("10,00"), dec("10.00"));
        assert_eq!(parse_amount("5.50"), dec("5.50"));
        assert_eq!(parse_amount("  7"), dec("7"));
    }

    #[test]
    fn unparsable_amounts_are_zero() {
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("R$ 10"), Decimal::ZERO);
        assert_eq!(parse_amount("-"), Decimal::ZERO);
    }

    #[test]
    fn reads_leading_numeric_prefix() {
        assert_eq!(parse_amount("12abc"), dec("12"));
        assert_eq!(parse_amount("3,5 reais"), dec("3.5"));
        assert_eq!(parse_amount("5."), dec("5"));
        assert_eq!(parse_amount(".5"), dec("0.5"));
        // Only the first comma is a decimal separator.
        assert_eq!(parse_amount("1,234,56"), dec("1.234"));
    }

    #[test]
    fn keeps_sign() {
        assert_eq!(parse_amount("-5,00"), dec("-5.00"));
        assert_eq!(parse_amount("+2"), dec("2"));
    }

    #[test]
    fn paid_in_full() {
        let d = derive(["10,00", "5,50"], "15,50");
        assert_eq!(d.total, dec("15.5"));
        assert_eq!(d.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn partial_payment() {
        let d = derive(["20,00"], "5,00");
        assert_eq!(d.total, dec("20"));
        assert_eq!(d.payment_status, PaymentStatus::Partial);
    }

    #[test]
    fn garbage_input_is_unpaid() {
        let d = derive(["abc"], "");
        assert_eq!(d.total, Decimal::ZERO);
        assert_eq!(d.payment_status, PaymentStatus::Unpaid);
    }

    #[test]
    fn overpayment_is_paid() {
        assert_eq!(
            PaymentStatus::derive(dec("10"), dec("12")),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn zero_total_is_unpaid_even_with_money_recorded() {
        assert_eq!(PaymentStatus::derive(dec("0"), dec("5")), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::derive(dec("0"), dec("0")), PaymentStatus::Unpaid);
    }

    #[test]
    fn nothing_paid_is_unpaid() {
        assert_eq!(PaymentStatus::derive(dec("30"), dec("0")), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::derive(dec("30"), dec("-1")), PaymentStatus::Unpaid);
    }

    #[test]
    fn total_is_sum_over_many_prices() {
        let prices = ["1,10", "2.20", "3,30", "4.40"];
        let d = derive(prices, "0");
        assert_eq!(d.total, dec("11.00"));
        assert_eq!(d.payment_status, PaymentStatus::Unpaid);
    }

    #[test]
    fn large_prices_saturate_instead_of_overflowing() {
        let max = "79228162514264337593543950335";
        let d = derive([max, max], "");
        assert_eq!(d.total, Decimal::MAX);
        assert_eq!(d.payment_status, PaymentStatus::Unpaid);

        let d = derive([max, "1", max], max);
        assert_eq!(d.total, Decimal::MAX);
        assert_eq!(d.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn exponents_are_read() {
        assert_eq!(parse_amount("1e3"), dec("1000"));
        assert_eq!(parse_amount("1,5E2"), dec("150"));
        assert_eq!(parse_amount("25e-1"), dec("2.5"));
        assert_eq!(parse_amount("2e+1 reais"), dec("20"));
        // An incomplete exponent is not part of the number.
        assert_eq!(parse_amount("7e"), dec("7"));
        assert_eq!(parse_amount("7e-"), dec("7"));
        assert_eq!(parse_amount_strict("1e3"), Some(dec("1000")));
        assert_eq!(parse_amount_strict("7e"), None);
    }

    #[test]
    fn unrepresentable_amounts_are_zero() {
        assert_eq!(parse_amount("1e40"), Decimal::ZERO);
        assert_eq!(parse_amount("1e99999999999"), Decimal::ZERO);
        assert_eq!(parse_amount("1e-40"), Decimal::ZERO);
        assert_eq!(parse_amount("0e99999"), Decimal::ZERO);
    }

    #[test]
    fn status_boundaries_hold_for_a_range_of_amounts() {
        for total_cents in 1..50i64 {
            let total = Decimal::new(total_cents * 25, 2);
            for paid_cents in 0..60i64 {
                let paid = Decimal::new(paid_cents * 25, 2);
                let expected = if paid == Decimal::ZERO {
                    PaymentStatus::Unpaid
                } else if paid >= total {
                    PaymentStatus::Paid
                } else {
                    PaymentStatus::Partial
                };
                assert_eq!(PaymentStatus::derive(total, paid), expected);
            }
        }
    }

    #[test]
    fn strict_parsing_rejects_trailing_garbage() {
        assert_eq!(parse_amount_strict("10,50"), Some(dec("10.50")));
        assert_eq!(parse_amount_strict(" 3.25 "), Some(dec("3.25")));
        assert_eq!(parse_amount_strict(""), Some(Decimal::ZERO));
        assert_eq!(parse_amount_strict("12abc"), None);
        assert_eq!(parse_amount_strict("abc"), None);
        assert_eq!(parse_amount_strict("1,2,3"), None);
    }

    #[test]
    fn statuses_round_trip_through_column_text() {
        for status in [
            PaymentStatus::Unpaid,
            PaymentStatus::Partial,
            PaymentStatus::Paid,
        ] {
            assert_eq!(PaymentStatus::from_string(status.as_str()), status);
        }
        for status in [
            ServiceStatus::InProgress,
            ServiceStatus::Fitting,
            ServiceStatus::Ready,
            ServiceStatus::Withdrawn,
        ] {
            assert_eq!(ServiceStatus::from_string(status.as_str()), status);
        }
    }

    #[test]
    fn statuses_use_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Unpaid).unwrap(),
            "\"A_PAGAR\""
        );
        assert_eq!(
            serde_json::from_str::<ServiceStatus>("\"RETIRADO\"").unwrap(),
            ServiceStatus::Withdrawn
        );
        assert!(serde_json::from_str::<ServiceStatus>("\"ENTREGUE\"").is_err());
    }
}
