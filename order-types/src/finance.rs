use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Period {
    #[default]
    Total,
    Hoje,
    Semana,
    Mes,
    Personalizado,
}

impl Period {
    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "TOTAL" => Some(Period::Total),
            "HOJE" => Some(Period::Hoje),
            "SEMANA" => Some(Period::Semana),
            "MES" => Some(Period::Mes),
            "PERSONALIZADO" => Some(Period::Personalizado),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceSummary {
    #[serde(rename = "totalGeral", with = "rust_decimal::serde::float")]
    pub total_billed: Decimal,
    #[serde(rename = "totalRecebido", with = "rust_decimal::serde::float")]
    pub total_received: Decimal,
    #[serde(rename = "totalAReceber", with = "rust_decimal::serde::float")]
    pub total_receivable: Decimal,
    /// Orders in the window that are not fully paid.
    #[serde(rename = "pendencias")]
    pub pending: usize,
    #[serde(rename = "quantidade")]
    pub count: usize,
    /// Totals of paid orders grouped by payment method.
    #[serde(rename = "porFormaPagamento")]
    pub by_payment_method: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_names() {
        assert_eq!(Period::from_string("semana"), Some(Period::Semana));
        assert_eq!(Period::from_string(""), Some(Period::Total));
        assert_eq!(Period::from_string("ANO"), None);
        assert_eq!(serde_json::to_value(Period::Personalizado).unwrap(), "PERSONALIZADO");
    }
}
