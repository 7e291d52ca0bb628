//! Finance summary handler.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use service_core::error::AppError;

use crate::services::{summarize, DateWindow, FinanceSummary, Period};
use crate::startup::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FinanceQuery {
    pub periodo: Option<String>,
    pub inicio: Option<String>,
    pub fim: Option<String>,
}

fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid date for {}: {}", field, s))),
    }
}

/// GET /api/financeiro?periodo=&inicio=&fim=
pub async fn finance_summary(
    State(state): State<AppState>,
    Query(query): Query<FinanceQuery>,
) -> Result<Json<FinanceSummary>, AppError> {
    let raw_period = query.periodo.as_deref().unwrap_or_default();
    let period = Period::from_string(raw_period)
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Unknown period: {}", raw_period)))?;
    let start = parse_date("inicio", query.inicio.as_deref())?;
    let end = parse_date("fim", query.fim.as_deref())?;

    let window = DateWindow::resolve(period, Utc::now().date_naive(), start, end);
    let orders = state.db.list_orders().await?;

    Ok(Json(summarize(&orders, window)))
}
