//! Process-wide Prometheus recorder for the `metrics` facade.

use crate::error::AppError;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the recorder on first call and return the shared handle.
///
/// Safe to call repeatedly; tests build several applications per process.
pub fn init_metrics() -> Result<PrometheusHandle, AppError> {
    HANDLE
        .get_or_try_init(|| {
            PrometheusBuilder::new().install_recorder().map_err(|e| {
                AppError::InternalError(anyhow::anyhow!(
                    "Failed to install Prometheus recorder: {}",
                    e
                ))
            })
        })
        .cloned()
}

/// Render all recorded metrics in Prometheus text format.
pub fn render_metrics() -> String {
    HANDLE.get().map(|h| h.render()).unwrap_or_default()
}
