use metrics_exporter_prometheus::PrometheusBuilder;
use service_core::error::AppError;
use std::net::SocketAddr;

/// Install the Prometheus recorder with its own scrape listener.
///
/// Skipped when no port is configured, leaving the request metrics as no-ops.
pub fn init_metrics(metrics_port: Option<u16>) -> Result<(), AppError> {
    let Some(port) = metrics_port else {
        tracing::debug!("METRICS_PORT not set, Prometheus exporter disabled");
        return Ok(());
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| {
            AppError::InternalError(anyhow::anyhow!(
                "Failed to install Prometheus exporter on {}: {}",
                addr,
                e
            ))
        })?;

    tracing::info!(addr = %addr, "Prometheus exporter listening");
    Ok(())
}
