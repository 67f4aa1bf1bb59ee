use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled {
        return Ok(());
    }

    if PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

pub(crate) fn record_graded(kind: &'static str) {
    metrics::counter!("submissions_graded_total", "kind" => kind).increment(1);
}

pub(crate) fn record_duplicate(source: &'static str) {
    metrics::counter!("submissions_duplicate_total", "source" => source).increment(1);
}

pub(crate) fn record_storage_retry(operation: &'static str) {
    metrics::counter!("storage_retries_total", "operation" => operation).increment(1);
}
