use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
static GENERATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Install the Prometheus recorder and register the custom counters.
///
/// Called once from `main` before any request is served.
pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if METRICS_HANDLE.set(handle).is_err() {
        panic!("failed to set metrics handle: already initialized");
    }

    let registry = Registry::new();

    let generations_counter = IntCounterVec::new(
        Opts::new(
            "creative_generations_total",
            "Total generation requests by kind and outcome",
        ),
        &["kind", "outcome"],
    )
    .expect("Failed to create creative_generations_total metric");

    registry
        .register(Box::new(generations_counter.clone()))
        .expect("Failed to register creative_generations_total");

    PROMETHEUS_REGISTRY
        .set(registry)
        .expect("Failed to set prometheus registry");
    GENERATIONS_TOTAL
        .set(generations_counter)
        .expect("Failed to set creative_generations_total");
}

/// Render recorder output plus the custom counters in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}

/// Count a generation attempt's outcome, per backend kind.
pub fn record_generation(kind: &str, outcome: &str) {
    if let Some(counter) = GENERATIONS_TOTAL.get() {
        counter.with_label_values(&[kind, outcome]).inc();
    }
}
