use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}

/// Text exposition of every registered metric.
pub async fn metrics_text() -> String {
    let metrics = get_metrics().await;
    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&metrics.registry.gather(), &mut buffer) {
        tracing::warn!("metrics encoding failed: {}", e);
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Document submission
    pub document_requests: IntCounterVec,
    pub document_failures: IntCounterVec,
    pub document_duration: HistogramVec,
    pub bad_token_retries: IntCounter,

    // Token
    pub token_fetches: IntCounter,
    pub token_fetch_failures: IntCounter,
    pub token_invalidations: IntCounter,

    // Report
    pub report_requests: IntCounter,
    pub report_failures: IntCounterVec,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("atolclient".into()), None).expect("metrics registry");

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Document
            document_requests: IntCounterVec::new(Opts::new("document_requests_total", "Documents submitted by operation"), &["operation"]).expect("metric definition"),
            document_failures: IntCounterVec::new(Opts::new("document_failures_total", "Document submission failures by reason"), &["operation", "reason"]).expect("metric definition"),
            document_duration: HistogramVec::new(HistogramOpts::new("document_duration_seconds", "Document submission duration seconds").buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]), &["operation"]).expect("metric definition"),
            bad_token_retries: IntCounter::new("bad_token_retries_total", "Submissions retried after a bad token answer").expect("metric definition"),

            // Token
            token_fetches: IntCounter::new("token_fetches_total", "Token acquisitions from the server").expect("metric definition"),
            token_fetch_failures: IntCounter::new("token_fetch_failures_total", "Failed token acquisitions").expect("metric definition"),
            token_invalidations: IntCounter::new("token_invalidations_total", "Cached tokens dropped").expect("metric definition"),

            // Report
            report_requests: IntCounter::new("report_requests_total", "Report fetches").expect("metric definition"),
            report_failures: IntCounterVec::new(Opts::new("report_failures_total", "Report fetch failures by reason"), &["reason"]).expect("metric definition"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(metrics.document_requests.clone()),
            Box::new(metrics.document_failures.clone()),
            Box::new(metrics.document_duration.clone()),
            Box::new(metrics.bad_token_retries.clone()),
            Box::new(metrics.token_fetches.clone()),
            Box::new(metrics.token_fetch_failures.clone()),
            Box::new(metrics.token_invalidations.clone()),
            Box::new(metrics.report_requests.clone()),
            Box::new(metrics.report_failures.clone()),
        ];
        for collector in collectors {
            reg.register(collector).expect("metric registration");
        }

        metrics
    }
}
