//! Prometheus metrics for the SSV validator client.
//!
//! All metrics follow the naming convention: `ssv_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // SLOT CLOCK / DISPATCHER
    // =========================================================================

    /// Slots the dispatcher has woken for
    pub static ref SLOTS_PROCESSED: Counter = Counter::new(
        "ssv_dispatcher_slots_processed_total",
        "Total number of slots the dispatcher processed"
    ).expect("metric creation failed");

    /// Slot most recently ticked
    pub static ref CURRENT_SLOT: Gauge = Gauge::new(
        "ssv_clock_current_slot",
        "Slot most recently delivered by the slot ticker"
    ).expect("metric creation failed");

    /// Slots skipped because duties could not be resolved
    pub static ref DUTY_RESOLUTION_FAILURES: Counter = Counter::new(
        "ssv_dispatcher_duty_resolution_failures_total",
        "Slots skipped because duty resolution failed"
    ).expect("metric creation failed");

    /// Role task outcomes
    pub static ref ROLE_TASKS: CounterVec = CounterVec::new(
        Opts::new("ssv_dispatcher_role_tasks_total", "Role tasks by role and outcome"),
        &["role", "outcome"]  // outcome: succeeded/failed/aborted/skipped
    ).expect("metric creation failed");

    // =========================================================================
    // TASK STREAM
    // =========================================================================

    /// Tasks received from the coordinator stream
    pub static ref STREAM_TASKS_RECEIVED: CounterVec = CounterVec::new(
        Opts::new("ssv_stream_tasks_received_total", "Tasks received by topic"),
        &["topic"]
    ).expect("metric creation failed");

    // =========================================================================
    // PARTIAL SIGNER
    // =========================================================================

    /// Partial submissions by kind and outcome
    pub static ref PARTIAL_SUBMISSIONS: CounterVec = CounterVec::new(
        Opts::new("ssv_signer_partial_submissions_total", "Partial signature submissions"),
        &["kind", "outcome"]  // kind: attestation/block
    ).expect("metric creation failed");

    /// Time from signing request to submission response
    pub static ref SIGNING_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "ssv_signer_signing_duration_seconds",
            "Time spent producing and submitting a partial signature"
        ).buckets(exponential_buckets(0.001, 2.0, 14).expect("bucket layout"))
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(SLOTS_PROCESSED.clone()),
        Box::new(CURRENT_SLOT.clone()),
        Box::new(DUTY_RESOLUTION_FAILURES.clone()),
        Box::new(ROLE_TASKS.clone()),
        Box::new(STREAM_TASKS_RECEIVED.clone()),
        Box::new(PARTIAL_SUBMISSIONS.clone()),
        Box::new(SIGNING_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
