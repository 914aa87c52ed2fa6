// Prometheus metrics for the API, exposed on GET /metrics

use codepad_common::types::ExecutionResult;
use lazy_static::lazy_static;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::time::Duration;

lazy_static! {
    pub static ref EXECUTIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("codepad_executions_total", "Executions by result status"),
        &["status"]
    )
    .expect("valid metric definition");
    pub static ref EXECUTION_FAILURES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("codepad_execution_failures_total", "Failed executions by error kind"),
        &["kind"]
    )
    .expect("valid metric definition");
    pub static ref EXECUTION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "codepad_execution_duration_seconds",
            "Wall time from submit to normalized result"
        )
        .buckets(vec![0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 12.0, 20.0])
    )
    .expect("valid metric definition");
    pub static ref SNIPPETS_SHARED_TOTAL: IntCounter =
        IntCounter::new("codepad_snippets_shared_total", "Snippets stored for sharing")
            .expect("valid metric definition");
    static ref REGISTRY: Registry = {
        let registry = Registry::new();
        registry.register(Box::new(EXECUTIONS_TOTAL.clone())).expect("unique metric");
        registry.register(Box::new(EXECUTION_FAILURES_TOTAL.clone())).expect("unique metric");
        registry.register(Box::new(EXECUTION_DURATION.clone())).expect("unique metric");
        registry.register(Box::new(SNIPPETS_SHARED_TOTAL.clone())).expect("unique metric");
        registry
    };
}

pub fn record_execution(result: &ExecutionResult, elapsed: Duration) {
    let status = if result.is_success() { "success" } else { "error" };
    EXECUTIONS_TOTAL.with_label_values(&[status]).inc();
    if let Some(kind) = result.error_kind() {
        EXECUTION_FAILURES_TOTAL.with_label_values(&[kind.as_str()]).inc();
    }
    EXECUTION_DURATION.observe(elapsed.as_secs_f64());
}

/// Text exposition of every registered metric
pub fn render() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use codepad_common::types::ErrorKind;

    #[test]
    fn test_render_includes_recorded_failure() {
        let result = ExecutionResult::failure(ErrorKind::ExecutionTimedOut, "timed out");
        record_execution(&result, Duration::from_millis(300));

        let text = render().unwrap();
        assert!(text.contains("codepad_executions_total{status=\"error\"}"));
        assert!(text.contains("codepad_execution_failures_total{kind=\"execution_timed_out\"}"));
        assert!(text.contains("codepad_execution_duration_seconds_bucket"));
    }
}
