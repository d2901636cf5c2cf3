//! Metrics collection and exposition.
//!
//! # Metrics
//! - `survey_requests_total` (counter): requests by method, status
//! - `survey_request_duration_seconds` (histogram): time from decode to response
//! - `survey_active_connections` (gauge): current connection count
//! - `survey_identities` (gauge): identities held in memory
//! - `survey_transitions_total` (counter): state machine transitions by outcome
//! - `survey_completed_total` (counter): surveys that reached the summary
//!
//! Recording is a no-op until a recorder is installed by [`init_metrics`].

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::survey::Outcome;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start_time: Instant) {
    ::metrics::counter!(
        "survey_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("survey_request_duration_seconds")
        .record(start_time.elapsed().as_secs_f64());
}

pub fn record_active_connections(count: u64) {
    ::metrics::gauge!("survey_active_connections").set(count as f64);
}

pub fn record_identity_count(count: usize) {
    ::metrics::gauge!("survey_identities").set(count as f64);
}

pub fn record_transition(outcome: Outcome) {
    ::metrics::counter!("survey_transitions_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_survey_completed() {
    ::metrics::counter!("survey_completed_total").increment(1);
}
