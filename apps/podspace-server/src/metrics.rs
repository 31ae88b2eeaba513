//! Prometheus metrics for podspace-server.
//!
//! Exposed in Prometheus format at the `/metrics` endpoint.

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder and return a handle for
/// rendering.
///
/// Must be called once at server startup before any metrics are recorded.
pub fn init_metrics() -> PrometheusHandle {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    describe_counter!("podspace_pods_created_total", "Total number of pods created");
    describe_counter!(
        "podspace_invitations_issued_total",
        "Total number of invitations issued"
    );
    describe_counter!(
        "podspace_invitations_redeemed_total",
        "Invitation redemption attempts by outcome"
    );
    describe_counter!(
        "podspace_messages_sent_total",
        "Total number of chat messages sent"
    );

    handle
}

pub fn record_pod_created() {
    counter!("podspace_pods_created_total").increment(1);
}

pub fn record_invitation_issued() {
    counter!("podspace_invitations_issued_total").increment(1);
}

pub fn record_invitation_redeemed(outcome: &'static str) {
    counter!("podspace_invitations_redeemed_total", "outcome" => outcome).increment(1);
}

pub fn record_message_sent() {
    counter!("podspace_messages_sent_total").increment(1);
}
