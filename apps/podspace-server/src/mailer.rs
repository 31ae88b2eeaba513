//! Outbound invitation mail.
//!
//! Delivery itself is external to this server; the default implementation
//! logs the accept link so an operator (or a test) can follow it.

use async_trait::async_trait;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Notify `to` that they were invited to `pod_name`. Best-effort:
    /// failures are the implementation's to log, never the caller's to
    /// handle.
    async fn send_invitation(&self, to: &str, pod_name: &str, accept_url: &str);
}

/// Logs invitations instead of sending them.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_invitation(&self, to: &str, pod_name: &str, accept_url: &str) {
        tracing::info!(to, pod_name, accept_url, "invitation issued");
    }
}
