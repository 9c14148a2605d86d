use metrics::{counter, gauge};

/// Metrics collector for the live viewer channel
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "av_ws" }
    }

    /// Record new connection established
    pub fn connection_established(&self) {
        counter!(format!("{}.connections.established", self.prefix)).increment(1);
    }

    /// Record connection closed
    pub fn connection_closed(&self, reason: &str) {
        counter!(format!("{}.connections.closed", self.prefix)).increment(1);
        counter!(format!("{}.connections.closed.{}", self.prefix, reason)).increment(1);
    }

    /// Live client count as published by the hub
    pub fn clients_active(&self, count: usize) {
        gauge!(format!("{}.clients.active", self.prefix)).set(count as f64);
    }

    /// Client dropped by the hub because its mailbox was full or closed
    pub fn client_evicted(&self, reason: &str) {
        counter!(format!("{}.clients.evicted.{}", self.prefix, reason)).increment(1);
    }

    /// Frames written to one socket
    pub fn messages_sent(&self, count: usize) {
        counter!(format!("{}.messages.sent", self.prefix)).increment(count as u64);
    }

    /// Record broadcast fanned out
    pub fn broadcast_published(&self, recipients: usize) {
        counter!(format!("{}.broadcast.published", self.prefix)).increment(1);
        gauge!(format!("{}.broadcast.recipients", self.prefix)).set(recipients as f64);
    }

    /// Record error occurrence
    pub fn error_occurred(&self, error_type: &str) {
        counter!(format!("{}.errors.total", self.prefix)).increment(1);
        counter!(format!("{}.errors.{}", self.prefix, error_type)).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
