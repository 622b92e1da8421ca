//! Prometheus metrics for the relay service.

use prometheus::{IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Service metrics for observability
///
/// Counters live in a registry owned by the service instance, so several
/// routers can coexist in one process without colliding registrations.
#[derive(Debug)]
pub struct ServiceMetrics {
    registry: Registry,

    pub webhook_requests_total: IntCounter,
    pub webhook_rejections_total: IntCounterVec,
    pub reports_dispatched_total: IntCounter,
    pub report_delivery_failures_total: IntCounter,
}

impl ServiceMetrics {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        let webhook_requests_total = IntCounter::new(
            "webhook_requests_total",
            "Total webhook requests received",
        )?;
        let webhook_rejections_total = IntCounterVec::new(
            Opts::new(
                "webhook_rejections_total",
                "Webhook requests rejected, by rejection code",
            ),
            &["code"],
        )?;
        let reports_dispatched_total = IntCounter::new(
            "reports_dispatched_total",
            "Analysis reports dispatched for delivery",
        )?;
        let report_delivery_failures_total = IntCounter::new(
            "report_delivery_failures_total",
            "Analysis reports whose delivery failed",
        )?;

        registry.register(Box::new(webhook_requests_total.clone()))?;
        registry.register(Box::new(webhook_rejections_total.clone()))?;
        registry.register(Box::new(reports_dispatched_total.clone()))?;
        registry.register(Box::new(report_delivery_failures_total.clone()))?;

        Ok(Arc::new(Self {
            registry,
            webhook_requests_total,
            webhook_rejections_total,
            reports_dispatched_total,
            report_delivery_failures_total,
        }))
    }

    pub fn record_webhook_request(&self) {
        self.webhook_requests_total.inc();
    }

    pub fn record_rejection(&self, code: &str) {
        self.webhook_rejections_total.with_label_values(&[code]).inc();
    }

    pub fn record_dispatch(&self) {
        self.reports_dispatched_total.inc();
    }

    pub fn record_delivery_failure(&self) {
        self.report_delivery_failures_total.inc();
    }

    /// Render all counters in the Prometheus text exposition format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}
