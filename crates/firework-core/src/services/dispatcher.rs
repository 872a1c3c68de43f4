// ============================================================================
// Firework Core - Webhook Dispatcher
// File: crates/firework-core/src/services/dispatcher.rs
// ============================================================================
//! Fan-out of one published message to every subscriber of a topic.
//!
//! Each delivery runs in its own task under a per-delivery timeout, so a
//! slow or failing subscriber never holds up its siblings. A process-wide
//! semaphore caps the number of deliveries in flight. Outcomes are logged
//! and published on a broadcast channel; they never flow back to the
//! publisher.
//!
//! A fan-out waits at most one delivery timeout for each free slot. When
//! none frees up in time, the rest of that fan-out is dropped and reported
//! as [`DeliveryOutcome::Dropped`], so waiting fan-outs cannot pile up
//! behind a saturated semaphore.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, warn};

use firework_security::PayloadSigner;
use firework_shared::constants::{
    DEFAULT_DISPATCH_MAX_IN_FLIGHT, DEFAULT_DISPATCH_REPORT_CAPACITY, DEFAULT_DISPATCH_TIMEOUT_MS,
    HEADER_SIGNATURE, HEADER_SUBSCRIPTION, HEADER_TOPIC,
};

use crate::domain::{DeliveryMethod, Subscriber, SubscriptionHandle};
use crate::transport::{WebhookRequest, WebhookTransport};

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Upper bound on a single delivery, connect to response.
    pub timeout: Duration,
    /// Deliveries allowed in flight across all topics.
    pub max_in_flight: usize,
    /// Buffered reports per receiver before slow receivers start lagging.
    pub report_capacity: usize,
    pub signing_secret: Option<String>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_DISPATCH_TIMEOUT_MS),
            max_in_flight: DEFAULT_DISPATCH_MAX_IN_FLIGHT,
            report_capacity: DEFAULT_DISPATCH_REPORT_CAPACITY,
            signing_secret: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The subscriber answered with a 2xx status.
    Delivered { status: u16 },
    /// The subscriber answered with any other status.
    Rejected { status: u16 },
    /// The request could not be completed.
    Failed { reason: String },
    TimedOut,
    /// Never sent: no delivery slot became free within the timeout.
    Dropped,
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }

    fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            DeliveryOutcome::Delivered { status }
        } else {
            DeliveryOutcome::Rejected { status }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub handle: SubscriptionHandle,
    pub url: String,
    pub method: DeliveryMethod,
    pub outcome: DeliveryOutcome,
    pub elapsed: Duration,
}

/// Result of one fan-out, in subscriber order.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub topic: String,
    pub deliveries: Vec<DeliveryReport>,
}

impl DispatchReport {
    pub fn delivered(&self) -> usize {
        self.deliveries.iter().filter(|d| d.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.deliveries.len() - self.delivered()
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn WebhookTransport>,
    permits: Arc<Semaphore>,
    timeout: Duration,
    signer: Option<PayloadSigner>,
    reports: broadcast::Sender<DispatchReport>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn WebhookTransport>, config: DispatcherConfig) -> Self {
        let (reports, _) = broadcast::channel(config.report_capacity.max(1));
        Self {
            transport,
            permits: Arc::new(Semaphore::new(config.max_in_flight.max(1))),
            timeout: config.timeout,
            signer: config.signing_secret.map(PayloadSigner::new),
            reports,
        }
    }

    /// Receiver for every report produced after this call.
    pub fn reports(&self) -> broadcast::Receiver<DispatchReport> {
        self.reports.subscribe()
    }

    /// Runs the fan-out in a background task and returns immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(
        &self,
        topic: &str,
        subscribers: Vec<Subscriber>,
        body: &str,
    ) -> JoinHandle<DispatchReport> {
        let dispatcher = self.clone();
        let topic = topic.to_string();
        let body: Arc<str> = Arc::from(body);
        tokio::spawn(async move { dispatcher.dispatch(&topic, subscribers, body).await })
    }

    /// Delivers `body` to every subscriber and waits for all outcomes.
    pub async fn dispatch(
        &self,
        topic: &str,
        subscribers: Vec<Subscriber>,
        body: Arc<str>,
    ) -> DispatchReport {
        let mut slots: Vec<Option<DeliveryReport>> = vec![None; subscribers.len()];
        let mut tasks = JoinSet::new();

        for (index, subscriber) in subscribers.iter().enumerate() {
            let acquire = Arc::clone(&self.permits).acquire_owned();
            let permit = match tokio::time::timeout(self.timeout, acquire).await {
                Ok(Ok(permit)) => permit,
                Ok(Err(e)) => {
                    error!("Dispatch permits closed: {}", e);
                    break;
                }
                Err(_) => {
                    warn!(
                        topic = %topic,
                        dropped = subscribers.len() - index,
                        "No delivery slot within timeout, dropping rest of fan-out"
                    );
                    break;
                }
            };

            let request = self.build_request(topic, subscriber, &body);
            let transport = Arc::clone(&self.transport);
            let timeout = self.timeout;
            let handle = subscriber.handle.clone();

            tasks.spawn(async move {
                let _permit = permit;
                let started = Instant::now();
                let url = request.url.clone();
                let method = request.method;

                let outcome = match tokio::time::timeout(timeout, transport.send(request)).await {
                    Ok(Ok(status)) => DeliveryOutcome::from_status(status),
                    Ok(Err(e)) => DeliveryOutcome::Failed {
                        reason: e.to_string(),
                    },
                    Err(_) => DeliveryOutcome::TimedOut,
                };

                (
                    index,
                    DeliveryReport {
                        handle,
                        url,
                        method,
                        outcome,
                        elapsed: started.elapsed(),
                    },
                )
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, report)) => slots[index] = Some(report),
                Err(e) => error!("Delivery task for topic {} aborted: {}", topic, e),
            }
        }

        let deliveries: Vec<DeliveryReport> = subscribers
            .into_iter()
            .zip(slots)
            .map(|(subscriber, slot)| {
                slot.unwrap_or_else(|| DeliveryReport {
                    handle: subscriber.handle,
                    url: subscriber.url,
                    method: subscriber.method,
                    outcome: DeliveryOutcome::Dropped,
                    elapsed: Duration::ZERO,
                })
            })
            .collect();

        let report = DispatchReport {
            topic: topic.to_string(),
            deliveries,
        };
        self.log_report(&report);

        // Fails only when nobody is listening.
        let _ = self.reports.send(report.clone());
        report
    }

    fn build_request(&self, topic: &str, subscriber: &Subscriber, body: &Arc<str>) -> WebhookRequest {
        let mut headers = vec![
            (HEADER_TOPIC, topic.to_string()),
            (HEADER_SUBSCRIPTION, subscriber.handle.to_string()),
        ];
        if let Some(signer) = &self.signer {
            headers.push((HEADER_SIGNATURE, signer.sign(body.as_bytes())));
        }

        WebhookRequest {
            url: subscriber.url.clone(),
            method: subscriber.method,
            body: Arc::clone(body),
            headers,
        }
    }

    fn log_report(&self, report: &DispatchReport) {
        for delivery in &report.deliveries {
            match &delivery.outcome {
                DeliveryOutcome::Delivered { status } => debug!(
                    topic = %report.topic,
                    handle = %delivery.handle,
                    url = %delivery.url,
                    status,
                    elapsed_ms = delivery.elapsed.as_millis() as u64,
                    "Webhook delivered"
                ),
                DeliveryOutcome::Rejected { status } => warn!(
                    topic = %report.topic,
                    handle = %delivery.handle,
                    url = %delivery.url,
                    status,
                    "Webhook rejected by subscriber"
                ),
                DeliveryOutcome::Failed { reason } => warn!(
                    topic = %report.topic,
                    handle = %delivery.handle,
                    url = %delivery.url,
                    reason = %reason,
                    "Webhook delivery failed"
                ),
                DeliveryOutcome::TimedOut => warn!(
                    topic = %report.topic,
                    handle = %delivery.handle,
                    url = %delivery.url,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Webhook delivery timed out"
                ),
                DeliveryOutcome::Dropped => warn!(
                    topic = %report.topic,
                    handle = %delivery.handle,
                    url = %delivery.url,
                    "Webhook delivery dropped"
                ),
            }
        }

        debug!(
            topic = %report.topic,
            delivered = report.delivered(),
            failed = report.failed(),
            "Dispatch finished"
        );
    }
}
