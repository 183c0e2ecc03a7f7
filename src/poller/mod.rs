//! Register poller - periodic signal sampling with change detection.
//!
//! Every tick reads the whole tracked signal set from the configured
//! [`SignalSource`], feeds each reading to the [`ChangeDetector`], and hands
//! the resulting [`ChangeEvent`]s to the dispatcher over a bounded channel.
//! The hand-off never waits: a full channel drops the event with a warning.

mod config;
mod detector;
mod error;
mod event;


pub use config::*;
pub use detector::*;
pub use error::*;
pub use event::*;

use crate::source::{SignalSource, SignalSpec, SourceError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Outcome of a single poll tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Signals read successfully
    pub read: usize,
    /// Signals whose read failed, timed out, or had the wrong type
    pub failed: usize,
    /// Change events handed to the dispatcher
    pub changes: usize,
    /// Change events dropped because the dispatcher queue was full or closed
    pub dropped: usize,
}

/// Background service that samples the tracked signal set on a fixed period.
pub struct RegisterPoller {
    /// Where readings come from
    source: Arc<dyn SignalSource>,
    /// Tracked signals, in read order
    specs: Vec<SignalSpec>,
    /// Last known values
    detector: ChangeDetector,
    /// Poll configuration
    config: PollerConfig,
    /// Hand-off to the dispatcher
    events: mpsc::Sender<ChangeEvent>,
}

impl RegisterPoller {
    /// Create a poller for a fixed signal set.
    ///
    /// # Errors
    ///
    /// Returns a [`SignalSetError`] if the set is empty, contains duplicate
    /// names, or has signals without an address.
    pub fn new(
        source: Arc<dyn SignalSource>,
        specs: Vec<SignalSpec>,
        config: PollerConfig,
        events: mpsc::Sender<ChangeEvent>,
    ) -> Result<Self, SignalSetError> {
        let detector = ChangeDetector::new(specs.clone())?;
        Ok(Self {
            source,
            specs,
            detector,
            config,
            events,
        })
    }

    /// Last known state of the tracked signals.
    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    /// Read one signal, bounded by the read timeout and checked against its
    /// declared type.
    pub async fn read_signal(
        source: &dyn SignalSource,
        spec: &SignalSpec,
        timeout: Duration,
    ) -> Result<crate::source::SignalValue, SourceError> {
        let raw = tokio::time::timeout(timeout, source.read(spec))
            .await
            .map_err(|_| SourceError::Timeout(timeout.as_millis() as u64))??;

        raw.conform(spec.signal_type)
            .ok_or_else(|| SourceError::TypeMismatch {
                signal: spec.name.clone(),
                expected: spec.signal_type,
                actual: raw.signal_type(),
            })
    }

    /// Sample every tracked signal once and return the detected changes.
    ///
    /// A failed read leaves that signal's value untouched and does not stop
    /// the remaining reads.
    pub async fn sample(&mut self) -> (Vec<ChangeEvent>, TickReport) {
        let timeout = Duration::from_millis(self.config.read_timeout_ms);
        let mut report = TickReport::default();
        let mut changes = Vec::new();

        for spec in &self.specs {
            match Self::read_signal(self.source.as_ref(), spec, timeout).await {
                Ok(value) => {
                    report.read += 1;
                    if let Some(event) = self.detector.observe(&spec.name, value, chrono::Utc::now())
                    {
                        tracing::debug!(
                            signal = %event.signal,
                            value = %event.value,
                            previous = ?event.previous,
                            "Signal changed"
                        );
                        changes.push(event);
                    }
                }
                Err(error) => {
                    report.failed += 1;
                    metrics::counter!("bridge_source_read_failures_total",
                        "signal" => spec.name.clone()
                    )
                    .increment(1);
                    tracing::warn!(
                        signal = %spec.name,
                        address = %spec.address,
                        source = self.source.name(),
                        error = %error,
                        "Signal read failed, keeping last value"
                    );
                }
            }
        }

        (changes, report)
    }

    /// Run one tick: sample, then hand every change to the dispatcher.
    pub async fn poll_once(&mut self) -> TickReport {
        let start = Instant::now();
        let (changes, mut report) = self.sample().await;

        for event in changes {
            match self.events.try_send(event) {
                Ok(()) => report.changes += 1,
                Err(mpsc::error::TrySendError::Full(event)) => {
                    report.dropped += 1;
                    tracing::warn!(
                        signal = %event.signal,
                        capacity = self.config.event_queue_capacity,
                        "Dispatcher queue full, dropping change event"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    report.dropped += 1;
                }
            }
        }

        metrics::counter!("bridge_poll_ticks_total").increment(1);
        metrics::counter!("bridge_change_events_total").increment(report.changes as u64);
        metrics::histogram!("bridge_poll_tick_seconds").record(start.elapsed().as_secs_f64());

        report
    }

    /// Start the poller background task.
    /// Returns a JoinHandle that resolves when the poller stops.
    pub fn start(mut self, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_millis(self.config.interval_ms.max(1)));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(
                interval_ms = self.config.interval_ms,
                signals = self.specs.len(),
                source = self.source.name(),
                "Register poller started"
            );

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    _ = interval.tick() => {
                        tokio::select! {
                            _ = cancel_token.cancelled() => break,
                            report = self.poll_once() => {
                                tracing::trace!(
                                    read = report.read,
                                    failed = report.failed,
                                    changes = report.changes,
                                    "Poll tick completed"
                                );
                            }
                        }
                    }
                }
            }

            tracing::info!("Register poller shutting down");
        })
    }
}
