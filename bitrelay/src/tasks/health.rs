use super::scheduler::{Scheduler, Tick};
use crate::services::{HealthProbe, Notifier};
use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use core::fmt;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

/// One sample per 5 seconds for an hour.
pub const DEFAULT_BUFFER_CAPACITY: usize = 60 * 60;
pub const NO_RESULTS: &str = "No health check results available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    GolangServer,
    DrfServer,
    FastApiServer,
}

impl Target {
    pub fn name(&self) -> &'static str {
        match self {
            Target::GolangServer => "Golang Server",
            Target::DrfServer => "DRF Server",
            Target::FastApiServer => "FastAPI Server",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Failed(String),
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthSample {
    pub target: Target,
    pub timestamp: i64,
    pub outcome: Outcome,
}

/// What a probe does when its target's buffer is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backpressure {
    /// Wait for the next drain. The probe task stays parked until then.
    #[default]
    Block,
    /// Discard the new sample and log it.
    DropNewest,
}

/// Bounded FIFO of samples for one target. Producers hold a [`SampleProducer`];
/// only the owner of the buffer can drain it.
#[derive(Debug)]
pub struct SampleBuffer {
    tx: mpsc::Sender<HealthSample>,
    rx: mpsc::Receiver<HealthSample>,
    policy: Backpressure,
}

#[derive(Debug, Clone)]
pub struct SampleProducer {
    tx: mpsc::Sender<HealthSample>,
    policy: Backpressure,
}

impl SampleBuffer {
    pub fn new(capacity: usize, policy: Backpressure) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self { tx, rx, policy }
    }

    pub fn producer(&self) -> SampleProducer {
        SampleProducer {
            tx: self.tx.clone(),
            policy: self.policy,
        }
    }

    /// Takes every sample buffered at the moment of the call.
    pub fn drain(&mut self) -> Vec<HealthSample> {
        let pending = self.rx.len();
        let mut samples = Vec::with_capacity(pending);
        for _ in 0..pending {
            match self.rx.try_recv() {
                Ok(sample) => samples.push(sample),
                Err(_) => break,
            }
        }
        samples
    }
}

impl SampleProducer {
    pub async fn push(&self, sample: HealthSample) {
        match self.policy {
            Backpressure::Block => {
                if self.tx.send(sample).await.is_err() {
                    tracing::debug!("Sample buffer closed");
                }
            }
            Backpressure::DropNewest => match self.tx.try_send(sample) {
                Ok(()) => {}
                Err(TrySendError::Full(sample)) => {
                    tracing::warn!(
                        target_name = %sample.target,
                        timestamp = sample.timestamp,
                        "Sample buffer full, dropping sample"
                    );
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!("Sample buffer closed");
                }
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    OkStart,
    NgStart,
    Up,
    Down,
    OkEnd,
    NgEnd,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Label::OkStart => "OK-start",
            Label::NgStart => "NG-start",
            Label::Up => "Up",
            Label::Down => "Down",
            Label::OkEnd => "OK-end",
            Label::NgEnd => "NG-end",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CondensedEntry {
    pub timestamp: i64,
    pub label: Label,
}

/// Keeps the first sample, the last sample and every point where the outcome
/// class differs from the previous sample. `samples` must already be sorted.
pub fn condense(samples: &[HealthSample]) -> Vec<CondensedEntry> {
    let Some((first, rest)) = samples.split_first() else {
        return Vec::new();
    };

    let mut entries = vec![CondensedEntry {
        timestamp: first.timestamp,
        label: if first.outcome.is_ok() {
            Label::OkStart
        } else {
            Label::NgStart
        },
    }];

    let Some((last, interior)) = rest.split_last() else {
        return entries;
    };

    let mut previous = first;
    for sample in interior {
        if sample.outcome.is_ok() != previous.outcome.is_ok() {
            entries.push(CondensedEntry {
                timestamp: sample.timestamp,
                label: if sample.outcome.is_ok() {
                    Label::Up
                } else {
                    Label::Down
                },
            });
        }
        previous = sample;
    }

    entries.push(CondensedEntry {
        timestamp: last.timestamp,
        label: if last.outcome.is_ok() {
            Label::OkEnd
        } else {
            Label::NgEnd
        },
    });

    entries
}

pub fn format_timestamp(timestamp: i64, time_zone: &Tz) -> String {
    match Utc.timestamp_opt(timestamp, 0).single() {
        Some(time) => time
            .with_timezone(time_zone)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => timestamp.to_string(),
    }
}

/// Sorts `samples` by timestamp and renders the condensed history, one entry
/// per line.
pub fn render_report(mut samples: Vec<HealthSample>, time_zone: &Tz) -> String {
    samples.sort_by_key(|sample| sample.timestamp);

    let entries = condense(&samples);
    if entries.is_empty() {
        return NO_RESULTS.to_string();
    }

    entries
        .iter()
        .map(|entry| {
            format!(
                "Time: {}, Status: {}",
                format_timestamp(entry.timestamp, time_zone),
                entry.label
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn compose_message(sections: &[(Target, String)]) -> String {
    sections
        .iter()
        .map(|(target, report)| format!("{} Health:\n{}", target, report))
        .collect::<Vec<_>>()
        .join("\n\n")
}

struct MonitoredTarget {
    target: Target,
    probe: Arc<dyn HealthProbe>,
    buffer: SampleBuffer,
}

pub struct HealthMonitor {
    targets: Vec<MonitoredTarget>,
    notifier: Arc<dyn Notifier>,
    check_interval: Duration,
    notification_interval: Duration,
    time_zone: Tz,
    buffer_capacity: usize,
    backpressure: Backpressure,
}

impl HealthMonitor {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        check_interval: Duration,
        notification_interval: Duration,
        time_zone: Tz,
    ) -> Self {
        Self {
            targets: Vec::new(),
            notifier,
            check_interval,
            notification_interval,
            time_zone,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            backpressure: Backpressure::default(),
        }
    }

    /// Sets the buffer size and policy for every target, registered or not.
    /// Buffers are replaced, so call this before the monitor starts.
    pub fn with_buffer(mut self, capacity: usize, backpressure: Backpressure) -> Self {
        self.buffer_capacity = capacity;
        self.backpressure = backpressure;
        for monitored in &mut self.targets {
            monitored.buffer = SampleBuffer::new(capacity, backpressure);
        }
        self
    }

    pub fn with_target(mut self, target: Target, probe: Arc<dyn HealthProbe>) -> Self {
        self.targets.push(MonitoredTarget {
            target,
            probe,
            buffer: SampleBuffer::new(self.buffer_capacity, self.backpressure),
        });
        self
    }

    /// Starts one detached probe per target. Each probe appends its sample to
    /// the target's buffer once the call returns.
    pub fn probe_all(&self) {
        for monitored in &self.targets {
            let target = monitored.target;
            let probe = Arc::clone(&monitored.probe);
            let producer = monitored.buffer.producer();

            tokio::spawn(async move {
                let outcome = match probe.probe().await {
                    Ok(()) => Outcome::Ok,
                    Err(e) => {
                        tracing::debug!(target_name = %target, error = %e, "Health check failed");
                        Outcome::Failed(e.to_string())
                    }
                };

                producer
                    .push(HealthSample {
                        target,
                        timestamp: Utc::now().timestamp(),
                        outcome,
                    })
                    .await;
            });
        }
    }

    /// Drains every buffer and renders the combined status message.
    pub fn report(&mut self) -> String {
        let sections: Vec<(Target, String)> = self
            .targets
            .iter_mut()
            .map(|monitored| {
                let samples = monitored.buffer.drain();
                tracing::debug!(
                    target_name = %monitored.target,
                    samples = samples.len(),
                    "Drained health samples"
                );
                (monitored.target, render_report(samples, &self.time_zone))
            })
            .collect();

        compose_message(&sections)
    }

    pub async fn run(mut self, shutdown: CancellationToken) {
        tracing::info!(
            targets = self.targets.len(),
            check_interval_secs = self.check_interval.as_secs(),
            notification_interval_secs = self.notification_interval.as_secs(),
            "Health monitor started"
        );

        let mut scheduler =
            Scheduler::new(self.check_interval, shutdown).with_report(self.notification_interval);

        loop {
            match scheduler.next().await {
                Tick::Cycle => self.probe_all(),
                Tick::Report => {
                    let message = self.report();
                    let notifier = Arc::clone(&self.notifier);
                    tokio::spawn(async move {
                        match notifier.post_message(&message).await {
                            Ok(()) => tracing::info!("Health check notification sent successfully"),
                            Err(e) => tracing::error!(
                                error = %e,
                                "Failed to send health check notification"
                            ),
                        }
                    });
                }
                Tick::Cancelled => {
                    tracing::info!("Health monitor stopped");
                    break;
                }
            }
        }
    }
}
