use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Cycle,
    Report,
    Cancelled,
}

/// Drives up to two fixed cadences plus a cancellation wake-up.
///
/// Each cadence first fires one full period after construction. Late ticks are
/// skipped rather than replayed, so a slow receiver sees coalesced ticks. When
/// both cadences are due at the same instant, `Cycle` is returned first and
/// `Report` on the following call.
#[derive(Debug)]
pub struct Scheduler {
    cycle: Interval,
    report: Option<Interval>,
    shutdown: CancellationToken,
}

fn cadence(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

impl Scheduler {
    pub fn new(cycle_period: Duration, shutdown: CancellationToken) -> Self {
        Self {
            cycle: cadence(cycle_period),
            report: None,
            shutdown,
        }
    }

    pub fn with_report(mut self, report_period: Duration) -> Self {
        self.report = Some(cadence(report_period));
        self
    }

    pub async fn next(&mut self) -> Tick {
        let Self {
            cycle,
            report,
            shutdown,
        } = self;

        let report = async {
            match report.as_mut() {
                Some(interval) => {
                    interval.tick().await;
                }
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = shutdown.cancelled() => Tick::Cancelled,
            _ = cycle.tick() => Tick::Cycle,
            _ = report => Tick::Report,
        }
    }
}
