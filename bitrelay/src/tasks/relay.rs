use super::scheduler::{Scheduler, Tick};
use crate::errors::AppError;
use crate::models::{ProductCode, convert_ticker_from_source};
use crate::services::{TickerSource, TickerStore};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("failed to fetch ticker: {0}")]
    Fetch(AppError),

    #[error("failed to forward ticker: {0}")]
    Forward(AppError),
}

/// One relay cycle: fetch the current ticker and forward its insert shape.
/// A fetch failure ends the cycle before anything is forwarded.
pub async fn relay_once(
    source: &dyn TickerSource,
    store: &dyn TickerStore,
    product_code: ProductCode,
) -> Result<(), RelayError> {
    let ticker = source
        .fetch_ticker(product_code)
        .await
        .map_err(RelayError::Fetch)?;

    let new_ticker = convert_ticker_from_source(&ticker);
    store
        .create_ticker(&new_ticker)
        .await
        .map_err(RelayError::Forward)?;

    Ok(())
}

pub struct TickerRelay {
    source: Arc<dyn TickerSource>,
    store: Arc<dyn TickerStore>,
    product_code: ProductCode,
    interval: Duration,
}

impl TickerRelay {
    pub fn new(
        source: Arc<dyn TickerSource>,
        store: Arc<dyn TickerStore>,
        product_code: ProductCode,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            store,
            product_code,
            interval,
        }
    }

    /// Starts one cycle per tick until `shutdown` is cancelled. Cycles still
    /// running at that point are detached, not awaited.
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(
            product_code = %self.product_code,
            interval_ms = self.interval.as_millis() as u64,
            "Ticker relay started"
        );

        let mut scheduler = Scheduler::new(self.interval, shutdown);
        let mut in_flight: JoinSet<Result<(), RelayError>> = JoinSet::new();

        loop {
            tokio::select! {
                tick = scheduler.next() => match tick {
                    Tick::Cycle => {
                        let source = Arc::clone(&self.source);
                        let store = Arc::clone(&self.store);
                        let product_code = self.product_code;
                        in_flight.spawn(async move {
                            relay_once(source.as_ref(), store.as_ref(), product_code).await
                        });
                    }
                    Tick::Report => continue,
                    Tick::Cancelled => {
                        in_flight.detach_all();
                        tracing::info!("Ticker relay stopped");
                        break;
                    }
                },
                Some(joined) = in_flight.join_next() => log_cycle(joined),
            }
        }
    }
}

fn log_cycle(joined: Result<Result<(), RelayError>, JoinError>) {
    match joined {
        Ok(Ok(())) => tracing::info!("Ticker posted successfully"),
        Ok(Err(e)) => tracing::warn!(error = %e, "Ticker cycle failed"),
        Err(e) if e.is_panic() => {
            let message = panic_message(e.into_panic());
            tracing::error!(panic = %message, "Panic recovered in ticker cycle");
        }
        Err(e) => tracing::warn!(error = %e, "Ticker cycle cancelled"),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
