use crate::errors::AppResult;
use crate::models::NewTicker;
use crate::services::TickerStore;
use core::fmt;
use futures::future::join_all;
use std::sync::Arc;

pub const DEFAULT_WORKERS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Delete,
    Post,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Delete => f.write_str("delete"),
            Phase::Post => f.write_str("post"),
        }
    }
}

/// A single item that failed inside a worker pool phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessError {
    pub item_id: i64,
    pub phase: Phase,
    pub error: String,
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} item {}: {}", self.phase, self.item_id, self.error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: Phase,
    pub attempted: usize,
    pub succeeded: usize,
    pub errors: Vec<ProcessError>,
}

/// Splits `items` across `workers` buckets; item `i` goes to bucket `i % workers`.
pub fn partition<T>(items: Vec<T>, workers: usize) -> Vec<Vec<T>> {
    let workers = workers.max(1);
    let mut buckets: Vec<Vec<T>> = (0..workers).map(|_| Vec::new()).collect();
    for (index, item) in items.into_iter().enumerate() {
        buckets[index % workers].push(item);
    }
    buckets
}

/// Runs `op` over every item with a fixed set of workers and returns once all
/// of them are done. Each worker handles its bucket sequentially and keeps
/// going after a failed item.
pub async fn run_pool<T, F, Fut>(
    phase: Phase,
    items: Vec<(i64, T)>,
    workers: usize,
    op: F,
) -> PhaseReport
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = AppResult<()>>,
{
    let attempted = items.len();
    let op = &op;

    let pool = partition(items, workers)
        .into_iter()
        .enumerate()
        .map(|(worker, bucket)| async move {
            let mut errors = Vec::new();
            let mut succeeded = 0;
            for (item_id, item) in bucket {
                match op(item).await {
                    Ok(()) => succeeded += 1,
                    Err(e) => {
                        tracing::debug!(worker, item_id, phase = %phase, error = %e, "Item failed");
                        errors.push(ProcessError {
                            item_id,
                            phase,
                            error: e.to_string(),
                        });
                    }
                }
            }
            (succeeded, errors)
        });

    let mut report = PhaseReport {
        phase,
        attempted,
        succeeded: 0,
        errors: Vec::new(),
    };
    for (succeeded, errors) in join_all(pool).await {
        report.succeeded += succeeded;
        report.errors.extend(errors);
    }

    tracing::info!(
        phase = %phase,
        attempted = report.attempted,
        succeeded = report.succeeded,
        failed = report.errors.len(),
        "Phase finished"
    );
    report
}

#[derive(Debug)]
pub struct MigrationReport {
    pub deleted: PhaseReport,
    /// Target size after the delete phase, if the refetch succeeded.
    pub remaining_after_delete: Option<usize>,
    pub posted: PhaseReport,
}

impl MigrationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ProcessError> {
        self.deleted.errors.iter().chain(self.posted.errors.iter())
    }

    pub fn log_summary(&self) {
        tracing::info!(
            deleted = self.deleted.succeeded,
            delete_attempted = self.deleted.attempted,
            remaining_after_delete = ?self.remaining_after_delete,
            posted = self.posted.succeeded,
            post_attempted = self.posted.attempted,
            errors = self.deleted.errors.len() + self.posted.errors.len(),
            "Import finished"
        );
        for error in self.errors() {
            tracing::error!(
                phase = %error.phase,
                item_id = error.item_id,
                error = %error.error,
                "Import item failed"
            );
        }
    }
}

/// Replaces every ticker in `target` with the tickers held by `source`.
pub struct BulkMigrator {
    source: Arc<dyn TickerStore>,
    target: Arc<dyn TickerStore>,
    workers: usize,
}

impl BulkMigrator {
    pub fn new(source: Arc<dyn TickerStore>, target: Arc<dyn TickerStore>, workers: usize) -> Self {
        Self {
            source,
            target,
            workers: workers.max(1),
        }
    }

    pub async fn run(&self) -> AppResult<MigrationReport> {
        let target = &self.target;

        let existing = target.list_tickers().await?;
        tracing::info!(count = existing.len(), "Fetched target tickers");

        let ids: Vec<(i64, i64)> = existing.iter().map(|t| (t.id, t.id)).collect();
        let deleted = run_pool(Phase::Delete, ids, self.workers, |id: i64| async move {
            target.delete_ticker(id).await
        })
        .await;

        let remaining_after_delete = match target.list_tickers().await {
            Ok(remaining) => Some(remaining.len()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refetch target tickers");
                None
            }
        };

        let source_tickers = self.source.list_tickers().await?;
        tracing::info!(count = source_tickers.len(), "Fetched source tickers");

        let inserts: Vec<(i64, NewTicker)> = source_tickers
            .into_iter()
            .map(|t| (t.id, t.into_new_ticker()))
            .collect();
        let posted = run_pool(Phase::Post, inserts, self.workers, |ticker: NewTicker| async move {
            target.create_ticker(&ticker).await
        })
        .await;

        Ok(MigrationReport {
            deleted,
            remaining_after_delete,
            posted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::models::StoredTicker;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List,
        Delete(i64),
        Create(i64),
    }

    fn stored(id: i64) -> StoredTicker {
        StoredTicker {
            id,
            ticker: NewTicker {
                tick_id: 1000 + id,
                product_code: "BTC_JPY".to_string(),
                ..Default::default()
            },
        }
    }

    #[derive(Default)]
    struct FakeStore {
        tickers: Vec<StoredTicker>,
        failing_deletes: HashSet<i64>,
        fail_list: bool,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeStore {
        fn with_ids(ids: impl IntoIterator<Item = i64>) -> Self {
            Self {
                tickers: ids.into_iter().map(stored).collect(),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TickerStore for FakeStore {
        async fn list_tickers(&self) -> AppResult<Vec<StoredTicker>> {
            self.calls.lock().unwrap().push(Call::List);
            if self.fail_list {
                return Err(AppError::Internal("store unavailable".to_string()));
            }
            Ok(self.tickers.clone())
        }

        async fn create_ticker(&self, ticker: &NewTicker) -> AppResult<()> {
            self.calls.lock().unwrap().push(Call::Create(ticker.tick_id));
            Ok(())
        }

        async fn delete_ticker(&self, id: i64) -> AppResult<()> {
            self.calls.lock().unwrap().push(Call::Delete(id));
            if self.failing_deletes.contains(&id) {
                return Err(AppError::Status {
                    status: 404,
                    body: "not found".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn partition_assigns_by_index_modulo() {
        let buckets = partition((0..23).collect::<Vec<i64>>(), 10);
        assert_eq!(buckets.len(), 10);

        for (worker, bucket) in buckets.iter().enumerate() {
            assert!(bucket.iter().all(|i| *i as usize % 10 == worker));
        }

        let mut seen: Vec<i64> = buckets.into_iter().flatten().collect();
        seen.sort();
        assert_eq!(seen, (0..23).collect::<Vec<_>>());
    }

    #[test]
    fn partition_clamps_worker_count() {
        let buckets = partition(vec![1, 2, 3], 0);
        assert_eq!(buckets, vec![vec![1, 2, 3]]);
    }

    #[tokio::test]
    async fn pool_keeps_going_after_failures() {
        let items: Vec<(i64, i64)> = (0..23).map(|i| (i, i)).collect();
        let processed = Mutex::new(Vec::new());

        let report = run_pool(Phase::Delete, items, 10, |i: i64| {
            processed.lock().unwrap().push(i);
            async move {
                if i % 8 == 0 {
                    Err(AppError::Internal(format!("item {} rejected", i)))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert_eq!(report.attempted, 23);
        assert_eq!(report.succeeded, 20);
        let mut failed: Vec<i64> = report.errors.iter().map(|e| e.item_id).collect();
        failed.sort();
        assert_eq!(failed, vec![0, 8, 16]);

        let mut processed = processed.into_inner().unwrap();
        processed.sort();
        assert_eq!(processed, (0..23).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn failed_deletes_do_not_block_posts() {
        let target = Arc::new(FakeStore {
            failing_deletes: [3, 11, 19].into_iter().collect(),
            ..FakeStore::with_ids(1..=23)
        });
        let source = Arc::new(FakeStore::with_ids(101..=123));

        let migrator = BulkMigrator::new(source, target.clone(), DEFAULT_WORKERS);
        let report = migrator.run().await.unwrap();

        assert_eq!(report.deleted.attempted, 23);
        assert_eq!(report.deleted.errors.len(), 3);
        assert!(report.deleted.errors.iter().all(|e| e.phase == Phase::Delete));
        assert_eq!(report.remaining_after_delete, Some(23));
        assert_eq!(report.posted.attempted, 23);
        assert_eq!(report.posted.succeeded, 23);
        assert_eq!(report.errors().count(), 3);

        let calls = target.calls();
        let last_delete = calls
            .iter()
            .rposition(|c| matches!(c, Call::Delete(_)))
            .unwrap();
        let first_create = calls
            .iter()
            .position(|c| matches!(c, Call::Create(_)))
            .unwrap();
        assert!(last_delete < first_create);

        let mut created: Vec<i64> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Create(tick_id) => Some(*tick_id),
                _ => None,
            })
            .collect();
        created.sort();
        assert_eq!(created, (1101..=1123).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn initial_fetch_failure_is_fatal() {
        let target = Arc::new(FakeStore {
            fail_list: true,
            ..FakeStore::with_ids(1..=5)
        });
        let source = Arc::new(FakeStore::with_ids(1..=5));

        let migrator = BulkMigrator::new(source.clone(), target.clone(), DEFAULT_WORKERS);
        assert!(migrator.run().await.is_err());

        assert_eq!(target.calls(), vec![Call::List]);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn source_fetch_failure_is_fatal_after_delete_phase() {
        let target = Arc::new(FakeStore::with_ids(1..=4));
        let source = Arc::new(FakeStore {
            fail_list: true,
            ..Default::default()
        });

        let migrator = BulkMigrator::new(source, target.clone(), 2);
        assert!(migrator.run().await.is_err());

        let calls = target.calls();
        assert_eq!(calls.iter().filter(|c| matches!(c, Call::Delete(_))).count(), 4);
        assert!(!calls.iter().any(|c| matches!(c, Call::Create(_))));
    }
}
