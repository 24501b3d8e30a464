//! Asynchronous query statistics.
//!
//! [`StatisticsQueue`] collects execution times without blocking the caller.
//! Producers enqueue `(query, millis)` events from any thread; one dedicated
//! consumer thread takes them off the queue in submission order, normalizes
//! the query text into a label and updates the running [`QueryStats`] for it.
//!
//! Each enqueue returns a [`Processed`] future that resolves once the consumer
//! has taken that event, whether or not it was aggregated. Pausing keeps the
//! consumer draining the queue but stops aggregation.
//!
//! ```rust
//! use quill_query::statistics::{SortBy, StatisticsQueue};
//!
//! # futures::executor::block_on(async {
//! let queue = StatisticsQueue::new();
//! queue.start().unwrap();
//!
//! queue.enqueue("SELECT * FROM people WHERE id IN (1, 2)", 12).unwrap();
//! queue.enqueue("SELECT * FROM people WHERE id IN (3)", 8).unwrap().await;
//!
//! let report = queue.report_sorted_by(SortBy::Avg);
//! assert_eq!(report.len(), 1);
//! assert_eq!(report[0].query, "SELECT * FROM people WHERE id IN (...)");
//! assert_eq!(report[0].avg, 10);
//!
//! queue.stop();
//! # });
//! ```

mod event;
mod stats;

pub use event::{ExecutionEvent, Processed};
pub use stats::{QueryStats, SortBy, StatisticsSnapshot};

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, trace, warn};

use crate::config::QuillConfig;
use crate::error::{QueryError, QueryResult};
use crate::normalize::statistics_label;
use event::Envelope;

/// State shared between producers and the consumer thread.
#[derive(Debug, Default)]
struct Shared {
    // Insertion order of first observation breaks report ties.
    stats: RwLock<IndexMap<String, QueryStats>>,
    paused: AtomicBool,
    pending: AtomicUsize,
}

impl Shared {
    fn record(&self, event: &ExecutionEvent) {
        let label = statistics_label(&event.query);
        let mut stats = self.stats.write();
        stats
            .entry(label)
            .or_insert_with_key(|label| QueryStats::new(label.clone()))
            .add_query_time(event.millis);
    }
}

#[derive(Debug)]
struct Worker {
    tx: mpsc::UnboundedSender<Envelope>,
    handle: JoinHandle<()>,
}

fn consume<F>(mut rx: mpsc::UnboundedReceiver<Envelope>, shared: Arc<Shared>, record: F)
where
    F: Fn(&Shared, &ExecutionEvent),
{
    while let Some(Envelope { event, done }) = rx.blocking_recv() {
        if shared.paused.load(Ordering::Acquire) {
            trace!(query = %event.query, "statistics paused, event skipped");
        } else if panic::catch_unwind(AssertUnwindSafe(|| record(&shared, &event))).is_err() {
            error!(query = %event.query, "failed to record query statistics");
        }
        shared.pending.fetch_sub(1, Ordering::AcqRel);
        let _ = done.send(());
    }
    debug!("statistics consumer exiting");
}

/// Single-consumer queue aggregating query execution times.
#[derive(Debug, Default)]
pub struct StatisticsQueue {
    shared: Arc<Shared>,
    worker: RwLock<Option<Worker>>,
}

impl StatisticsQueue {
    /// Create a queue. The consumer is not running until [`start`](Self::start).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue and start it if statistics are enabled.
    pub fn from_config(config: &QuillConfig) -> QueryResult<Self> {
        let queue = Self::new();
        if config.statistics_enabled {
            queue.start()?;
        }
        Ok(queue)
    }

    /// Spawn the consumer thread.
    pub fn start(&self) -> QueryResult<()> {
        self.start_with(Shared::record)
    }

    fn start_with<F>(&self, record: F) -> QueryResult<()>
    where
        F: Fn(&Shared, &ExecutionEvent) + Send + 'static,
    {
        let mut worker = self.worker.write();
        if worker.is_some() {
            return Err(QueryError::queue_already_running());
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name("quill-statistics".into())
            .spawn(move || consume(rx, shared, record))
            .map_err(|e| {
                QueryError::internal("failed to spawn statistics thread").with_source(e)
            })?;

        *worker = Some(Worker { tx, handle });
        info!("statistics queue started");
        Ok(())
    }

    /// Stop accepting events, drain the queue and join the consumer.
    ///
    /// Returns the number of events that were still queued. Stopping a queue
    /// that is not running returns 0.
    pub fn stop(&self) -> usize {
        let Some(Worker { tx, handle }) = self.worker.write().take() else {
            return 0;
        };

        let drained = self.shared.pending.load(Ordering::Acquire);
        drop(tx);
        if handle.join().is_err() {
            error!("statistics consumer thread panicked");
        }
        info!(drained, "statistics queue stopped");
        drained
    }

    /// Check whether the consumer is running.
    pub fn is_running(&self) -> bool {
        self.worker.read().is_some()
    }

    /// Pause or resume aggregation. Events keep being consumed while paused.
    pub fn pause(&self, paused: bool) {
        self.shared.paused.store(paused, Ordering::Release);
        debug!(paused, "statistics pause toggled");
    }

    /// Check whether aggregation is paused.
    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::Acquire)
    }

    /// Number of events enqueued but not yet consumed.
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }

    /// Queue one execution.
    pub fn enqueue(&self, query: impl Into<String>, millis: u64) -> QueryResult<Processed> {
        self.enqueue_event(ExecutionEvent::new(query, millis))
    }

    /// Queue one execution event.
    ///
    /// Fails with `QueueStopped` when the consumer is not running.
    pub fn enqueue_event(&self, event: ExecutionEvent) -> QueryResult<Processed> {
        let worker = self.worker.read();
        let Some(worker) = worker.as_ref() else {
            warn!(query = %event.query, "statistics queue stopped, event rejected");
            return Err(QueryError::queue_stopped());
        };

        let (done, rx) = oneshot::channel();
        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        if let Err(mpsc::error::SendError(envelope)) = worker.tx.send(Envelope { event, done }) {
            self.shared.pending.fetch_sub(1, Ordering::AcqRel);
            warn!(query = %envelope.event.query, "statistics consumer gone, event rejected");
            return Err(QueryError::queue_stopped());
        }
        Ok(Processed::new(rx))
    }

    /// Snapshots of every query, in order of first observation.
    pub fn report(&self) -> Vec<StatisticsSnapshot> {
        self.shared
            .stats
            .read()
            .values()
            .map(QueryStats::snapshot)
            .collect()
    }

    /// Snapshots sorted descending by `sort_by`; ties keep first-observation order.
    pub fn report_sorted_by(&self, sort_by: SortBy) -> Vec<StatisticsSnapshot> {
        let mut report = self.report();
        report.sort_by(|a, b| sort_by.key(b).cmp(&sort_by.key(a)));
        report
    }

    /// Like [`report_sorted_by`](Self::report_sorted_by) with the key given by name.
    pub fn report_sorted_by_name(&self, sort_by: &str) -> QueryResult<Vec<StatisticsSnapshot>> {
        Ok(self.report_sorted_by(sort_by.parse()?))
    }

    /// Drop all collected statistics.
    pub fn reset(&self) {
        self.shared.stats.write().clear();
    }
}

impl Drop for StatisticsQueue {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn started() -> StatisticsQueue {
        let queue = StatisticsQueue::new();
        queue.start().unwrap();
        queue
    }

    #[tokio::test]
    async fn test_aggregates_in_order() {
        let queue = started();
        let mut last = None;
        for t in [3, 4, 5, 7, 30] {
            last = Some(queue.enqueue("select * from people", t).unwrap());
        }
        last.unwrap().await;

        let report = queue.report();
        assert_eq!(report.len(), 1);
        let stats = &report[0];
        assert_eq!(stats.count, 5);
        assert_eq!(stats.min, 3);
        assert_eq!(stats.max, 30);
        assert_eq!(stats.total, 49);
        assert_eq!(stats.avg, 10);
    }

    #[tokio::test]
    async fn test_report_sorted_by_avg() {
        let queue = started();
        let mut handles = Vec::new();
        for (query, base) in [("q1", 10), ("q2", 20), ("q3", 30)] {
            for i in 0..10 {
                handles.push(queue.enqueue(query, base + i).unwrap());
            }
        }
        futures::future::join_all(handles).await;

        let report = queue.report_sorted_by(SortBy::Avg);
        let labels: Vec<_> = report.iter().map(|s| s.query.as_str()).collect();
        assert_eq!(labels, vec!["q3", "q2", "q1"]);
        assert_eq!(report[0].avg, 35);
        assert_eq!(report[0].total, 345);
        assert_eq!(report[0].min, 30);
        assert_eq!(report[0].max, 39);
        assert_eq!(report[2].count, 10);
    }

    #[tokio::test]
    async fn test_ties_keep_first_observation_order() {
        let queue = started();
        queue.enqueue("b", 5).unwrap();
        queue.enqueue("a", 5).unwrap();
        queue.enqueue("c", 5).unwrap().await;

        let report = queue.report_sorted_by(SortBy::Count);
        let labels: Vec<_> = report.iter().map(|s| s.query.as_str()).collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_pause_consumes_without_recording() {
        let queue = started();
        queue.enqueue("select 1", 1).unwrap().await;
        let before = queue.report().len();

        queue.pause(true);
        assert!(queue.is_paused());
        queue.enqueue("select 2", 1).unwrap().await;
        assert_eq!(queue.report().len(), before);
        assert_eq!(queue.pending(), 0);

        queue.pause(false);
        queue.enqueue("select 2", 1).unwrap().await;
        assert_eq!(queue.report().len(), before + 1);
    }

    #[tokio::test]
    async fn test_labels_are_normalized() {
        let queue = started();
        queue.enqueue("select * from t where id IN (1,2,3,4)", 1).unwrap();
        queue.enqueue("select * from t where id IN (5)", 1).unwrap();
        queue.enqueue("select * from t limit 1 offset 0", 1).unwrap();
        queue.enqueue("select * from t limit 1 offset 20", 1).unwrap().await;

        let report = queue.report();
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].query, "select * from t where id IN (...)");
        assert_eq!(report[0].count, 2);
        assert_eq!(report[1].query, "select * from t limit 1 offset ...");
    }

    #[tokio::test]
    async fn test_consumer_survives_recording_panic() {
        let queue = StatisticsQueue::new();
        queue
            .start_with(|shared: &Shared, event: &ExecutionEvent| {
                if event.query == "select boom" {
                    panic!("recording failed");
                }
                shared.record(event);
            })
            .unwrap();

        queue.enqueue("select boom", 1).unwrap().await;
        assert!(queue.is_running());
        assert_eq!(queue.pending(), 0);

        queue.enqueue("select 1", 2).unwrap().await;
        let report = queue.report();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].query, "select 1");
        assert_eq!(report[0].count, 1);
    }

    #[test]
    fn test_events_recorded_in_submission_order() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let queue = StatisticsQueue::new();
        let sink = Arc::clone(&seen);
        queue
            .start_with(move |shared: &Shared, event: &ExecutionEvent| {
                sink.lock().push(event.millis);
                shared.record(event);
            })
            .unwrap();

        let times: Vec<u64> = (0..200).map(|i| (i * 37) % 101).collect();
        for &t in &times {
            let _ = queue.enqueue("select * from people", t).unwrap();
        }
        queue.stop();

        assert_eq!(*seen.lock(), times);
        let stats = &queue.report()[0];
        assert_eq!(stats.count, 200);
        assert_eq!(stats.total, times.iter().sum::<u64>());
        assert_eq!(stats.min, 0);
        assert_eq!(stats.max, 100);
    }

    #[test]
    fn test_concurrent_producers() {
        let queue = Arc::new(started());
        let producers: Vec<_> = (0..8)
            .map(|p| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..500 {
                        let label = if i % 2 == 0 { "select even" } else { "select odd" };
                        let _ = queue.enqueue(label, p + 1).unwrap();
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        queue.stop();
        assert_eq!(queue.pending(), 0);
        let report = queue.report();
        assert_eq!(report.len(), 2);
        assert_eq!(report.iter().map(|s| s.count).sum::<u64>(), 4000);
        assert!(report.iter().all(|s| s.count == 2000));
        assert_eq!(report.iter().map(|s| s.total).sum::<u64>(), 500 * (1..=8).sum::<u64>());
    }

    #[test]
    fn test_enqueue_requires_running_queue() {
        let queue = StatisticsQueue::new();
        let err = queue.enqueue("select 1", 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::QueueStopped);

        queue.start().unwrap();
        queue.stop();
        assert!(!queue.is_running());
        assert_eq!(queue.enqueue("select 1", 1).unwrap_err().code, ErrorCode::QueueStopped);
    }

    #[test]
    fn test_double_start() {
        let queue = started();
        assert_eq!(queue.start().unwrap_err().code, ErrorCode::QueueAlreadyRunning);
    }

    #[test]
    fn test_stop_drains() {
        let queue = started();
        for i in 0..100 {
            let _ = queue.enqueue("select 1", i).unwrap();
        }
        queue.stop();
        assert_eq!(queue.pending(), 0);
        assert_eq!(queue.report()[0].count, 100);
        assert_eq!(queue.stop(), 0);
    }

    #[test]
    fn test_restart_keeps_stats() {
        let queue = started();
        let _ = queue.enqueue("select 1", 4).unwrap();
        queue.stop();
        queue.start().unwrap();
        let _ = queue.enqueue("select 1", 6).unwrap();
        queue.stop();
        assert_eq!(queue.report()[0].count, 2);

        queue.reset();
        assert!(queue.report().is_empty());
    }

    #[test]
    fn test_report_sorted_by_name() {
        let queue = StatisticsQueue::new();
        assert!(queue.report_sorted_by_name("avg").unwrap().is_empty());
        assert_eq!(
            queue.report_sorted_by_name("median").unwrap_err().code,
            ErrorCode::InvalidSortField
        );
    }

    #[test]
    fn test_from_config() {
        let enabled = QuillConfig::builder().statistics_enabled(true).build();
        assert!(StatisticsQueue::from_config(&enabled).unwrap().is_running());
        let disabled = QuillConfig::default();
        assert!(!StatisticsQueue::from_config(&disabled).unwrap().is_running());
    }
}
