//! Integration tests for the statistics queue.

use pretty_assertions::assert_eq;
use quill::query::{ErrorCode, ExecutionEvent, QuillConfig, SortBy};
use quill::StatisticsQueue;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_report_after_mixed_traffic() {
    let queue = StatisticsQueue::new();
    queue.start().unwrap();

    let mut handles = Vec::new();
    for id in 0..5 {
        handles.push(
            queue
                .enqueue(format!("SELECT * FROM people WHERE id IN ({}, {})", id, id + 1), 10)
                .unwrap(),
        );
    }
    handles.push(queue.enqueue("select count(*) from people", 100).unwrap());
    handles.push(
        queue
            .enqueue_event(ExecutionEvent::from_duration(
                "select count(*) from people",
                Duration::from_millis(300),
            ))
            .unwrap(),
    );
    futures::future::join_all(handles).await;

    let by_total = queue.report_sorted_by(SortBy::Total);
    assert_eq!(by_total.len(), 2);
    assert_eq!(by_total[0].query, "select count(*) from people");
    assert_eq!(by_total[0].total, 400);
    assert_eq!(by_total[0].avg, 200);
    assert_eq!(by_total[1].count, 5);

    let by_count = queue.report_sorted_by_name("count").unwrap();
    assert_eq!(by_count[0].count, 5);

    let err = queue.report_sorted_by_name("median").unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidSortField);

    assert_eq!(queue.stop(), 0);
    assert!(!queue.is_running());
}

#[tokio::test]
async fn test_reports_survive_restart_until_reset() {
    let queue = StatisticsQueue::new();
    queue.start().unwrap();
    queue.enqueue("select 1", 4).unwrap().await;
    queue.stop();

    assert_eq!(
        queue.enqueue("select 1", 4).unwrap_err().code,
        ErrorCode::QueueStopped
    );

    queue.start().unwrap();
    queue.enqueue("select 1", 6).unwrap().await;
    let report = queue.report();
    assert_eq!(report[0].count, 2);
    assert_eq!(report[0].avg, 5);

    queue.reset();
    assert!(queue.report().is_empty());
}

#[test]
fn test_snapshot_serializes() {
    let queue = StatisticsQueue::new();
    queue.start().unwrap();
    futures::executor::block_on(queue.enqueue("select 1", 7).unwrap());

    let json = serde_json::to_value(queue.report()).unwrap();
    assert_eq!(json[0]["query"], "select 1");
    assert_eq!(json[0]["max"], 7);
}

#[test]
fn test_from_config() {
    let disabled = StatisticsQueue::from_config(&QuillConfig::default()).unwrap();
    assert!(!disabled.is_running());

    let config = QuillConfig::builder().statistics_enabled(true).build();
    let enabled = StatisticsQueue::from_config(&config).unwrap();
    assert!(enabled.is_running());
}

#[test]
fn test_producer_threads_share_one_queue() {
    let queue = Arc::new(StatisticsQueue::new());
    queue.start().unwrap();

    let producers: Vec<_> = (0..4u64)
        .map(|p| {
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || {
                for i in 0..250 {
                    let _ = queue
                        .enqueue(format!("select * from t{} where id IN ({})", p, i), 3)
                        .unwrap();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    queue.stop();
    let report = queue.report_sorted_by(SortBy::Count);
    assert_eq!(report.len(), 4);
    assert!(report.iter().all(|s| s.count == 250 && s.total == 750));
}
