//! Execution events and their completion handles.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;

/// One query execution to aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionEvent {
    /// Raw query text.
    pub query: String,
    /// Elapsed time in milliseconds.
    pub millis: u64,
}

impl ExecutionEvent {
    /// Create an event from a millisecond count.
    pub fn new(query: impl Into<String>, millis: u64) -> Self {
        Self {
            query: query.into(),
            millis,
        }
    }

    /// Create an event from a measured duration.
    pub fn from_duration(query: impl Into<String>, elapsed: Duration) -> Self {
        Self::new(query, u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }
}

/// An event travelling to the consumer with its completion handle.
#[derive(Debug)]
pub(crate) struct Envelope {
    pub(crate) event: ExecutionEvent,
    pub(crate) done: oneshot::Sender<()>,
}

/// Resolves once the consumer has taken the event off the queue.
///
/// Completion does not mean the event was aggregated: a paused queue consumes
/// events without recording them. The future also resolves if the consumer
/// goes away before reaching the event.
#[derive(Debug)]
pub struct Processed {
    rx: oneshot::Receiver<()>,
}

impl Processed {
    pub(crate) fn new(rx: oneshot::Receiver<()>) -> Self {
        Self { rx }
    }
}

impl Future for Processed {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        // A dropped sender still counts as processed.
        Pin::new(&mut self.rx).poll(cx).map(|_| ())
    }
}
