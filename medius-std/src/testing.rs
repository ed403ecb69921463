//! Testing utilities for Medius.
//!
//! This module provides utilities to make testing stages and handlers easier.
//!
//! # Features
//!
//! - [`OrderLog`]: A shared log for asserting execution order
//! - [`RecordingStage`]: A stage that records when it runs around `next`
//! - [`ShortCircuitStage`]: A stage that answers without calling `next`
//! - [`CountingHandler`]: A handler wrapper that counts invocations

use medius_core::{BoxError, Envelope, Next, PipelineStage, Reply, Request, RequestHandler};
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Order Log
// ============================================================================

/// A cloneable, shared list of labels in the order they were pushed.
#[derive(Clone, Default)]
pub struct OrderLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl OrderLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// Get a clone of the recorded entries.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Clear all recorded entries.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

// ============================================================================
// Recording Stage
// ============================================================================

/// A pass-through stage that logs `label:before`, then `label:after` or
/// `label:failed` depending on the outcome of `next`.
///
/// # Example
///
/// ```rust,ignore
/// let log = OrderLog::new();
/// mediator.register_pipeline(RecordingStage::new("A", log.clone()));
/// mediator.register_pipeline(RecordingStage::new("B", log.clone()));
///
/// mediator.send(request).await?;
/// assert_eq!(log.entries(), ["A:before", "B:before", "B:after", "A:after"]);
/// ```
#[derive(Clone)]
pub struct RecordingStage {
    label: String,
    log: OrderLog,
}

impl RecordingStage {
    /// Create a recording stage writing to `log`.
    pub fn new(label: impl Into<String>, log: OrderLog) -> Self {
        Self {
            label: label.into(),
            log,
        }
    }
}

impl PipelineStage for RecordingStage {
    async fn process(&self, request: Envelope, next: Next<'_>) -> Result<Reply, BoxError> {
        self.log.push(format!("{}:before", self.label));
        let result = next.run(request).await;
        let outcome = if result.is_ok() { "after" } else { "failed" };
        self.log.push(format!("{}:{outcome}", self.label));
        result
    }
}

// ============================================================================
// Short-circuit Stage
// ============================================================================

/// A stage that never calls `next` and answers with the reply built by `F`.
pub struct ShortCircuitStage<F> {
    reply: F,
}

impl<F> ShortCircuitStage<F>
where
    F: Fn() -> Reply + Send + Sync + 'static,
{
    /// Create a stage answering every request with `reply()`.
    pub fn new(reply: F) -> Self {
        Self { reply }
    }
}

impl<F> PipelineStage for ShortCircuitStage<F>
where
    F: Fn() -> Reply + Send + Sync + 'static,
{
    async fn process(&self, _request: Envelope, _next: Next<'_>) -> Result<Reply, BoxError> {
        Ok((self.reply)())
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler wrapper that counts invocations.
///
/// # Example
///
/// ```rust,ignore
/// let counter = CountingHandler::new(GetUserHandler);
/// let calls = counter.clone();
///
/// mediator.register_handler(counter)?;
/// mediator.send(GetUserQuery { id: 1 }).await?;
///
/// assert_eq!(calls.count(), 1);
/// ```
pub struct CountingHandler<H> {
    inner: Arc<H>,
    count: Arc<AtomicUsize>,
}

impl<H> CountingHandler<H> {
    /// Wrap `inner`.
    pub fn new(inner: H) -> Self {
        Self {
            inner: Arc::new(inner),
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<H> Clone for CountingHandler<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            count: self.count.clone(),
        }
    }
}

impl<R, H> RequestHandler<R> for CountingHandler<H>
where
    R: Request,
    H: RequestHandler<R>,
{
    async fn handle(&self, request: R) -> Result<R::Response, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.inner.handle(request).await
    }
}
