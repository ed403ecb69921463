//! # Pipeline Stage Layer
//!
//! A pipeline stage is middleware wrapped around every dispatch. It receives
//! the request as an [`Envelope`] and a [`Next`] handle to the remainder of the
//! chain, and decides what happens:
//!
//! - **Pass through**: `next.run(request).await`
//! - **Transform**: rewrite the envelope before `next`, or the reply after it
//! - **Short-circuit**: return a [`Reply`] (or an error) without calling `next`
//! - **Intercept failures**: match on the result of `next`
//!
//! Stages are shared by every request type, so they never see concrete types
//! unless they downcast.

use crate::{
    envelope::{Envelope, Reply},
    error::BoxError,
    handler::ErasedHandler,
};
use futures::future::BoxFuture;
use std::{future::Future, sync::Arc};

/// Middleware executed around the handler invocation.
///
/// # Static vs Dynamic Dispatch
///
/// This trait uses native `async fn` for zero-cost static dispatch.
/// Chains store stages as [`DynPipelineStage`] trait objects.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `PipelineStage`",
    label = "missing `PipelineStage` implementation",
    note = "Stages must implement `process` and call `next.run(request)` to continue the chain."
)]
pub trait PipelineStage: Send + Sync + 'static {
    /// Process a request, usually by delegating to `next`.
    fn process(
        &self,
        request: Envelope,
        next: Next<'_>,
    ) -> impl Future<Output = Result<Reply, BoxError>> + Send;
}

/// Dynamic object-safe version of [`PipelineStage`].
pub trait DynPipelineStage: Send + Sync + 'static {
    /// Process a request (dynamic dispatch version).
    fn process_dyn<'a>(
        &'a self,
        request: Envelope,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<Reply, BoxError>>;
}

// Blanket implementation: Any type implementing PipelineStage implements DynPipelineStage.
impl<T: PipelineStage> DynPipelineStage for T {
    fn process_dyn<'a>(
        &'a self,
        request: Envelope,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<Reply, BoxError>> {
        Box::pin(self.process(request, next))
    }
}

/// The remainder of a pipeline: the stages after the current one, ending in
/// the handler bound to the request.
///
/// `Next` is consumed by [`Next::run`], so a stage can continue the chain at
/// most once.
pub struct Next<'a> {
    stages: &'a [Arc<dyn DynPipelineStage>],
    terminal: &'a dyn ErasedHandler,
}

impl<'a> Next<'a> {
    /// Compose `stages` (outermost first) around `terminal`.
    pub fn new(stages: &'a [Arc<dyn DynPipelineStage>], terminal: &'a dyn ErasedHandler) -> Self {
        Self { stages, terminal }
    }

    /// Number of stages still to run before the handler.
    pub fn remaining(&self) -> usize {
        self.stages.len()
    }

    /// Run the rest of the chain with `request`.
    pub fn run(self, request: Envelope) -> BoxFuture<'a, Result<Reply, BoxError>> {
        match self.stages.split_first() {
            Some((stage, rest)) => stage.process_dyn(request, Next::new(rest, self.terminal)),
            None => self.terminal.handle_erased(request),
        }
    }
}

impl std::fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.stages.len())
            .field("handler", &self.terminal.handler_type())
            .finish()
    }
}
