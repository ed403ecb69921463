//! Ordered pipeline chain.
//!
//! Stages run in registration order: the first stage appended is the
//! outermost wrapper and the handler is the innermost call. The chain is never
//! mutated while dispatching; [`PipelineChain::build`] composes a fresh
//! [`Next`] over the stage list for every request.

use medius_core::{DynPipelineStage, ErasedHandler, Next, PipelineStage};
use std::sync::Arc;

/// An ordered list of pipeline stages.
#[derive(Clone, Default)]
pub struct PipelineChain {
    stages: Vec<Arc<dyn DynPipelineStage>>,
}

impl PipelineChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage after every stage registered so far.
    pub fn append<S: PipelineStage>(&mut self, stage: S) {
        self.stages.push(Arc::new(stage));
    }

    /// Append an already shared stage.
    pub fn append_shared(&mut self, stage: Arc<dyn DynPipelineStage>) {
        self.stages.push(stage);
    }

    /// Compose the chain around `terminal`, outermost stage first.
    pub fn build<'a>(&'a self, terminal: &'a dyn ErasedHandler) -> Next<'a> {
        Next::new(&self.stages, terminal)
    }

    /// Get the number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check if the chain has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl std::fmt::Debug for PipelineChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineChain")
            .field("stages", &self.stages.len())
            .finish()
    }
}
