//! The dispatcher.
//!
//! A [`Mediator`] owns a [`BindingRegistry`] and a [`PipelineChain`]. Every
//! [`Mediator::send`] resolves the request's identifier, wraps the bound
//! handler in the current chain and runs it.
//!
//! # Locking
//!
//! Registry and chain sit behind `parking_lot` read-write locks. A dispatch
//! holds a read lock only long enough to clone the handler and the chain
//! snapshot; no lock is held across an `.await`.

use crate::{
    discovery::{self, DiscoveryReport, HandlerSource},
    pipeline::PipelineChain,
    registry::{BindingInfo, BindingPolicy, BindingRegistry},
};
use medius_core::{
    DynPipelineStage, Envelope, ErasedHandler, HandlerAdapter, MediatorError, PipelineStage,
    Request, RequestHandler,
};
use parking_lot::RwLock;
use std::{
    any::type_name,
    sync::{Arc, OnceLock},
};

/// In-process request dispatcher.
///
/// # Example
///
/// ```rust,ignore
/// use medius::prelude::*;
///
/// let mediator = Mediator::new();
/// mediator.register_handler::<GetUserQuery, _>(GetUserHandler)?;
///
/// let user = mediator.send(GetUserQuery { id: 1 }).await?;
/// ```
pub struct Mediator {
    registry: RwLock<BindingRegistry>,
    pipeline: RwLock<Arc<PipelineChain>>,
}

static GLOBAL: OnceLock<Mediator> = OnceLock::new();

impl Mediator {
    /// Create an empty mediator with [`BindingPolicy::Replace`].
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for configuring a mediator.
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::new()
    }

    /// The process-wide mediator, created empty on first access.
    pub fn global() -> &'static Mediator {
        GLOBAL.get_or_init(Mediator::new)
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Bind `handler` to the request type `R`, keyed by [`Request::NAME`].
    pub fn register_handler<R, H>(&self, handler: H) -> Result<(), MediatorError>
    where
        R: Request,
        H: RequestHandler<R>,
    {
        self.register_handler_as::<R, H>(R::NAME, handler)
    }

    /// Bind `handler` to the request type `R` under an explicit identifier.
    ///
    /// Only requests whose [`Request::NAME`] equals `name` are routed here;
    /// any other request type registered under the same identifier is
    /// rejected at dispatch with [`MediatorError::RequestTypeMismatch`].
    pub fn register_handler_as<R, H>(
        &self,
        name: impl Into<String>,
        handler: H,
    ) -> Result<(), MediatorError>
    where
        R: Request,
        H: RequestHandler<R>,
    {
        self.register_erased(name, Arc::new(HandlerAdapter::<R, H>::new(handler)))
    }

    /// Bind an already erased handler to `name`.
    pub fn register_erased(
        &self,
        name: impl Into<String>,
        handler: Arc<dyn ErasedHandler>,
    ) -> Result<(), MediatorError> {
        let name = name.into();
        tracing::debug!(request = %name, handler = handler.handler_type(), "registering handler");
        let replaced = self.registry.write().register(name.clone(), handler)?;
        if let Some(previous) = replaced {
            tracing::debug!(request = %name, previous = previous.handler_type(), "replaced existing binding");
        }
        Ok(())
    }

    /// Append a stage to the pipeline.
    ///
    /// The first stage registered is the outermost around every dispatch.
    pub fn register_pipeline<S: PipelineStage>(&self, stage: S) {
        self.register_pipeline_shared(Arc::new(stage));
    }

    /// Append an already shared stage to the pipeline.
    pub fn register_pipeline_shared(&self, stage: Arc<dyn DynPipelineStage>) {
        let mut pipeline = self.pipeline.write();
        Arc::make_mut(&mut pipeline).append_shared(stage);
        tracing::debug!(stages = pipeline.len(), "registered pipeline stage");
    }

    /// Populate the registry from `source`.
    ///
    /// See [`discovery`](crate::discovery) for the failure policy. Bindings
    /// made before a failure stay registered.
    pub async fn register_handlers<S>(
        &self,
        source: &S,
        descriptor: &str,
    ) -> Result<DiscoveryReport, MediatorError>
    where
        S: HandlerSource + ?Sized,
    {
        let report = discovery::discover(source, descriptor, |request, handler| {
            self.register_erased(request, handler)
        })
        .await?;
        tracing::info!(
            descriptor,
            units = report.units.len(),
            registered = report.registered.len(),
            skipped = report.skipped.len(),
            "handler discovery finished"
        );
        Ok(report)
    }

    /// Register every handler declared with `#[handler(..)]` in modules under
    /// `prefix` (`""` selects all).
    #[cfg(feature = "inventory")]
    pub async fn discover_registered(&self, prefix: &str) -> Result<DiscoveryReport, MediatorError> {
        self.register_handlers(&discovery::InventorySource::new(), prefix)
            .await
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    /// Dispatch `request` through the pipeline to its bound handler.
    ///
    /// Fails with [`MediatorError::HandlerNotFound`] before any stage runs if
    /// nothing is bound to [`Request::NAME`]. Failures raised by stages or the
    /// handler are returned as [`MediatorError::Handler`].
    pub async fn send<R: Request>(&self, request: R) -> Result<R::Response, MediatorError> {
        let handler = self
            .registry
            .read()
            .resolve(R::NAME)
            .ok_or_else(|| MediatorError::HandlerNotFound(R::NAME.to_string()))?;
        let pipeline = Arc::clone(&*self.pipeline.read());

        tracing::debug!(request = R::NAME, handler = handler.handler_type(), stages = pipeline.len(), "dispatching request");

        let reply = pipeline
            .build(&*handler)
            .run(Envelope::new(request))
            .await
            .map_err(MediatorError::from_pipeline)?;

        reply
            .downcast::<R::Response>()
            .map_err(|_| MediatorError::ResponseTypeMismatch {
                request: R::NAME.to_string(),
                expected: type_name::<R::Response>(),
            })
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    /// Check whether a handler is bound to `name`.
    pub fn has_handler(&self, name: &str) -> bool {
        self.registry.read().contains(name)
    }

    /// A sorted snapshot of the current bindings.
    pub fn bindings(&self) -> Vec<BindingInfo> {
        self.registry.read().bindings()
    }

    /// Get the number of pipeline stages.
    pub fn pipeline_len(&self) -> usize {
        self.pipeline.read().len()
    }

    /// The registry's binding policy.
    pub fn policy(&self) -> BindingPolicy {
        self.registry.read().policy()
    }
}

impl Default for Mediator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Mediator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mediator")
            .field("registry", &*self.registry.read())
            .field("pipeline", &**self.pipeline.read())
            .finish()
    }
}

/// Builder for constructing a [`Mediator`].
///
/// # Example
///
/// ```rust,ignore
/// let mediator = Mediator::builder()
///     .policy(BindingPolicy::Reject)
///     .stage(LoggingStage::new())
///     .build();
/// ```
#[derive(Default)]
pub struct MediatorBuilder {
    policy: BindingPolicy,
    pipeline: PipelineChain,
}

impl MediatorBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the binding policy.
    pub fn policy(mut self, policy: BindingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Append a pipeline stage.
    pub fn stage<S: PipelineStage>(mut self, stage: S) -> Self {
        self.pipeline.append(stage);
        self
    }

    /// Build the mediator.
    pub fn build(self) -> Mediator {
        Mediator {
            registry: RwLock::new(BindingRegistry::with_policy(self.policy)),
            pipeline: RwLock::new(Arc::new(self.pipeline)),
        }
    }
}
