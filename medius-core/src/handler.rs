//! # Handler Layer
//!
//! Handlers are the terminal point of a dispatch: the business logic bound to
//! one request type. A mediator stores them type-erased behind
//! [`ErasedHandler`], so requests of any type can share one registry.
//!
//! # Usage Patterns
//!
//! 1. **Struct implementation**: `impl RequestHandler<MyQuery> for MyHandler`
//! 2. **Closure**: `|query: MyQuery| async move { Ok::<_, BoxError>(..) }`

use crate::{
    envelope::{Envelope, Reply},
    error::{BoxError, MediatorError},
    request::Request,
};
use futures::future::BoxFuture;
use std::{any::type_name, future::Future, marker::PhantomData};

/// The handler bound to request type `R`.
///
/// One instance serves every request of its type, so implementations take
/// `&self` and keep any mutable state behind their own synchronization.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle requests of type `{R}`",
    label = "missing `RequestHandler<{R}>` implementation",
    note = "Handlers must implement `handle` for the request type `{R}`."
)]
pub trait RequestHandler<R: Request>: Send + Sync + 'static {
    /// Handle the request and produce its response.
    fn handle(&self, request: R) -> impl Future<Output = Result<R::Response, BoxError>> + Send;
}

// Blanket impl for closures
impl<R, F, Fut, E> RequestHandler<R> for F
where
    R: Request,
    F: Fn(R) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R::Response, E>> + Send,
    E: Into<BoxError>,
{
    fn handle(&self, request: R) -> impl Future<Output = Result<R::Response, BoxError>> + Send {
        let fut = (self)(request);
        async move { fut.await.map_err(Into::into) }
    }
}

/// Object-safe view of a handler, independent of its request type.
pub trait ErasedHandler: Send + Sync + 'static {
    /// Rust type name of the request this handler accepts.
    fn request_type(&self) -> &'static str;

    /// Rust type name of the underlying handler, for diagnostics.
    fn handler_type(&self) -> &'static str;

    /// Handle a type-erased request.
    ///
    /// Fails with [`MediatorError::RequestTypeMismatch`] if the envelope does
    /// not carry the handler's request type.
    fn handle_erased(&self, request: Envelope) -> BoxFuture<'_, Result<Reply, BoxError>>;
}

/// Adapts a typed [`RequestHandler`] into an [`ErasedHandler`].
pub struct HandlerAdapter<R, H> {
    handler: H,
    _request: PhantomData<fn(R)>,
}

impl<R, H> HandlerAdapter<R, H> {
    /// Wrap a typed handler.
    pub const fn new(handler: H) -> Self {
        Self {
            handler,
            _request: PhantomData,
        }
    }

    /// Get a reference to the typed handler.
    pub fn inner(&self) -> &H {
        &self.handler
    }
}

impl<R: Request, H: RequestHandler<R>> HandlerAdapter<R, H> {
    async fn dispatch(&self, request: Envelope) -> Result<Reply, BoxError> {
        let request = match request.downcast::<R>() {
            Ok(request) => request,
            Err(envelope) => {
                return Err(Box::new(MediatorError::RequestTypeMismatch {
                    request: envelope.name().to_string(),
                    expected: type_name::<R>(),
                    found: envelope.type_name(),
                }));
            }
        };
        let response = self.handler.handle(request).await?;
        Ok(Reply::new(response))
    }
}

impl<R: Request, H: RequestHandler<R>> ErasedHandler for HandlerAdapter<R, H> {
    fn request_type(&self) -> &'static str {
        type_name::<R>()
    }

    fn handler_type(&self) -> &'static str {
        type_name::<H>()
    }

    fn handle_erased(&self, request: Envelope) -> BoxFuture<'_, Result<Reply, BoxError>> {
        Box::pin(self.dispatch(request))
    }
}
