//! Error types for Medius.
//!
//! Every failure surfaced by a mediator is a [`MediatorError`]. Failures raised
//! by handlers and pipeline stages are carried as [`BoxError`] and come back to
//! the caller through [`MediatorError::Handler`] without modification.

use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Medius operations.
#[derive(Error, Debug)]
pub enum MediatorError {
    /// No handler is bound to the request type.
    #[error("no handler registered for request type `{0}`")]
    HandlerNotFound(String),

    /// The handler source yielded no candidate units.
    #[error("handler source `{0}` yielded no candidate units")]
    DiscoverySourceEmpty(String),

    /// The handler source could not enumerate its candidate units.
    #[error("handler source `{descriptor}` is unavailable")]
    SourceUnavailable {
        /// The descriptor passed to discovery.
        descriptor: String,
        /// The underlying failure.
        #[source]
        source: BoxError,
    },

    /// A candidate unit failed to load, or one of its handlers failed to construct.
    #[error("failed to load handler unit `{unit}`")]
    HandlerLoad {
        /// The unit being loaded.
        unit: String,
        /// The underlying failure.
        #[source]
        source: BoxError,
    },

    /// A binding already exists and the registry rejects replacements.
    #[error("request type `{0}` is already bound to a handler")]
    DuplicateBinding(String),

    /// The handler bound under a name was built for a different request type.
    #[error("handler bound to `{request}` expects `{expected}` but received `{found}`")]
    RequestTypeMismatch {
        /// The binding identifier.
        request: String,
        /// The request type the handler accepts.
        expected: &'static str,
        /// The request type that was dispatched.
        found: &'static str,
    },

    /// A pipeline stage replaced the response with a value of another type.
    #[error("response for `{request}` is not a `{expected}`")]
    ResponseTypeMismatch {
        /// The binding identifier.
        request: String,
        /// The response type the caller expects.
        expected: &'static str,
    },

    /// The dispatch did not finish in time.
    #[error("request `{request}` timed out after {after:?}")]
    Timeout {
        /// The binding identifier.
        request: String,
        /// The elapsed deadline.
        after: Duration,
    },

    /// A failure raised by a handler or pipeline stage.
    #[error(transparent)]
    Handler(BoxError),
}

impl MediatorError {
    /// Recover a `MediatorError` carried inside a boxed pipeline failure, or
    /// wrap any other failure as [`MediatorError::Handler`].
    pub fn from_pipeline(err: BoxError) -> Self {
        match err.downcast::<MediatorError>() {
            Ok(err) => *err,
            Err(err) => MediatorError::Handler(err),
        }
    }

    /// Returns `true` for [`MediatorError::HandlerNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, MediatorError::HandlerNotFound(_))
    }

    /// Borrow the failure raised by a handler or stage as `E`.
    pub fn handler_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            MediatorError::Handler(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }
}
