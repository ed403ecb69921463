//! # medius - In-Process Mediator
//!
//! `medius` routes a typed request to the single handler bound to its type,
//! through an ordered pipeline of middleware stages, and hands the typed
//! response back to the caller. Callers never name the handler.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use medius::prelude::*;
//!
//! #[derive(Debug, Request)]
//! #[request(response = String)]
//! struct GetUserQuery {
//!     id: u64,
//! }
//!
//! #[medius::handler]
//! async fn get_user(query: GetUserQuery) -> Result<String, BoxError> {
//!     Ok(format!("Fetching user with id: {}", query.id))
//! }
//!
//! let mediator = Mediator::new();
//! mediator.register_pipeline(LoggingStage::new());
//! mediator.discover_registered(module_path!()).await?;
//!
//! let user = mediator.send(GetUserQuery { id: 1 }).await?;
//! ```
//!
//! ## Registration
//!
//! Handlers are bound explicitly with [`Mediator::register_handler`], in bulk
//! from a [`HandlerSource`] with [`Mediator::register_handlers`], or
//! declaratively with `#[handler]` and [`Mediator::discover_registered`]
//! (features `macros` and `inventory`).
//!
//! ## Features
//!
//! - `macros` (default): `#[derive(Request)]` and `#[handler]`
//! - `inventory` (default): link-time handler discovery
//! - `timeout`: [`stages::TimeoutStage`], built on `tokio::time`

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use medius_core::{
    // Errors
    BoxError,
    DynPipelineStage,
    // Pipeline
    Envelope,
    ErasedHandler,
    HandlerAdapter,
    MediatorError,
    Next,
    PipelineStage,
    Reply,
    // Requests and handlers
    Request,
    RequestHandler,
};

pub use medius_std::{
    mediator::{Mediator, MediatorBuilder},
    pipeline::PipelineChain,
    registry::{BindingInfo, BindingPolicy, BindingRegistry},
};

/// Handler discovery.
pub mod discovery {
    pub use medius_std::discovery::{
        CandidateUnit, DiscoveredBinding, DiscoveryReport, HandlerDescriptor, HandlerFactory,
        HandlerSource, ManifestError, ManifestSource, discover,
    };

    #[cfg(feature = "inventory")]
    pub use medius_std::discovery::{HandlerRegistration, InventorySource, StaticBinding};
}

/// Standard pipeline stages.
pub mod stages {
    pub use medius_std::stages::LoggingStage;

    #[cfg(feature = "timeout")]
    pub use medius_std::stages::TimeoutStage;
}

/// Testing utilities.
pub mod testing {
    pub use medius_std::testing::{CountingHandler, OrderLog, RecordingStage, ShortCircuitStage};
}

pub use discovery::{HandlerDescriptor, HandlerSource, ManifestSource};

/// Prelude module - common imports for Medius.
///
/// # Usage
///
/// ```rust,ignore
/// use medius::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BindingPolicy,
        BoxError,
        Envelope,
        HandlerDescriptor,
        ManifestSource,
        Mediator,
        MediatorError,
        Next,
        PipelineStage,
        Reply,
        Request,
        RequestHandler,
        stages::LoggingStage,
    };

    #[cfg(feature = "macros")]
    pub use crate::handler;
}

#[cfg(feature = "macros")]
pub use medius_macros::{Request, handler};

#[cfg(feature = "inventory")]
pub use inventory;
