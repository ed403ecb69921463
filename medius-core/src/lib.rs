//! # medius-core
//!
//! Core contracts for the Medius in-process request dispatcher.
//!
//! This crate has minimal dependencies and is meant to be imported by crates
//! that only define requests, handlers or pipeline stages and do not need the
//! `medius-std` dispatcher.
//!
//! # Layers
//!
//! ## Requests ([`Request`])
//!
//! A request is a typed value with a stable identifier ([`Request::NAME`]) and
//! an associated response type. Identifiers, not Rust type names, are the keys
//! of the binding registry.
//!
//! ## Handlers ([`RequestHandler`])
//!
//! The terminal point of a dispatch. Each request type is bound to exactly one
//! handler instance, stored type-erased as an [`ErasedHandler`].
//!
//! ## Pipeline stages ([`PipelineStage`])
//!
//! Middleware wrapped around every dispatch in registration order. Stages see
//! requests and responses as [`Envelope`] and [`Reply`] and continue the chain
//! through [`Next`].
//!
//! # Error Types
//!
//! - [`MediatorError`] - every failure surfaced by a mediator
//! - [`BoxError`] - failures raised by handlers and stages

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod envelope;
mod error;
mod handler;
mod request;
mod stage;

// Re-exports
pub use envelope::{Envelope, Reply};
pub use error::{BoxError, MediatorError};
pub use handler::{ErasedHandler, HandlerAdapter, RequestHandler};
pub use request::Request;
pub use stage::{DynPipelineStage, Next, PipelineStage};
