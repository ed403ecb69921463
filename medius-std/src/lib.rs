//! # medius-std
//!
//! Standard implementations for the Medius in-process request dispatcher.
//!
//! This crate provides:
//! - **Binding registry**: [`BindingRegistry`], [`BindingPolicy`]
//! - **Pipeline chain**: [`PipelineChain`]
//! - **Handler discovery**: [`HandlerSource`], [`ManifestSource`], and
//!   `InventorySource` behind the `inventory` feature
//! - **Dispatcher**: [`Mediator`], [`MediatorBuilder`]
//! - **Standard stages**: Logging, Timeout

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use medius_core;

// Modules
pub mod discovery;
pub mod mediator;
pub mod pipeline;
pub mod registry;
pub mod stages;
pub mod testing;

pub use discovery::{
    CandidateUnit, DiscoveredBinding, DiscoveryReport, HandlerDescriptor, HandlerSource,
    ManifestSource,
};
pub use mediator::{Mediator, MediatorBuilder};
pub use pipeline::PipelineChain;
pub use registry::{BindingInfo, BindingPolicy, BindingRegistry};

#[cfg(feature = "inventory")]
pub use inventory;
