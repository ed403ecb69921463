//! # Link-time handler registration using Inventory
//!
//! Handlers declare their binding with `#[handler(RequestType)]` (or a manual
//! `inventory::submit!` of a [`HandlerRegistration`]). The registrations are
//! collected into a static table at link time, and [`InventorySource`]
//! exposes that table to discovery. Each Rust module that submitted at least
//! one registration is one candidate unit; the discovery descriptor is a
//! module-path prefix.
//!
//! # Example
//!
//! ```rust,ignore
//! use medius::{handler, Mediator};
//!
//! #[handler(GetUserQuery)]
//! #[derive(Default)]
//! struct GetUserHandler;
//!
//! let mediator = Mediator::new();
//! mediator.discover_registered("my_app::use_cases").await?;
//! ```

use super::{CandidateUnit, HandlerDescriptor, HandlerSource, under_prefix};
use medius_core::{BoxError, ErasedHandler, HandlerAdapter, Request, RequestHandler};
use std::{collections::BTreeSet, sync::Arc};

/// The binding half of a [`HandlerRegistration`].
pub struct StaticBinding {
    /// The request identifier.
    pub request: &'static str,
    /// Zero-argument constructor for the handler.
    pub construct: fn() -> Result<Arc<dyn ErasedHandler>, BoxError>,
}

/// Registration entry for a handler in the link-time table.
///
/// This struct is submitted to `inventory` for automatic collection.
pub struct HandlerRegistration {
    /// `module_path!()` of the submitting module.
    pub module: &'static str,
    /// The handler's name.
    pub handler: &'static str,
    /// The declared binding, or `None` for an exported but unbound handler.
    pub binding: Option<StaticBinding>,
}

impl HandlerRegistration {
    /// Register `H` as the handler of `R`, constructed with `H::default()`.
    pub const fn bound<R, H>(module: &'static str, handler: &'static str) -> Self
    where
        R: Request,
        H: RequestHandler<R> + Default,
    {
        Self {
            module,
            handler,
            binding: Some(StaticBinding {
                request: R::NAME,
                construct: construct_default::<R, H>,
            }),
        }
    }

    /// Register a handler with an explicit request identifier and constructor.
    pub const fn with_constructor(
        module: &'static str,
        handler: &'static str,
        request: &'static str,
        construct: fn() -> Result<Arc<dyn ErasedHandler>, BoxError>,
    ) -> Self {
        Self {
            module,
            handler,
            binding: Some(StaticBinding { request, construct }),
        }
    }

    /// Register an exported handler that declares no binding.
    pub const fn unbound(module: &'static str, handler: &'static str) -> Self {
        Self {
            module,
            handler,
            binding: None,
        }
    }

    fn descriptor(&self) -> HandlerDescriptor {
        match &self.binding {
            Some(binding) => {
                let construct = binding.construct;
                HandlerDescriptor::from_factory(self.handler, binding.request, Arc::new(construct))
            }
            None => HandlerDescriptor::unbound(self.handler),
        }
    }
}

inventory::collect!(HandlerRegistration);

fn construct_default<R, H>() -> Result<Arc<dyn ErasedHandler>, BoxError>
where
    R: Request,
    H: RequestHandler<R> + Default,
{
    Ok(Arc::new(HandlerAdapter::<R, H>::new(H::default())))
}

/// A handler source reading the link-time registration table.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventorySource;

impl InventorySource {
    /// Create the source.
    pub fn new() -> Self {
        Self
    }

    /// Get the number of registrations in the table.
    pub fn registration_count() -> usize {
        inventory::iter::<HandlerRegistration>.into_iter().count()
    }
}

impl HandlerSource for InventorySource {
    fn candidates(&self, descriptor: &str) -> Result<Vec<CandidateUnit>, BoxError> {
        let prefix = descriptor.trim_end_matches(':');
        // Module paths are sorted so that discovery order does not depend on
        // link order.
        let modules: BTreeSet<&'static str> = inventory::iter::<HandlerRegistration>
            .into_iter()
            .map(|reg| reg.module)
            .filter(|module| under_prefix(module, prefix, "::"))
            .collect();
        Ok(modules.into_iter().map(CandidateUnit::new).collect())
    }

    async fn load(&self, unit: &CandidateUnit) -> Result<Vec<HandlerDescriptor>, BoxError> {
        let mut entries: Vec<&HandlerRegistration> = inventory::iter::<HandlerRegistration>
            .into_iter()
            .filter(|reg| reg.module == unit.name())
            .collect();
        entries.sort_by_key(|reg| reg.handler);
        Ok(entries.into_iter().map(HandlerRegistration::descriptor).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{discovery::discover, registry::BindingRegistry};

    #[derive(Debug)]
    struct Status;

    impl Request for Status {
        type Response = &'static str;
        const NAME: &'static str = "Status";
    }

    #[derive(Default)]
    struct StatusHandler;

    impl RequestHandler<Status> for StatusHandler {
        async fn handle(&self, _request: Status) -> Result<&'static str, BoxError> {
            Ok("green")
        }
    }

    inventory::submit! {
        HandlerRegistration::bound::<Status, StatusHandler>(module_path!(), "StatusHandler")
    }

    inventory::submit! {
        HandlerRegistration::unbound(module_path!(), "StatusFormatter")
    }

    #[test]
    fn test_candidates_include_this_module() {
        let units = InventorySource.candidates(module_path!()).unwrap();
        assert_eq!(units, vec![CandidateUnit::new(module_path!())]);
        assert!(InventorySource::registration_count() >= 2);
    }

    #[tokio::test]
    async fn test_discovers_submitted_handlers() {
        let mut registry = BindingRegistry::new();
        let report = discover(&InventorySource, module_path!(), |request, handler| {
            registry.register(request, handler).map(drop)
        })
        .await
        .unwrap();

        assert_eq!(report.skipped, vec!["StatusFormatter"]);
        assert_eq!(report.registered.len(), 1);
        assert!(
            registry
                .resolve("Status")
                .unwrap()
                .handler_type()
                .ends_with("StatusHandler")
        );
    }
}
