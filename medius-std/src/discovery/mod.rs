//! # Handler Discovery
//!
//! Discovery populates a binding registry from a [`HandlerSource`]: an opaque
//! collection of *candidate units*, each exporting zero or more
//! [`HandlerDescriptor`]s. A descriptor names a handler and, optionally,
//! declares the request type it is bound to. Bound descriptors are
//! constructed with no arguments and registered; unbound ones are skipped.
//!
//! How a handler declares its binding is the source's business, not the
//! registry's:
//!
//! - [`ManifestSource`] takes an explicit in-memory list of units.
//! - `InventorySource` (feature `inventory`) reads the link-time table filled
//!   by `#[handler(..)]` and `inventory::submit!`.
//!
//! # Failure policy
//!
//! - A source with no candidate units fails with
//!   [`MediatorError::DiscoverySourceEmpty`].
//! - The first unit that fails to load, or whose handler fails to construct,
//!   aborts discovery with [`MediatorError::HandlerLoad`]. Bindings registered
//!   from earlier units are kept.

mod manifest;

#[cfg(feature = "inventory")]
mod collected;

pub use manifest::{ManifestError, ManifestSource};

#[cfg(feature = "inventory")]
pub use collected::{HandlerRegistration, InventorySource, StaticBinding};

use medius_core::{BoxError, ErasedHandler, HandlerAdapter, MediatorError, Request, RequestHandler};
use std::{any::type_name, borrow::Cow, convert::Infallible, future::Future, sync::Arc};

/// Zero-argument constructor producing a ready-to-register handler.
pub type HandlerFactory =
    Arc<dyn Fn() -> Result<Arc<dyn ErasedHandler>, BoxError> + Send + Sync>;

/// One unit enumerated by a [`HandlerSource`], e.g. a module or a manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateUnit {
    name: String,
}

impl CandidateUnit {
    /// Create a unit reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The unit's name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone)]
struct Binding {
    request: Cow<'static, str>,
    factory: HandlerFactory,
}

/// A handler exported by a candidate unit.
#[derive(Clone)]
pub struct HandlerDescriptor {
    name: Cow<'static, str>,
    binding: Option<Binding>,
}

impl HandlerDescriptor {
    /// A handler bound to `R`, constructed with `H::default()`.
    pub fn bound<R, H>() -> Self
    where
        R: Request,
        H: RequestHandler<R> + Default,
    {
        Self::with_factory::<R, H, _, Infallible>(type_name::<H>(), || Ok(H::default()))
    }

    /// A handler bound to `R`, constructed by `factory`.
    pub fn with_factory<R, H, F, E>(name: impl Into<Cow<'static, str>>, factory: F) -> Self
    where
        R: Request,
        H: RequestHandler<R>,
        F: Fn() -> Result<H, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let factory: HandlerFactory = Arc::new(move || {
            let handler = factory().map_err(Into::into)?;
            Ok(Arc::new(HandlerAdapter::<R, H>::new(handler)) as Arc<dyn ErasedHandler>)
        });
        Self::from_factory(name, R::NAME, factory)
    }

    /// A handler bound to the identifier `request`, constructed by an erased factory.
    pub fn from_factory(
        name: impl Into<Cow<'static, str>>,
        request: impl Into<Cow<'static, str>>,
        factory: HandlerFactory,
    ) -> Self {
        Self {
            name: name.into(),
            binding: Some(Binding {
                request: request.into(),
                factory,
            }),
        }
    }

    /// An exported handler without a binding declaration. Discovery skips it.
    pub fn unbound(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            binding: None,
        }
    }

    /// The handler's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared request identifier, if any.
    pub fn binding(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.request.as_ref())
    }
}

impl std::fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("name", &self.name)
            .field("binding", &self.binding())
            .finish()
    }
}

/// A source of candidate handler units.
pub trait HandlerSource: Send + Sync {
    /// Enumerate the units selected by `descriptor`, in load order.
    fn candidates(&self, descriptor: &str) -> Result<Vec<CandidateUnit>, BoxError>;

    /// Load one unit and list the handlers it exports.
    fn load(
        &self,
        unit: &CandidateUnit,
    ) -> impl Future<Output = Result<Vec<HandlerDescriptor>, BoxError>> + Send;
}

/// A binding registered by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredBinding {
    /// The unit that exported the handler.
    pub unit: String,
    /// The request identifier.
    pub request: String,
    /// The handler's name.
    pub handler: String,
}

/// Summary of one discovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Units visited, in load order.
    pub units: Vec<String>,
    /// Bindings registered, in registration order.
    pub registered: Vec<DiscoveredBinding>,
    /// Names of exported handlers without a binding declaration.
    pub skipped: Vec<String>,
}

/// Load every unit `source` yields for `descriptor` and pass each bound
/// handler to `bind`.
///
/// Units are loaded one at a time in enumeration order.
pub async fn discover<S, F>(
    source: &S,
    descriptor: &str,
    mut bind: F,
) -> Result<DiscoveryReport, MediatorError>
where
    S: HandlerSource + ?Sized,
    F: FnMut(&str, Arc<dyn ErasedHandler>) -> Result<(), MediatorError>,
{
    let units = source
        .candidates(descriptor)
        .map_err(|source| MediatorError::SourceUnavailable {
            descriptor: descriptor.to_string(),
            source,
        })?;

    if units.is_empty() {
        return Err(MediatorError::DiscoverySourceEmpty(descriptor.to_string()));
    }

    let mut report = DiscoveryReport::default();
    for unit in units {
        let load_error = |source: BoxError| MediatorError::HandlerLoad {
            unit: unit.name().to_string(),
            source,
        };

        let exported = source.load(&unit).await.map_err(load_error)?;
        for entry in exported {
            let Some(binding) = &entry.binding else {
                tracing::debug!(unit = %unit.name(), handler = %entry.name(), "skipping unbound handler");
                report.skipped.push(entry.name().to_string());
                continue;
            };
            let request = binding.request.as_ref();
            let handler = (binding.factory)().map_err(load_error)?;
            bind(request, handler)?;
            report.registered.push(DiscoveredBinding {
                unit: unit.name().to_string(),
                request: request.to_string(),
                handler: entry.name().to_string(),
            });
        }

        tracing::info!(unit = %unit.name(), "loaded handler unit");
        report.units.push(unit.name().to_string());
    }

    Ok(report)
}

/// Whether `name` is `prefix` itself or nested under it.
///
/// An empty prefix selects everything.
pub(crate) fn under_prefix(name: &str, prefix: &str, separator: &str) -> bool {
    prefix.is_empty()
        || name == prefix
        || name
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(separator))
}
