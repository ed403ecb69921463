//! Binding registry mapping request identifiers to handlers.
//!
//! Each request identifier is bound to at most one handler. What happens when
//! a second handler is registered for the same identifier is decided by the
//! registry's [`BindingPolicy`].

use medius_core::{ErasedHandler, MediatorError};
use std::{collections::HashMap, sync::Arc};

/// What to do when a request identifier is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingPolicy {
    /// The most recent registration wins (default).
    #[default]
    Replace,
    /// A second registration fails with [`MediatorError::DuplicateBinding`].
    Reject,
}

/// A snapshot of one binding, for inspection and comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct BindingInfo {
    /// The request identifier.
    pub request: String,
    /// Rust type name of the bound handler.
    pub handler: &'static str,
}

/// Maps request identifiers to handler instances.
pub struct BindingRegistry {
    bindings: HashMap<String, Arc<dyn ErasedHandler>>,
    policy: BindingPolicy,
}

impl BindingRegistry {
    /// Create an empty registry with the default [`BindingPolicy::Replace`].
    pub fn new() -> Self {
        Self::with_policy(BindingPolicy::default())
    }

    /// Create an empty registry with the given policy.
    pub fn with_policy(policy: BindingPolicy) -> Self {
        Self {
            bindings: HashMap::new(),
            policy,
        }
    }

    /// Bind `handler` to `request`.
    ///
    /// Returns the handler that was replaced, if any. Under
    /// [`BindingPolicy::Reject`] an existing binding makes this fail instead.
    pub fn register(
        &mut self,
        request: impl Into<String>,
        handler: Arc<dyn ErasedHandler>,
    ) -> Result<Option<Arc<dyn ErasedHandler>>, MediatorError> {
        let request = request.into();
        if self.policy == BindingPolicy::Reject && self.bindings.contains_key(&request) {
            return Err(MediatorError::DuplicateBinding(request));
        }
        Ok(self.bindings.insert(request, handler))
    }

    /// Look up the handler bound to `request`.
    pub fn resolve(&self, request: &str) -> Option<Arc<dyn ErasedHandler>> {
        self.bindings.get(request).cloned()
    }

    /// Check whether `request` is bound.
    pub fn contains(&self, request: &str) -> bool {
        self.bindings.contains_key(request)
    }

    /// The active binding policy.
    pub fn policy(&self) -> BindingPolicy {
        self.policy
    }

    /// Get the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the registry has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// All bindings, sorted by request identifier.
    pub fn bindings(&self) -> Vec<BindingInfo> {
        let mut bindings: Vec<_> = self
            .bindings
            .iter()
            .map(|(request, handler)| BindingInfo {
                request: request.clone(),
                handler: handler.handler_type(),
            })
            .collect();
        bindings.sort();
        bindings
    }
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingRegistry")
            .field("policy", &self.policy)
            .field("bindings", &self.bindings())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medius_core::{BoxError, HandlerAdapter, Request, RequestHandler};

    #[derive(Debug)]
    struct Ping;

    impl Request for Ping {
        type Response = &'static str;
        const NAME: &'static str = "Ping";
    }

    struct First;
    struct Second;

    impl RequestHandler<Ping> for First {
        async fn handle(&self, _request: Ping) -> Result<&'static str, BoxError> {
            Ok("first")
        }
    }

    impl RequestHandler<Ping> for Second {
        async fn handle(&self, _request: Ping) -> Result<&'static str, BoxError> {
            Ok("second")
        }
    }

    fn erased<H: RequestHandler<Ping>>(handler: H) -> Arc<dyn ErasedHandler> {
        Arc::new(HandlerAdapter::<Ping, H>::new(handler))
    }

    #[test]
    fn test_resolve_missing_is_none() {
        let registry = BindingRegistry::new();
        assert!(registry.resolve("Ping").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = BindingRegistry::new();
        assert!(registry.register("Ping", erased(First)).unwrap().is_none());
        let replaced = registry.register("Ping", erased(Second)).unwrap();

        assert!(replaced.unwrap().handler_type().ends_with("First"));
        assert_eq!(registry.len(), 1);
        assert!(
            registry
                .resolve("Ping")
                .unwrap()
                .handler_type()
                .ends_with("Second")
        );
    }

    #[test]
    fn test_reject_policy_keeps_first_binding() {
        let mut registry = BindingRegistry::with_policy(BindingPolicy::Reject);
        registry.register("Ping", erased(First)).unwrap();
        let Err(err) = registry.register("Ping", erased(Second)) else {
            panic!("second registration should be rejected");
        };

        assert!(matches!(err, MediatorError::DuplicateBinding(ref name) if name == "Ping"));
        assert!(
            registry
                .resolve("Ping")
                .unwrap()
                .handler_type()
                .ends_with("First")
        );
    }

    #[test]
    fn test_bindings_snapshot_is_sorted() {
        let mut registry = BindingRegistry::new();
        registry.register("Zeta", erased(First)).unwrap();
        registry.register("Alpha", erased(Second)).unwrap();

        let names: Vec<_> = registry.bindings().into_iter().map(|b| b.request).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }
}
