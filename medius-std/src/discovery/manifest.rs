//! In-memory handler source.

use super::{CandidateUnit, HandlerDescriptor, HandlerSource, under_prefix};
use medius_core::BoxError;
use thiserror::Error;

/// Errors raised while loading a manifest unit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    /// The unit is not part of the manifest.
    #[error("unit `{0}` is not part of the manifest")]
    UnknownUnit(String),

    /// The unit was declared as failing to load.
    #[error("unit `{unit}` cannot be loaded: {reason}")]
    Broken {
        /// The unit name.
        unit: String,
        /// Why the unit cannot be loaded.
        reason: String,
    },
}

#[derive(Clone)]
enum Unit {
    Loaded(Vec<HandlerDescriptor>),
    Broken(String),
}

/// A handler source backed by an explicit, ordered list of named units.
///
/// Unit names are `/`-separated paths. The discovery descriptor selects the
/// units equal to it or nested under it; an empty descriptor selects all.
///
/// # Example
///
/// ```rust,ignore
/// let source = ManifestSource::new()
///     .unit("users/create", [HandlerDescriptor::bound::<CreateUserCommand, CreateUserHandler>()])
///     .unit("users/get", [HandlerDescriptor::bound::<GetUserQuery, GetUserHandler>()]);
///
/// mediator.register_handlers(&source, "users").await?;
/// ```
#[derive(Clone, Default)]
pub struct ManifestSource {
    units: Vec<(String, Unit)>,
}

impl ManifestSource {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit exporting `descriptors`.
    ///
    /// Unit names are unique: adding a name that is already present replaces
    /// that unit and keeps its position.
    pub fn unit(
        self,
        name: impl Into<String>,
        descriptors: impl IntoIterator<Item = HandlerDescriptor>,
    ) -> Self {
        self.insert(name.into(), Unit::Loaded(descriptors.into_iter().collect()))
    }

    /// Add a unit that fails to load with `reason`.
    pub fn broken_unit(self, name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.insert(name.into(), Unit::Broken(reason.into()))
    }

    fn insert(mut self, name: String, unit: Unit) -> Self {
        match self.units.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = unit,
            None => self.units.push((name, unit)),
        }
        self
    }

    /// Get the number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if the manifest has no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl HandlerSource for ManifestSource {
    fn candidates(&self, descriptor: &str) -> Result<Vec<CandidateUnit>, BoxError> {
        let prefix = descriptor.trim_end_matches('/');
        Ok(self
            .units
            .iter()
            .filter(|(name, _)| under_prefix(name, prefix, "/"))
            .map(|(name, _)| CandidateUnit::new(name.clone()))
            .collect())
    }

    async fn load(&self, unit: &CandidateUnit) -> Result<Vec<HandlerDescriptor>, BoxError> {
        match self.units.iter().find(|(name, _)| name == unit.name()) {
            Some((_, Unit::Loaded(descriptors))) => Ok(descriptors.clone()),
            Some((name, Unit::Broken(reason))) => Err(Box::new(ManifestError::Broken {
                unit: name.clone(),
                reason: reason.clone(),
            })),
            None => Err(Box::new(ManifestError::UnknownUnit(unit.name().to_string()))),
        }
    }
}

impl std::fmt::Debug for ManifestSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.units.iter().map(|(name, _)| name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_follow_declaration_order() {
        let source = ManifestSource::new()
            .unit("b", Vec::new())
            .unit("a", Vec::new())
            .unit("a/nested", Vec::new());

        let all: Vec<_> = source
            .candidates("")
            .unwrap()
            .into_iter()
            .map(|u| u.name().to_string())
            .collect();
        assert_eq!(all, vec!["b", "a", "a/nested"]);

        let nested = source.candidates("a/").unwrap();
        assert_eq!(nested.len(), 2);
    }

    #[tokio::test]
    async fn test_repeated_unit_name_replaces_earlier_unit() {
        let source = ManifestSource::new()
            .unit("users", [HandlerDescriptor::unbound("CreateUser")])
            .unit("audit", Vec::new())
            .unit("users", [HandlerDescriptor::unbound("DeleteUser")]);

        assert_eq!(source.len(), 2);
        let names: Vec<_> = source
            .candidates("")
            .unwrap()
            .into_iter()
            .map(|u| u.name().to_string())
            .collect();
        assert_eq!(names, vec!["users", "audit"]);

        let exported = source.load(&CandidateUnit::new("users")).await.unwrap();
        let handlers: Vec<_> = exported.iter().map(HandlerDescriptor::name).collect();
        assert_eq!(handlers, vec!["DeleteUser"]);
    }

    #[tokio::test]
    async fn test_broken_unit_can_be_replaced() {
        let source = ManifestSource::new()
            .broken_unit("users", "truncated file")
            .unit("users", Vec::new());

        assert!(source.load(&CandidateUnit::new("users")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_unknown_unit() {
        let source = ManifestSource::new();
        assert!(source.is_empty());
        let err = source.load(&CandidateUnit::new("ghost")).await.unwrap_err();
        assert_eq!(err.to_string(), "unit `ghost` is not part of the manifest");
    }

    #[tokio::test]
    async fn test_load_broken_unit() {
        let source = ManifestSource::new().broken_unit("bad", "truncated file");
        let err = source.load(&CandidateUnit::new("bad")).await.unwrap_err();
        assert_eq!(err.to_string(), "unit `bad` cannot be loaded: truncated file");
    }
}
