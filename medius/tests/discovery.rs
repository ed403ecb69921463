//! Handler discovery: link-time `#[handler]` registrations and manifests.

#![cfg(all(feature = "macros", feature = "inventory"))]

mod common;

use common::{CreateUserCommand, DeleteUserCommand, GetUserQuery, faraj};
use medius::{
    BoxError, Mediator, MediatorError, Request, RequestHandler,
    discovery::{DiscoveredBinding, HandlerDescriptor, InventorySource, ManifestSource},
    handler,
};

/// Handlers living in their own module, to check prefix narrowing.
mod audit {
    use super::*;

    #[derive(Debug, Request)]
    #[request(response = usize, name = "audit.count")]
    pub struct CountEntries;

    #[handler(CountEntries, name = "AuditCounter")]
    #[derive(Default)]
    pub struct Counter;

    impl RequestHandler<CountEntries> for Counter {
        async fn handle(&self, _request: CountEntries) -> Result<usize, BoxError> {
            Ok(3)
        }
    }

    // Exported without a binding declaration.
    medius::inventory::submit! {
        medius::discovery::HandlerRegistration::unbound(module_path!(), "AuditFormatter")
    }
}

fn common_module() -> String {
    format!("{}::common", module_path!())
}

#[tokio::test]
async fn test_discovers_user_handlers() {
    let mediator = Mediator::new();

    let report = mediator.discover_registered(&common_module()).await.unwrap();

    assert_eq!(report.units, vec![common_module()]);
    assert_eq!(
        report.registered,
        vec![
            DiscoveredBinding {
                unit: common_module(),
                request: "CreateUserCommand".into(),
                handler: "CreateUserHandler".into(),
            },
            DiscoveredBinding {
                unit: common_module(),
                request: "GetUserQuery".into(),
                handler: "get_user".into(),
            },
        ]
    );

    assert_eq!(
        mediator.send(faraj()).await.unwrap(),
        "User faraj created with email farajshuaib@gmail.com"
    );
    assert_eq!(
        mediator.send(GetUserQuery { id: 1 }).await.unwrap(),
        "Fetching user with id: 1"
    );
}

#[tokio::test]
async fn test_undiscovered_request_is_not_found() {
    let mediator = Mediator::new();
    mediator.discover_registered("").await.unwrap();

    let err = mediator.send(DeleteUserCommand { id: 1 }).await.unwrap_err();

    assert!(matches!(err, MediatorError::HandlerNotFound(ref name) if name == "DeleteUserCommand"));
}

#[tokio::test]
async fn test_prefix_narrows_discovery() {
    let mediator = Mediator::new();

    let report = mediator
        .discover_registered(&format!("{}::audit", module_path!()))
        .await
        .unwrap();

    assert_eq!(report.skipped, vec!["AuditFormatter"]);
    assert_eq!(report.registered.len(), 1);
    assert_eq!(report.registered[0].handler, "AuditCounter");
    assert_eq!(mediator.send(audit::CountEntries).await.unwrap(), 3);
    assert!(!mediator.has_handler(CreateUserCommand::NAME));
}

#[tokio::test]
async fn test_rediscovery_yields_identical_bindings() {
    let mediator = Mediator::new();

    mediator.discover_registered("").await.unwrap();
    let first = mediator.bindings();
    mediator.discover_registered("").await.unwrap();

    assert_eq!(mediator.bindings(), first);
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn test_unknown_prefix_is_an_empty_source() {
    let mediator = Mediator::new();

    let err = mediator.discover_registered("nowhere").await.unwrap_err();

    assert!(matches!(err, MediatorError::DiscoverySourceEmpty(ref d) if d == "nowhere"));
    assert!(mediator.bindings().is_empty());
}

#[test]
fn test_registrations_are_collected() {
    assert!(InventorySource::registration_count() >= 4);
}

#[tokio::test]
async fn test_manifest_failure_keeps_earlier_bindings() {
    let source = ManifestSource::new()
        .unit(
            "users/create",
            [HandlerDescriptor::bound::<CreateUserCommand, common::CreateUserHandler>()],
        )
        .broken_unit("users/delete", "handler module failed to compile")
        .unit(
            "users/get",
            [HandlerDescriptor::bound::<GetUserQuery, common::get_user>()],
        );
    let mediator = Mediator::new();

    let err = mediator.register_handlers(&source, "users").await.unwrap_err();

    assert!(matches!(err, MediatorError::HandlerLoad { ref unit, .. } if unit == "users/delete"));
    assert!(mediator.has_handler(CreateUserCommand::NAME));
    assert!(!mediator.has_handler(GetUserQuery::NAME));
}
