//! # medius-macros
//!
//! Procedural macros for the Medius mediator. Use them through the `medius`
//! crate with the `macros` feature; the generated code refers to `::medius`.

use proc_macro::TokenStream;

mod handler;
mod request;

/// Derive macro for implementing the `Request` trait.
///
/// The response type is required. The request identifier defaults to the
/// type's name and can be overridden with `name`. Generic types must set
/// `name`, since all their instantiations share one identifier.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug, medius::Request)]
/// #[request(response = String)]
/// pub struct GetUserQuery {
///     pub id: u64,
/// }
///
/// #[derive(Debug, medius::Request)]
/// #[request(response = (), name = "users.delete")]
/// pub struct DeleteUserCommand {
///     pub id: u64,
/// }
/// ```
#[proc_macro_derive(Request, attributes(request))]
pub fn derive_request(input: TokenStream) -> TokenStream {
    request::derive_request_impl(input)
}

/// Declare the request type a handler is bound to.
///
/// The handler is added to the link-time registration table and picked up by
/// `Mediator::discover_registered`. Requires the `inventory` feature.
///
/// On a struct, the struct must implement `RequestHandler<R>` and `Default`:
///
/// ```rust,ignore
/// #[medius::handler(GetUserQuery)]
/// #[derive(Default)]
/// pub struct GetUserHandler;
///
/// impl RequestHandler<GetUserQuery> for GetUserHandler {
///     async fn handle(&self, query: GetUserQuery) -> Result<String, BoxError> {
///         Ok(format!("Fetching user with id: {}", query.id))
///     }
/// }
/// ```
///
/// On an async function taking the request, a unit struct with the function's
/// name is generated as the handler:
///
/// ```rust,ignore
/// #[medius::handler]
/// async fn get_user(query: GetUserQuery) -> Result<String, BoxError> {
///     Ok(format!("Fetching user with id: {}", query.id))
/// }
/// ```
///
/// Pass `name = "..."` to override the handler name recorded in discovery
/// reports.
#[proc_macro_attribute]
pub fn handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    handler::handler_impl(attr, item)
}
