//! Request trait for dispatchable types.

use std::fmt::Debug;

/// A typed request that can be dispatched through a mediator.
///
/// Every request carries a stable identifier in [`Request::NAME`]. The
/// identifier is the key used by the binding registry, so it must be unique
/// among the request types registered on one mediator. Deriving the trait with
/// `#[derive(Request)]` uses the type's identifier as the name.
///
/// # Example
///
/// ```rust
/// use medius_core::Request;
///
/// #[derive(Debug)]
/// struct GetUserQuery {
///     id: u64,
/// }
///
/// impl Request for GetUserQuery {
///     type Response = String;
///     const NAME: &'static str = "GetUserQuery";
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a dispatchable Request",
    label = "missing `Request` implementation",
    note = "Implement `Request` (or `#[derive(Request)]`) and name its `Response` type."
)]
pub trait Request: Debug + Send + 'static {
    /// The response produced by the handler bound to this request.
    type Response: Debug + Send + 'static;

    /// Stable identifier used as the binding key.
    const NAME: &'static str;
}
