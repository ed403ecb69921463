//! Type-erased carriers for requests and responses.
//!
//! Pipeline stages are shared by every request type, so they see requests and
//! responses through [`Envelope`] and [`Reply`]. Both can be downcast back to
//! the concrete type when a stage needs to inspect or rewrite the value.

use crate::request::Request;
use std::{
    any::{Any, type_name},
    fmt,
};

trait Payload: Any + fmt::Debug + Send {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
    fn type_name(&self) -> &'static str;
}

impl<T: Any + fmt::Debug + Send> Payload for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

// The blanket impl also covers `Box<dyn Payload>`, so every accessor below
// dereferences the box explicitly to reach the inner value.
fn take<T: Any>(body: Box<dyn Payload>) -> T {
    match Payload::into_any(body).downcast::<T>() {
        Ok(value) => *value,
        Err(_) => unreachable!("payload type is checked before taking it"),
    }
}

/// A request in flight through the pipeline.
pub struct Envelope {
    name: &'static str,
    body: Box<dyn Payload>,
}

impl Envelope {
    /// Wrap a typed request.
    pub fn new<R: Request>(request: R) -> Self {
        Self {
            name: R::NAME,
            body: Box::new(request),
        }
    }

    /// The request's binding identifier ([`Request::NAME`]).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The Rust type name of the carried request.
    pub fn type_name(&self) -> &'static str {
        (*self.body).type_name()
    }

    /// Returns `true` if the envelope carries a `T`.
    pub fn is<T: Any>(&self) -> bool {
        (*self.body).as_any().is::<T>()
    }

    /// Borrow the request as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.body).as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the request as `T`, e.g. to rewrite it before `next`.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        (*self.body).as_any_mut().downcast_mut::<T>()
    }

    /// Take the request out as `T`, handing the envelope back on mismatch.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        if self.is::<T>() {
            Ok(take(self.body))
        } else {
            Err(self)
        }
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("name", &self.name)
            .field("body", &self.body)
            .finish()
    }
}

/// A response travelling back out through the pipeline.
pub struct Reply {
    body: Box<dyn Payload>,
}

impl Reply {
    /// Wrap a response value.
    pub fn new<T: Any + fmt::Debug + Send>(value: T) -> Self {
        Self {
            body: Box::new(value),
        }
    }

    /// The Rust type name of the carried response.
    pub fn type_name(&self) -> &'static str {
        (*self.body).type_name()
    }

    /// Returns `true` if the reply carries a `T`.
    pub fn is<T: Any>(&self) -> bool {
        (*self.body).as_any().is::<T>()
    }

    /// Borrow the response as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.body).as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the response as `T`.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        (*self.body).as_any_mut().downcast_mut::<T>()
    }

    /// Take the response out as `T`, handing the reply back on mismatch.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        if self.is::<T>() {
            Ok(take(self.body))
        } else {
            Err(self)
        }
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reply").field(&self.body).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Ping {
        seq: u32,
    }

    impl Request for Ping {
        type Response = u32;
        const NAME: &'static str = "Ping";
    }

    #[test]
    fn test_envelope_keeps_name_and_type() {
        let envelope = Envelope::new(Ping { seq: 7 });
        assert_eq!(envelope.name(), "Ping");
        assert!(envelope.type_name().ends_with("Ping"));
        assert!(envelope.is::<Ping>());
        assert!(!envelope.is::<String>());
    }

    #[test]
    fn test_envelope_downcast_mut_rewrites_request() {
        let mut envelope = Envelope::new(Ping { seq: 1 });
        envelope.downcast_mut::<Ping>().unwrap().seq = 2;
        assert_eq!(envelope.downcast::<Ping>().unwrap(), Ping { seq: 2 });
    }

    #[test]
    fn test_envelope_downcast_mismatch_returns_envelope() {
        let envelope = Envelope::new(Ping { seq: 3 });
        let envelope = envelope.downcast::<String>().unwrap_err();
        assert_eq!(envelope.downcast_ref::<Ping>(), Some(&Ping { seq: 3 }));
    }

    #[test]
    fn test_reply_downcast() {
        let reply = Reply::new(String::from("done"));
        assert_eq!(reply.downcast_ref::<String>().map(String::as_str), Some("done"));
        let reply = reply.downcast::<u32>().unwrap_err();
        assert_eq!(reply.downcast::<String>().unwrap(), "done");
    }

    #[test]
    fn test_debug_shows_payload() {
        let envelope = Envelope::new(Ping { seq: 9 });
        let rendered = format!("{envelope:?}");
        assert!(rendered.contains("Ping"));
        assert!(rendered.contains("seq: 9"));
    }
}
