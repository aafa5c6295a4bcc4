//! Marshallers turn a typed operation input into an HTTP request.
//!
//! Protocol encoders implement [`Marshaller`] with `Body = ()` and fill in method, uri and
//! headers. [`StreamingRequestMarshaller`] decorates such an encoder and attaches a
//! streaming body, producing a request with a [`RequestPayload`](crate::protocol::body::RequestPayload).

mod streaming;

pub use streaming::StreamingMarshallerBuilder;
pub use streaming::StreamingRequestMarshaller;

use http::Request;

use crate::protocol::{MarshalError, RequestHead};

/// Converts an operation input into a request.
pub trait Marshaller<T: ?Sized> {
    type Body;

    fn marshal(&self, input: &T) -> Result<Request<Self::Body>, MarshalError>;
}

impl<T: ?Sized, M: Marshaller<T> + ?Sized> Marshaller<T> for &M {
    type Body = M::Body;

    #[inline]
    fn marshal(&self, input: &T) -> Result<Request<Self::Body>, MarshalError> {
        (**self).marshal(input)
    }
}

/// A [`Marshaller`] backed by a plain function.
#[derive(Debug, Clone, Copy)]
pub struct FnMarshaller<F> {
    f: F,
}

impl<T, F> Marshaller<T> for FnMarshaller<F>
where
    T: ?Sized,
    F: Fn(&T) -> Result<RequestHead, MarshalError>,
{
    type Body = ();

    #[inline]
    fn marshal(&self, input: &T) -> Result<RequestHead, MarshalError> {
        (self.f)(input)
    }
}

/// Wraps a function as a bodiless [`Marshaller`].
pub fn marshaller_fn<T, F>(f: F) -> FnMarshaller<F>
where
    T: ?Sized,
    F: Fn(&T) -> Result<RequestHead, MarshalError>,
{
    FnMarshaller { f }
}
