//! Request body sources and the payload attached to a marshalled request.
//!
//! A body source describes where the request bytes come from and what the caller knows
//! about them ahead of time:
//!
//! - [`RequestBody`]: a synchronous [`ContentStreamProvider`] with a length that is always known
//! - [`AsyncRequestBody`]: an asynchronous [`ContentPublisher`] with an optional length hint
//!
//! Both implement [`BodySource`], which is the only capability the streaming marshaller
//! needs. The marshaller never reads from the source, it only records a [`RequestPayload`]
//! on the request so the transport can open the stream later.

mod async_request_body;
mod payload;
mod request_body;

pub use async_request_body::AsyncRequestBody;
pub use async_request_body::ByteStream;
pub use async_request_body::ContentPublisher;
pub use payload::RequestPayload;
pub use request_body::ContentStreamProvider;
pub use request_body::RequestBody;

use mime::Mime;

/// Size of the chunks read from synchronous providers and files.
pub(crate) const CHUNK_SIZE: usize = 8 * 1024;

/// The capability shared by synchronous and asynchronous request bodies.
pub trait BodySource {
    /// The content type used when the base encoder did not set one.
    fn content_type(&self) -> &Mime;

    /// The body length, if it is known before the body is streamed.
    fn content_length(&self) -> Option<u64>;

    /// The payload to attach to the outgoing request.
    fn payload(&self) -> RequestPayload;
}
