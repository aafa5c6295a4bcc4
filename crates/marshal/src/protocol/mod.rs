//! Request and body types shared by every marshaller.
//!
//! - **Requests** ([`request`]): [`RequestHead`] produced by protocol encoders and the
//!   [`MarshalledRequest`] handed to the transport
//! - **Bodies** ([`body`]): the [`body::BodySource`] capability with its synchronous and
//!   asynchronous implementations, and the [`body::RequestPayload`] attached to requests
//! - **Errors** ([`error`]): [`MarshalError`]

mod request;
pub use request::MarshalledRequest;
pub use request::RequestHead;
pub use request::first_content_type;

mod error;
pub use error::MarshalError;

pub mod body;
