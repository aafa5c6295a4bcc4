//! Streaming request marshalling for generated service clients
//!
//! This crate sits between a protocol encoder and the HTTP transport. The protocol encoder
//! turns an operation input into a request head (method, uri, headers); this crate
//! attaches a streaming body to it and decides which framing headers the request carries.
//!
//! # Features
//!
//! - One decorator for synchronous and asynchronous request bodies
//! - `Content-Type` default-fill that never overrides the protocol encoder
//! - A pure header policy for `Content-Length` and `Transfer-Encoding`
//! - Chunked unsigned payloads and HTTP/2 transports
//! - Fail-fast builder validation
//!
//! # Example
//!
//! ```
//! use http::{header, Request};
//! use micro_marshal::marshal::{marshaller_fn, Marshaller, StreamingRequestMarshaller};
//! use micro_marshal::protocol::body::RequestBody;
//! use micro_marshal::protocol::MarshalError;
//!
//! struct PutObject {
//!     key: String,
//! }
//!
//! let encoder = marshaller_fn(|input: &PutObject| {
//!     Request::put(format!("/bucket/{}", input.key)).body(()).map_err(MarshalError::delegate)
//! });
//!
//! let marshaller = StreamingRequestMarshaller::builder()
//!     .delegate_marshaller(encoder)
//!     .request_body(RequestBody::from_string("Hello World!"))
//!     .requires_length(true)
//!     .build()?;
//!
//! let request = marshaller.marshal(&PutObject { key: "hello.txt".to_string() })?;
//! assert_eq!(request.headers()[header::CONTENT_LENGTH], "12");
//! assert_eq!(request.headers()[header::CONTENT_TYPE], "text/plain; charset=utf-8");
//! # Ok::<(), MarshalError>(())
//! ```
//!
//! # Architecture
//!
//! - [`marshal`]: the [`marshal::Marshaller`] trait and the streaming decorator
//! - [`transfer`]: transfer flags and the header policy
//! - [`protocol`]: request types, body sources and errors
//!
//! # Transfer headers
//!
//! The header policy is evaluated once per request, after the body is attached and the
//! content type is filled in:
//!
//! | chunked unsigned | HTTP/2 | length known | length required | result                          |
//! |------------------|--------|--------------|-----------------|---------------------------------|
//! | yes              | any    | any          | any             | `Transfer-Encoding: chunked`    |
//! | no               | yes    | any          | any             | neither header                  |
//! | no               | no     | yes          | any             | `Content-Length`                |
//! | no               | no     | no           | yes             | [`protocol::MarshalError::LengthRequired`] |
//! | no               | no     | no           | no              | neither header, transport decides |
//!
//! # Error Handling
//!
//! Every failure is a [`protocol::MarshalError`] and aborts request construction before
//! any I/O happens.

pub mod marshal;
pub mod protocol;
pub mod transfer;

mod utils;
pub(crate) use utils::ensure;
