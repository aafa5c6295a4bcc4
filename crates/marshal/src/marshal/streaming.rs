//! Streaming request marshaller.
//!
//! [`StreamingRequestMarshaller`] decorates a bodiless protocol marshaller. Each call:
//!
//! 1. runs the delegate to obtain the request head
//! 2. attaches the body source as the request payload
//! 3. fills in `Content-Type` from the body source if the delegate left it unset or empty
//! 4. decides and applies the `Content-Length` / `Transfer-Encoding` headers
//!
//! The same decorator serves synchronous ([`RequestBody`]) and asynchronous
//! ([`AsyncRequestBody`]) bodies, so both go through one header policy.

use http::{HeaderValue, header};
use tracing::debug;

use crate::marshal::Marshaller;
use crate::protocol::body::{AsyncRequestBody, BodySource, RequestBody, RequestPayload};
use crate::protocol::{MarshalError, MarshalledRequest, first_content_type};
use crate::transfer::{TransferConfiguration, decide_for};

/// Decorates a protocol marshaller so the produced request carries a streaming body.
///
/// The decorator only holds read-only state and may be shared between threads when its
/// delegate and body source allow it.
#[derive(Debug, Clone)]
pub struct StreamingRequestMarshaller<M, B> {
    delegate: M,
    body: B,
    config: TransferConfiguration,
}

impl<M, B> StreamingRequestMarshaller<M, B> {
    /// Creates a marshaller with every transfer flag disabled.
    pub fn new(delegate: M, body: B) -> Self {
        Self { delegate, body, config: TransferConfiguration::default() }
    }

    pub fn transfer_configuration(&self) -> &TransferConfiguration {
        &self.config
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn delegate(&self) -> &M {
        &self.delegate
    }
}

impl<M> StreamingRequestMarshaller<M, RequestBody> {
    /// Starts building a marshaller for a synchronous body.
    pub fn builder() -> StreamingMarshallerBuilder<M, RequestBody> {
        StreamingMarshallerBuilder::new("request_body")
    }
}

impl<M> StreamingRequestMarshaller<M, AsyncRequestBody> {
    /// Starts building a marshaller for an asynchronous body.
    pub fn async_builder() -> StreamingMarshallerBuilder<M, AsyncRequestBody> {
        StreamingMarshallerBuilder::new("async_request_body")
    }
}

impl<T, M, B> Marshaller<T> for StreamingRequestMarshaller<M, B>
where
    T: ?Sized,
    M: Marshaller<T, Body = ()>,
    B: BodySource,
{
    type Body = RequestPayload;

    fn marshal(&self, input: &T) -> Result<MarshalledRequest, MarshalError> {
        let head = self.delegate.marshal(input)?;
        let mut request = head.map(|()| self.body.payload());

        if first_content_type(request.headers()).is_none() {
            let content_type =
                HeaderValue::from_str(self.body.content_type().as_ref()).map_err(MarshalError::invalid_header)?;
            request.headers_mut().insert(header::CONTENT_TYPE, content_type);
        }

        let mutation = decide_for(self.body.content_length(), &self.config)?;
        mutation.apply(request.headers_mut());

        debug!(
            method = %request.method(),
            uri = %request.uri(),
            content_length = ?self.body.content_length(),
            mutation = ?mutation,
            "marshalled streaming request"
        );
        Ok(request)
    }
}

/// Builder for [`StreamingRequestMarshaller`].
///
/// The delegate marshaller and the body are mandatory, [`build`](Self::build) fails if
/// either is missing. Transfer flags default to `false`.
#[derive(Debug)]
pub struct StreamingMarshallerBuilder<M, B> {
    delegate: Option<M>,
    body: Option<B>,
    body_field: &'static str,
    config: TransferConfiguration,
}

impl<M, B> StreamingMarshallerBuilder<M, B> {
    fn new(body_field: &'static str) -> Self {
        Self { delegate: None, body: None, body_field, config: TransferConfiguration::default() }
    }

    /// The protocol marshaller filling in method, uri and headers.
    pub fn delegate_marshaller(mut self, delegate: M) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Whether the operation needs a `Content-Length` header.
    pub fn requires_length(mut self, requires_length: bool) -> Self {
        self.config = self.config.with_requires_length(requires_length);
        self
    }

    /// Whether the body is sent unsigned with `Transfer-Encoding: chunked`.
    pub fn transfer_encoding(mut self, transfer_encoding: bool) -> Self {
        self.config = self.config.with_chunked_unsigned_encoding(transfer_encoding);
        self
    }

    /// Whether the request goes over HTTP/2.
    pub fn use_http2(mut self, use_http2: bool) -> Self {
        self.config = self.config.with_http2(use_http2);
        self
    }

    /// Replaces all transfer flags at once.
    pub fn transfer_configuration(mut self, config: TransferConfiguration) -> Self {
        self.config = config;
        self
    }

    /// # Errors
    ///
    /// Returns [`MarshalError::MissingField`] if the delegate marshaller or the body was not set.
    pub fn build(self) -> Result<StreamingRequestMarshaller<M, B>, MarshalError> {
        let delegate = self.delegate.ok_or(MarshalError::missing_field("delegate_marshaller"))?;
        let body = self.body.ok_or(MarshalError::missing_field(self.body_field))?;
        Ok(StreamingRequestMarshaller { delegate, body, config: self.config })
    }
}

impl<M> StreamingMarshallerBuilder<M, RequestBody> {
    pub fn request_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }
}

impl<M> StreamingMarshallerBuilder<M, AsyncRequestBody> {
    pub fn async_request_body(mut self, body: AsyncRequestBody) -> Self {
        self.body = Some(body);
        self
    }
}
