/// The transfer flags of one streaming operation.
///
/// The flags are independent: every combination is accepted and resolved by
/// [`decide`](crate::transfer::decide), even those that make little sense in practice
/// such as chunked encoding over HTTP/2.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct TransferConfiguration {
    requires_length: bool,
    chunked_unsigned_encoding: bool,
    use_http2: bool,
}

impl TransferConfiguration {
    pub const fn new(requires_length: bool, chunked_unsigned_encoding: bool, use_http2: bool) -> Self {
        Self { requires_length, chunked_unsigned_encoding, use_http2 }
    }

    /// Derives the flags from the operation model.
    pub fn for_operation(traits: &OperationTraits) -> Self {
        Self {
            requires_length: traits.requires_length_in_input,
            chunked_unsigned_encoding: traits.auth_type.is_unsigned_body(),
            use_http2: traits.supports_h2,
        }
    }

    #[must_use]
    pub const fn with_requires_length(mut self, requires_length: bool) -> Self {
        self.requires_length = requires_length;
        self
    }

    #[must_use]
    pub const fn with_chunked_unsigned_encoding(mut self, chunked_unsigned_encoding: bool) -> Self {
        self.chunked_unsigned_encoding = chunked_unsigned_encoding;
        self
    }

    #[must_use]
    pub const fn with_http2(mut self, use_http2: bool) -> Self {
        self.use_http2 = use_http2;
        self
    }

    /// The operation needs a `Content-Length` header.
    #[inline]
    pub const fn requires_length(&self) -> bool {
        self.requires_length
    }

    /// The payload is signed chunk by chunk and sent with `Transfer-Encoding: chunked`.
    #[inline]
    pub const fn chunked_unsigned_encoding(&self) -> bool {
        self.chunked_unsigned_encoding
    }

    /// The transport frames the body itself.
    #[inline]
    pub const fn use_http2(&self) -> bool {
        self.use_http2
    }
}

/// How an operation's requests are signed.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum AuthType {
    /// No signing.
    None,
    /// Signature over headers and the full payload hash.
    #[default]
    V4,
    /// Signature over headers only, the payload is streamed unsigned in chunks.
    V4UnsignedBody,
    /// Bearer token.
    Bearer,
}

impl AuthType {
    #[inline]
    pub fn is_unsigned_body(&self) -> bool {
        matches!(self, AuthType::V4UnsignedBody)
    }
}

/// The subset of an operation's model that drives its transfer strategy.
///
/// This is resolved once per operation, not per call.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct OperationTraits {
    /// The input shape carries a streaming member that needs a known length.
    pub requires_length_in_input: bool,
    pub auth_type: AuthType,
    /// The service metadata declares HTTP/2 support.
    pub supports_h2: bool,
}
