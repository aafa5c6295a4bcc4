//! Transfer header policy for streaming request bodies.
//!
//! [`decide`] turns what is known about a body into a [`HeaderMutation`] describing the
//! `Content-Length` and `Transfer-Encoding` headers the request must carry. Deciding and
//! applying are separate steps: the decision is a plain value, and
//! [`HeaderMutation::apply`] is the only place a header map is touched.
//!
//! Rules are evaluated in order, the first match wins:
//!
//! 1. chunked unsigned encoding: `Transfer-Encoding: chunked`, no `Content-Length`
//! 2. HTTP/2: neither header, the transport frames the body
//! 3. known length: `Content-Length`, no `Transfer-Encoding`
//! 4. length required but unknown: [`MarshalError::LengthRequired`]
//! 5. otherwise both headers are left to the transport

use http::{HeaderMap, HeaderName, HeaderValue, header};
use tracing::trace;

use crate::ensure;
use crate::protocol::MarshalError;
use crate::transfer::TransferConfiguration;

const CHUNKED: HeaderValue = HeaderValue::from_static("chunked");

/// The framing headers chosen for a request body.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HeaderMutation {
    /// `Transfer-Encoding: chunked` replaces any existing value, `Content-Length` is removed.
    Chunked,
    /// Both `Content-Length` and `Transfer-Encoding` are removed.
    Omitted,
    /// `Content-Length` is set to the length, `Transfer-Encoding` is removed.
    Length(u64),
    /// Neither header is touched.
    Deferred,
}

/// A single header edit described by a [`HeaderMutation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderEdit {
    /// Leave whatever the protocol encoder set.
    Keep,
    /// Remove every value of the header.
    Remove,
    /// Replace every value of the header with this one.
    Replace(HeaderValue),
}

impl HeaderMutation {
    /// The edit applied to `Content-Length`.
    pub fn content_length(&self) -> HeaderEdit {
        match self {
            HeaderMutation::Length(n) => HeaderEdit::Replace(HeaderValue::from(*n)),
            HeaderMutation::Chunked | HeaderMutation::Omitted => HeaderEdit::Remove,
            HeaderMutation::Deferred => HeaderEdit::Keep,
        }
    }

    /// The edit applied to `Transfer-Encoding`.
    pub fn transfer_encoding(&self) -> HeaderEdit {
        match self {
            HeaderMutation::Chunked => HeaderEdit::Replace(CHUNKED),
            HeaderMutation::Length(_) | HeaderMutation::Omitted => HeaderEdit::Remove,
            HeaderMutation::Deferred => HeaderEdit::Keep,
        }
    }

    #[inline]
    pub fn is_chunked(&self) -> bool {
        matches!(self, HeaderMutation::Chunked)
    }

    /// Applies the edits to `headers`. Headers other than the two framing headers are left
    /// untouched.
    pub fn apply(&self, headers: &mut HeaderMap) {
        apply_edit(headers, header::CONTENT_LENGTH, self.content_length());
        apply_edit(headers, header::TRANSFER_ENCODING, self.transfer_encoding());
    }
}

fn apply_edit(headers: &mut HeaderMap, name: HeaderName, edit: HeaderEdit) {
    match edit {
        HeaderEdit::Keep => {}
        HeaderEdit::Remove => {
            headers.remove(name);
        }
        HeaderEdit::Replace(value) => {
            headers.insert(name, value);
        }
    }
}

/// Decides the framing headers for a body.
///
/// # Errors
///
/// Returns [`MarshalError::LengthRequired`] when `requires_length` is set, the length is
/// unknown, and neither chunked encoding nor HTTP/2 can carry the body without one.
#[allow(clippy::fn_params_excessive_bools, reason = "the flags mirror the operation model one to one")]
pub fn decide(
    known_length: Option<u64>,
    requires_length: bool,
    chunked_unsigned_encoding: bool,
    use_http2: bool,
) -> Result<HeaderMutation, MarshalError> {
    let mutation = if chunked_unsigned_encoding {
        HeaderMutation::Chunked
    } else if use_http2 {
        HeaderMutation::Omitted
    } else if let Some(length) = known_length {
        HeaderMutation::Length(length)
    } else {
        ensure!(!requires_length, MarshalError::LengthRequired);
        HeaderMutation::Deferred
    };

    trace!(
        ?known_length,
        requires_length,
        chunked_unsigned_encoding,
        use_http2,
        mutation = ?mutation,
        "decided transfer headers"
    );
    Ok(mutation)
}

/// Same as [`decide`], taking the flags from a [`TransferConfiguration`].
#[inline]
pub fn decide_for(known_length: Option<u64>, config: &TransferConfiguration) -> Result<HeaderMutation, MarshalError> {
    decide(known_length, config.requires_length(), config.chunked_unsigned_encoding(), config.use_http2())
}
