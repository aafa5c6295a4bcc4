use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use mime::Mime;
use tracing::trace;

use crate::protocol::MarshalError;
use crate::protocol::body::{BodySource, RequestPayload};

/// Opens a fresh blocking reader over the request content.
///
/// A provider may be asked for a stream more than once (for example when the transport
/// resends a request), so every call must start from the beginning of the content.
pub trait ContentStreamProvider: Send + Sync {
    fn new_stream(&self) -> io::Result<Box<dyn Read + Send>>;
}

impl<F, R> ContentStreamProvider for F
where
    F: Fn() -> io::Result<R> + Send + Sync,
    R: Read + Send + 'static,
{
    fn new_stream(&self) -> io::Result<Box<dyn Read + Send>> {
        let reader = self()?;
        Ok(Box::new(reader))
    }
}

/// A synchronous request body whose length is known up front.
#[derive(Clone)]
pub struct RequestBody {
    provider: Arc<dyn ContentStreamProvider>,
    content_length: u64,
    content_type: Mime,
}

impl RequestBody {
    /// A body with no content.
    pub fn empty() -> Self {
        Self::from_bytes(Bytes::new())
    }

    /// A body backed by in-memory bytes, typed as `application/octet-stream`.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let content_length = bytes.len() as u64;
        Self::from_content_provider(BytesProvider(bytes), content_length, mime::APPLICATION_OCTET_STREAM)
    }

    /// A body backed by a UTF-8 string, typed as `text/plain; charset=utf-8`.
    pub fn from_string(string: impl Into<String>) -> Self {
        let string: String = string.into();
        Self::from_bytes(string).with_content_type(mime::TEXT_PLAIN_UTF_8)
    }

    /// A body backed by a file; the length is taken from the file metadata.
    ///
    /// The file is opened again every time a stream is requested.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MarshalError> {
        let path = path.as_ref().to_path_buf();
        let content_length = path.metadata()?.len();
        trace!(path = %path.display(), content_length, "create request body from file");
        Ok(Self::from_content_provider(FileProvider(path), content_length, mime::APPLICATION_OCTET_STREAM))
    }

    /// A body backed by an arbitrary provider.
    ///
    /// `content_length` must match the number of bytes each stream yields.
    pub fn from_content_provider<P>(provider: P, content_length: u64, content_type: Mime) -> Self
    where
        P: ContentStreamProvider + 'static,
    {
        Self { provider: Arc::new(provider), content_length, content_type }
    }

    /// Replaces the declared content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: Mime) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn content_type(&self) -> &Mime {
        &self.content_type
    }

    /// Opens a new stream over the body content.
    pub fn new_stream(&self) -> io::Result<Box<dyn Read + Send>> {
        self.provider.new_stream()
    }
}

impl BodySource for RequestBody {
    fn content_type(&self) -> &Mime {
        &self.content_type
    }

    #[inline]
    fn content_length(&self) -> Option<u64> {
        Some(self.content_length)
    }

    fn payload(&self) -> RequestPayload {
        RequestPayload::stream(Arc::clone(&self.provider))
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBody")
            .field("content_length", &self.content_length)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<String> for RequestBody {
    fn from(value: String) -> Self {
        Self::from_string(value)
    }
}

impl From<&'static str> for RequestBody {
    fn from(value: &'static str) -> Self {
        Self::from_string(value)
    }
}

struct BytesProvider(Bytes);

impl ContentStreamProvider for BytesProvider {
    fn new_stream(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(self.0.clone())))
    }
}

struct FileProvider(PathBuf);

impl ContentStreamProvider for FileProvider {
    fn new_stream(&self) -> io::Result<Box<dyn Read + Send>> {
        let file = File::open(&self.0)?;
        Ok(Box::new(file))
    }
}
