use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt, TryStreamExt};
use mime::Mime;
use tokio_util::io::ReaderStream;
use tracing::trace;

use crate::protocol::MarshalError;
use crate::protocol::body::{BodySource, CHUNK_SIZE, RequestPayload};

/// A boxed stream of body chunks.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

/// Publishes the request content as an asynchronous stream of chunks.
///
/// Like a reactive publisher, every call to [`publish`](ContentPublisher::publish) starts
/// a new subscription from the beginning of the content. Nothing is read until the
/// returned stream is polled.
pub trait ContentPublisher: Send + Sync {
    fn publish(&self) -> ByteStream;
}

impl<F, S> ContentPublisher for F
where
    F: Fn() -> S + Send + Sync,
    S: Stream<Item = io::Result<Bytes>> + Send + 'static,
{
    fn publish(&self) -> ByteStream {
        self().boxed()
    }
}

/// An asynchronous request body with an optional length hint.
///
/// The hint is supplied by whoever builds the body, it is never derived by draining the
/// publisher.
#[derive(Clone)]
pub struct AsyncRequestBody {
    publisher: Arc<dyn ContentPublisher>,
    content_length: Option<u64>,
    content_type: Mime,
}

impl AsyncRequestBody {
    /// A body with no content.
    pub fn empty() -> Self {
        Self::from_bytes(Bytes::new())
    }

    /// A body backed by in-memory bytes, typed as `application/octet-stream`.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let content_length = bytes.len() as u64;
        Self::from_publisher(BytesPublisher(bytes), Some(content_length), mime::APPLICATION_OCTET_STREAM)
    }

    /// A body backed by a UTF-8 string, typed as `text/plain; charset=utf-8`.
    pub fn from_string(string: impl Into<String>) -> Self {
        let string: String = string.into();
        Self::from_bytes(string).with_content_type(mime::TEXT_PLAIN_UTF_8)
    }

    /// A body streamed from a file; the length is taken from the file metadata.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, MarshalError> {
        let path = path.as_ref().to_path_buf();
        let content_length = tokio::fs::metadata(&path).await?.len();
        trace!(path = %path.display(), content_length, "create async request body from file");
        Ok(Self::from_publisher(FilePublisher(path), Some(content_length), mime::APPLICATION_OCTET_STREAM))
    }

    /// A body backed by an arbitrary publisher.
    ///
    /// Pass `None` as `content_length` when the length is only known once the publisher has
    /// been drained.
    pub fn from_publisher<P>(publisher: P, content_length: Option<u64>, content_type: Mime) -> Self
    where
        P: ContentPublisher + 'static,
    {
        Self { publisher: Arc::new(publisher), content_length, content_type }
    }

    /// Replaces the length hint.
    #[must_use]
    pub fn with_content_length(mut self, content_length: Option<u64>) -> Self {
        self.content_length = content_length;
        self
    }

    /// Replaces the declared content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: Mime) -> Self {
        self.content_type = content_type;
        self
    }

    /// Starts a new subscription to the body content.
    pub fn publish(&self) -> ByteStream {
        self.publisher.publish()
    }
}

impl BodySource for AsyncRequestBody {
    fn content_type(&self) -> &Mime {
        &self.content_type
    }

    #[inline]
    fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    fn payload(&self) -> RequestPayload {
        RequestPayload::publisher(Arc::clone(&self.publisher))
    }
}

impl fmt::Debug for AsyncRequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncRequestBody")
            .field("content_length", &self.content_length)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

impl From<Bytes> for AsyncRequestBody {
    fn from(bytes: Bytes) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<String> for AsyncRequestBody {
    fn from(value: String) -> Self {
        Self::from_string(value)
    }
}

impl From<&'static str> for AsyncRequestBody {
    fn from(value: &'static str) -> Self {
        Self::from_string(value)
    }
}

struct BytesPublisher(Bytes);

impl ContentPublisher for BytesPublisher {
    fn publish(&self) -> ByteStream {
        if self.0.is_empty() {
            return stream::empty().boxed();
        }
        stream::once(futures::future::ready(Ok(self.0.clone()))).boxed()
    }
}

struct FilePublisher(PathBuf);

impl ContentPublisher for FilePublisher {
    fn publish(&self) -> ByteStream {
        let path = self.0.clone();
        stream::once(async move { tokio::fs::File::open(path).await })
            .map_ok(|file| ReaderStream::with_capacity(file, CHUNK_SIZE))
            .try_flatten()
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(body: &AsyncRequestBody) -> Vec<u8> {
        let chunks: Vec<Bytes> = body.publish().try_collect().await.unwrap();
        chunks.concat()
    }

    #[test]
    fn is_send_and_sync() {
        fn check<T: Send + Sync>() {}
        check::<AsyncRequestBody>();
    }

    #[tokio::test]
    async fn string_body() {
        let body = AsyncRequestBody::from_string("Hello world");

        assert_eq!(body.content_length(), Some(11));
        assert_eq!(body.content_type(), &mime::TEXT_PLAIN_UTF_8);
        assert_eq!(collect(&body).await, b"Hello world");
        // a second subscription starts over
        assert_eq!(collect(&body).await, b"Hello world");
    }

    #[tokio::test]
    async fn empty_body_publishes_nothing() {
        let body = AsyncRequestBody::empty();

        assert_eq!(body.content_length(), Some(0));
        assert!(body.publish().next().await.is_none());
    }

    #[tokio::test]
    async fn publisher_without_length() {
        let body = AsyncRequestBody::from_publisher(
            || stream::iter(vec![Ok::<_, io::Error>(Bytes::from_static(b"a")), Ok(Bytes::from_static(b"bc"))]),
            None,
            mime::APPLICATION_OCTET_STREAM,
        );

        assert_eq!(body.content_length(), None);
        assert_eq!(collect(&body).await, b"abc");
    }

    #[tokio::test]
    async fn length_hint_can_be_replaced() {
        let body = AsyncRequestBody::from_bytes(vec![0u8; 4]).with_content_length(None);
        assert_eq!(body.content_length(), None);

        let body = body.with_content_length(Some(4));
        assert_eq!(body.content_length(), Some(4));
    }

    #[tokio::test]
    async fn file_body() {
        let path = std::env::temp_dir().join(format!("micro-marshal-async-{}.bin", std::process::id()));
        tokio::fs::write(&path, vec![7u8; CHUNK_SIZE + 10]).await.unwrap();

        let body = AsyncRequestBody::from_file(&path).await.unwrap();
        assert_eq!(body.content_length(), Some((CHUNK_SIZE + 10) as u64));

        let content = collect(&body).await;
        assert_eq!(content.len(), CHUNK_SIZE + 10);
        assert!(content.iter().all(|b| *b == 7));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file() {
        let path = std::env::temp_dir().join("micro-marshal-missing-async-file.bin");
        let error = AsyncRequestBody::from_file(path).await.unwrap_err();
        assert!(matches!(error, MarshalError::Io { .. }));
    }
}
