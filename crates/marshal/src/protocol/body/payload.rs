use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use futures::stream::{self, StreamExt, TryStreamExt};
use http_body::Frame;
use http_body_util::StreamBody;
use http_body_util::combinators::UnsyncBoxBody;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::protocol::body::{ByteStream, CHUNK_SIZE, ContentPublisher, ContentStreamProvider};

/// Chunks a blocking reader may read ahead of the consumer.
const READ_AHEAD: usize = 2;

/// The body attached to a marshalled request.
///
/// A payload only holds a shared handle to its source, so cloning it is cheap and nothing
/// is read until the transport opens the content.
#[derive(Clone, Default)]
pub struct RequestPayload {
    kind: Kind,
}

#[derive(Clone, Default)]
enum Kind {
    #[default]
    Empty,
    Stream(Arc<dyn ContentStreamProvider>),
    Publisher(Arc<dyn ContentPublisher>),
}

impl RequestPayload {
    pub fn empty() -> Self {
        Self { kind: Kind::Empty }
    }

    pub fn stream(provider: Arc<dyn ContentStreamProvider>) -> Self {
        Self { kind: Kind::Stream(provider) }
    }

    pub fn publisher(publisher: Arc<dyn ContentPublisher>) -> Self {
        Self { kind: Kind::Publisher(publisher) }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, Kind::Empty)
    }

    #[inline]
    pub fn is_stream(&self) -> bool {
        matches!(self.kind, Kind::Stream(_))
    }

    #[inline]
    pub fn is_publisher(&self) -> bool {
        matches!(self.kind, Kind::Publisher(_))
    }

    /// Opens a blocking reader if the payload comes from a synchronous provider.
    ///
    /// Returns `None` for empty and asynchronous payloads.
    pub fn content_stream(&self) -> Option<io::Result<Box<dyn Read + Send>>> {
        match &self.kind {
            Kind::Stream(provider) => Some(provider.new_stream()),
            Kind::Empty | Kind::Publisher(_) => None,
        }
    }

    /// Subscribes to the content if the payload comes from an asynchronous publisher.
    ///
    /// Returns `None` for empty and synchronous payloads.
    pub fn publish(&self) -> Option<ByteStream> {
        match &self.kind {
            Kind::Publisher(publisher) => Some(publisher.publish()),
            Kind::Empty | Kind::Stream(_) => None,
        }
    }

    /// Converts the payload into an `http_body::Body` for transports built on `http-body`.
    ///
    /// Synchronous providers are opened and read on tokio's blocking thread pool once the
    /// body is first polled, so the body must be polled inside a tokio runtime.
    pub fn into_http_body(self) -> UnsyncBoxBody<Bytes, io::Error> {
        let stream: ByteStream = match self.kind {
            Kind::Empty => stream::empty().boxed(),
            Kind::Publisher(publisher) => publisher.publish(),
            Kind::Stream(provider) => read_blocking(provider),
        };
        UnsyncBoxBody::new(StreamBody::new(stream.map_ok(Frame::data)))
    }
}

fn read_blocking(provider: Arc<dyn ContentStreamProvider>) -> ByteStream {
    stream::once(async move {
        let (tx, rx) = mpsc::channel(READ_AHEAD);
        let reader = tokio::task::spawn_blocking(move || pump(provider.as_ref(), &tx));
        stream::unfold(Some((rx, reader)), next_chunk)
    })
    .flatten()
    .boxed()
}

/// Chunks sent by the blocking reader, and the task reading them.
type Reading = (mpsc::Receiver<io::Result<Bytes>>, JoinHandle<()>);

async fn next_chunk(state: Option<Reading>) -> Option<(io::Result<Bytes>, Option<Reading>)> {
    let (mut rx, reader) = state?;
    if let Some(chunk) = rx.recv().await {
        return Some((chunk, Some((rx, reader))));
    }
    // the channel closes early only if the reading task panicked
    match reader.await {
        Ok(()) => None,
        Err(e) => Some((Err(io::Error::other(e)), None)),
    }
}

fn pump(provider: &dyn ContentStreamProvider, tx: &mpsc::Sender<io::Result<Bytes>>) {
    let chunks: Box<dyn Iterator<Item = io::Result<Bytes>>> = match provider.new_stream() {
        Ok(reader) => Box::new(ReadChunks { reader: Some(reader) }),
        Err(e) => Box::new(std::iter::once(Err(e))),
    };
    for chunk in chunks {
        if tx.blocking_send(chunk).is_err() {
            trace!("request body dropped before it was fully read");
            return;
        }
    }
}

impl fmt::Debug for RequestPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            Kind::Empty => "Empty",
            Kind::Stream(_) => "Stream",
            Kind::Publisher(_) => "Publisher",
        };
        f.debug_tuple("RequestPayload").field(&kind).finish()
    }
}

/// Iterates a blocking reader in chunks of [`CHUNK_SIZE`] bytes.
struct ReadChunks {
    reader: Option<Box<dyn Read + Send>>,
}

impl Iterator for ReadChunks {
    type Item = io::Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        let mut buf = BytesMut::zeroed(CHUNK_SIZE);
        loop {
            match reader.read(&mut buf) {
                Ok(0) => {
                    self.reader = None;
                    return None;
                }
                Ok(n) => {
                    buf.truncate(n);
                    return Some(Ok(buf.freeze()));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.reader = None;
                    return Some(Err(e));
                }
            }
        }
    }
}
