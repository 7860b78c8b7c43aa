//! Request and response bodies.
//!
//! # Responsibilities
//! - Hold either a byte stream or an arbitrary replaced value
//! - Provide a writable channel for producing stream bodies
//!
//! # Design Decisions
//! - Replacing a body drops the previous one; a dropped stream closes the
//!   receiving half, so writers upstream observe the cut
//! - Backpressure is whatever the stream provides; the body adds none

use std::fmt;
use std::io;

use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, BoxStream, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;

/// A boxed stream of body chunks.
pub type BodyStream = BoxStream<'static, io::Result<Bytes>>;

/// Message body.
#[derive(Default)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// Byte stream, consumed at most once.
    Stream(BodyStream),
    /// Arbitrary value set by a handler.
    Value(Value),
}

impl Body {
    pub fn empty() -> Self {
        Body::Empty
    }

    pub fn from_value(value: impl Into<Value>) -> Self {
        Body::Value(value.into())
    }

    pub fn from_stream(stream: BodyStream) -> Self {
        Body::Stream(stream)
    }

    /// A stream body yielding one chunk.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let chunk: io::Result<Bytes> = Ok(bytes.into());
        Body::Stream(stream::once(async move { chunk }).boxed())
    }

    /// Create a stream body fed by the returned sender.
    pub fn channel(capacity: usize) -> (BodySender, Body) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let stream = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|chunk| (chunk, rx))
        });
        (BodySender { tx }, Body::Stream(stream.boxed()))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Body::Stream(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Body::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Collect the body into bytes. Values are encoded as JSON.
    pub async fn into_bytes(self) -> io::Result<Bytes> {
        match self {
            Body::Empty => Ok(Bytes::new()),
            Body::Value(value) => serde_json::to_vec(&value)
                .map(Bytes::from)
                .map_err(io::Error::other),
            Body::Stream(mut stream) => {
                let mut buf = BytesMut::new();
                while let Some(chunk) = stream.next().await {
                    buf.extend_from_slice(&chunk?);
                }
                Ok(buf.freeze())
            }
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Stream(_) => f.write_str("Stream(..)"),
            Body::Value(v) => f.debug_tuple("Value").field(v).finish(),
        }
    }
}

/// Error returned when the receiving body has been dropped or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("body stream closed")]
pub struct BodyClosed;

/// Writing half of [`Body::channel`].
#[derive(Debug, Clone)]
pub struct BodySender {
    tx: mpsc::Sender<io::Result<Bytes>>,
}

impl BodySender {
    /// Send a chunk, waiting for capacity.
    pub async fn send(&self, chunk: impl Into<Bytes>) -> Result<(), BodyClosed> {
        self.tx.send(Ok(chunk.into())).await.map_err(|_| BodyClosed)
    }

    /// Terminate the stream with an error.
    pub async fn abort(&self, error: io::Error) -> Result<(), BodyClosed> {
        self.tx.send(Err(error)).await.map_err(|_| BodyClosed)
    }

    /// True once the receiving body is gone.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
