//! Accumulates streamed chunks into the complete reply while passing them through.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use futures::Stream;

use crate::observability::{STREAM_CHUNKS, STREAM_DURATION, STREAM_TTFB};
use crate::types::Chunk;
use crate::{Error, Result};

/// A stream wrapper that concatenates every `Chunk` it yields.
///
/// The caller sees each chunk as it arrives.  When the inner stream is fully
/// drained without error, the concatenated text is sent through the oneshot
/// channel returned by [`AccumulatingStream::new`]; if any item was an error
/// the channel receives that error instead.  Dropping the stream early drops
/// the sender, so the receiver observes a closed channel.
pub struct AccumulatingStream {
    inner: Pin<Box<dyn Stream<Item = Result<Chunk>> + Send>>,
    reply_tx: Option<tokio::sync::oneshot::Sender<Result<String>>>,
    text: String,
    error: Option<Error>,
    started: Instant,
    saw_first_chunk: bool,
}

impl AccumulatingStream {
    /// Wraps a chunk stream.
    ///
    /// Returns the stream and a receiver that will contain the accumulated
    /// reply once the stream is fully drained.
    pub fn new<S>(stream: S) -> (Self, tokio::sync::oneshot::Receiver<Result<String>>)
    where
        S: Stream<Item = Result<Chunk>> + Send + 'static,
    {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let this = Self {
            inner: Box::pin(stream),
            reply_tx: Some(tx),
            text: String::new(),
            error: None,
            started: Instant::now(),
            saw_first_chunk: false,
        };
        (this, rx)
    }

    fn finish(&mut self) {
        if let Some(tx) = self.reply_tx.take() {
            STREAM_DURATION.add(self.started.elapsed().as_secs_f64());
            let reply = match self.error.take() {
                Some(err) => Err(err),
                None => Ok(std::mem::take(&mut self.text)),
            };
            let _ = tx.send(reply);
        }
    }
}

impl Stream for AccumulatingStream {
    type Item = Result<Chunk>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                STREAM_CHUNKS.click();
                if !self.saw_first_chunk {
                    self.saw_first_chunk = true;
                    STREAM_TTFB.add(self.started.elapsed().as_secs_f64());
                }
                self.text.push_str(&chunk.text);
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                if self.error.is_none() {
                    self.error = Some(e.clone());
                }
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                self.finish();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
