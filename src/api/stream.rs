//! Incremental parser over the server-push status subscription.
//!
//! The service exposes article progress as Server-Sent Events: `data:` lines
//! accumulate until a blank line ends the frame, and the joined payload is a
//! JSON [`StatusEvent`]. Auxiliary SSE fields (`id:`, `event:`, `retry:`,
//! comments) carry nothing this client uses and are skipped.

use std::pin::Pin;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use log::{debug, warn};

use super::error::ApiError;
use super::types::StatusEvent;

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ApiError>> + Send>>;

/// A single open status subscription, scoped to one article identifier.
///
/// The connection lives in an `Option` so closing happens exactly once no
/// matter how often [`close`](StatusStream::close) is called; dropping the
/// wrapper closes it implicitly.
pub struct StatusStream {
    inner: Option<ByteStream>,
    buffer: String,
    data_lines: Vec<String>,
}

impl std::fmt::Debug for StatusStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusStream")
            .field("open", &self.inner.is_some())
            .field("buffer", &self.buffer)
            .field("data_lines", &self.data_lines)
            .finish()
    }
}

impl StatusStream {
    pub(crate) fn new(inner: impl Stream<Item = Result<Bytes, ApiError>> + Send + 'static) -> Self {
        Self {
            inner: Some(Box::pin(inner)),
            buffer: String::new(),
            data_lines: Vec::new(),
        }
    }

    /// Drop the underlying connection. Idempotent.
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            debug!("status stream closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// The next parsed status event.
    ///
    /// `Ok(None)` once the stream ends or after [`close`](StatusStream::close);
    /// a transport error closes the stream and surfaces once. Malformed frames
    /// are logged and skipped, never fatal.
    pub async fn next_event(&mut self) -> Result<Option<StatusEvent>, ApiError> {
        loop {
            if let Some(event) = self.drain_buffered() {
                return Ok(Some(event));
            }
            let Some(stream) = self.inner.as_mut() else {
                return Ok(None);
            };
            match stream.next().await {
                Some(Ok(chunk)) => {
                    self.buffer.push_str(&String::from_utf8_lossy(&chunk));
                }
                Some(Err(err)) => {
                    self.close();
                    return Err(err);
                }
                None => {
                    self.close();
                    return Ok(None);
                }
            }
        }
    }

    /// Consume complete lines from the buffer until a full frame parses.
    fn drain_buffered(&mut self) -> Option<StatusEvent> {
        while let Some(pos) = self.buffer.find('\n') {
            let line = self.buffer[..pos].trim_end_matches('\r').to_string();
            self.buffer.drain(..=pos);

            if line.is_empty() {
                if self.data_lines.is_empty() {
                    continue;
                }
                let payload = self.data_lines.join("\n");
                self.data_lines.clear();
                match serde_json::from_str::<StatusEvent>(&payload) {
                    Ok(event) => return Some(event),
                    Err(err) => {
                        warn!("discarding malformed status payload: {err} -- {payload}");
                    }
                }
            } else if let Some(data) = line.strip_prefix("data:") {
                self.data_lines.push(data.trim_start().to_string());
            }
        }
        None
    }
}
