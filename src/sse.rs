//! Server-Sent Events (SSE) processing for streaming responses.
//!
//! This module turns the raw byte stream of a `streamGenerateContent?alt=sse`
//! response into a stream of parsed [`GenerateContentResponse`] payloads.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::observability::{STREAM_BYTES, STREAM_ERRORS};
use crate::types::{ErrorResponse, GenerateContentResponse};
use crate::{Error, Result};

/// Process a stream of bytes into a stream of response payloads.
///
/// Bytes are buffered until a complete event (terminated by a blank line) is
/// available, so payloads and multi-byte characters may be split across
/// network reads.
pub fn process_sse<S, E>(byte_stream: S) -> impl Stream<Item = Result<GenerateContentResponse>>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    let buffer: Vec<u8> = Vec::new();

    stream::unfold(
        (stream, buffer, false),
        |(mut stream, mut buffer, done)| async move {
            if done {
                return None;
            }
            loop {
                if let Some((event, remaining)) = extract_event(&buffer) {
                    buffer = remaining;
                    match event {
                        Some(event) => {
                            if event.is_err() {
                                STREAM_ERRORS.click();
                            }
                            return Some((event, (stream, buffer, false)));
                        }
                        None => continue,
                    }
                }

                match stream.next().await {
                    Some(Ok(bytes)) => {
                        STREAM_BYTES.count(bytes.len() as u64);
                        buffer.extend_from_slice(&bytes);
                    }
                    Some(Err(e)) => {
                        STREAM_ERRORS.click();
                        return Some((Err(e), (stream, buffer, true)));
                    }
                    None => {
                        // A final event may arrive without its trailing blank line.
                        if buffer.iter().any(|b| !b.is_ascii_whitespace()) {
                            buffer.extend_from_slice(b"\n\n");
                            if let Some((Some(event), _)) = extract_event(&buffer) {
                                return Some((event, (stream, Vec::new(), true)));
                            }
                        }
                        return None;
                    }
                }
            }
        },
    )
}

/// Extract one complete SSE event from the front of `buffer`.
///
/// Returns `None` when no complete event is buffered yet.  The inner option
/// is `None` for events that carry no data (comments, keep-alives).
fn extract_event(buffer: &[u8]) -> Option<(Option<Result<GenerateContentResponse>>, Vec<u8>)> {
    let (end, skip) = find_event_boundary(buffer)?;
    let rest = buffer[end + skip..].to_vec();
    let event_text = match std::str::from_utf8(&buffer[..end]) {
        Ok(text) => text,
        Err(e) => {
            return Some((
                Some(Err(Error::encoding(
                    format!("Invalid UTF-8 in stream: {e}"),
                    Some(Box::new(e)),
                ))),
                rest,
            ));
        }
    };

    let mut data = String::new();
    for line in event_text.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(value) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(value.strip_prefix(' ').unwrap_or(value));
        }
    }

    if data.trim().is_empty() {
        return Some((None, rest));
    }
    Some((Some(parse_payload(&data)), rest))
}

/// Locate the first blank line, accepting both `\n\n` and `\r\n\r\n`.
fn find_event_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
    let lf = buffer.windows(2).position(|w| w == b"\n\n").map(|i| (i, 2));
    let crlf = buffer
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|i| (i, 4));
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

/// Parse one `data:` payload, turning in-band error objects into errors.
fn parse_payload(data: &str) -> Result<GenerateContentResponse> {
    if let Ok(envelope) = serde_json::from_str::<ErrorResponse>(data) {
        let detail = envelope.error;
        return Err(Error::api(
            detail.code.unwrap_or(500),
            detail.status,
            detail
                .message
                .unwrap_or_else(|| "stream reported an error".to_string()),
        ));
    }
    serde_json::from_str::<GenerateContentResponse>(data).map_err(|e| {
        Error::serialization(
            format!("Malformed SSE payload '{data}': {e}"),
            Some(Box::new(e)),
        )
    })
}
