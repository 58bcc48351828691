//! Server-Sent Events (SSE) processing for streaming completions.
//!
//! This module turns the raw byte stream of a streaming `chat/completions`
//! response into a stream of [`ChatCompletionChunk`]s, handling buffering
//! across network reads, the `[DONE]` sentinel, and in-band error payloads.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;

use crate::observability::{STREAM_BYTES, STREAM_CHUNKS, STREAM_ERRORS};
use crate::{ChatCompletionChunk, Error, Result};

/// Payload that marks the end of a completion stream.
const DONE_SENTINEL: &str = "[DONE]";

/// One decoded SSE frame.
#[derive(Debug)]
enum Frame {
    Chunk(Box<ChatCompletionChunk>),
    Done,
    Skip,
}

/// Error payload some servers send inside the stream instead of a chunk.
#[derive(Deserialize)]
struct StreamError {
    error: StreamErrorDetail,
}

#[derive(Deserialize)]
struct StreamErrorDetail {
    #[serde(rename = "type", default)]
    error_type: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

struct SseState<S> {
    stream: S,
    buffer: Vec<u8>,
    eof: bool,
}

/// Process a stream of bytes into a stream of completion chunks.
///
/// The returned stream ends at `data: [DONE]` or when the connection closes,
/// whichever comes first.
pub fn process_sse<S>(byte_stream: S) -> impl Stream<Item = Result<ChatCompletionChunk>> + Send
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + Send + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    let state = SseState {
        stream,
        buffer: Vec::new(),
        eof: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            match next_frame(&mut state.buffer) {
                Some(Ok(Frame::Chunk(chunk))) => {
                    STREAM_CHUNKS.click();
                    return Some((Ok(*chunk), state));
                }
                Some(Ok(Frame::Done)) => return None,
                Some(Ok(Frame::Skip)) => continue,
                Some(Err(e)) => {
                    STREAM_ERRORS.click();
                    return Some((Err(e), state));
                }
                None => {}
            }

            if state.eof {
                return None;
            }

            match state.stream.next().await {
                Some(Ok(bytes)) => {
                    STREAM_BYTES.count(bytes.len() as u64);
                    state.buffer.extend(bytes.iter().filter(|b| **b != b'\r'));
                }
                Some(Err(e)) => {
                    STREAM_ERRORS.click();
                    return Some((Err(e), state));
                }
                None => {
                    // A final event may be missing its blank line.
                    state.eof = true;
                    if state.buffer.iter().any(|b| !b.is_ascii_whitespace()) {
                        state.buffer.extend_from_slice(b"\n\n");
                    } else {
                        return None;
                    }
                }
            }
        }
    })
}

/// Remove one complete event from the front of `buffer` and decode it.
///
/// Returns `None` when the buffer does not hold a complete event yet.
fn next_frame(buffer: &mut Vec<u8>) -> Option<Result<Frame>> {
    let end = buffer.windows(2).position(|w| w == b"\n\n")?;
    let event: Vec<u8> = buffer.drain(..end + 2).take(end).collect();
    let text = match std::str::from_utf8(&event) {
        Ok(text) => text,
        Err(e) => {
            return Some(Err(Error::encoding(
                format!("Invalid UTF-8 in stream: {e}"),
                Some(Box::new(e)),
            )));
        }
    };
    Some(decode_event(text))
}

/// Decode the text of a single event (without its terminating blank line).
fn decode_event(text: &str) -> Result<Frame> {
    let mut data: Option<String> = None;
    for line in text.lines() {
        // Comments, `event:`, `id:` and `retry:` fields carry nothing we use.
        let Some(value) = line.strip_prefix("data:") else {
            continue;
        };
        let value = value.strip_prefix(' ').unwrap_or(value);
        match data.as_mut() {
            Some(data) => {
                data.push('\n');
                data.push_str(value);
            }
            None => data = Some(value.to_string()),
        }
    }

    let Some(data) = data else {
        return Ok(Frame::Skip);
    };
    let data = data.trim();
    if data == DONE_SENTINEL {
        return Ok(Frame::Done);
    }
    if data.is_empty() {
        return Ok(Frame::Skip);
    }

    if let Ok(StreamError { error }) = serde_json::from_str::<StreamError>(data) {
        return Err(Error::api(
            0,
            error.error_type,
            error
                .message
                .unwrap_or_else(|| "error event in stream".to_string()),
        ));
    }

    let chunk = serde_json::from_str::<ChatCompletionChunk>(data).map_err(|e| {
        Error::serialization(
            format!("Failed to parse chunk JSON: {e}"),
            Some(Box::new(e)),
        )
    })?;
    Ok(Frame::Chunk(Box::new(chunk)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompletionUsage;

    fn bytes_stream(
        parts: Vec<&'static [u8]>,
    ) -> impl Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + Send + 'static
    {
        stream::iter(
            parts
                .into_iter()
                .map(|part| Ok(Bytes::from_static(part)))
                .collect::<Vec<_>>(),
        )
    }

    async fn collect(parts: Vec<&'static [u8]>) -> Vec<Result<ChatCompletionChunk>> {
        process_sse(bytes_stream(parts)).collect().await
    }

    fn content_of(chunk: &ChatCompletionChunk) -> Option<&str> {
        chunk.first_choice()?.delta.content.as_deref()
    }

    #[tokio::test]
    async fn parse_content_chunks() {
        let data: &'static [u8] = b"data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Hi\"}}]}\n\n\
data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\" there\"}}]}\n\n\
data: [DONE]\n\n";
        let chunks = collect(vec![data]).await;

        assert_eq!(chunks.len(), 2);
        assert_eq!(content_of(chunks[0].as_ref().unwrap()), Some("Hi"));
        assert_eq!(content_of(chunks[1].as_ref().unwrap()), Some(" there"));
    }

    #[tokio::test]
    async fn done_ends_stream_even_with_trailing_bytes() {
        let data: &'static [u8] = b"data: [DONE]\n\ndata: {\"choices\":[]}\n\n";
        let chunks = collect(vec![data]).await;
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn handle_split_event() {
        let chunks = collect(vec![
            &b"data: {\"choices\":[{\"delta\":{\"con"[..],
            &b"tent\":\"split\"}}]}\n"[..],
            &b"\n"[..],
        ])
        .await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(content_of(chunks[0].as_ref().unwrap()), Some("split"));
    }

    #[tokio::test]
    async fn multibyte_character_split_across_reads() {
        // "é" is 0xC3 0xA9.
        let chunks = collect(vec![
            &b"data: {\"choices\":[{\"delta\":{\"content\":\"caf\xC3"[..],
            &b"\xA9\"}}]}\n\n"[..],
        ])
        .await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(content_of(chunks[0].as_ref().unwrap()), Some("café"));
    }

    #[tokio::test]
    async fn crlf_and_comments_are_ignored() {
        let data: &'static [u8] = b": keep-alive\r\n\r\n\
event: completion\r\ndata: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\r\n\r\n";
        let chunks = collect(vec![data]).await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(content_of(chunks[0].as_ref().unwrap()), Some("ok"));
    }

    #[tokio::test]
    async fn multi_line_data_is_joined_and_other_fields_ignored() {
        let data: &'static [u8] = b"id: 7\n\
retry: 1000\n\
data: {\"choices\":[{\"delta\":\n\
data: {\"content\":\"joined\"}}]}\n\n";
        let chunks = collect(vec![data]).await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(content_of(chunks[0].as_ref().unwrap()), Some("joined"));
    }

    #[test]
    fn data_lines_are_joined_with_newline() {
        let Ok(Frame::Skip) = decode_event("id: 1\nretry: 5\nevent: ping") else {
            panic!("expected an event without data to be skipped");
        };
        let err = match decode_event("data: {\"choices\":\ndata: oops}") {
            Err(err) => err,
            Ok(frame) => panic!("expected a parse error, got {frame:?}"),
        };
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[tokio::test]
    async fn usage_chunk_is_passed_through() {
        let data: &'static [u8] = b"data: {\"choices\":[],\"usage\":{\"prompt_tokens\":3,\"completion_tokens\":4,\"total_tokens\":7}}\n\n";
        let chunks = collect(vec![data]).await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].as_ref().unwrap().usage,
            Some(CompletionUsage::new(3, 4))
        );
    }

    #[tokio::test]
    async fn trailing_event_without_blank_line() {
        let data: &'static [u8] = b"data: {\"choices\":[{\"delta\":{\"content\":\"end\"}}]}";
        let chunks = collect(vec![data]).await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(content_of(chunks[0].as_ref().unwrap()), Some("end"));
    }

    #[tokio::test]
    async fn error_payload_becomes_error() {
        let data: &'static [u8] =
            b"data: {\"error\":{\"type\":\"server_error\",\"message\":\"boom\"}}\n\n";
        let chunks = collect(vec![data]).await;

        assert_eq!(chunks.len(), 1);
        let err = chunks[0].as_ref().unwrap_err();
        assert_eq!(err.to_string(), "server_error: boom");
    }

    #[tokio::test]
    async fn handle_malformed_event() {
        let data: &'static [u8] = b"data: this is not json\n\n";
        let chunks = collect(vec![data]).await;

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_err());
    }
}
