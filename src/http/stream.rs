//! Newline-delimited response streaming.

use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures_util::stream::{Stream, StreamExt};

use crate::error::GlifError;

/// Stream of complete lines from a streaming run, each ending in its `\n`.
pub type LineStream = Pin<Box<dyn Stream<Item = Result<Bytes, GlifError>> + Send>>;

/// Accumulates body chunks and splits off complete lines.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    buf: BytesMut,
}

impl LineBuffer {
    pub(crate) fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Next complete line, terminator included, if one is buffered.
    pub(crate) fn next_line(&mut self) -> Option<Bytes> {
        let pos = self.buf.iter().position(|b| *b == b'\n')?;
        Some(self.buf.split_to(pos + 1).freeze())
    }

    /// Bytes received after the last newline.
    pub(crate) fn remainder(&self) -> &[u8] {
        &self.buf
    }
}

/// Turn a successful response into a stream of its lines.
///
/// A trailing fragment without a newline is not a complete record and is
/// dropped. A read error ends the stream after being yielded once.
pub(crate) fn lines(response: reqwest::Response) -> LineStream {
    Box::pin(async_stream::stream! {
        let mut body = Box::pin(response.bytes_stream());
        let mut buffer = LineBuffer::default();

        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(GlifError::Stream(e));
                    return;
                }
            };
            buffer.extend(&chunk);
            while let Some(line) = buffer.next_line() {
                yield Ok(line);
            }
        }

        let rest = buffer.remainder();
        if !rest.is_empty() {
            tracing::warn!(bytes = rest.len(), "Dropping unterminated trailing stream fragment");
        }
        tracing::debug!("Stream ended");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_complete_lines() {
        let mut buf = LineBuffer::default();
        buf.extend(b"{\"chunk\":0}\n{\"chunk\":1}\n{\"ch");
        assert_eq!(buf.next_line().unwrap(), &b"{\"chunk\":0}\n"[..]);
        assert_eq!(buf.next_line().unwrap(), &b"{\"chunk\":1}\n"[..]);
        assert!(buf.next_line().is_none());
        assert_eq!(buf.remainder(), b"{\"ch");

        buf.extend(b"unk\":2}\n");
        assert_eq!(buf.next_line().unwrap(), &b"{\"chunk\":2}\n"[..]);
        assert!(buf.remainder().is_empty());
    }

    #[test]
    fn test_crlf_left_intact() {
        let mut buf = LineBuffer::default();
        buf.extend(b"a\r\nb\n");
        assert_eq!(buf.next_line().unwrap(), &b"a\r\n"[..]);
        assert_eq!(buf.next_line().unwrap(), &b"b\n"[..]);
    }

    #[test]
    fn test_empty_lines_are_kept() {
        let mut buf = LineBuffer::default();
        buf.extend(b"\n\nx\n");
        assert_eq!(buf.next_line().unwrap(), &b"\n"[..]);
        assert_eq!(buf.next_line().unwrap(), &b"\n"[..]);
        assert_eq!(buf.next_line().unwrap(), &b"x\n"[..]);
        assert!(buf.next_line().is_none());
    }
}
