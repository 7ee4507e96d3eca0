//! Newline-delimited JSON stream decoding

use bytes::Bytes;
use drover_provider::ProviderError;
use futures_util::{Stream, StreamExt, stream};
use serde::de::DeserializeOwned;

use crate::json::parse_json;

/// Decode a byte stream of newline-terminated JSON records
///
/// Each complete line is parsed on its own. A line that fails to parse
/// yields one `Err` item and decoding continues with the next line.
/// Blank lines are skipped, and a final line without a terminating newline
/// is parsed when the byte stream ends.
pub fn decode_json_lines<T, S>(byte_stream: S) -> impl Stream<Item = Result<T, ProviderError>> + Send
where
    T: DeserializeOwned + Send + 'static,
    S: Stream<Item = Result<Bytes, ProviderError>> + Send + 'static,
{
    byte_stream
        .map(Some)
        // End-of-stream marker flushes the unterminated remainder
        .chain(stream::once(std::future::ready(None)))
        .scan(LineBuffer::default(), |buffer, item| {
            let lines: Vec<Result<Vec<u8>, ProviderError>> = match item {
                Some(Ok(bytes)) => buffer.push(&bytes).into_iter().map(Ok).collect(),
                Some(Err(e)) => vec![Err(e)],
                None => buffer.finish().into_iter().map(Ok).collect(),
            };
            std::future::ready(Some(lines))
        })
        .flat_map(stream::iter)
        .filter_map(|line| {
            std::future::ready(match line {
                Ok(line) => parse_line(&line),
                Err(e) => Some(Err(e)),
            })
        })
}

/// Bytes received since the last newline
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    /// Append a chunk and take every line it completes
    ///
    /// `pending` never holds a newline between calls, so only the appended
    /// bytes are searched.
    fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        let mut search_from = self.pending.len();
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[search_from..].iter().position(|&b| b == b'\n') {
            let end = search_from + offset;
            lines.push(self.pending[start..end].to_vec());
            start = end + 1;
            search_from = start;
        }
        self.pending.drain(..start);

        lines
    }

    /// Take whatever is left once the input has ended
    fn finish(&mut self) -> Option<Vec<u8>> {
        (!self.pending.is_empty()).then(|| std::mem::take(&mut self.pending))
    }
}

fn parse_line<T: DeserializeOwned>(line: &[u8]) -> Option<Result<T, ProviderError>> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    let text = match std::str::from_utf8(line) {
        Ok(text) => text,
        Err(e) => {
            return Some(Err(ProviderError::JsonParse {
                text: String::from_utf8_lossy(line).into_owned(),
                message: e.to_string(),
            }));
        }
    };

    if text.trim().is_empty() {
        return None;
    }

    Some(parse_json(text))
}
