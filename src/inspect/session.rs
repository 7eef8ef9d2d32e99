//! Inspect Session
//!
//! Reads response flag lines from an input stream, decodes each one and
//! writes the outcome to an output stream.
//!
//! ## Session Lifecycle
//!
//! ```text
//! 1. Session created over (reader, writer)
//!        │
//!        ▼
//! 2. ┌──────────────────────────────┐
//!    │      Main Loop               │
//!    │                              │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Read one line           │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Split into flag tokens  │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Decode + write outcome  │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │         [Loop back]          │
//!    └──────────────────────────────┘
//!        │
//!        ▼
//! 3. End of input / I/O error
//! ```
//!
//! A line that fails to decode produces an `ERROR` output line and the
//! session carries on with the next one.

use crate::protocol::{parse_meta_flags, FlagError, MetaResult};
use std::str::Utf8Error;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter,
};
use tracing::{debug, info, trace, warn};

/// Maximum size of one input line, newline included (64 KB)
pub const MAX_LINE_SIZE: usize = 64 * 1024;

/// Initial capacity of the line buffer
const INITIAL_LINE_SIZE: usize = 256;

/// Statistics for an inspect session
#[derive(Debug, Default)]
pub struct InspectStats {
    /// Total lines read, including blank ones
    pub lines_read: AtomicU64,
    /// Lines decoded successfully
    pub decoded: AtomicU64,
    /// Lines that failed to decode
    pub failed: AtomicU64,
    /// Total bytes read
    pub bytes_read: AtomicU64,
}

impl InspectStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_read(&self, bytes: usize) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn bytes_discarded(&self, bytes: usize) {
        self.bytes_read.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn line_decoded(&self) {
        self.decoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn line_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Reasons a single input line produces an `ERROR` output line.
///
/// None of these end the session.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    /// The flag tokens did not decode
    #[error(transparent)]
    Decode(#[from] FlagError),

    /// The line is not valid UTF-8
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    /// The line exceeds [`MAX_LINE_SIZE`]
    #[error("line too long: more than {max} bytes")]
    TooLong { max: usize },
}

/// Decodes flag lines from `reader` and writes results to `writer`.
pub struct InspectSession<R, W> {
    reader: R,
    writer: BufWriter<W>,
    line: Vec<u8>,
    stats: Arc<InspectStats>,
}

impl<R, W> InspectSession<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W, stats: Arc<InspectStats>) -> Self {
        Self {
            reader,
            writer: BufWriter::new(writer),
            line: Vec::with_capacity(INITIAL_LINE_SIZE),
            stats,
        }
    }

    /// Runs until the reader is exhausted.
    pub async fn run(mut self) -> Result<(), InspectError> {
        info!("Inspect session started");

        let result = self.main_loop().await;

        match &result {
            Ok(()) => info!(
                decoded = self.stats.decoded.load(Ordering::Relaxed),
                failed = self.stats.failed.load(Ordering::Relaxed),
                "Inspect session finished"
            ),
            Err(e) => warn!(error = %e, "Inspect session aborted"),
        }

        result
    }

    async fn main_loop(&mut self) -> Result<(), InspectError> {
        loop {
            let n = self.read_line().await?;
            if n == 0 {
                return Ok(());
            }
            self.stats.line_read(n);
            trace!(bytes = n, "Read line");

            let outcome = if self.line.len() >= MAX_LINE_SIZE && !self.line.ends_with(b"\n") {
                let skipped = self.discard_rest_of_line().await?;
                self.stats.bytes_discarded(skipped);
                warn!(
                    size = n + skipped,
                    max = MAX_LINE_SIZE,
                    "Line size limit exceeded"
                );
                Err(LineError::TooLong { max: MAX_LINE_SIZE })
            } else {
                match decode_line(&self.line) {
                    Some(outcome) => outcome,
                    None => continue,
                }
            };

            match &outcome {
                Ok(_) => self.stats.line_decoded(),
                Err(e) => {
                    debug!(error = %e, "Line failed to decode");
                    self.stats.line_failed();
                }
            }

            let rendered = render(&outcome);
            self.writer.write_all(rendered.as_bytes()).await?;
            self.writer.flush().await?;
        }
    }

    /// Reads up to [`MAX_LINE_SIZE`] bytes of the next line into `self.line`.
    async fn read_line(&mut self) -> Result<usize, InspectError> {
        self.line.clear();
        let n = (&mut self.reader)
            .take(MAX_LINE_SIZE as u64)
            .read_until(b'\n', &mut self.line)
            .await?;
        Ok(n)
    }

    /// Skips input up to and including the next newline, returning the byte count.
    async fn discard_rest_of_line(&mut self) -> Result<usize, InspectError> {
        let mut skipped = 0;
        loop {
            let n = self.read_line().await?;
            skipped += n;
            if n == 0 || self.line.ends_with(b"\n") {
                return Ok(skipped);
            }
        }
    }
}

/// Decodes one raw input line. Returns `None` for a blank line.
fn decode_line(line: &[u8]) -> Option<Result<MetaResult, LineError>> {
    let text = match std::str::from_utf8(line) {
        Ok(text) => text,
        Err(e) => return Some(Err(e.into())),
    };

    let tokens: Vec<&str> = text.split_ascii_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    Some(parse_meta_flags(&tokens).map_err(LineError::from))
}

/// Formats one decode outcome as an output line.
fn render(outcome: &Result<MetaResult, LineError>) -> String {
    match outcome {
        Ok(result) => format!("OK {}\n", result),
        Err(e) => format!("ERROR {}\n", e),
    }
}

/// Errors that can end an inspect session.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    /// I/O error on the input or output stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs an inspect session to completion.
///
/// This is a convenience function that creates an InspectSession and
/// runs it.
pub async fn inspect<R, W>(
    reader: R,
    writer: W,
    stats: Arc<InspectStats>,
) -> Result<(), InspectError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    InspectSession::new(reader, writer, stats).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    async fn run_lines(input: &[u8]) -> (String, Arc<InspectStats>) {
        let reader = BufReader::new(tokio_test::io::Builder::new().read(input).build());
        let mut output = Vec::new();
        let stats = Arc::new(InspectStats::new());

        inspect(reader, &mut output, Arc::clone(&stats)).await.unwrap();

        (String::from_utf8(output).unwrap(), stats)
    }

    #[tokio::test]
    async fn test_decodes_single_line() {
        let (output, stats) = run_lines(b"O123 k456 t3600 s10\n").await;

        assert_eq!(
            output,
            "OK won=false stale=false hit=false key=456 opaque=123 cas=(none) flags=0 last_access=0 size=10 ttl=3600\n"
        );
        assert_eq!(stats.lines_read.load(Ordering::Relaxed), 1);
        assert_eq!(stats.decoded.load(Ordering::Relaxed), 1);
        assert_eq!(stats.failed.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_error_does_not_end_session() {
        let (output, stats) = run_lines(b"Q\r\nc42\r\n").await;

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "ERROR invalid flag: Q");
        assert!(lines[1].starts_with("OK "));
        assert!(lines[1].contains("cas=42"));

        assert_eq!(stats.decoded.load(Ordering::Relaxed), 1);
        assert_eq!(stats.failed.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_blank_lines_skipped() {
        let (output, stats) = run_lines(b"\n   \nW\n").await;

        assert_eq!(output.lines().count(), 1);
        assert!(output.starts_with("OK won=true"));
        assert_eq!(stats.lines_read.load(Ordering::Relaxed), 3);
        assert_eq!(stats.decoded.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let (output, _) = run_lines(b"h1 f9").await;
        assert!(output.contains("hit=true"));
        assert!(output.contains("flags=9"));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let reader = BufReader::new(tokio_test::io::Builder::new().build());
        let mut output = Vec::new();
        let stats = Arc::new(InspectStats::new());

        inspect(reader, &mut output, Arc::clone(&stats)).await.unwrap();

        assert!(output.is_empty());
        assert_eq!(stats.lines_read.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_read_error_aborts() {
        let mock = tokio_test::io::Builder::new()
            .read(b"W\n")
            .read_error(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
            .build();
        let mut output = Vec::new();
        let stats = Arc::new(InspectStats::new());

        let err = inspect(BufReader::new(mock), &mut output, Arc::clone(&stats))
            .await
            .unwrap_err();

        assert!(matches!(err, InspectError::Io(_)));
        assert_eq!(stats.decoded.load(Ordering::Relaxed), 1);
        assert!(String::from_utf8(output).unwrap().starts_with("OK won=true"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_does_not_end_session() {
        let (output, stats) = run_lines(b"k\xff\nW\n").await;

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ERROR invalid UTF-8"));
        assert!(lines[1].starts_with("OK won=true"));

        assert_eq!(stats.decoded.load(Ordering::Relaxed), 1);
        assert_eq!(stats.failed.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_oversized_line_is_skipped() {
        let mut input = vec![b'k'; MAX_LINE_SIZE * 2 + 10];
        input.extend_from_slice(b"\nc7\n");
        let (output, stats) = run_lines(&input).await;

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            format!("ERROR line too long: more than {} bytes", MAX_LINE_SIZE)
        );
        assert!(lines[1].contains("cas=7"));

        assert_eq!(stats.lines_read.load(Ordering::Relaxed), 2);
        assert_eq!(stats.failed.load(Ordering::Relaxed), 1);
        assert_eq!(stats.decoded.load(Ordering::Relaxed), 1);
        assert_eq!(
            stats.bytes_read.load(Ordering::Relaxed),
            input.len() as u64
        );
    }

    #[tokio::test]
    async fn test_line_just_under_limit_decodes() {
        let mut input = vec![b'k'; MAX_LINE_SIZE - 1];
        input.push(b'\n');
        let (output, stats) = run_lines(&input).await;

        assert!(output.starts_with("OK "));
        assert_eq!(stats.decoded.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_decode_line() {
        assert!(decode_line(b"  \r\n").is_none());
        assert!(matches!(
            decode_line(b"Q\n"),
            Some(Err(LineError::Decode(FlagError::UnknownFlag('Q'))))
        ));
        assert!(matches!(
            decode_line(b"\xfe\n"),
            Some(Err(LineError::InvalidUtf8(_)))
        ));
    }

    #[test]
    fn test_render() {
        assert_eq!(
            render(&Err(FlagError::UnknownFlag('Q').into())),
            "ERROR invalid flag: Q\n"
        );
        assert!(render(&Ok(MetaResult::default())).starts_with("OK won=false"));
    }
}
