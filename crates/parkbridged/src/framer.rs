//! Newline framing for the producer byte stream.
//!
//! The simulator writes one record per line but TCP is free to split or
//! coalesce those writes. [`Framer`] keeps the unterminated tail between
//! reads and yields every complete line exactly once, in arrival order.

use std::borrow::Cow;

use thiserror::Error;

const DELIMITER: u8 = b'\n';

/// Errors raised while framing the byte stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// A frame grew past the configured bound before its delimiter arrived.
    #[error("frame of {size} bytes exceeds {limit} byte limit")]
    Oversized {
        /// Bytes buffered when the bound was hit.
        size: usize,
        /// Configured bound.
        limit: usize,
    },
}

/// One complete, trimmed message candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    text: String,
    lossy: bool,
}

impl Frame {
    fn decode(raw: &[u8]) -> Option<Self> {
        let (text, lossy) = match String::from_utf8_lossy(raw) {
            Cow::Borrowed(text) => (text.trim().to_owned(), false),
            Cow::Owned(text) => (text.trim().to_owned(), true),
        };
        if text.is_empty() {
            return None;
        }
        Some(Self { text, lossy })
    }

    /// Trimmed message text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consumes the frame, returning its text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    /// Whether invalid UTF-8 was replaced with `U+FFFD` while decoding.
    #[must_use]
    pub const fn is_lossy(&self) -> bool {
        self.lossy
    }
}

/// Stateful splitter turning byte chunks into complete frames.
#[derive(Debug)]
pub struct Framer {
    carry: Vec<u8>,
    max_frame_bytes: usize,
    discarding: bool,
}

impl Framer {
    /// Creates a framer that rejects frames longer than `max_frame_bytes`.
    #[must_use]
    pub const fn new(max_frame_bytes: usize) -> Self {
        Self {
            carry: Vec::new(),
            max_frame_bytes,
            discarding: false,
        }
    }

    /// Feeds one chunk, returning the frames it completes in arrival order.
    ///
    /// A chunk without a delimiter only extends the carry-over. Whitespace-only
    /// lines are dropped. When the carry-over outgrows the bound, a single
    /// [`FrameError::Oversized`] is reported and the rest of that frame is
    /// skipped up to and including its delimiter.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Result<Frame, FrameError>> {
        let mut frames = Vec::new();
        let mut rest = chunk;

        while let Some(position) = rest.iter().position(|byte| *byte == DELIMITER) {
            let (line, tail) = rest.split_at(position);
            rest = tail.get(1..).unwrap_or_default();

            if self.discarding {
                self.discarding = false;
                continue;
            }

            self.carry.extend_from_slice(line);
            let raw = std::mem::take(&mut self.carry);
            if raw.len() > self.max_frame_bytes {
                frames.push(Err(FrameError::Oversized {
                    size: raw.len(),
                    limit: self.max_frame_bytes,
                }));
                continue;
            }
            if let Some(frame) = Frame::decode(&raw) {
                frames.push(Ok(frame));
            }
        }

        if !self.discarding {
            self.carry.extend_from_slice(rest);
            if self.carry.len() > self.max_frame_bytes {
                frames.push(Err(FrameError::Oversized {
                    size: self.carry.len(),
                    limit: self.max_frame_bytes,
                }));
                self.carry = Vec::new();
                self.discarding = true;
            }
        }

        frames
    }

    /// Number of buffered bytes still waiting for a delimiter.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.carry.len()
    }

    /// Ends the stream, returning how many unterminated bytes were dropped.
    pub fn finish(&mut self) -> Option<usize> {
        self.discarding = false;
        let pending = std::mem::take(&mut self.carry);
        let significant = pending.iter().any(|byte| !byte.is_ascii_whitespace());
        significant.then_some(pending.len())
    }
}
