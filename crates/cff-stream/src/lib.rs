//! Framed reader and writer adapters over any [`std::io::Read`] /
//! [`std::io::Write`] for the Compact Frame Format.
//!
//! The core codec in `cff-codec` is allocation-free and works against
//! caller-owned storage; this crate is the host-side convenience layer on
//! top of it. Readers buffer the incoming stream in a ring, let the codec's
//! resynchronizing parser recover from corruption, and hand out frames with
//! owned payloads. Writers keep the frame counter running across the life of
//! the connection. No partial reads, no buffer management in user code.

pub mod error;
pub mod reader;
pub mod writer;

use bytes::Bytes;
use cff_codec::{frame_size, MAX_PAYLOAD_SIZE};

pub use error::{Result, StreamError};
pub use reader::FrameReader;
pub use writer::FrameWriter;

/// A decoded frame with an owned payload.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The counter stamped by the sending builder.
    pub frame_counter: u16,
    /// The frame payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(frame_counter: u16, payload: impl Into<Bytes>) -> Self {
        Self {
            frame_counter,
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (header + payload + payload CRC).
    pub fn wire_size(&self) -> usize {
        frame_size(self.payload.len())
    }
}

/// Configuration for framed readers and writers.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Largest payload accepted or produced. Defaults to the wire maximum
    /// (65535); values above it are capped by the 16-bit size field anyway.
    pub max_payload_size: usize,
    /// Capacity of the reader's receive ring. Must hold at least one maximum
    /// frame for reads to make progress. Default: two maximum frames.
    pub ring_capacity: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE,
            ring_capacity: 2 * frame_size(MAX_PAYLOAD_SIZE),
        }
    }
}
