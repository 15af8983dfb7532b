//! Compact Frame Format (CFF): length-prefixed framing with CRC-16 integrity
//! for continuous byte streams.
//!
//! Every frame is delimited with:
//! - A 2-byte preamble (`0xFA 0xCE`) for stream synchronization
//! - A 2-byte little-endian frame counter and payload size, protected by a
//!   header CRC
//! - The payload, protected by its own CRC
//!
//! The split into header and payload CRCs lets a receiver trust the size
//! field before the payload has fully arrived, and lets the streaming parser
//! recover from corruption by sliding its origin one byte at a time, so a
//! single damaged byte costs at most one frame.
//!
//! The whole codec is allocation-free and works in place over caller-owned
//! storage, so it is as at home in firmware as on a host. Incoming bytes are
//! staged in a [`RingBuffer`] and parsed directly from ring storage; payloads
//! may span the wrap boundary, and [`FrameView::copy_payload`] linearizes
//! them on demand.

pub mod builder;
pub mod crc;
pub mod error;
pub mod parser;
pub mod ring;
pub mod wire;

pub use builder::FrameBuilder;
pub use crc::{crc16, crc16_update};
pub use error::{CffError, Result};
pub use parser::{parse_frame, parse_frames, FrameView};
pub use ring::RingBuffer;
pub use wire::{
    frame_size, read_u16_le, write_u16_le, HEADER_SIZE, MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE,
    PAYLOAD_CRC_SIZE, PREAMBLE,
};
