//! Frame parsing and stream resynchronization.
//!
//! [`parse_frame`] validates exactly one frame at the ring's consume origin.
//! [`parse_frames`] is the streaming entry point: it scans for the preamble,
//! parses, and after any validation failure slides the origin forward by a
//! single byte before trying again, so one corrupted byte costs at most one
//! frame.

use crate::error::{CffError, Result};
use crate::ring::RingBuffer;
use crate::wire::{frame_size, HEADER_SIZE, MIN_FRAME_SIZE, PREAMBLE};

/// A frame parsed in place.
///
/// The view borrows the ring buffer; the payload bytes stay valid for as long
/// as the view exists, even though the frame has already been consumed from
/// the FIFO's perspective. Callers that need the payload beyond that must
/// copy it out with [`FrameView::copy_payload`].
#[derive(Debug)]
pub struct FrameView<'r, S> {
    ring: &'r RingBuffer<S>,
    frame_counter: u16,
    payload_len: usize,
    payload_start: usize,
    header_crc: u16,
    payload_crc: u16,
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> FrameView<'_, S> {
    /// The counter stamped into the frame by its builder.
    pub fn frame_counter(&self) -> u16 {
        self.frame_counter
    }

    /// Payload length in bytes.
    pub fn payload_len(&self) -> usize {
        self.payload_len
    }

    /// The validated header CRC.
    pub fn header_crc(&self) -> u16 {
        self.header_crc
    }

    /// The validated payload CRC.
    pub fn payload_crc(&self) -> u16 {
        self.payload_crc
    }

    /// Copy the payload into `out`, following the ring's wrap boundary.
    ///
    /// Returns the payload length. Fails with [`CffError::BufferTooSmall`]
    /// if `out` is shorter than the payload.
    pub fn copy_payload(&self, out: &mut [u8]) -> Result<usize> {
        if out.len() < self.payload_len {
            return Err(CffError::BufferTooSmall {
                required: self.payload_len,
                capacity: out.len(),
            });
        }

        self.ring
            .copy_from_absolute(self.payload_start, &mut out[..self.payload_len]);
        Ok(self.payload_len)
    }
}

/// Parse exactly one frame starting at the ring's consume origin.
///
/// On success the consume index has advanced past the frame and the returned
/// view references the payload in place. On any failure the consume index is
/// untouched; [`CffError::IncompleteFrame`] means more bytes may complete the
/// frame, every other error means the bytes at the origin are not a frame.
pub fn parse_frame<S>(ring: &mut RingBuffer<S>) -> Result<FrameView<'_, S>>
where
    S: AsRef<[u8]> + AsMut<[u8]>,
{
    let used = ring.used();
    if used < MIN_FRAME_SIZE {
        return Err(CffError::IncompleteFrame);
    }

    if ring.peek_byte(0) != Some(PREAMBLE[0]) || ring.peek_byte(1) != Some(PREAMBLE[1]) {
        return Err(CffError::InvalidPreamble);
    }

    let frame_counter = ring.peek_u16_le(2).ok_or(CffError::IncompleteFrame)?;
    let payload_len = ring.peek_u16_le(4).ok_or(CffError::IncompleteFrame)? as usize;
    let stored_header_crc = ring.peek_u16_le(6).ok_or(CffError::IncompleteFrame)?;

    let computed_header_crc = ring.crc16_range(0, 6).ok_or(CffError::IncompleteFrame)?;
    if computed_header_crc != stored_header_crc {
        return Err(CffError::InvalidHeaderCrc {
            expected: computed_header_crc,
            found: stored_header_crc,
        });
    }

    // The header is trustworthy from here on; the size field is covered by
    // the CRC just checked.
    let total = frame_size(payload_len);
    if used < total {
        return Err(CffError::IncompleteFrame);
    }

    let stored_payload_crc = ring
        .peek_u16_le(HEADER_SIZE + payload_len)
        .ok_or(CffError::IncompleteFrame)?;
    let computed_payload_crc = ring
        .crc16_range(HEADER_SIZE, payload_len)
        .ok_or(CffError::IncompleteFrame)?;
    if computed_payload_crc != stored_payload_crc {
        return Err(CffError::InvalidPayloadCrc {
            expected: computed_payload_crc,
            found: stored_payload_crc,
        });
    }

    let payload_start = ring.absolute_index(HEADER_SIZE);
    ring.discard(total);

    Ok(FrameView {
        ring: &*ring,
        frame_counter,
        payload_len,
        payload_start,
        header_crc: stored_header_crc,
        payload_crc: stored_payload_crc,
    })
}

/// Parse every complete frame buffered in `ring`, delivering each to
/// `callback`, and return the number delivered.
///
/// Validation failures are recovered internally: the consume origin slides
/// forward one byte and scanning resumes, so a later well-aligned frame still
/// parses. An incomplete trailing frame is left buffered for the next call.
pub fn parse_frames<S, F>(ring: &mut RingBuffer<S>, mut callback: F) -> usize
where
    S: AsRef<[u8]> + AsMut<[u8]>,
    F: FnMut(&FrameView<'_, S>),
{
    let mut parsed = 0;

    loop {
        if ring.used() < MIN_FRAME_SIZE {
            break;
        }

        match find_preamble(ring) {
            Some(offset) => ring.discard(offset),
            None => {
                // Keep the final byte: it may be the first preamble byte of
                // a frame whose remainder has not arrived yet.
                ring.discard(ring.used() - 1);
                break;
            }
        }

        match parse_frame(ring) {
            Ok(frame) => {
                callback(&frame);
                parsed += 1;
            }
            Err(CffError::IncompleteFrame) => break,
            Err(_) => ring.discard(1),
        }
    }

    parsed
}

/// Logical offset of the first preamble occurrence, if any.
fn find_preamble<S>(ring: &RingBuffer<S>) -> Option<usize>
where
    S: AsRef<[u8]> + AsMut<[u8]>,
{
    let used = ring.used();
    (0..used.saturating_sub(1)).find(|&offset| {
        ring.peek_byte(offset) == Some(PREAMBLE[0]) && ring.peek_byte(offset + 1) == Some(PREAMBLE[1])
    })
}
