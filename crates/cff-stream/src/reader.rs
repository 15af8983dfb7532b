use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use cff_codec::{frame_size, parse_frames, RingBuffer, MIN_FRAME_SIZE};
use tracing::{trace, warn};

use crate::error::{Result, StreamError};
use crate::{Frame, StreamConfig};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete frames from any `Read` stream.
///
/// Incoming bytes are staged in a receive ring and decoded by the codec's
/// resynchronizing parser, so corrupted stretches of the stream are skipped
/// (with a warning) rather than ending the connection. Callers always get
/// complete, CRC-validated frames.
pub struct FrameReader<T> {
    inner: T,
    ring: RingBuffer<Vec<u8>>,
    pending: VecDeque<Frame>,
    config: StreamConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, StreamConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: StreamConfig) -> Self {
        let capacity = config.ring_capacity.max(MIN_FRAME_SIZE);
        let ring = RingBuffer::new(vec![0u8; capacity]).expect("clamped capacity is nonzero");
        Self {
            inner,
            ring,
            pending: VecDeque::new(),
            config,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(StreamError::ConnectionClosed)` when EOF is reached, and
    /// `Err(StreamError::FrameTooLarge)` if the stream carries a frame whose
    /// declared size can never fit the receive ring.
    pub fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                trace!(
                    frame_counter = frame.frame_counter,
                    payload_len = frame.payload.len(),
                    "frame received"
                );
                return Ok(frame);
            }

            // A full ring with nothing decodable means the frame at the head
            // declares a size the ring can never buffer.
            if self.ring.free_space() == 0 {
                let declared = self.ring.peek_u16_le(4).unwrap_or(0) as usize;
                return Err(StreamError::FrameTooLarge {
                    size: frame_size(declared),
                    capacity: self.ring.capacity(),
                });
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let want = self.ring.free_space().min(READ_CHUNK_SIZE);
            let read = match self.inner.read(&mut chunk[..want]) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(StreamError::Io(err)),
            };

            if read == 0 {
                return Err(StreamError::ConnectionClosed);
            }

            self.ring.append(&chunk[..read])?;
            self.decode_buffered();
        }
    }

    /// Drain every complete frame currently buffered into the pending queue.
    fn decode_buffered(&mut self) {
        let used_before = self.ring.used();
        let mut delivered_bytes = 0;
        // Valid frames dropped for exceeding the payload limit, counted
        // separately so the resynchronization warning reports only bytes
        // actually lost to corruption.
        let mut skipped_bytes = 0;

        let pending = &mut self.pending;
        let max_payload = self.config.max_payload_size;
        parse_frames(&mut self.ring, |view| {
            if view.payload_len() > max_payload {
                warn!(
                    payload_len = view.payload_len(),
                    max_payload, "dropping frame above the configured payload limit"
                );
                skipped_bytes += frame_size(view.payload_len());
                return;
            }

            let mut payload = BytesMut::zeroed(view.payload_len());
            view.copy_payload(&mut payload)
                .expect("payload buffer is sized exactly");
            pending.push_back(Frame {
                frame_counter: view.frame_counter(),
                payload: payload.freeze(),
            });
            delivered_bytes += frame_size(view.payload_len());
        });

        let consumed = used_before - self.ring.used();
        let discarded = consumed - delivered_bytes - skipped_bytes;
        if discarded > 0 {
            warn!(discarded, "discarded bytes while resynchronizing");
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current reader configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }
}
