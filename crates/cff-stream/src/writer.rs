use std::io::{ErrorKind, Write};

use cff_codec::{frame_size, FrameBuilder, MAX_PAYLOAD_SIZE};
use tracing::trace;

use crate::error::{Result, StreamError};
use crate::StreamConfig;

/// Writes complete frames to any `Write` stream.
///
/// The frame counter runs across the life of the writer, so receivers see a
/// gapless, wrapping sequence.
pub struct FrameWriter<T> {
    inner: T,
    builder: FrameBuilder<Vec<u8>>,
    config: StreamConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, StreamConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: StreamConfig) -> Self {
        let max = config.max_payload_size.min(MAX_PAYLOAD_SIZE);
        let builder =
            FrameBuilder::new(vec![0u8; frame_size(max)]).expect("buffer holds a minimum frame");
        Self {
            inner,
            builder,
            config,
        }
    }

    /// Encode `payload` as one frame and send it (blocking).
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() > self.config.max_payload_size {
            return Err(StreamError::PayloadTooLarge {
                size: payload.len(),
                max: self.config.max_payload_size,
            });
        }

        let frame_counter = self.builder.frame_counter();
        let frame = self.builder.build(payload)?;

        let mut offset = 0usize;
        while offset < frame.len() {
            match self.inner.write(&frame[offset..]) {
                Ok(0) => return Err(StreamError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(StreamError::Io(err)),
            }
        }

        trace!(frame_counter, payload_len = payload.len(), "frame sent");
        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(StreamError::Io(err)),
            }
        }
    }

    /// The counter the next frame will be stamped with.
    pub fn frame_counter(&self) -> u16 {
        self.builder.frame_counter()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current writer configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }
}
