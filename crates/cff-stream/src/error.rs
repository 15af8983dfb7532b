use cff_codec::CffError;

/// Errors that can occur while reading or writing framed streams.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The codec rejected the frame being built or parsed.
    #[error("codec error: {0}")]
    Codec(#[from] CffError),

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A buffered frame declares a size that can never fit the receive ring.
    #[error("frame of {size} bytes cannot fit the {capacity}-byte receive ring")]
    FrameTooLarge { size: usize, capacity: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, StreamError>;
