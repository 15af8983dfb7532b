/// Errors that can occur while building, buffering, or parsing frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CffError {
    /// A caller-provided buffer cannot hold the result.
    #[error("buffer too small ({capacity} bytes, need {required})")]
    BufferTooSmall { required: usize, capacity: usize },

    /// A ring-buffer append exceeds free space, or a consume exceeds the
    /// bytes available.
    #[error("insufficient space ({requested} bytes requested, {available} available)")]
    InsufficientSpace { requested: usize, available: usize },

    /// The payload does not fit the 16-bit size field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// More bytes are needed before a frame can be parsed.
    #[error("incomplete frame")]
    IncompleteFrame,

    /// The bytes at the parse origin are not the frame preamble.
    #[error("invalid preamble (expected 0xFA 0xCE)")]
    InvalidPreamble,

    /// The stored header CRC does not match the header bytes.
    #[error("invalid header CRC (computed {expected:#06x}, stored {found:#06x})")]
    InvalidHeaderCrc { expected: u16, found: u16 },

    /// The stored payload CRC does not match the payload bytes.
    #[error("invalid payload CRC (computed {expected:#06x}, stored {found:#06x})")]
    InvalidPayloadCrc { expected: u16, found: u16 },
}

pub type Result<T> = std::result::Result<T, CffError>;
