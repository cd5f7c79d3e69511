//! Error types for automaton construction, queries, and persistence.

use thiserror::Error;

use super::byte_string::ByteString;

/// Error variants for FSA operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A key was inserted out of order. The builder rejects the key before
    /// touching the graph, so the automaton stays usable.
    #[error("out-of-order key: '{previous}' sorts after '{input}'")]
    OrderViolation {
        /// The last key the builder accepted.
        previous: ByteString,
        /// The offending key.
        input: ByteString,
    },

    /// An insertion was attempted after the automaton was finalized.
    #[error("automaton is finalized, cannot insert more keys")]
    Finalized,

    /// An input contained one of the reserved bytes `0x00` or `0xff`.
    #[error("reserved byte 0x{0:02x} in input")]
    ReservedByte(u8),

    /// Structural validation failed while reading an automaton file.
    #[error("invalid fsa file: {0}")]
    InvalidFile(&'static str),

    /// An I/O error occurred during read or write.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for FSA operations.
pub type Result<T> = std::result::Result<T, Error>;
