use thiserror::Error;

/// Errors produced by the hashing engine and the comparer.
#[derive(Debug, Error)]
pub enum FuzzyError {
    /// Caller passed arguments that violate the entry point's contract.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Fingerprint text that does not follow `blocksize:part1:part2`.
    #[error("Invalid fingerprint {input:?}: {reason}")]
    InvalidFingerprint { input: String, reason: &'static str },

    /// The input is too large for the block size table.
    #[error("Block size table overflow after {total_bytes} bytes")]
    BlockSizeOverflow { total_bytes: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FuzzyError>;
