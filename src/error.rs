// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error type shared by the index, the backtracker and the sequence store.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// A seek asked for a rank outside `[0, size)`. The index is unchanged.
    #[error("rank {rank} out of range (size {size})")]
    RankOutOfRange { rank: u64, size: u64 },

    /// A tuple handed to the index holds a value outside `[0, n)`.
    #[error("tuple value {value} out of range for n = {n}")]
    ValueOutOfRange { value: u32, n: usize },

    /// The adjacency rule and the candidate domain disagree about the universe.
    #[error("rule '{rule}' expects a domain of {expected} candidates, got {actual}")]
    DomainMismatch {
        rule: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Nodes must be pushed with the level increasing by at most one.
    #[error("push at level {level} skips levels (current depth {depth})")]
    LevelSkip { level: usize, depth: usize },

    #[error("tree depth {depth} exceeds configured maximum {max}")]
    DepthExceeded { depth: usize, max: usize },

    #[error("sequence of length {actual} does not fit records of length {expected}")]
    RecordLength { expected: usize, actual: usize },

    #[error("operation not available in {0} mode")]
    ModeMismatch(&'static str),

    #[error("short read: asked for {expected} bytes, received {actual}")]
    ShortRead { expected: usize, actual: usize },

    #[error("bad sequence file header: {0}")]
    BadHeader(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = SearchError::RankOutOfRange { rank: 12, size: 10 };
        assert_eq!(err.to_string(), "rank 12 out of range (size 10)");

        let err = SearchError::ShortRead {
            expected: 20,
            actual: 7,
        };
        assert_eq!(err.to_string(), "short read: asked for 20 bytes, received 7");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SearchError = io.into();
        assert!(matches!(err, SearchError::Io(_)));
    }
}
