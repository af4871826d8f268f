pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Error returned when a grid cannot be built from the given input.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    #[display("grid size must be at least {min}, got {size}")]
    InvalidSize { size: usize, min: usize },
    #[display("row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[display("cell ({row}, {col}) holds {value}, which is neither empty nor a power of two")]
    InvalidCell { row: usize, col: usize, value: u32 },
}

/// Error returned when a [`GameConfig`] is rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("grid size must be in {min}..={max}, got {size}")]
    InvalidSize { size: usize, min: usize, max: usize },
    #[display("win target must be a power of two no less than 4, got {target}")]
    InvalidWinTarget { target: u32 },
}

/// Error returned when a [`GameSeed`] cannot be parsed from hex.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed: {reason}")]
pub struct SeedParseError {
    #[error(not(source))]
    reason: String,
}
