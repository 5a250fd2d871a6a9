//! Error types for cellset decoding.

use thiserror::Error;

/// Result type for cellset operations.
pub type CellsetResult<T> = Result<T, CellsetError>;

/// Errors raised while reading or decoding a cellset.
///
/// Decoding is all-or-nothing: any of these aborts the whole cellset.
#[derive(Error, Debug)]
pub enum CellsetError {
    /// Axes, tuples, cardinalities or cells are missing or inconsistent.
    #[error("malformed cellset: {0}")]
    MalformedCellset(String),

    /// The computed tuple index lies past the end of an axis' tuple list.
    #[error("tuple index {index} out of range on axis {axis} ({available} tuples)")]
    IndexOutOfRange {
        axis: usize,
        index: usize,
        available: usize,
    },

    /// A coordinate matched none of the cube dimensions under the strict policy.
    #[error("cell {ordinal}: coordinate '{coordinate}' matches no cube dimension")]
    UnmatchedCoordinate { ordinal: usize, coordinate: String },

    #[error("invalid cellset JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CellsetError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedCellset(message.into())
    }
}
