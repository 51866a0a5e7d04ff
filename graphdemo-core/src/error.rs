//! Error types shared by every layer of the graph kernel.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Pixel ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfRangeWrite {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("A run is already in flight")]
    RunInFlight,

    #[error("Worker for columns {start}..{end} panicked")]
    WorkerPanicked { start: u32, end: u32 },

    #[error("Cancellation token was already used by another run")]
    TokenReused,

    #[error("Run thread panicked before reporting a result")]
    RunPanicked,
}

pub type Result<T> = std::result::Result<T, GraphError>;
