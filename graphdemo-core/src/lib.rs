pub mod color;
pub mod config;
pub mod error;
pub mod partition;
pub mod pixel_buffer;
pub mod status;

pub use color::{ColorSample, ALPHA};
pub use config::{
    GridConfig, RunConfig, Schedule, BYTES_PER_PIXEL, DEFAULT_HEIGHT, DEFAULT_PARTITION_COUNT,
    DEFAULT_WIDTH,
};
pub use error::{GraphError, Result};
pub use partition::{partition_columns, Partition};
pub use pixel_buffer::PixelBuffer;
pub use status::{CompletionStatus, RunProgress, RunResult, WorkerStatus, CANCELLED_MESSAGE};
