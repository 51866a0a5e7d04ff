//! Grid and run configuration.
//!
//! A `RunConfig` is validated before any run starts and stays immutable for
//! the lifetime of that run. Configurations can be built in code or parsed from
//! JSON, where every field is optional and falls back to the defaults below.

use crate::{GraphError, Result};
use serde::{Deserialize, Serialize};

/// Bytes per pixel in the packed BGRA output format.
pub const BYTES_PER_PIXEL: usize = 4;

/// Default grid width in pixels.
pub const DEFAULT_WIDTH: u32 = 15_000;

/// Default grid height in pixels.
pub const DEFAULT_HEIGHT: u32 = 10_000;

/// Default number of concurrent workers.
pub const DEFAULT_PARTITION_COUNT: usize = 2;

/// Dimensions of the pixel grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: u32,
    pub height: u32,
}

impl GridConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Reject grids the field function cannot be evaluated over.
    ///
    /// Both dimensions must be positive and even so that the mirrored
    /// left/right columns meet exactly at `width / 2`.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GraphError::InvalidConfiguration(format!(
                "grid must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width % 2 != 0 || self.height % 2 != 0 {
            return Err(GraphError::InvalidConfiguration(format!(
                "grid dimensions must be even, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Number of columns the workers iterate over (`width / 2`).
    pub fn half_width(&self) -> u32 {
        self.width / 2
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of the output image in bytes.
    pub fn byte_len(&self) -> usize {
        self.pixel_count() * BYTES_PER_PIXEL
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

/// How the workers of a run are executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schedule {
    /// Partitions run one after another on the calling thread.
    Serial,
    /// One scoped OS thread per partition.
    #[default]
    Threads,
    /// Partitions are dispatched onto the rayon thread pool.
    DataParallel,
}

/// Everything needed to start one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub width: u32,
    pub height: u32,
    pub partition_count: usize,
    pub schedule: Schedule,
}

impl RunConfig {
    pub fn new(width: u32, height: u32, partition_count: usize) -> Self {
        Self {
            width,
            height,
            partition_count,
            schedule: Schedule::default(),
        }
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// One partition per available core.
    pub fn with_available_parallelism(mut self) -> Self {
        self.partition_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(DEFAULT_PARTITION_COUNT);
        self
    }

    pub fn grid(&self) -> GridConfig {
        GridConfig::new(self.width, self.height)
    }

    pub fn validate(&self) -> Result<()> {
        self.grid().validate()?;
        if self.partition_count < 1 {
            return Err(GraphError::InvalidConfiguration(
                "partition_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RunConfig = serde_json::from_str(json)
            .map_err(|e| GraphError::InvalidConfiguration(format!("Parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_PARTITION_COUNT)
    }
}
