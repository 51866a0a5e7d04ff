//! Evaluation of one partition of columns.

use crate::cancellation::CancellationChecker;
use crate::field::GraphField;
use graphdemo_core::{ColorSample, GridConfig, Partition, PixelBuffer, Result, WorkerStatus};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Everything a worker needs for one run.
///
/// Owned by the coordinator for the duration of the run and shared with the
/// workers by reference.
pub struct RunContext {
    pub grid: GridConfig,
    pub color: ColorSample,
    pub field: GraphField,
    pub buffer: Arc<PixelBuffer>,
    completed_columns: Arc<AtomicU32>,
}

impl RunContext {
    pub fn new(
        grid: GridConfig,
        color: ColorSample,
        buffer: Arc<PixelBuffer>,
        completed_columns: Arc<AtomicU32>,
    ) -> Self {
        debug_assert_eq!(buffer.grid(), grid, "buffer must match the run grid");
        Self {
            grid,
            color,
            field: GraphField::new(&grid),
            buffer,
            completed_columns,
        }
    }

    /// Columns fully evaluated so far in this run.
    pub fn completed_columns(&self) -> u32 {
        self.completed_columns.load(Ordering::Relaxed)
    }
}

/// Plot every column of `partition` in ascending order.
///
/// The checker is polled before each sample pair; once it reports
/// cancellation the worker stops mid-column and returns `Cancelled`. Pixels
/// already written stay in the buffer.
pub fn run_partition<C: CancellationChecker>(
    partition: Partition,
    ctx: &RunContext,
    checker: &C,
) -> Result<WorkerStatus> {
    for x in partition.columns() {
        let status = run_column(x, ctx, checker).inspect_err(|e| {
            log::warn!("Worker {}..{} failed: {}", partition.start, partition.end, e)
        })?;
        if status == WorkerStatus::Cancelled {
            log::debug!(
                "Worker {}..{} cancelled at column {}",
                partition.start,
                partition.end,
                x
            );
            return Ok(WorkerStatus::Cancelled);
        }
    }

    log::debug!("Worker {}..{} completed", partition.start, partition.end);
    Ok(WorkerStatus::Completed)
}

/// Plot a single column, polling the checker before each sample pair.
///
/// A column counts as completed only once all of its pairs are written.
pub fn run_column<C: CancellationChecker>(
    x: u32,
    ctx: &RunContext,
    checker: &C,
) -> Result<WorkerStatus> {
    for pair in ctx.field.sample(x) {
        if checker.is_cancelled() {
            return Ok(WorkerStatus::Cancelled);
        }
        ctx.buffer.write_pair(pair.left, pair.right, ctx.color)?;
    }
    ctx.completed_columns.fetch_add(1, Ordering::Relaxed);
    Ok(WorkerStatus::Completed)
}
