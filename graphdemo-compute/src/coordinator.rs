//! Run lifecycle: buffer, color, cancellation token, workers and timing.

use crate::cancellation::{CancelEither, CancellationToken};
use crate::schedule::dispatch;
use crate::worker::RunContext;
use graphdemo_core::{
    partition_columns, ColorSample, GraphError, GridConfig, PixelBuffer, Result, RunConfig,
    RunProgress, RunResult,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Drives runs of the graph kernel.
///
/// At most one run is in flight at a time. `cancel` may be called from any
/// thread while `run_once` blocks on another.
#[derive(Default)]
pub struct Coordinator {
    /// Token of the run in flight, `None` when idle.
    active: Mutex<Option<CancellationToken>>,
    /// Buffer of the last run, reused while the grid size is unchanged.
    buffer: Mutex<Option<Arc<PixelBuffer>>>,
    completed_columns: Arc<AtomicU32>,
    total_columns: AtomicU32,
    clear_between_runs: bool,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero a reused buffer before each run instead of drawing over the
    /// previous image.
    pub fn with_clear_between_runs(mut self, clear: bool) -> Self {
        self.clear_between_runs = clear;
        self
    }

    /// Run once with a freshly drawn color.
    pub fn run_once(&self, config: &RunConfig) -> Result<RunResult> {
        self.execute(
            config,
            ColorSample::random(&mut rand::rng()),
            CancellationToken::new(),
        )
    }

    /// Run once with the color drawn from `seed`.
    pub fn run_once_seeded(&self, config: &RunConfig, seed: u64) -> Result<RunResult> {
        self.execute(config, ColorSample::from_seed(seed), CancellationToken::new())
    }

    /// Run once with a fresh color, observing a token created by the caller.
    ///
    /// Lets a caller hand out the token before the run is scheduled, so a
    /// cancel issued in between is not lost. A token that already drove a run
    /// is rejected with `TokenReused`.
    pub fn run_with_token(
        &self,
        config: &RunConfig,
        token: CancellationToken,
    ) -> Result<RunResult> {
        self.execute(config, ColorSample::random(&mut rand::rng()), token)
    }

    /// Request cancellation of the run in flight.
    ///
    /// Returns true if this call requested it. Calling again, calling while
    /// idle, or calling after the run finished does nothing.
    pub fn cancel(&self) -> bool {
        match self.lock_active().as_ref() {
            Some(token) => {
                let requested = token.cancel();
                if requested {
                    log::info!("Cancellation requested");
                }
                requested
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock_active().is_some()
    }

    /// Buffer of the current or most recent run.
    pub fn buffer(&self) -> Option<Arc<PixelBuffer>> {
        self.lock_buffer().clone()
    }

    pub fn progress(&self) -> RunProgress {
        RunProgress {
            completed_columns: self.completed_columns.load(Ordering::Relaxed),
            total_columns: self.total_columns.load(Ordering::Relaxed),
        }
    }

    fn execute(
        &self,
        config: &RunConfig,
        color: ColorSample,
        token: CancellationToken,
    ) -> Result<RunResult> {
        config.validate()?;
        let grid = config.grid();
        let partitions = partition_columns(grid.width, config.partition_count)?;

        {
            let mut active = self.lock_active();
            if active.is_some() {
                log::warn!("Rejected start: a run is already in flight");
                return Err(GraphError::RunInFlight);
            }
            if !token.claim() {
                log::warn!("Rejected start: cancellation token already used");
                return Err(GraphError::TokenReused);
            }
            *active = Some(token.clone());
        }
        let _active = ActiveRun { coordinator: self };

        let buffer = self.acquire_buffer(grid);
        self.completed_columns.store(0, Ordering::Relaxed);
        self.total_columns.store(grid.half_width(), Ordering::Relaxed);

        let ctx = RunContext::new(grid, color, buffer, Arc::clone(&self.completed_columns));
        let fault = CancellationToken::new();
        let checker = CancelEither::new(token.checker(), fault.checker());

        log::info!(
            "Starting run: {}x{}, {} partitions, {:?}",
            grid.width,
            grid.height,
            partitions.len(),
            config.schedule
        );

        let start = Instant::now();
        let outcomes = dispatch(config.schedule, &partitions, &ctx, &checker, &fault);
        let elapsed = start.elapsed();

        let worker_statuses = outcomes
            .into_iter()
            .collect::<Result<Vec<_>>>()
            .inspect_err(|e| log::warn!("Run failed after {:?}: {}", elapsed, e))?;

        let result = RunResult::new(elapsed, worker_statuses, color);
        log::info!(
            "Run finished in {}ms: {:?} ({})",
            result.elapsed_ms(),
            result.completion,
            result.status_text()
        );
        Ok(result)
    }

    fn acquire_buffer(&self, grid: GridConfig) -> Arc<PixelBuffer> {
        let mut slot = self.lock_buffer();
        match slot.as_ref() {
            Some(buffer) if buffer.grid() == grid => {
                log::debug!("Reusing {}x{} buffer", grid.width, grid.height);
                if self.clear_between_runs {
                    buffer.clear();
                }
                Arc::clone(buffer)
            }
            _ => {
                log::debug!(
                    "Allocating {}x{} buffer ({} bytes)",
                    grid.width,
                    grid.height,
                    grid.byte_len()
                );
                let buffer = Arc::new(PixelBuffer::new(grid));
                *slot = Some(Arc::clone(&buffer));
                buffer
            }
        }
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_buffer(&self) -> MutexGuard<'_, Option<Arc<PixelBuffer>>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Discards the run's token when the run ends, however it ends.
struct ActiveRun<'a> {
    coordinator: &'a Coordinator,
}

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        *self.coordinator.lock_active() = None;
    }
}
