//! Execution strategies for the workers of a run.
//!
//! Every strategy reports exactly one outcome per partition, in partition
//! order, so they are interchangeable for the coordinator. `DataParallel`
//! additionally splits each partition column by column over the rayon pool,
//! since the columns near the center carry the most samples.

use crate::cancellation::{CancellationChecker, CancellationToken};
use crate::worker::{run_column, run_partition, RunContext};
use graphdemo_core::{GraphError, Partition, Result, Schedule, WorkerStatus};
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Smallest number of columns handed to one rayon task.
const MIN_COLUMNS_PER_TASK: usize = 16;

/// Run one worker per partition and wait for all of them.
///
/// A worker that fails raises `fault`, which the other workers observe
/// through `checker`, so a failing run winds down early.
pub fn dispatch<C: CancellationChecker>(
    schedule: Schedule,
    partitions: &[Partition],
    ctx: &RunContext,
    checker: &C,
    fault: &CancellationToken,
) -> Vec<Result<WorkerStatus>> {
    match schedule {
        Schedule::Serial => partitions
            .iter()
            .map(|&partition| {
                run_guarded(partition, fault, || run_partition(partition, ctx, checker))
            })
            .collect(),
        Schedule::Threads => std::thread::scope(|scope| {
            let handles: Vec<_> = partitions
                .iter()
                .map(|&partition| {
                    scope.spawn(move || {
                        run_guarded(partition, fault, || run_partition(partition, ctx, checker))
                    })
                })
                .collect();

            handles
                .into_iter()
                .zip(partitions)
                .map(|(handle, partition)| {
                    handle.join().unwrap_or_else(|_| Err(panicked(partition)))
                })
                .collect()
        }),
        Schedule::DataParallel => partitions
            .par_iter()
            .map(|&partition| {
                run_guarded(partition, fault, || run_balanced(partition, ctx, checker))
            })
            .collect(),
    }
}

/// Evaluate one partition column by column on the rayon pool.
fn run_balanced<C: CancellationChecker>(
    partition: Partition,
    ctx: &RunContext,
    checker: &C,
) -> Result<WorkerStatus> {
    let status = partition
        .columns()
        .into_par_iter()
        .with_min_len(MIN_COLUMNS_PER_TASK)
        .map(|x| run_column(x, ctx, checker))
        .try_reduce(|| WorkerStatus::Completed, |a, b| Ok(merge(a, b)))
        .inspect_err(|e| {
            log::warn!("Worker {}..{} failed: {}", partition.start, partition.end, e)
        })?;

    log::debug!("Worker {}..{} {:?}", partition.start, partition.end, status);
    Ok(status)
}

fn merge(a: WorkerStatus, b: WorkerStatus) -> WorkerStatus {
    if a == WorkerStatus::Cancelled || b == WorkerStatus::Cancelled {
        WorkerStatus::Cancelled
    } else {
        WorkerStatus::Completed
    }
}

fn run_guarded<F>(partition: Partition, fault: &CancellationToken, work: F) -> Result<WorkerStatus>
where
    F: FnOnce() -> Result<WorkerStatus>,
{
    let outcome =
        catch_unwind(AssertUnwindSafe(work)).unwrap_or_else(|_| Err(panicked(&partition)));

    if outcome.is_err() {
        fault.cancel();
    }
    outcome
}

fn panicked(partition: &Partition) -> GraphError {
    GraphError::WorkerPanicked {
        start: partition.start,
        end: partition.end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancellation::NeverCancel;
    use graphdemo_core::{partition_columns, ColorSample, GridConfig, PixelBuffer};
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;

    fn context(width: u32, height: u32) -> RunContext {
        let grid = GridConfig::new(width, height);
        RunContext::new(
            grid,
            ColorSample::new(1, 2, 3),
            Arc::new(PixelBuffer::new(grid)),
            Arc::new(AtomicU32::new(0)),
        )
    }

    fn image(schedule: Schedule, partition_count: usize) -> Vec<u8> {
        let ctx = context(200, 200);
        let partitions = partition_columns(200, partition_count).unwrap();
        let fault = CancellationToken::new();
        let outcomes = dispatch(schedule, &partitions, &ctx, &NeverCancel, &fault);

        assert_eq!(outcomes.len(), partition_count);
        assert!(outcomes
            .iter()
            .all(|o| matches!(o, Ok(WorkerStatus::Completed))));
        assert_eq!(ctx.completed_columns(), 100);
        ctx.buffer.to_bytes()
    }

    #[test]
    fn schedules_produce_identical_images() {
        let serial = image(Schedule::Serial, 1);
        assert_eq!(image(Schedule::Threads, 2), serial);
        assert_eq!(image(Schedule::Threads, 7), serial);
        assert_eq!(image(Schedule::DataParallel, 1), serial);
        assert_eq!(image(Schedule::DataParallel, 4), serial);
        assert_eq!(image(Schedule::DataParallel, 150), serial);
    }

    #[test]
    fn any_cancelled_column_cancels_the_partition() {
        use WorkerStatus::{Cancelled, Completed};
        assert_eq!(merge(Completed, Completed), Completed);
        assert_eq!(merge(Completed, Cancelled), Cancelled);
        assert_eq!(merge(Cancelled, Completed), Cancelled);
    }

    #[test]
    fn balanced_partition_fails_on_out_of_range_write() {
        let ctx = context(1000, 10);
        let partitions = partition_columns(1000, 1).unwrap();
        let fault = CancellationToken::new();
        let outcomes = dispatch(
            Schedule::DataParallel,
            &partitions,
            &ctx,
            &fault.checker(),
            &fault,
        );

        assert!(fault.is_cancelled());
        assert!(matches!(outcomes[..], [Err(GraphError::OutOfRangeWrite { .. })]));
    }

    #[test]
    fn failing_worker_raises_fault() {
        let ctx = context(1000, 10);
        let partitions = partition_columns(1000, 2).unwrap();
        let fault = CancellationToken::new();
        let outcomes = dispatch(
            Schedule::Threads,
            &partitions,
            &ctx,
            &fault.checker(),
            &fault,
        );

        assert!(fault.is_cancelled());
        assert!(outcomes
            .iter()
            .any(|o| matches!(o, Err(GraphError::OutOfRangeWrite { .. }))));
    }

    #[test]
    fn cancelled_checker_stops_every_schedule() {
        for schedule in [Schedule::Serial, Schedule::Threads, Schedule::DataParallel] {
            let ctx = context(200, 200);
            let partitions = partition_columns(200, 3).unwrap();
            let token = CancellationToken::new();
            token.cancel();
            let fault = CancellationToken::new();

            let outcomes = dispatch(schedule, &partitions, &ctx, &token.checker(), &fault);
            assert!(outcomes
                .iter()
                .all(|o| matches!(o, Ok(WorkerStatus::Cancelled))));
            assert!(!fault.is_cancelled());
        }
    }
}
