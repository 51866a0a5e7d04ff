pub mod cancellation;
pub mod coordinator;
pub mod field;
pub mod schedule;
pub mod worker;

pub use cancellation::{
    AtomicBoolChecker, CancelEither, CancellationChecker, CancellationToken, NeverCancel,
};
pub use coordinator::Coordinator;
pub use field::{ColumnSamples, GraphField, SamplePair, SAMPLE_STEP};
pub use schedule::dispatch;
pub use worker::{run_partition, RunContext};

// Re-export core types for convenience
pub use graphdemo_core::*;
