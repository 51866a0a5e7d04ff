use crate::ColorSample;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Message shown in place of the duration when a run was cancelled.
pub const CANCELLED_MESSAGE: &str = "The operation was canceled.";

/// Terminal state of one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerStatus {
    Completed,
    Cancelled,
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerStatus::Completed => write!(f, "Completed"),
            WorkerStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Terminal state of a whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionStatus {
    Completed,
    Cancelled,
}

impl CompletionStatus {
    /// Cancelled as soon as any worker was cancelled.
    pub fn from_workers(statuses: &[WorkerStatus]) -> Self {
        if statuses.contains(&WorkerStatus::Cancelled) {
            CompletionStatus::Cancelled
        } else {
            CompletionStatus::Completed
        }
    }
}

/// Outcome of one run, handed to the reporting layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub elapsed: Duration,
    pub completion: CompletionStatus,
    /// One entry per partition, in partition order.
    pub worker_statuses: Vec<WorkerStatus>,
    pub color: ColorSample,
}

impl RunResult {
    pub fn new(elapsed: Duration, worker_statuses: Vec<WorkerStatus>, color: ColorSample) -> Self {
        Self {
            elapsed,
            completion: CompletionStatus::from_workers(&worker_statuses),
            worker_statuses,
            color,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.completion == CompletionStatus::Cancelled
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }

    /// "Duration (ms): N", or the cancellation message.
    pub fn duration_text(&self) -> String {
        match self.completion {
            CompletionStatus::Completed => format!("Duration (ms): {}", self.elapsed_ms()),
            CompletionStatus::Cancelled => CANCELLED_MESSAGE.to_string(),
        }
    }

    /// Terminal state of every worker, e.g. "Status of workers is Completed, Cancelled".
    pub fn status_text(&self) -> String {
        let statuses: Vec<String> = self.worker_statuses.iter().map(|s| s.to_string()).collect();
        format!("Status of workers is {}", statuses.join(", "))
    }

    /// One line with the elapsed time and every worker status, cancelled or not.
    pub fn summary_text(&self) -> String {
        let duration = format!("Duration (ms): {}", self.elapsed_ms());
        match self.completion {
            CompletionStatus::Completed => format!("{}. {}", duration, self.status_text()),
            CompletionStatus::Cancelled => {
                format!("{} {}. {}", CANCELLED_MESSAGE, duration, self.status_text())
            }
        }
    }
}

/// Progress of an ongoing run, counted in fully evaluated columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunProgress {
    pub completed_columns: u32,
    pub total_columns: u32,
}

impl RunProgress {
    pub fn new(total_columns: u32) -> Self {
        Self {
            completed_columns: 0,
            total_columns,
        }
    }

    /// Completion percentage (0.0 to 100.0).
    pub fn percentage(&self) -> f32 {
        if self.total_columns == 0 {
            0.0
        } else {
            (self.completed_columns as f32 / self.total_columns as f32) * 100.0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_columns >= self.total_columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(statuses: Vec<WorkerStatus>) -> RunResult {
        RunResult::new(Duration::from_millis(1234), statuses, ColorSample::default())
    }

    #[test]
    fn all_completed_workers_complete_the_run() {
        let res = result(vec![WorkerStatus::Completed, WorkerStatus::Completed]);
        assert_eq!(res.completion, CompletionStatus::Completed);
        assert!(!res.is_cancelled());
        assert_eq!(res.duration_text(), "Duration (ms): 1234");
    }

    #[test]
    fn one_cancelled_worker_cancels_the_run() {
        let res = result(vec![WorkerStatus::Completed, WorkerStatus::Cancelled]);
        assert_eq!(res.completion, CompletionStatus::Cancelled);
        assert_eq!(res.duration_text(), CANCELLED_MESSAGE);
    }

    #[test]
    fn status_text_lists_every_worker() {
        let res = result(vec![WorkerStatus::Completed, WorkerStatus::Cancelled]);
        assert_eq!(res.status_text(), "Status of workers is Completed, Cancelled");
    }

    #[test]
    fn summary_keeps_elapsed_time_of_cancelled_runs() {
        let done = result(vec![WorkerStatus::Completed, WorkerStatus::Completed]);
        assert_eq!(
            done.summary_text(),
            "Duration (ms): 1234. Status of workers is Completed, Completed"
        );

        let cancelled = result(vec![WorkerStatus::Cancelled, WorkerStatus::Completed]);
        assert_eq!(
            cancelled.summary_text(),
            "The operation was canceled. Duration (ms): 1234. \
             Status of workers is Cancelled, Completed"
        );
    }

    #[test]
    fn progress_percentage() {
        let mut progress = RunProgress::new(200);
        assert!((progress.percentage() - 0.0).abs() < 0.001);
        progress.completed_columns = 50;
        assert!((progress.percentage() - 25.0).abs() < 0.001);
        assert!(!progress.is_complete());
        progress.completed_columns = 200;
        assert!(progress.is_complete());
    }

    #[test]
    fn progress_with_no_columns() {
        let progress = RunProgress::new(0);
        assert!((progress.percentage() - 0.0).abs() < 0.001);
    }
}
