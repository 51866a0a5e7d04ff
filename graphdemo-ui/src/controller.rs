//! Start/cancel command handling on top of the coordinator.
//!
//! `start` launches a run on a background thread and returns immediately.
//! `cancel` asks the run in flight to stop. When a run ends, its image is
//! presented on the display surface and a [`RunEvent`] is published.

use crate::display::DisplaySurface;
use crate::messages::{Command, RunEvent};
use graphdemo_compute::{CancellationToken, Coordinator};
use graphdemo_core::{GraphError, Result, RunConfig, RunProgress, RunResult};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

#[derive(Default)]
struct ControllerState {
    /// Token of the run in flight, `None` when idle.
    token: Option<CancellationToken>,
    last_outcome: Option<std::result::Result<RunResult, GraphError>>,
}

pub struct GraphController<S: DisplaySurface + 'static> {
    coordinator: Arc<Coordinator>,
    surface: Arc<Mutex<S>>,
    state: Arc<Mutex<ControllerState>>,
    events: Sender<RunEvent>,
    run_thread: Option<JoinHandle<()>>,
}

impl<S: DisplaySurface + 'static> GraphController<S> {
    /// Create a controller and the receiver its run events are published on.
    pub fn new(surface: S) -> (Self, Receiver<RunEvent>) {
        Self::with_coordinator(Arc::new(Coordinator::new()), surface)
    }

    pub fn with_coordinator(
        coordinator: Arc<Coordinator>,
        surface: S,
    ) -> (Self, Receiver<RunEvent>) {
        let (events, receiver) = mpsc::channel();
        let controller = Self {
            coordinator,
            surface: Arc::new(Mutex::new(surface)),
            state: Arc::new(Mutex::new(ControllerState::default())),
            events,
            run_thread: None,
        };
        (controller, receiver)
    }

    pub fn handle(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Start { config } => self.start(config),
            Command::Cancel => {
                self.cancel();
                Ok(())
            }
        }
    }

    /// Parse a JSON command and handle it.
    pub fn handle_json(&mut self, json: &str) -> Result<()> {
        let command: Command = serde_json::from_str(json)
            .map_err(|e| GraphError::InvalidConfiguration(format!("Parse error: {}", e)))?;
        self.handle(command)
    }

    /// Launch a run in the background.
    ///
    /// A start while another run is in flight is rejected with `RunInFlight`,
    /// never queued.
    pub fn start(&mut self, config: RunConfig) -> Result<()> {
        config.validate()?;

        let token = {
            let mut state = lock(&self.state);
            if state.token.is_some() {
                log::warn!("Start ignored: a run is already in flight");
                return Err(GraphError::RunInFlight);
            }
            let token = CancellationToken::new();
            state.token = Some(token.clone());
            token
        };

        // The previous run has already released its token.
        if let Some(handle) = self.run_thread.take() {
            let _ = handle.join();
        }

        log::info!(
            "Plot requested: {}x{} with {} workers",
            config.width,
            config.height,
            config.partition_count
        );

        let coordinator = Arc::clone(&self.coordinator);
        let surface = Arc::clone(&self.surface);
        let state = Arc::clone(&self.state);
        let events = self.events.clone();

        self.run_thread = Some(thread::spawn(move || {
            let mut report = RunReport {
                state,
                events,
                outcome: None,
            };
            let outcome = coordinator.run_with_token(&config, token);

            // Cancelled runs are shown too, with whatever was plotted.
            if outcome.is_ok() {
                if let Some(buffer) = coordinator.buffer() {
                    lock(&surface).present(&buffer.to_bytes(), buffer.width(), buffer.height());
                }
            }

            report.outcome = Some(outcome);
        }));

        Ok(())
    }

    /// Request cancellation of the run in flight. No-op when idle.
    pub fn cancel(&self) -> bool {
        lock(&self.state)
            .token
            .as_ref()
            .is_some_and(CancellationToken::cancel)
    }

    pub fn is_running(&self) -> bool {
        lock(&self.state).token.is_some()
    }

    /// Block until the current run (if any) has finished.
    pub fn wait(&mut self) {
        if let Some(handle) = self.run_thread.take() {
            if handle.join().is_err() {
                log::error!("Run thread panicked");
            }
        }
    }

    pub fn progress(&self) -> RunProgress {
        self.coordinator.progress()
    }

    pub fn last_result(&self) -> Option<RunResult> {
        match &lock(&self.state).last_outcome {
            Some(Ok(result)) => Some(result.clone()),
            _ => None,
        }
    }

    /// Duration line of the last run: elapsed milliseconds, the cancellation
    /// message, or the failure.
    pub fn duration_text(&self) -> String {
        match &lock(&self.state).last_outcome {
            Some(Ok(result)) => result.duration_text(),
            Some(Err(e)) => e.to_string(),
            None => String::new(),
        }
    }

    /// Worker status line of the last run.
    pub fn status_text(&self) -> String {
        match &lock(&self.state).last_outcome {
            Some(Ok(result)) => result.status_text(),
            _ => String::new(),
        }
    }

    /// Elapsed time and worker statuses of the last run in one line.
    pub fn summary_text(&self) -> String {
        match &lock(&self.state).last_outcome {
            Some(Ok(result)) => result.summary_text(),
            Some(Err(e)) => e.to_string(),
            None => String::new(),
        }
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&lock(&self.surface))
    }
}

impl<S: DisplaySurface + 'static> Drop for GraphController<S> {
    fn drop(&mut self) {
        self.cancel();
        self.wait();
    }
}

/// Publishes the outcome of a run thread and frees the run slot when the
/// thread ends, including when it unwinds.
struct RunReport {
    state: Arc<Mutex<ControllerState>>,
    events: Sender<RunEvent>,
    outcome: Option<Result<RunResult>>,
}

impl Drop for RunReport {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or_else(|| {
            log::error!("Run thread panicked before reporting");
            Err(GraphError::RunPanicked)
        });

        let event = match &outcome {
            Ok(result) => RunEvent::Finished {
                result: result.clone(),
            },
            Err(e) => RunEvent::Failed {
                message: e.to_string(),
            },
        };

        {
            let mut state = lock(&self.state);
            state.token = None;
            state.last_outcome = Some(outcome);
        }

        // Nobody listening is fine.
        let _ = self.events.send(event);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
