use graphdemo_core::{RunConfig, RunResult};
use serde::{Deserialize, Serialize};

/// Commands delivered by the event layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Command {
    /// Start a run. Missing config fields fall back to the defaults.
    Start {
        #[serde(default)]
        config: RunConfig,
    },

    /// Cancel the run in flight.
    Cancel,
}

/// Outcome of a run, published once per run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum RunEvent {
    /// The run reached a terminal state (completed or cancelled).
    Finished { result: RunResult },

    /// The run failed.
    Failed { message: String },
}
