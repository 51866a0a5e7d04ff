pub mod controller;
pub mod display;
pub mod messages;

pub use controller::GraphController;
pub use display::{DisplaySurface, MemorySurface};
pub use messages::{Command, RunEvent};
