/// Runtime orchestrator module - Gateway

mod orchestrator;

pub use orchestrator::{apply_overrides, Orchestrator};
