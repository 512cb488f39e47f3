mod orchestrator;
mod relay;
mod runner;
mod sink;
pub mod errors;
pub mod types;

pub use errors::SyncError;
pub use orchestrator::Orchestrator;
pub use sink::OutputSink;
