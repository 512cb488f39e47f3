use std::io;
use std::result;
use thiserror::Error;
use tokio::task::JoinError;

/// Environment faults only. A child that runs and exits non-zero is a
/// normal `JobResult`, never a `SyncError`.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("failed to spawn {program}: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("failed to reap child process: {0}")]
    Wait(io::Error),
    #[error("job task failed: {0}")]
    Task(#[from] JoinError),
}

pub type Result<T> = result::Result<T, SyncError>;
