use crate::errors::{Result, SyncError};
use crate::runner;
use crate::sink::OutputSink;
use crate::types::{Dest, ExtraArgs, JobResult, JobSpec, Program, Source};

use futures::future;
use tracing::info;

const DEFAULT_PROGRAM: &str = "rsync";

/// Fans out one runner task per (source, destination) pair and converges
/// once every one of them has finished, however it finished.
pub struct Orchestrator {
    program: Program,
    sink: OutputSink,
}

impl Orchestrator {
    /// An orchestrator wrapping the conventionally named sync tool.
    pub fn new(sink: OutputSink) -> Self {
        Self::with_program(DEFAULT_PROGRAM.to_string(), sink)
    }

    /// An orchestrator wrapping an arbitrary executable.
    pub fn with_program(program: Program, sink: OutputSink) -> Self {
        Self { program, sink }
    }

    /// Run every pair to completion and return one outcome per pair, in
    /// input order. All jobs launch at once; a failing or unspawnable job
    /// never aborts its siblings, and nothing is returned until the whole
    /// set is done. An empty input completes immediately with no spawns.
    pub async fn run_all(
        &self,
        pairs: Vec<(Source, Dest)>,
        extra_args: ExtraArgs,
    ) -> Vec<Result<JobResult>> {
        info!(jobs = pairs.len(), "launching sync jobs");
        let handles: Vec<_> = pairs
            .into_iter()
            .enumerate()
            .map(|(index, (source, destination))| {
                let spec = JobSpec {
                    source,
                    destination,
                    index,
                    extra_args: extra_args.clone(),
                };
                let program = self.program.clone();
                let sink = self.sink.clone();
                tokio::spawn(async move { runner::run(&program, spec, sink).await })
            })
            .collect();

        let results: Vec<Result<JobResult>> = future::join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(outcome) => outcome,
                Err(join_error) => Err(SyncError::Task(join_error)),
            })
            .collect();

        let failed = results
            .iter()
            .filter(|outcome| !matches!(outcome, Ok(result) if result.success()))
            .count();
        info!(jobs = results.len(), failed, "all sync jobs completed");
        results
    }
}
