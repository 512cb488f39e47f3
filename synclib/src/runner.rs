use crate::errors::{Result, SyncError};
use crate::relay::LinePrefixer;
use crate::sink::OutputSink;
use crate::types::{JobResult, JobSpec, OutputChunk};

use bytes::BytesMut;
use std::os::unix::process::ExitStatusExt;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Build the invocation for one job: extra flags first, then source and
/// destination, matching the wrapped tool's `[flags..] SRC DST` contract.
fn command_for(program: &str, spec: &JobSpec) -> Command {
    let mut command = Command::new(program);
    command
        .args(&spec.extra_args)
        .arg(&spec.source)
        .arg(&spec.destination)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    command
}

/// Run one job to completion: spawn the wrapped tool, relay its combined
/// stdout/stderr through `sink` with this job's prefix, await the exit code.
///
/// A non-zero exit is a normal `JobResult`; only environment faults such as
/// a failed spawn come back as `SyncError`.
pub async fn run(program: &str, spec: JobSpec, sink: OutputSink) -> Result<JobResult> {
    let mut command = command_for(program, &spec);
    info!(
        job = spec.index + 1,
        source = %spec.source,
        destination = %spec.destination,
        "starting {}", program
    );
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(source) => {
            error!(job = spec.index + 1, program, "failed to spawn: {}", source);
            return Err(SyncError::Spawn {
                program: program.to_string(),
                source,
            });
        }
    };

    // one channel carries both pipes; the readers merge into it
    let (chunk_tx, mut chunk_rx) = mpsc::unbounded_channel();
    if let Some(stdout) = child.stdout.take() {
        spawn_reader(stdout, chunk_tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_reader(stderr, chunk_tx.clone());
    }
    drop(chunk_tx); // the stream ends when both readers hang up

    let mut relay = LinePrefixer::new(&spec.prefix());
    while let Some(chunk) = chunk_rx.recv().await {
        debug!(
            job = spec.index + 1,
            "{}",
            String::from_utf8_lossy(&chunk).trim_end()
        );
        sink.write(relay.feed(&chunk));
    }
    if let Some(opening) = relay.finish() {
        sink.write(opening);
    }

    let status = child.wait().await.map_err(SyncError::Wait)?;
    // a signalled child has no exit code; report the negated signal number
    let exit_code = status
        .code()
        .or_else(|| status.signal().map(|signal| -signal))
        .unwrap_or(-1);
    info!(
        job = spec.index + 1,
        source = %spec.source,
        destination = %spec.destination,
        exit_code,
        "sync finished"
    );
    Ok(JobResult {
        index: spec.index,
        exit_code,
    })
}

fn spawn_reader<R>(mut pipe: R, chunk_tx: mpsc::UnboundedSender<OutputChunk>)
where
    R: AsyncRead + Send + Unpin + 'static,
{
    tokio::spawn(async move {
        let mut buf = BytesMut::with_capacity(4096);
        loop {
            match pipe.read_buf(&mut buf).await {
                Ok(n) if n > 0 => {
                    // move the bytes out of buf and into a message
                    let _ = chunk_tx.send(buf.split().freeze());
                }
                _ => {
                    break;
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn spec(extra_args: Vec<String>) -> JobSpec {
        JobSpec {
            source: "S".into(),
            destination: "D".into(),
            index: 0,
            extra_args,
        }
    }

    #[test]
    fn argv_is_extra_flags_then_source_then_destination() {
        let command = command_for("rsync", &spec(vec!["-avh".into(), "--dry-run".into()]));
        let argv: Vec<&OsStr> = command.as_std().get_args().collect();
        assert_eq!(argv, ["-avh", "--dry-run", "S", "D"]);
        assert_eq!(command.as_std().get_program(), "rsync");
    }

    #[test]
    fn argv_without_extra_flags() {
        let command = command_for("rsync", &spec(vec![]));
        let argv: Vec<&OsStr> = command.as_std().get_args().collect();
        assert_eq!(argv, ["S", "D"]);
    }
}
