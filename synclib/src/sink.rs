use crate::types::OutputChunk;

use tokio::io::{self, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// The shared console sink all runners append to.
///
/// This struct is actually a handle; the real work is done by the drain task
/// spawned in `from_writer`, which owns the writer and writes submitted
/// chunks one at a time. Each chunk therefore lands contiguously on the
/// console without the runners contending on a lock.
#[derive(Clone)]
pub struct OutputSink {
    sender: mpsc::UnboundedSender<OutputChunk>,
}

impl OutputSink {
    /// A sink draining to the process's stdout.
    pub fn stdout() -> (Self, JoinHandle<io::Result<io::Stdout>>) {
        Self::from_writer(io::stdout())
    }

    /// A sink draining to an arbitrary writer. The returned task resolves
    /// with the writer, fully flushed, once every handle has been dropped.
    pub fn from_writer<W>(mut writer: W) -> (Self, JoinHandle<io::Result<W>>)
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let (sender, mut inbox) = mpsc::unbounded_channel::<OutputChunk>();
        let drain = tokio::spawn(async move {
            while let Some(chunk) = inbox.recv().await {
                writer.write_all(&chunk).await?;
                // flush per chunk so interleaved jobs render live
                writer.flush().await?;
            }
            Ok(writer)
        });
        (Self { sender }, drain)
    }

    /// Append one chunk. Ignored if the drain task is gone.
    pub fn write(&self, chunk: OutputChunk) {
        let _ = self.sender.send(chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[tokio::test]
    async fn drains_chunks_in_submission_order() {
        let (sink, drain) = OutputSink::from_writer(Vec::new());
        sink.write(Bytes::from_static(b"one "));
        sink.write(Bytes::from_static(b"two "));
        sink.write(Bytes::from_static(b"three"));
        drop(sink);
        let written = drain.await.expect("drain task").expect("write");
        assert_eq!(written, b"one two three");
    }

    #[tokio::test]
    async fn clones_share_one_stream() {
        let (sink, drain) = OutputSink::from_writer(Vec::new());
        let clone = sink.clone();
        sink.write(Bytes::from_static(b"a"));
        clone.write(Bytes::from_static(b"b"));
        drop(sink);
        drop(clone);
        let written = drain.await.expect("drain task").expect("write");
        assert_eq!(written, b"ab");
    }
}
