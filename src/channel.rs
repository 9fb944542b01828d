use crate::sink::LogSink;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

/// Counters of a [`ChannelSink`]; clones observe the same values.
#[derive(Debug, Clone, Default)]
pub struct ChannelStats {
    enqueued: Arc<AtomicU64>,
    dropped: Arc<AtomicU64>,
    written: Arc<AtomicU64>,
}

impl ChannelStats {
    /// Lines accepted into the channel.
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    /// Lines dropped because the channel was full or closed.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Lines the background task wrote successfully.
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }
}

/// Non-blocking sink that hands lines to a background Tokio task.
///
/// `write_line` never waits: lines go into a bounded channel and a task
/// spawned by [`ChannelSink::new`] writes them to the underlying
/// [`AsyncWrite`]. When the channel is full the line is dropped and the
/// call returns [`io::ErrorKind::WouldBlock`].
///
/// The task ends once the sink is dropped and the channel is drained; its
/// [`JoinHandle`] then yields the writer.
pub struct ChannelSink {
    sender: mpsc::Sender<Vec<u8>>,
    stats: ChannelStats,
}

impl ChannelSink {
    /// Create a sink and spawn its writer task on the current Tokio runtime.
    ///
    /// `buffer` is the channel capacity in lines, with a floor of 16.
    pub fn new<W>(writer: W, buffer: usize) -> (Self, JoinHandle<W>)
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<Vec<u8>>(buffer.max(16));
        let stats = ChannelStats::default();
        let written = Arc::clone(&stats.written);

        let handle = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(line) = rx.recv().await {
                match writer.write_all(&line).await {
                    Ok(()) => {
                        written.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => eprintln!("fieldlog: error writing log line: {}", e),
                }
                if let Err(e) = writer.flush().await {
                    eprintln!("fieldlog: error flushing log writer: {}", e);
                }
            }
            writer
        });

        (Self { sender: tx, stats }, handle)
    }

    /// Sink writing to the process' standard output.
    pub fn stdout(buffer: usize) -> (Self, JoinHandle<tokio::io::Stdout>) {
        Self::new(tokio::io::stdout(), buffer)
    }

    pub fn stats(&self) -> ChannelStats {
        self.stats.clone()
    }
}

impl LogSink for ChannelSink {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        match self.sender.try_send(line.to_vec()) {
            Ok(()) => {
                self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                Err(io::Error::new(
                    io::ErrorKind::WouldBlock,
                    "log channel full, dropping log line",
                ))
            }
            Err(TrySendError::Closed(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "log writer task has stopped",
                ))
            }
        }
    }
}
