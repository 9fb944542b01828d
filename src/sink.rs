use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Destination for serialized log lines.
///
/// Implementations must write each line as a unit: concurrent callers may
/// never observe a line interleaved with another one.
pub trait LogSink: Send + Sync {
    /// Write one complete line, including its terminating newline.
    fn write_line(&self, line: &[u8]) -> io::Result<()>;

    /// Flush any buffered lines.
    ///
    /// Default implementation is a no-op.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock leaves at worst a partial line behind.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sink writing to any [`Write`] implementation behind a mutex.
///
/// The lock is held for a single `write_all` of the whole line.
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        WriterSink::new(io::stdout())
    }
}

impl WriterSink<io::Stderr> {
    pub fn stderr() -> Self {
        WriterSink::new(io::stderr())
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        lock(&self.writer).write_all(line)
    }

    fn flush(&self) -> io::Result<()> {
        lock(&self.writer).flush()
    }
}

/// In-memory sink; clones share the same buffer.
///
/// Useful to capture output in tests.
#[derive(Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        lock(&self.buffer).clone()
    }

    /// Everything written so far, split into lines without terminators.
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&lock(&self.buffer))
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.buffer).clear();
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        lock(&self.buffer).extend_from_slice(line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_sink_writes_whole_lines() {
        let sink = WriterSink::new(Vec::new());
        sink.write_line(b"one\n").unwrap();
        sink.write_line(b"two\n").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.into_inner(), b"one\ntwo\n");
    }

    #[test]
    fn memory_sink_clones_share_buffer() {
        let sink = MemorySink::new();
        let clone = sink.clone();
        clone.write_line(b"{\"a\":1}\n").unwrap();
        assert_eq!(sink.lines(), vec!["{\"a\":1}".to_string()]);
        sink.clear();
        assert!(clone.contents().is_empty());
    }
}
