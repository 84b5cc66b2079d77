//! Line-oriented frame sinks.

use crate::TransportError;
use log::info;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Sends serialized frames to a destination.
pub trait Sender: Send {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Flushes any buffered frames. No-op by default.
    fn flush(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Writes each frame to standard output, one per line.
pub struct StdioSender {
    stdout: io::Stdout,
}

impl StdioSender {
    pub fn new() -> Self {
        StdioSender { stdout: io::stdout() }
    }
}

impl Default for StdioSender {
    fn default() -> Self {
        Self::new()
    }
}

impl Sender for StdioSender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut out = self.stdout.lock();
        out.write_all(data)?;
        out.write_all(b"\n")?;
        out.flush()?; // observers piping stdout need each frame immediately
        Ok(())
    }
}

/// Appends each frame to a file, one per line.
pub struct FileSender {
    writer: BufWriter<File>,
}

impl FileSender {
    /// Opens `path` for appending, creating it if needed.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        info!("Writing ball actions to {}", path.display());
        Ok(Self { writer: BufWriter::new(file) })
    }
}

impl Sender for FileSender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.writer.write_all(data)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSender;

impl Sender for NullSender {
    fn send(&mut self, _data: &[u8]) -> Result<(), TransportError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn file_sender_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actions.log");

        let mut sender = FileSender::new(&path).unwrap();
        sender.send(b"first").unwrap();
        sender.send(b"second").unwrap();
        sender.flush().unwrap();
        drop(sender);

        let mut reopened = FileSender::new(&path).unwrap();
        reopened.send(b"third").unwrap();
        reopened.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\nthird\n");
    }

    #[test]
    fn null_sender_accepts_everything() {
        let mut sender = NullSender;
        assert!(sender.send(b"ignored").is_ok());
        assert!(sender.flush().is_ok());
    }
}
