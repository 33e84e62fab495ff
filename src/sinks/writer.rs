//! Sink over any `std::io::Write`

use crate::core::{Result, Sink};
use std::io::Write;

/// Adapts an arbitrary writer (socket, pipe, `Vec<u8>`, ...) into a [`Sink`].
pub struct WriterSink<W: Write + Send> {
    writer: Option<W>,
    name: String,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self::named(writer, "writer")
    }

    pub fn named(writer: W, name: impl Into<String>) -> Self {
        Self {
            writer: Some(writer),
            name: name.into(),
        }
    }

    /// Give the writer back, e.g. after the logger has closed the sink.
    pub fn into_inner(self) -> Option<W> {
        self.writer
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write(&mut self, record: &[u8]) -> Result<usize> {
        match self.writer.as_mut() {
            Some(writer) => {
                writer.write_all(record)?;
                Ok(record.len())
            }
            None => Err(crate::core::LoggerError::writer("writer already closed")),
        }
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    /// Flushes and drops the wrapped writer.
    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
