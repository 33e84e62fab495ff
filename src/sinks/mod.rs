//! Sink implementations

pub mod memory;
pub mod writer;

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "file")]
pub mod rotating_file;

pub use memory::MemorySink;
pub use writer::WriterSink;

#[cfg(feature = "console")]
pub use console::{ConsoleSink, ConsoleTarget};
#[cfg(feature = "file")]
pub use file::FileSink;
#[cfg(feature = "file")]
pub use rotating_file::{RotatingFileLogger, RotationPolicy};

pub use crate::core::{RotationDelegate, Sink};
