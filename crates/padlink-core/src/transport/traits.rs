//! Line transport abstraction.
//!
//! Defines the `LineTransport` trait the session talks through, allowing
//! different implementations (serial port, mock, etc.). The session never
//! opens or closes a transport; callers hand it an already-open one.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to open {port}: {message}")]
    OpenFailed { port: String, message: String },

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Device disconnected")]
    Disconnected,

    #[error("Timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bidirectional, line-oriented byte channel to the pad controller.
///
/// Both calls may block up to the transport's configured timeout.
pub trait LineTransport: Send {
    /// Write `line` followed by a single `\n`.
    fn write_line(&mut self, line: &str) -> Result<(), TransportError>;

    /// Read one line, with the terminator (`\n` or `\r\n`) removed.
    fn read_line(&mut self) -> Result<String, TransportError>;
}

impl<T: LineTransport + ?Sized> LineTransport for Box<T> {
    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        (**self).write_line(line)
    }

    fn read_line(&mut self) -> Result<String, TransportError> {
        (**self).read_line()
    }
}
