//! serialport-based line transport implementation.

use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serialport::SerialPort;
use tracing::{debug, info, instrument};

use super::traits::{LineTransport, TransportError};
use crate::protocol::constants::LINE_TERMINATOR;

pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Serial link settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Port name, e.g. `/dev/ttyACM0` or `COM3`.
    pub port: Option<String>,
    /// Baud rate. USB CDC devices ignore it, but the port still needs one.
    pub baud_rate: u32,
    /// Read timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl SerialConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SerialConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Line transport over a serial port.
pub struct SerialTransport {
    port: BufReader<Box<dyn SerialPort>>,
    /// Bytes of a line whose read timed out before the terminator arrived.
    pending: Vec<u8>,
    timeout_ms: u64,
}

impl SerialTransport {
    /// Open the port named in `config`.
    #[instrument(level = "info", skip(config), fields(port = ?config.port, baud = config.baud_rate))]
    pub fn open(config: &SerialConfig) -> Result<Self, TransportError> {
        let name = config.port.as_deref().ok_or_else(|| TransportError::OpenFailed {
            port: String::new(),
            message: "no serial port configured".into(),
        })?;

        let port = serialport::new(name, config.baud_rate)
            .timeout(config.timeout())
            .open()
            .map_err(|e| TransportError::OpenFailed {
                port: name.to_string(),
                message: e.to_string(),
            })?;

        info!(port = %name, timeout_ms = config.timeout_ms, "Serial port opened");
        Ok(Self::from_port(port, config.timeout_ms))
    }

    /// Wrap a port the caller has already opened.
    pub fn from_port(port: Box<dyn SerialPort>, timeout_ms: u64) -> Self {
        Self {
            port: BufReader::new(port),
            pending: Vec::new(),
            timeout_ms,
        }
    }
}

fn map_io(e: std::io::Error, timeout_ms: u64) -> TransportError {
    match e.kind() {
        ErrorKind::TimedOut | ErrorKind::WouldBlock => TransportError::Timeout { timeout_ms },
        ErrorKind::BrokenPipe | ErrorKind::NotConnected | ErrorKind::UnexpectedEof => {
            TransportError::Disconnected
        }
        _ => TransportError::Io(e),
    }
}

/// Read up to and including `\n`, appending to `pending`. On error the
/// bytes received so far stay in `pending` for the next call.
fn read_framed<R: BufRead>(
    reader: &mut R,
    pending: &mut Vec<u8>,
    timeout_ms: u64,
) -> Result<String, TransportError> {
    let n = reader
        .read_until(b'\n', pending)
        .map_err(|e| map_io(e, timeout_ms))?;
    if n == 0 || pending.last() != Some(&b'\n') {
        return Err(TransportError::Disconnected);
    }

    let mut buf = std::mem::take(pending);
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    debug!(bytes_read = buf.len(), "Read complete");
    String::from_utf8(buf).map_err(|e| TransportError::ReadFailed(e.to_string()))
}

impl LineTransport for SerialTransport {
    #[instrument(level = "trace", skip(self))]
    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        let timeout_ms = self.timeout_ms;
        let framed = format!("{line}{LINE_TERMINATOR}");
        let writer = self.port.get_mut();
        writer
            .write_all(framed.as_bytes())
            .map_err(|e| map_io(e, timeout_ms))?;
        writer.flush().map_err(|e| map_io(e, timeout_ms))?;

        debug!(bytes_written = framed.len(), "Write complete");
        Ok(())
    }

    /// A timeout part way through a line keeps the bytes received so far;
    /// the next call continues the same line instead of starting on its
    /// tail.
    #[instrument(level = "trace", skip(self))]
    fn read_line(&mut self) -> Result<String, TransportError> {
        read_framed(&mut self.port, &mut self.pending, self.timeout_ms)
    }
}
