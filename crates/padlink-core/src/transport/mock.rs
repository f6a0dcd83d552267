//! Mock line transport for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::traits::{LineTransport, TransportError};
use crate::protocol::Ack;
use crate::protocol::constants::LINE_TERMINATOR;

/// Mock transport for unit testing session logic.
///
/// Clones share state, so a test can keep a handle after moving the
/// transport into a session.
#[derive(Clone)]
pub struct MockTransport {
    /// Queued lines to return on read.
    response_queue: Arc<Mutex<VecDeque<String>>>,
    /// Captured writes, terminator included.
    write_log: Arc<Mutex<Vec<String>>>,
    /// Whether device is "connected".
    connected: Arc<Mutex<bool>>,
    /// Reported in the timeout error when the queue runs dry.
    timeout_ms: u64,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            response_queue: Arc::new(Mutex::new(VecDeque::new())),
            write_log: Arc::new(Mutex::new(Vec::new())),
            connected: Arc::new(Mutex::new(true)),
            timeout_ms: 1000,
        }
    }

    /// Queue a response line to be returned on next read.
    pub fn queue_line(&self, line: &str) {
        self.response_queue
            .lock()
            .unwrap()
            .push_back(line.to_string());
    }

    /// Queue an ack line.
    pub fn queue_ack(&self, ack: Ack) {
        self.queue_line(&ack.to_string());
    }

    /// Number of queued responses not yet read.
    pub fn pending_responses(&self) -> usize {
        self.response_queue.lock().unwrap().len()
    }

    /// Get all captured writes.
    pub fn get_writes(&self) -> Vec<String> {
        self.write_log.lock().unwrap().clone()
    }

    /// Clear captured writes.
    pub fn clear_writes(&self) {
        self.write_log.lock().unwrap().clear();
    }

    /// Simulate device disconnect.
    pub fn disconnect(&self) {
        *self.connected.lock().unwrap() = false;
    }

    /// Simulate device reconnect.
    pub fn reconnect(&self) {
        *self.connected.lock().unwrap() = true;
    }

    fn is_connected(&self) -> bool {
        *self.connected.lock().unwrap()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl LineTransport for MockTransport {
    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::Disconnected);
        }
        self.write_log
            .lock()
            .unwrap()
            .push(format!("{line}{LINE_TERMINATOR}"));
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, TransportError> {
        if !self.is_connected() {
            return Err(TransportError::Disconnected);
        }
        self.response_queue
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(TransportError::Timeout {
                timeout_ms: self.timeout_ms,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_response_queue() {
        let mut mock = MockTransport::new();
        mock.queue_line("Dance Pad Firmware");
        mock.queue_ack(Ack::Success);

        assert_eq!(mock.read_line().unwrap(), "Dance Pad Firmware");
        assert_eq!(mock.read_line().unwrap(), "!");

        // Queue is empty now
        assert!(matches!(
            mock.read_line(),
            Err(TransportError::Timeout { .. })
        ));
    }

    #[test]
    fn test_mock_write_capture() {
        let mut mock = MockTransport::new();
        let handle = mock.clone();
        mock.write_line("-version").unwrap();
        mock.write_line("-v").unwrap();

        let writes = handle.get_writes();
        assert_eq!(writes, vec!["-version\n", "-v\n"]);

        handle.clear_writes();
        assert!(mock.get_writes().is_empty());
    }

    #[test]
    fn test_mock_disconnect() {
        let mut mock = MockTransport::new();
        mock.disconnect();
        assert!(mock.write_line("-blink").is_err());
        assert!(matches!(mock.read_line(), Err(TransportError::Disconnected)));

        mock.reconnect();
        assert!(mock.write_line("-blink").is_ok());
    }
}
