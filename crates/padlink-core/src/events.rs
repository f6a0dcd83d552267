//! Event system for UI decoupling.
//!
//! Lets a CLI or GUI watch the wire traffic of a session without the
//! session knowing about it.

use std::fmt;

use crate::protocol::Ack;

/// Line direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketDirection {
    Tx, // Host -> Device
    Rx, // Device -> Host
}

impl fmt::Display for PacketDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketDirection::Tx => write!(f, "TX"),
            PacketDirection::Rx => write!(f, "RX"),
        }
    }
}

/// Events emitted by a pad session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PadEvent {
    /// A line went over the wire, terminator excluded.
    Packet {
        direction: PacketDirection,
        line: String,
    },
    /// Device answered a typed-set item.
    AckReceived { key: String, ack: Ack },
    /// Device answered outside the protocol.
    ProtocolViolation { detail: String },
}

/// Observer trait for receiving session events.
///
/// Implement this trait in your UI layer to receive updates.
pub trait PadObserver: Send + Sync {
    /// Called when an event occurs.
    fn on_event(&self, event: &PadEvent);
}

/// No-op observer that discards all events.
pub struct NullObserver;

impl PadObserver for NullObserver {
    fn on_event(&self, _event: &PadEvent) {}
}

/// Observer that logs events using tracing.
pub struct TracingObserver;

impl PadObserver for TracingObserver {
    fn on_event(&self, event: &PadEvent) {
        match event {
            PadEvent::Packet { direction, line } => {
                tracing::debug!(dir = %direction, line = %line, "Serial line");
            }
            PadEvent::AckReceived { key, ack } => {
                if ack.is_success() {
                    tracing::debug!(key = %key, ack = %ack, "Set accepted");
                } else {
                    tracing::warn!(key = %key, ack = %ack, "Set rejected");
                }
            }
            PadEvent::ProtocolViolation { detail } => {
                tracing::error!("Protocol violation: {}", detail);
            }
        }
    }
}
