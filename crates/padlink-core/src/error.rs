//! Error types for the pad protocol.

use std::fmt;

use thiserror::Error;

use crate::transport::TransportError;

#[derive(Error, Debug)]
pub enum PadError {
    #[error("Color component {component} out of range: {value} (expected 0..=255)")]
    OutOfRange { component: &'static str, value: i32 },

    #[error("Threshold {name} out of range: {value} (expected 1..=1023)")]
    ThresholdOutOfRange { name: &'static str, value: i32 },

    #[error("Release threshold {release} exceeds trigger threshold {trigger}")]
    ThresholdOrderViolation { trigger: i32, release: i32 },

    #[error("Invalid set item: {0}")]
    InvalidSetItem(String),

    #[error("Invalid panel orientation: {0} degrees")]
    InvalidOrientation(u64),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidField { field: String, value: String },

    #[error("Missing or malformed field: {0}")]
    MissingField(String),

    #[error("Malformed sensor snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Device rejected {key}")]
    SetRejected { key: String },

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Broad failure class, used by callers to pick a recovery strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected locally before anything was sent. Fix the input.
    Validation,
    /// Response text could not be decoded. Nothing partial was returned.
    Decode,
    /// Device answered outside the protocol, usually a firmware mismatch.
    Protocol,
    /// Channel failure or timeout.
    Transport,
}

impl PadError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PadError::OutOfRange { .. }
            | PadError::ThresholdOutOfRange { .. }
            | PadError::ThresholdOrderViolation { .. }
            | PadError::InvalidSetItem(_) => ErrorCategory::Validation,
            PadError::InvalidOrientation(_)
            | PadError::InvalidField { .. }
            | PadError::MissingField(_)
            | PadError::MalformedSnapshot(_) => ErrorCategory::Decode,
            // A rejected item is a well-formed answer; it is grouped with
            // protocol outcomes because the caller must re-read device state.
            PadError::SetRejected { .. } | PadError::ProtocolViolation(_) => {
                ErrorCategory::Protocol
            }
            PadError::Transport(_) => ErrorCategory::Transport,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Decode => write!(f, "decode"),
            ErrorCategory::Protocol => write!(f, "protocol"),
            ErrorCategory::Transport => write!(f, "transport"),
        }
    }
}

pub type Result<T> = std::result::Result<T, PadError>;
