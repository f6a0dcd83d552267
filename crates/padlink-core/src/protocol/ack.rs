//! Ack parsing.
//!
//! The device answers every typed-set item with a single sentinel
//! character. Anything else is reported as a protocol violation and is
//! never coerced into success or failure.

use std::fmt;

use super::constants::{ACK_FAILURE, ACK_SUCCESS};
use crate::error::PadError;

/// Ack returned by the device after a typed-set item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    /// Item accepted (`!`).
    Success,
    /// Item rejected (`?`).
    Failure,
}

impl Ack {
    /// Parse an ack line. Line terminators must already be stripped.
    pub fn parse(line: &str) -> Result<Self, PadError> {
        let mut chars = line.chars();
        match (chars.next(), chars.next()) {
            (Some(ACK_SUCCESS), None) => Ok(Ack::Success),
            (Some(ACK_FAILURE), None) => Ok(Ack::Failure),
            _ => Err(PadError::ProtocolViolation(format!(
                "expected ack '{}' or '{}', got {:?}",
                ACK_SUCCESS, ACK_FAILURE, line
            ))),
        }
    }

    /// Sentinel character on the wire.
    pub fn as_char(&self) -> char {
        match self {
            Ack::Success => ACK_SUCCESS,
            Ack::Failure => ACK_FAILURE,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Ack::Success)
    }
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
