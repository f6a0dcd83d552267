//! Protocol module - wire vocabulary of the pad firmware.

pub mod ack;
pub mod command;
pub mod constants;

pub use ack::Ack;
pub use command::{Command, SetItem, TypeTag};
pub use constants::*;
