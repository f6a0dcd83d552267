//! Color codec.
//!
//! Colors travel as a single unsigned integer with red in the low byte,
//! green in the next and blue above it: `r | g << 8 | b << 16`.

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::error::PadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Build a color from unchecked integer components.
    pub fn try_from_components(red: i32, green: i32, blue: i32) -> Result<Self, PadError> {
        Ok(Self {
            red: component("red", red)?,
            green: component("green", green)?,
            blue: component("blue", blue)?,
        })
    }

    /// Wire representation.
    pub fn to_wire(self) -> u32 {
        LittleEndian::read_u32(&[self.red, self.green, self.blue, 0])
    }

    /// Decode a wire value. Only the low 24 bits are used.
    pub fn from_wire(value: u32) -> Self {
        let mut bytes = [0u8; 4];
        LittleEndian::write_u32(&mut bytes, value);
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    pub fn components(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }
}

fn component(name: &'static str, value: i32) -> Result<u8, PadError> {
    u8::try_from(value).map_err(|_| PadError::OutOfRange {
        component: name,
        value,
    })
}

/// Encode integer components, rejecting anything outside 0..=255.
pub fn encode(red: i32, green: i32, blue: i32) -> Result<u32, PadError> {
    Color::try_from_components(red, green, blue).map(Color::to_wire)
}

/// Decode a wire value into `(red, green, blue)`.
pub fn decode(value: u32) -> (u8, u8, u8) {
    Color::from_wire(value).components()
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}
