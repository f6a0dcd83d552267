//! Panel and sensor identifiers shared by the configuration and snapshot
//! decoders.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PadError;

/// One of the four pad quadrants, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PanelDirection {
    /// All panels in the order the firmware reports them.
    pub const ALL: [PanelDirection; 4] = [
        PanelDirection::Up,
        PanelDirection::Down,
        PanelDirection::Left,
        PanelDirection::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelDirection::Up => "up",
            PanelDirection::Down => "down",
            PanelDirection::Left => "left",
            PanelDirection::Right => "right",
        }
    }

    /// Position in wire order.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for PanelDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelDirection {
    type Err = PadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PanelDirection::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PadError::InvalidField {
                field: "panel".into(),
                value: s.into(),
            })
    }
}

/// One of the four sensors inside a panel, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardinalDirection {
    North,
    East,
    South,
    West,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::East,
        CardinalDirection::South,
        CardinalDirection::West,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardinalDirection::North => "north",
            CardinalDirection::East => "east",
            CardinalDirection::South => "south",
            CardinalDirection::West => "west",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an unsigned decimal field. Signs, blanks and anything other than
/// ASCII digits are rejected.
pub(crate) fn parse_uint<T: FromStr>(field: &str) -> Option<T> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Strip the line terminator and the NUL the firmware leaves where it
/// removes a trailing comma.
pub(crate) fn trim_response(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '\0')
}

/// Counterclockwise rotation of the sensor PCB within a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum PanelOrientation {
    #[default]
    Standard,
    Rotated90,
    Rotated180,
    Rotated270,
}

impl PanelOrientation {
    /// Any rotation outside the four supported ones is rejected, however
    /// large.
    pub fn from_degrees(degrees: u64) -> Result<Self, PadError> {
        match degrees {
            0 => Ok(PanelOrientation::Standard),
            90 => Ok(PanelOrientation::Rotated90),
            180 => Ok(PanelOrientation::Rotated180),
            270 => Ok(PanelOrientation::Rotated270),
            other => Err(PadError::InvalidOrientation(other)),
        }
    }

    pub fn degrees(&self) -> u16 {
        match self {
            PanelOrientation::Standard => 0,
            PanelOrientation::Rotated90 => 90,
            PanelOrientation::Rotated180 => 180,
            PanelOrientation::Rotated270 => 270,
        }
    }
}

impl TryFrom<u16> for PanelOrientation {
    type Error = PadError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees.into())
    }
}

impl From<PanelOrientation> for u16 {
    fn from(orientation: PanelOrientation) -> Self {
        orientation.degrees()
    }
}

impl fmt::Display for PanelOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_degrees() {
        for degrees in [0, 90, 180, 270] {
            let o = PanelOrientation::from_degrees(degrees).unwrap();
            assert_eq!(u64::from(o.degrees()), degrees);
        }
    }

    #[test]
    fn test_invalid_orientation() {
        for degrees in [1, 45, 360, 900, 65536, u64::MAX] {
            assert!(matches!(
                PanelOrientation::from_degrees(degrees),
                Err(PadError::InvalidOrientation(d)) if d == degrees
            ));
        }
    }

    #[test]
    fn test_wire_order() {
        assert_eq!(PanelDirection::Right.index(), 3);
        assert_eq!(CardinalDirection::South.index(), 2);
        for (i, p) in PanelDirection::ALL.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
    }

    #[test]
    fn test_parse_uint() {
        assert_eq!(parse_uint::<u16>("270"), Some(270));
        assert_eq!(parse_uint::<u16>("+1"), None);
        assert_eq!(parse_uint::<u32>("-1"), None);
        assert_eq!(parse_uint::<u32>(" 1"), None);
        assert_eq!(parse_uint::<u32>(""), None);
        assert_eq!(parse_uint::<u8>("256"), None);
    }

    #[test]
    fn test_trim_response() {
        assert_eq!(trim_response("1,2,3\0\r\n"), "1,2,3");
        assert_eq!(trim_response("  \n"), "");
    }

    #[test]
    fn test_panel_from_str() {
        assert_eq!("up".parse::<PanelDirection>().unwrap(), PanelDirection::Up);
        assert_eq!(
            "RIGHT".parse::<PanelDirection>().unwrap(),
            PanelDirection::Right
        );
        assert!("north".parse::<PanelDirection>().is_err());
    }
}
