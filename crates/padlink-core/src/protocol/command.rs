//! Command and typed-set vocabulary.
//!
//! Every command line is `-<command>`; every typed-set payload line that
//! follows a `-set` command is `<tag> <key>=<value>`.

use std::fmt;

use super::constants::{COMMAND_MARKER, KEY_AUTO_LIGHTS, KEY_BRIGHTNESS, KEY_COLOR_PREFIX};
use crate::color::Color;
use crate::error::PadError;
use crate::model::PanelDirection;

/// Commands understood by the pad firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Version,
    Blink,
    Config,
    Set,
    Persist,
    Values,
    Calibrate,
}

impl Command {
    /// Command word without the marker.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Version => "version",
            Command::Blink => "blink",
            Command::Config => "config",
            Command::Set => "set",
            Command::Persist => "persist",
            Command::Values => "v",
            Command::Calibrate => "calibrate",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", COMMAND_MARKER, self.as_str())
    }
}

/// Type tag of a typed-set item. Determines how the device parses the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Str,
    U16,
    U32,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Str => write!(f, "str"),
            TypeTag::U16 => write!(f, "u16"),
            TypeTag::U32 => write!(f, "u32"),
        }
    }
}

/// A single configuration item sent after `-set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetItem {
    Str { key: String, value: String },
    U16 { key: String, value: u16 },
    U32 { key: String, value: u32 },
}

impl SetItem {
    /// Trigger threshold of the sensor wired to `pin`.
    pub fn sensor_trigger(pin: u32, value: u16) -> Self {
        SetItem::U16 {
            key: format!("sensor{pin}trigger"),
            value,
        }
    }

    /// Release threshold of the sensor wired to `pin`.
    pub fn sensor_release(pin: u32, value: u16) -> Self {
        SetItem::U16 {
            key: format!("sensor{pin}release"),
            value,
        }
    }

    pub fn color(panel: PanelDirection, color: Color) -> Self {
        SetItem::U32 {
            key: format!("{KEY_COLOR_PREFIX}{panel}"),
            value: color.to_wire(),
        }
    }

    pub fn brightness(value: u8) -> Self {
        SetItem::U16 {
            key: KEY_BRIGHTNESS.to_string(),
            value: value.into(),
        }
    }

    pub fn auto_lights(enabled: bool) -> Self {
        SetItem::U16 {
            key: KEY_AUTO_LIGHTS.to_string(),
            value: enabled.into(),
        }
    }

    pub fn tag(&self) -> TypeTag {
        match self {
            SetItem::Str { .. } => TypeTag::Str,
            SetItem::U16 { .. } => TypeTag::U16,
            SetItem::U32 { .. } => TypeTag::U32,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            SetItem::Str { key, .. } | SetItem::U16 { key, .. } | SetItem::U32 { key, .. } => key,
        }
    }

    /// Check that the item can be framed on a single line without
    /// confusing the device's key/value parser.
    pub fn validate(&self) -> Result<(), PadError> {
        let key = self.key();
        if key.is_empty() {
            return Err(PadError::InvalidSetItem("empty key".into()));
        }
        if let Some(c) = key
            .chars()
            .find(|c| c.is_whitespace() || *c == '=' || *c == ',' || !c.is_ascii())
        {
            return Err(PadError::InvalidSetItem(format!(
                "key {key:?} contains {c:?}"
            )));
        }
        if let SetItem::Str { value, .. } = self
            && let Some(c) = value
                .chars()
                .find(|c| *c == '\n' || *c == '\r' || *c == ',' || !c.is_ascii())
        {
            return Err(PadError::InvalidSetItem(format!(
                "value for {key:?} contains {c:?}"
            )));
        }
        Ok(())
    }

    /// Payload line, without terminator.
    pub fn to_line(&self) -> String {
        match self {
            SetItem::Str { key, value } => format!("{} {key}={value}", self.tag()),
            SetItem::U16 { key, value } => format!("{} {key}={value}", self.tag()),
            SetItem::U32 { key, value } => format!("{} {key}={value}", self.tag()),
        }
    }
}

impl fmt::Display for SetItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_framing() {
        assert_eq!(Command::Version.to_string(), "-version");
        assert_eq!(Command::Values.to_string(), "-v");
        assert_eq!(Command::Calibrate.to_string(), "-calibrate");
    }

    #[test]
    fn test_threshold_items() {
        assert_eq!(
            SetItem::sensor_trigger(3, 150).to_line(),
            "u16 sensor3trigger=150"
        );
        assert_eq!(
            SetItem::sensor_release(3, 110).to_line(),
            "u16 sensor3release=110"
        );
    }

    #[test]
    fn test_color_item() {
        let item = SetItem::color(PanelDirection::Up, Color::new(10, 20, 30));
        assert_eq!(item.tag(), TypeTag::U32);
        assert_eq!(item.to_line(), "u32 color_up=1971210");
    }

    #[test]
    fn test_lighting_items() {
        assert_eq!(SetItem::brightness(128).to_line(), "u16 brightness=128");
        assert_eq!(SetItem::auto_lights(true).to_line(), "u16 auto_lights=1");
        assert_eq!(SetItem::auto_lights(false).to_line(), "u16 auto_lights=0");
    }

    #[test]
    fn test_str_item() {
        let item = SetItem::Str {
            key: "name".into(),
            value: "left pad".into(),
        };
        assert!(item.validate().is_ok());
        assert_eq!(item.to_line(), "str name=left pad");
    }

    #[test]
    fn test_validate_rejects_unframeable_items() {
        let bad = [
            SetItem::U16 {
                key: String::new(),
                value: 1,
            },
            SetItem::U16 {
                key: "a=b".into(),
                value: 1,
            },
            SetItem::U32 {
                key: "two words".into(),
                value: 1,
            },
            SetItem::Str {
                key: "name".into(),
                value: "line\nbreak".into(),
            },
            SetItem::Str {
                key: "name".into(),
                value: "a,b".into(),
            },
        ];
        for item in bad {
            assert!(
                matches!(item.validate(), Err(PadError::InvalidSetItem(_))),
                "{item:?}"
            );
        }
    }
}
