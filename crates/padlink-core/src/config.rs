//! Device configuration model and its decoder.
//!
//! The `-config` response is a single line:
//!
//! ```text
//! <20 positional fields>,<key>=<value>,<key>=<value>,...
//! ```
//!
//! The positional prefix holds five fields per panel in panel order
//! (`orientation, north_pin, east_pin, south_pin, west_pin`). The trailing
//! section carries `color_<panel>` for every panel and, optionally,
//! `brightness` and `auto_lights`. Unknown keys are kept in
//! [`DeviceConfiguration::extras`].
//!
//! Decoding is all-or-nothing: the first bad field fails the whole line.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::PadError;
use crate::model::{
    CardinalDirection, PanelDirection, PanelOrientation, parse_uint, trim_response,
};
use crate::protocol::constants::{
    DEFAULT_AUTO_LIGHTS, DEFAULT_BRIGHTNESS, FIELD_DELIMITER, FIELDS_PER_PANEL, KEY_AUTO_LIGHTS,
    KEY_BRIGHTNESS, KEY_COLOR_PREFIX, KEY_VALUE_SEPARATOR, POSITIONAL_CONFIG_FIELDS,
};

const PANEL_FIELD_NAMES: [&str; FIELDS_PER_PANEL] =
    ["orientation", "north_pin", "east_pin", "south_pin", "west_pin"];

/// Hardware pins of the four sensors in a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pins {
    pub north: u32,
    pub east: u32,
    pub south: u32,
    pub west: u32,
}

impl Pins {
    pub fn get(&self, sensor: CardinalDirection) -> u32 {
        match sensor {
            CardinalDirection::North => self.north,
            CardinalDirection::East => self.east,
            CardinalDirection::South => self.south,
            CardinalDirection::West => self.west,
        }
    }

    /// Pins in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (CardinalDirection, u32)> + '_ {
        CardinalDirection::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Panel {
    pub orientation: PanelOrientation,
    pub pins: Pins,
    pub color: Color,
}

/// Snapshot of the device-side configuration.
///
/// Each call to `get_configuration` builds a fresh value; nothing in the
/// session holds on to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfiguration {
    brightness: u8,
    auto_lights: bool,
    up: Panel,
    down: Panel,
    left: Panel,
    right: Panel,
    /// Trailing keys this decoder does not interpret.
    #[serde(default)]
    extras: BTreeMap<String, String>,
}

impl DeviceConfiguration {
    /// Decode a `-config` response line.
    pub fn decode(line: &str) -> Result<Self, PadError> {
        let tokens: Vec<&str> = trim_response(line).split(FIELD_DELIMITER).collect();

        // Shape check over the whole line before interpreting any field.
        if let Some(missing) = (0..POSITIONAL_CONFIG_FIELDS)
            .find(|&i| tokens.get(i).is_none_or(|t| t.contains(KEY_VALUE_SEPARATOR)))
        {
            return Err(PadError::MissingField(positional_name(missing)));
        }
        let (positional, trailing) = tokens.split_at(POSITIONAL_CONFIG_FIELDS);

        // Every positional field is interpreted before the trailing section.
        let mut panels = [Panel::default(); 4];
        for (panel, fields) in PanelDirection::ALL
            .into_iter()
            .zip(positional.chunks_exact(FIELDS_PER_PANEL))
        {
            let base = panel.index() * FIELDS_PER_PANEL;
            let number = |offset: usize| -> Result<u32, PadError> {
                parse_uint(fields[offset])
                    .ok_or_else(|| invalid(&positional_name(base + offset), fields[offset]))
            };

            let degrees = parse_uint::<u64>(fields[0])
                .ok_or_else(|| invalid(&positional_name(base), fields[0]))?;
            panels[panel.index()] = Panel {
                orientation: PanelOrientation::from_degrees(degrees)?,
                pins: Pins {
                    north: number(1)?,
                    east: number(2)?,
                    south: number(3)?,
                    west: number(4)?,
                },
                color: Color::default(),
            };
        }

        let mut items = split_items(trailing)?;
        for panel in PanelDirection::ALL {
            let key = format!("{KEY_COLOR_PREFIX}{panel}");
            panels[panel.index()].color = items
                .remove(key.as_str())
                .and_then(parse_uint::<u32>)
                .map(Color::from_wire)
                .ok_or(PadError::MissingField(key))?;
        }

        let brightness = match items.remove(KEY_BRIGHTNESS) {
            Some(value) => parse_uint::<u8>(value).ok_or_else(|| invalid(KEY_BRIGHTNESS, value))?,
            None => DEFAULT_BRIGHTNESS,
        };
        let auto_lights = match items.remove(KEY_AUTO_LIGHTS) {
            Some("0") => false,
            Some("1") => true,
            Some(value) => return Err(invalid(KEY_AUTO_LIGHTS, value)),
            None => DEFAULT_AUTO_LIGHTS,
        };

        let [up, down, left, right] = panels;
        Ok(Self {
            brightness,
            auto_lights,
            up,
            down,
            left,
            right,
            extras: items
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
    }

    pub fn panel(&self, direction: PanelDirection) -> &Panel {
        match direction {
            PanelDirection::Up => &self.up,
            PanelDirection::Down => &self.down,
            PanelDirection::Left => &self.left,
            PanelDirection::Right => &self.right,
        }
    }

    /// Panels in wire order.
    pub fn panels(&self) -> impl Iterator<Item = (PanelDirection, &Panel)> + '_ {
        PanelDirection::ALL.into_iter().map(|p| (p, self.panel(p)))
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn auto_lights(&self) -> bool {
        self.auto_lights
    }

    pub fn extras(&self) -> &BTreeMap<String, String> {
        &self.extras
    }

    /// Find which panel and sensor a pin is wired to.
    pub fn locate_pin(&self, pin: u32) -> Option<(PanelDirection, CardinalDirection)> {
        self.panels().find_map(|(direction, panel)| {
            panel
                .pins
                .iter()
                .find(|&(_, p)| p == pin)
                .map(|(sensor, _)| (direction, sensor))
        })
    }

    /// Load a configuration backup from a TOML file.
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DeviceConfiguration = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save the configuration as a TOML backup.
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl fmt::Display for DeviceConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (direction, panel) in self.panels() {
            writeln!(
                f,
                "{:<6} {:>4}  pins N={} E={} S={} W={}  color {}",
                direction,
                panel.orientation.to_string(),
                panel.pins.north,
                panel.pins.east,
                panel.pins.south,
                panel.pins.west,
                panel.color
            )?;
        }
        write!(
            f,
            "brightness {}  auto lights {}",
            self.brightness,
            if self.auto_lights { "on" } else { "off" }
        )?;
        for (key, value) in &self.extras {
            write!(f, "\n{key}={value}")?;
        }
        Ok(())
    }
}

fn positional_name(index: usize) -> String {
    let panel = PanelDirection::ALL[index / FIELDS_PER_PANEL];
    format!("{}.{}", panel, PANEL_FIELD_NAMES[index % FIELDS_PER_PANEL])
}

fn invalid(field: &str, value: &str) -> PadError {
    PadError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn split_items<'a>(tokens: &[&'a str]) -> Result<BTreeMap<&'a str, &'a str>, PadError> {
    let mut items = BTreeMap::new();
    for token in tokens.iter().filter(|t| !t.is_empty()) {
        let (key, value) = token
            .split_once(KEY_VALUE_SEPARATOR)
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| invalid("trailing item", token))?;
        match items.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(_) => return Err(invalid(key, value)),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSITIONAL: &str = "0,1,2,3,4,270,5,6,7,8,180,9,10,11,12,90,13,14,15,16";
    const COLORS: &str = "color_up=255,color_down=65280,color_left=16711680,color_right=16777215";

    fn sample() -> String {
        format!("{POSITIONAL},{COLORS}")
    }

    #[test]
    fn test_decode_reference_line() {
        let config = DeviceConfiguration::decode(&sample()).unwrap();

        let up = config.panel(PanelDirection::Up);
        assert_eq!(up.orientation, PanelOrientation::Standard);
        assert_eq!(
            up.pins,
            Pins {
                north: 1,
                east: 2,
                south: 3,
                west: 4
            }
        );
        assert_eq!(up.color, Color::new(255, 0, 0));

        let down = config.panel(PanelDirection::Down);
        assert_eq!(down.orientation, PanelOrientation::Rotated270);
        assert_eq!(down.pins.north, 5);
        assert_eq!(down.pins.west, 8);
        assert_eq!(down.color, Color::new(0, 255, 0));

        let left = config.panel(PanelDirection::Left);
        assert_eq!(left.orientation, PanelOrientation::Rotated180);
        assert_eq!(left.pins.east, 10);
        assert_eq!(left.color, Color::new(0, 0, 255));

        let right = config.panel(PanelDirection::Right);
        assert_eq!(right.orientation, PanelOrientation::Rotated90);
        assert_eq!(right.pins.south, 15);
        assert_eq!(right.color, Color::WHITE);

        assert_eq!(config.brightness(), DEFAULT_BRIGHTNESS);
        assert_eq!(config.auto_lights(), DEFAULT_AUTO_LIGHTS);
        assert!(config.extras().is_empty());
    }

    #[test]
    fn test_trailing_keys_are_order_independent() {
        let line = format!(
            "{POSITIONAL},color_right=16777215,brightness=40,color_left=16711680,\
             auto_lights=1,color_down=65280,color_up=255"
        );
        let config = DeviceConfiguration::decode(&line).unwrap();
        assert_eq!(config.brightness(), 40);
        assert!(config.auto_lights());
        assert_eq!(config.panel(PanelDirection::Down).color, Color::new(0, 255, 0));
    }

    #[test]
    fn test_firmware_padding_and_unknown_keys() {
        let line = format!("{},sensor20trigger=500,name=pad1\0\r\n", sample());
        let config = DeviceConfiguration::decode(&line).unwrap();
        assert_eq!(config.extras().len(), 2);
        assert_eq!(config.extras()["sensor20trigger"], "500");
        assert_eq!(config.extras()["name"], "pad1");
    }

    #[test]
    fn test_invalid_orientation_aborts() {
        let line = sample().replacen("270", "45", 1);
        assert!(matches!(
            DeviceConfiguration::decode(&line),
            Err(PadError::InvalidOrientation(45))
        ));
    }

    #[test]
    fn test_orientation_checked_before_colors() {
        let line = "0,1,2,3,4,271,5,6,7,8,180,9,10,11,12,90,13,14,15,16";
        assert!(matches!(
            DeviceConfiguration::decode(line),
            Err(PadError::InvalidOrientation(271))
        ));
    }

    #[test]
    fn test_positional_fields_checked_before_trailing_items() {
        let line = format!("{},color_up=0", sample().replacen(",6,", ",six,", 1));
        assert!(matches!(
            DeviceConfiguration::decode(&line),
            Err(PadError::InvalidField { ref field, .. }) if field == "down.east_pin"
        ));
    }

    #[test]
    fn test_oversized_orientation() {
        let line = sample().replacen("270", "65536", 1);
        assert!(matches!(
            DeviceConfiguration::decode(&line),
            Err(PadError::InvalidOrientation(65536))
        ));
    }

    #[test]
    fn test_wide_pin_numbers() {
        let line = sample().replacen(",5,", ",70000,", 1);
        let config = DeviceConfiguration::decode(&line).unwrap();
        assert_eq!(config.panel(PanelDirection::Down).pins.north, 70000);
        assert_eq!(
            config.locate_pin(70000),
            Some((PanelDirection::Down, CardinalDirection::North))
        );
    }

    #[test]
    fn test_non_numeric_positional_field() {
        let line = sample().replacen(",6,", ",six,", 1);
        match DeviceConfiguration::decode(&line) {
            Err(PadError::InvalidField { field, value }) => {
                assert_eq!(field, "down.east_pin");
                assert_eq!(value, "six");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_short_positional_prefix() {
        let line = format!("0,1,2,3,4,270,5,6,7,8,{COLORS}");
        match DeviceConfiguration::decode(&line) {
            Err(PadError::MissingField(field)) => assert_eq!(field, "left.orientation"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            DeviceConfiguration::decode(""),
            Err(PadError::MissingField(_))
        ));
    }

    #[test]
    fn test_extra_positional_field_rejected() {
        let line = format!("{POSITIONAL},17,{COLORS}");
        assert!(matches!(
            DeviceConfiguration::decode(&line),
            Err(PadError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_missing_or_malformed_color() {
        let line = format!(
            "{POSITIONAL},color_up=255,color_down=65280,color_left=16711680"
        );
        match DeviceConfiguration::decode(&line) {
            Err(PadError::MissingField(field)) => assert_eq!(field, "color_right"),
            other => panic!("unexpected result: {other:?}"),
        }

        let line = sample().replace("color_up=255", "color_up=red");
        match DeviceConfiguration::decode(&line) {
            Err(PadError::MissingField(field)) => assert_eq!(field, "color_up"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_bad_lighting_values() {
        let line = format!("{},brightness=300", sample());
        assert!(matches!(
            DeviceConfiguration::decode(&line),
            Err(PadError::InvalidField { .. })
        ));
        let line = format!("{},auto_lights=yes", sample());
        assert!(matches!(
            DeviceConfiguration::decode(&line),
            Err(PadError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let line = format!("{},color_up=0", sample());
        assert!(matches!(
            DeviceConfiguration::decode(&line),
            Err(PadError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_locate_pin() {
        let config = DeviceConfiguration::decode(&sample()).unwrap();
        assert_eq!(
            config.locate_pin(11),
            Some((PanelDirection::Left, CardinalDirection::South))
        );
        assert_eq!(config.locate_pin(99), None);
    }

    #[test]
    fn test_toml_backup() {
        let config = DeviceConfiguration::decode(&format!("{},note=x", sample())).unwrap();
        let text = toml::to_string_pretty(&config).unwrap();
        let restored: DeviceConfiguration = toml::from_str(&text).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_display_lists_panels() {
        let text = DeviceConfiguration::decode(&sample()).unwrap().to_string();
        assert!(text.starts_with("up"));
        assert!(text.contains("270°"));
        assert!(text.contains("#FFFFFF"));
    }
}
