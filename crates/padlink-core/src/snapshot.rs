//! Sensor telemetry decoding.
//!
//! The `-v` response is 48 comma-separated integers: for every panel
//! (up, down, left, right) and every sensor in it (north, east, south,
//! west), the raw value followed by the trigger and release thresholds.

use std::fmt;

use crate::error::PadError;
use crate::model::{CardinalDirection, PanelDirection, parse_uint, trim_response};
use crate::protocol::constants::{
    FIELD_DELIMITER, PANEL_COUNT, SENSORS_PER_PANEL, SNAPSHOT_FIELDS, VALUES_PER_SENSOR,
};

/// One sensor's reading. Thresholds are reported as configured on the
/// device and are not re-validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorReading {
    pub value: u32,
    pub trigger_threshold: u32,
    pub release_threshold: u32,
}

impl SensorReading {
    /// Whether the raw value has reached the trigger threshold.
    pub fn is_pressed(&self) -> bool {
        self.value >= self.trigger_threshold
    }
}

/// Point-in-time reading of all 16 sensors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorSnapshot {
    readings: [[SensorReading; SENSORS_PER_PANEL]; PANEL_COUNT],
}

impl SensorSnapshot {
    /// Decode a `-v` response line.
    pub fn decode(line: &str) -> Result<Self, PadError> {
        let fields: Vec<&str> = trim_response(line).split(FIELD_DELIMITER).collect();
        if fields.len() != SNAPSHOT_FIELDS {
            return Err(PadError::MalformedSnapshot(format!(
                "expected {} fields, got {}",
                SNAPSHOT_FIELDS,
                fields.len()
            )));
        }

        let values = fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                parse_uint::<u32>(field).ok_or_else(|| {
                    PadError::MalformedSnapshot(format!("field {i} is not an integer: {field:?}"))
                })
            })
            .collect::<Result<Vec<u32>, _>>()?;

        let mut readings = [[SensorReading::default(); SENSORS_PER_PANEL]; PANEL_COUNT];
        for (slot, triple) in readings
            .iter_mut()
            .flatten()
            .zip(values.chunks_exact(VALUES_PER_SENSOR))
        {
            *slot = SensorReading {
                value: triple[0],
                trigger_threshold: triple[1],
                release_threshold: triple[2],
            };
        }

        Ok(Self { readings })
    }

    pub fn get(&self, panel: PanelDirection, sensor: CardinalDirection) -> &SensorReading {
        &self.readings[panel.index()][sensor.index()]
    }

    /// The four readings of one panel, in north/east/south/west order.
    pub fn panel(&self, panel: PanelDirection) -> &[SensorReading; SENSORS_PER_PANEL] {
        &self.readings[panel.index()]
    }

    /// All readings in wire order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (PanelDirection, CardinalDirection, &SensorReading)> + '_ {
        PanelDirection::ALL.into_iter().flat_map(move |panel| {
            CardinalDirection::ALL
                .into_iter()
                .map(move |sensor| (panel, sensor, self.get(panel, sensor)))
        })
    }

    /// Whether any sensor of the panel is past its trigger threshold.
    pub fn is_panel_pressed(&self, panel: PanelDirection) -> bool {
        self.panel(panel).iter().any(SensorReading::is_pressed)
    }
}

impl fmt::Display for SensorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, panel) in PanelDirection::ALL.into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{panel:<6}")?;
            for (sensor, reading) in CardinalDirection::ALL.iter().zip(self.panel(panel)) {
                write!(
                    f,
                    " {}={:>4} ({}/{})",
                    &sensor.as_str()[..1].to_uppercase(),
                    reading.value,
                    reading.trigger_threshold,
                    reading.release_threshold
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sensor `i` reports value `i`, trigger `500 + i`, release `300 + i`.
    fn line(count: usize) -> String {
        (0..count)
            .map(|n| {
                let sensor = (n / 3) as u32;
                match n % 3 {
                    0 => sensor,
                    1 => 500 + sensor,
                    _ => 300 + sensor,
                }
                .to_string()
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn test_decode_fixed_order() {
        let snapshot = SensorSnapshot::decode(&line(48)).unwrap();
        let all: Vec<_> = snapshot.iter().collect();
        assert_eq!(all.len(), 16);

        for (i, (panel, sensor, reading)) in all.into_iter().enumerate() {
            assert_eq!(panel, PanelDirection::ALL[i / 4]);
            assert_eq!(sensor, CardinalDirection::ALL[i % 4]);
            assert_eq!(reading.value, i as u32);
            assert_eq!(reading.trigger_threshold, 500 + i as u32);
            assert_eq!(reading.release_threshold, 300 + i as u32);
        }

        let r = snapshot.get(PanelDirection::Left, CardinalDirection::East);
        assert_eq!(r.value, 9);
    }

    #[test]
    fn test_wrong_field_count() {
        for count in [0, 1, 47, 49, 96] {
            assert!(
                matches!(
                    SensorSnapshot::decode(&line(count)),
                    Err(PadError::MalformedSnapshot(_))
                ),
                "count {count}"
            );
        }
    }

    #[test]
    fn test_non_integer_field() {
        let bad = line(48).replacen("500", "abc", 1);
        assert!(matches!(
            SensorSnapshot::decode(&bad),
            Err(PadError::MalformedSnapshot(_))
        ));
        let negative = format!("-1{}", &line(48)[1..]);
        assert!(matches!(
            SensorSnapshot::decode(&negative),
            Err(PadError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_trailing_nul_from_firmware() {
        let padded = format!("{}\0\n", line(48));
        assert!(SensorSnapshot::decode(&padded).is_ok());
    }

    #[test]
    fn test_pressed() {
        let mut fields: Vec<String> = line(48).split(',').map(str::to_string).collect();
        // Down/north: value 700 with trigger 504.
        fields[12] = "700".into();
        let snapshot = SensorSnapshot::decode(&fields.join(",")).unwrap();
        assert!(
            snapshot
                .get(PanelDirection::Down, CardinalDirection::North)
                .is_pressed()
        );
        assert!(snapshot.is_panel_pressed(PanelDirection::Down));
        assert!(!snapshot.is_panel_pressed(PanelDirection::Up));
    }
}
