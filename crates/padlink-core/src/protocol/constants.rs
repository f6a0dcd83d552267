// Command framing
pub const COMMAND_MARKER: char = '-';
pub const LINE_TERMINATOR: &str = "\n";

// Ack sentinels sent after every typed-set item
pub const ACK_SUCCESS: char = '!';
pub const ACK_FAILURE: char = '?';

// Field separators
pub const FIELD_DELIMITER: char = ',';
pub const KEY_VALUE_SEPARATOR: char = '=';

// Configuration response layout
pub const FIELDS_PER_PANEL: usize = 5;
pub const PANEL_COUNT: usize = 4;
pub const POSITIONAL_CONFIG_FIELDS: usize = FIELDS_PER_PANEL * PANEL_COUNT; // 20

// Sensor snapshot layout
pub const SENSORS_PER_PANEL: usize = 4;
pub const VALUES_PER_SENSOR: usize = 3;
pub const SNAPSHOT_FIELDS: usize = PANEL_COUNT * SENSORS_PER_PANEL * VALUES_PER_SENSOR; // 48

// Thresholds must lie in the open interval (0, THRESHOLD_LIMIT)
pub const THRESHOLD_LIMIT: i32 = 1024;

// Trailing configuration keys
pub const KEY_COLOR_PREFIX: &str = "color_";
pub const KEY_BRIGHTNESS: &str = "brightness";
pub const KEY_AUTO_LIGHTS: &str = "auto_lights";

pub const DEFAULT_BRIGHTNESS: u8 = 255;
pub const DEFAULT_AUTO_LIGHTS: bool = false;

// Arrow light lines. Sent raw, without the command marker.
// Byte 3 carries the player 1 pad arrows; 'O' lights all four, '@' is blank.
pub const ARROW_LIGHTS_LEN: usize = 13;
pub const ARROW_LIGHTS_OFF: &str = "@@@@@@@@@@@@@";
pub const ARROW_LIGHTS_ON: &str = "@@@O@@@@@@@@@";

const _: () = assert!(ARROW_LIGHTS_OFF.len() == ARROW_LIGHTS_LEN);
const _: () = assert!(ARROW_LIGHTS_ON.len() == ARROW_LIGHTS_LEN);
