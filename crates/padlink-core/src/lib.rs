//! padlink-core: host-side protocol for FSR dance pad controllers.
//!
//! This crate talks to the pad firmware over a line-oriented serial link:
//! it frames commands, runs the typed "set configuration item" exchange,
//! and decodes the panel layout and per-sensor telemetry the device sends
//! back.
//!
//! # Architecture
//!
//! The crate is organized into layers:
//!
//! - **Protocol**: Command words, type tags, ack sentinels, constants
//! - **Color / Threshold**: Pure codec and validator run before any write
//! - **Config / Snapshot**: All-or-nothing decoders for device responses
//! - **Transport**: Line channel abstraction (serialport, mock)
//! - **Events**: Observer pattern for UI decoupling
//! - **Session**: Synchronous request/response orchestrator
//!
//! # Example
//!
//! ```no_run
//! use padlink_core::{PadSession, SerialConfig, SerialTransport};
//!
//! let config = SerialConfig {
//!     port: Some("/dev/ttyACM0".to_string()),
//!     ..Default::default()
//! };
//!
//! let transport = SerialTransport::open(&config).expect("open failed");
//! let mut session = PadSession::new(transport);
//! println!("{}", session.get_version().expect("no answer"));
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod protocol;
pub mod session;
pub mod snapshot;
pub mod threshold;
pub mod transport;

// Re-exports for convenience
pub use color::Color;
pub use config::{DeviceConfiguration, Panel, Pins};
pub use error::{ErrorCategory, PadError};
pub use events::{NullObserver, PacketDirection, PadEvent, PadObserver, TracingObserver};
pub use model::{CardinalDirection, PanelDirection, PanelOrientation};
pub use protocol::{Ack, Command, SetItem, TypeTag};
pub use session::PadSession;
pub use snapshot::{SensorReading, SensorSnapshot};
pub use transport::{LineTransport, MockTransport, SerialConfig, SerialTransport, TransportError};
