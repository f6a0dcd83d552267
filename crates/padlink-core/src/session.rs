//! Pad session - the only component that talks to the transport.
//!
//! Every operation is synchronous: it writes its command line(s) and, where
//! the command has an answer, blocks on the transport until the answer
//! arrives or the transport times out. Operations take `&mut self`, so a
//! session can never interleave two exchanges. Share one across threads by
//! wrapping it in a `Mutex`.
//!
//! No operation retries. Callers decide whether to retry, reconnect or
//! give up.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::color::Color;
use crate::config::DeviceConfiguration;
use crate::error::{PadError, Result};
use crate::events::{PacketDirection, PadEvent, PadObserver, TracingObserver};
use crate::model::PanelDirection;
use crate::protocol::constants::{ARROW_LIGHTS_OFF, ARROW_LIGHTS_ON};
use crate::protocol::{Ack, Command, SetItem};
use crate::snapshot::SensorSnapshot;
use crate::threshold;
use crate::transport::{LineTransport, TransportError};

/// Session over a single, caller-owned transport.
pub struct PadSession<T: LineTransport, O: PadObserver = TracingObserver> {
    transport: T,
    observer: Arc<O>,
}

impl<T: LineTransport> PadSession<T, TracingObserver> {
    /// Create a new session with default tracing observer.
    pub fn new(transport: T) -> Self {
        Self::with_observer(transport, Arc::new(TracingObserver))
    }
}

impl<T: LineTransport, O: PadObserver> PadSession<T, O> {
    /// Create a new session with a custom observer.
    pub fn with_observer(transport: T, observer: Arc<O>) -> Self {
        Self {
            transport,
            observer,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Give the transport back to the caller, who is responsible for
    /// closing it.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Firmware version string. An empty line is a valid answer.
    #[instrument(skip(self))]
    pub fn get_version(&mut self) -> Result<String> {
        let line = self.query(Command::Version)?;
        Ok(line.trim().to_string())
    }

    /// Blink the controller's on-board LED.
    #[instrument(skip(self))]
    pub fn blink(&mut self) -> Result<()> {
        self.send_command(Command::Blink)
    }

    /// Force recalibration of every sensor baseline.
    #[instrument(skip(self))]
    pub fn calibrate(&mut self) -> Result<()> {
        self.send_command(Command::Calibrate)
    }

    /// Ask the device to write its configuration to non-volatile storage.
    /// The device does not answer; success only means the line was sent.
    #[instrument(skip(self))]
    pub fn persist(&mut self) -> Result<()> {
        self.send_command(Command::Persist)
    }

    #[instrument(skip(self))]
    pub fn get_configuration(&mut self) -> Result<DeviceConfiguration> {
        let line = self.query(Command::Config)?;
        DeviceConfiguration::decode(&line)
    }

    #[instrument(skip(self))]
    pub fn get_sensor_snapshot(&mut self) -> Result<SensorSnapshot> {
        let line = self.query(Command::Values)?;
        SensorSnapshot::decode(&line)
    }

    /// Set the trigger and release thresholds of the sensor on `pin`.
    ///
    /// The two values are sent as two separate items and this is **not
    /// atomic**: if the trigger is accepted and the release is rejected
    /// or times out, the device keeps the new trigger. The error names the
    /// item that failed (`SetRejected { key }`); re-read the configuration
    /// to learn the final state.
    #[instrument(skip(self))]
    pub fn set_threshold(&mut self, pin: u32, trigger: i32, release: i32) -> Result<()> {
        threshold::validate(trigger, release)?;
        // Both values are now in 1..=1023.
        self.set_item(&SetItem::sensor_trigger(pin, trigger as u16))?;
        self.set_item(&SetItem::sensor_release(pin, release as u16))
    }

    /// Set a panel's color from integer components in 0..=255.
    #[instrument(skip(self))]
    pub fn set_color(&mut self, panel: PanelDirection, red: i32, green: i32, blue: i32) -> Result<()> {
        let color = Color::try_from_components(red, green, blue)?;
        self.set_item(&SetItem::color(panel, color))
    }

    #[instrument(skip(self))]
    pub fn set_brightness(&mut self, brightness: u8) -> Result<()> {
        self.set_item(&SetItem::brightness(brightness))
    }

    #[instrument(skip(self))]
    pub fn set_auto_lights(&mut self, enabled: bool) -> Result<()> {
        self.set_item(&SetItem::auto_lights(enabled))
    }

    /// Turn the arrow lights fully on or off. Sent as a raw light-state
    /// line; the device does not answer.
    #[instrument(skip(self))]
    pub fn set_arrow_lights(&mut self, enabled: bool) -> Result<()> {
        let pattern = if enabled {
            ARROW_LIGHTS_ON
        } else {
            ARROW_LIGHTS_OFF
        };
        self.link().write_line(pattern)?;
        Ok(())
    }

    /// Send one typed-set item and wait for its ack.
    #[instrument(skip(self, item), fields(key = item.key()))]
    pub fn set_item(&mut self, item: &SetItem) -> Result<()> {
        item.validate()?;

        let mut link = self.link();
        link.write_line(&Command::Set.to_string())?;
        link.write_line(&item.to_line())?;
        let line = link.read_line()?;

        let ack = match Ack::parse(line.trim()) {
            Ok(ack) => ack,
            Err(e) => {
                warn!(key = item.key(), response = %line, "Unexpected ack");
                link.emit(PadEvent::ProtocolViolation {
                    detail: e.to_string(),
                });
                return Err(e);
            }
        };
        link.emit(PadEvent::AckReceived {
            key: item.key().to_string(),
            ack,
        });

        match ack {
            Ack::Success => {
                info!(item = %item, "Configuration item set");
                Ok(())
            }
            Ack::Failure => Err(PadError::SetRejected {
                key: item.key().to_string(),
            }),
        }
    }

    fn send_command(&mut self, command: Command) -> Result<()> {
        self.link().write_line(&command.to_string())?;
        Ok(())
    }

    fn query(&mut self, command: Command) -> Result<String> {
        let mut link = self.link();
        link.write_line(&command.to_string())?;
        Ok(link.read_line()?)
    }

    fn link(&mut self) -> ObservableTransport<'_, T, O> {
        ObservableTransport {
            inner: &mut self.transport,
            observer: &self.observer,
        }
    }
}

/// Transport wrapper that emits packet events.
struct ObservableTransport<'a, T: LineTransport, O: PadObserver> {
    inner: &'a mut T,
    observer: &'a Arc<O>,
}

impl<T: LineTransport, O: PadObserver> ObservableTransport<'_, T, O> {
    fn emit(&self, event: PadEvent) {
        self.observer.on_event(&event);
    }
}

impl<T: LineTransport, O: PadObserver> LineTransport for ObservableTransport<'_, T, O> {
    fn write_line(&mut self, line: &str) -> std::result::Result<(), TransportError> {
        let res = self.inner.write_line(line);
        if res.is_ok() {
            self.emit(PadEvent::Packet {
                direction: PacketDirection::Tx,
                line: line.to_string(),
            });
        }
        res
    }

    fn read_line(&mut self) -> std::result::Result<String, TransportError> {
        let res = self.inner.read_line();
        if let Ok(line) = &res {
            self.emit(PadEvent::Packet {
                direction: PacketDirection::Rx,
                line: line.clone(),
            });
        }
        res
    }
}
