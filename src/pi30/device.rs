use crate::prelude::*;
use crate::error::{DeviceError, TransportError};
use crate::pi30::command::Command;
use crate::pi30::frame;
use crate::pi30::registry::{Descriptor, Registry};
use crate::transport::{hid, serial, HidPort, Port, SerialPort, TestPort, Transport};

use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

/// Device path that selects the in-memory test port.
pub const TEST_DEVICE: &str = "TEST";

/// Substring of a device path that marks a raw USB HID node.
pub const HIDRAW: &str = "hidraw";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    Test,
    DirectUsb { index: u32 },
    Serial,
}

impl ConnectionMode {
    pub fn from_path(path: &str) -> Self {
        if path == TEST_DEVICE {
            Self::Test
        } else if path.contains(HIDRAW) {
            Self::DirectUsb {
                index: hid::device_index(path),
            }
        } else {
            Self::Serial
        }
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Test => write!(f, "test"),
            Self::DirectUsb { index } => write!(f, "direct usb (hid {})", index),
            Self::Serial => write!(f, "serial"),
        }
    }
}

/// One inverter and the channel to reach it.
///
/// The mode is fixed at construction from the device path. The only state
/// that changes afterwards is the serial number, filled in at most once by
/// the first successful `get_serial_number`.
pub struct Device {
    path: String,
    mode: ConnectionMode,
    baud_rate: u32,
    serial_timeout: Duration,
    usb_timeout: Duration,
    registry: Registry,
    test_port: Option<TestPort>,
    serial_number: OnceLock<String>,
}

impl Device {
    pub fn new(path: &str) -> Result<Self, DeviceError> {
        Self::build(path, &Config::default())
    }

    pub fn from_config(config: &Config) -> Result<Self, DeviceError> {
        let path = config.device.as_deref().unwrap_or_default();
        Self::build(path, config)
    }

    /// A test-mode device answering from `port` instead of the default fixture.
    pub fn with_test_port(port: TestPort) -> Self {
        let mut device = Self::unchecked(TEST_DEVICE, &Config::default());
        device.test_port = Some(port);
        device
    }

    fn build(path: &str, config: &Config) -> Result<Self, DeviceError> {
        if path.is_empty() {
            return Err(DeviceError::NoDevice);
        }

        Ok(Self::unchecked(path, config))
    }

    fn unchecked(path: &str, config: &Config) -> Self {
        let mode = ConnectionMode::from_path(path);
        info!("using {} connection to {}", mode, path);

        Self {
            path: path.to_string(),
            mode,
            baud_rate: serial::BAUD_RATE,
            serial_timeout: config.serial_timeout,
            usb_timeout: config.usb_timeout,
            registry: Registry::pi30(),
            test_port: (mode == ConnectionMode::Test).then(TestPort::default),
            serial_number: OnceLock::new(),
        }
    }

    pub fn device_path(&self) -> &str {
        &self.path
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    pub fn is_test(&self) -> bool {
        self.mode == ConnectionMode::Test
    }

    pub fn is_direct_usb(&self) -> bool {
        matches!(self.mode, ConnectionMode::DirectUsb { .. })
    }

    /// Only meaningful for serial connections, but always reported.
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The test port behind a test-mode device, for inspecting traffic.
    pub fn test_port(&self) -> Option<&TestPort> {
        self.test_port.as_ref()
    }

    pub fn get_all_commands(&self) -> Vec<Descriptor> {
        self.registry.descriptors()
    }

    fn open(&self) -> Result<Port, TransportError> {
        let port = match self.mode {
            ConnectionMode::Test => Port::from(self.test_port.clone().unwrap_or_default()),
            ConnectionMode::DirectUsb { .. } => {
                Port::from(HidPort::open(&self.path, self.usb_timeout)?)
            }
            ConnectionMode::Serial => Port::from(SerialPort::open(
                &self.path,
                self.baud_rate,
                self.serial_timeout,
            )?),
        };

        Ok(port)
    }

    fn round_trip(&self, request: &[u8]) -> Result<Vec<u8>, TransportError> {
        let mut port = self.open()?;
        port.send_frame(request)?;
        port.read_frame()
    }

    /// Run `command_text` against the inverter.
    ///
    /// `None` means either the text matches nothing in the catalog (and no
    /// I/O was attempted) or the transport failed. A response that arrived
    /// but did not validate still produces a `Command`, marked invalid.
    pub fn execute(&self, command_text: &str) -> Option<Command> {
        let Some(definition) = self.registry.find(command_text) else {
            debug!("{:?} is not a recognised command", command_text);
            return None;
        };

        let request = frame::encode(command_text);
        debug!("{} -> {:02x?}", self.path, request);

        let response = match self.round_trip(&request) {
            Ok(response) => response,
            Err(err) => {
                warn!("{}: {} failed: {}", self.path, command_text, err);
                return None;
            }
        };
        debug!("{} <- {:02x?}", self.path, response);

        Some(Command::from_response(command_text, definition, &response))
    }

    /// The inverter's serial number, queried once and cached.
    pub fn get_serial_number(&self) -> Result<String> {
        if let Some(serial) = self.serial_number.get() {
            return Ok(serial.clone());
        }

        let query = self.registry.serial_number_command();
        let command = match self.execute(query) {
            Some(command) if command.is_valid() => command,
            Some(_) => bail!("{}: invalid response to {}", self.path, query),
            None => bail!("{}: no response to {}", self.path, query),
        };

        let serial = command
            .fields()
            .first()
            .and_then(|(_, value)| value.as_text())
            .ok_or_else(|| anyhow!("{}: {} returned no serial number", self.path, query))?
            .to_string();

        // first stored value wins if callers race
        Ok(self.serial_number.get_or_init(|| serial).clone())
    }

    /// The cached serial number, without querying the inverter.
    pub fn cached_serial_number(&self) -> Option<&str> {
        self.serial_number.get().map(String::as_str)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Inverter connected via {} on {}", self.mode, self.path)?;
        if self.mode == ConnectionMode::Serial {
            write!(f, " at {} baud", self.baud_rate)?;
        }
        match self.cached_serial_number() {
            Some(serial) => write!(f, ", serial number {}", serial),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("baud_rate", &self.baud_rate)
            .field("serial_number", &self.cached_serial_number())
            .finish()
    }
}
