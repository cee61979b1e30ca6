use thiserror::Error;

/// Raised when a `Device` cannot be constructed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeviceError {
    #[error("no device specified")]
    NoDevice,
}

/// Anything that went wrong moving bytes to or from the inverter.
///
/// The command engine never hands these to its caller, `execute` turns them
/// into a `None` result. They are still logged at `warn` level.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("timed out after {0:?} waiting for a response")]
    Timeout(std::time::Duration),
    #[error("no response available for {0}")]
    NoData(String),
    #[error("response exceeded {0} bytes without a terminator")]
    Overflow(usize),
}

impl From<serialport::Error> for TransportError {
    fn from(err: serialport::Error) -> Self {
        Self::Io(err.into())
    }
}

/// A command catalog that would match some input more than one way.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command {0} is defined more than once")]
    DuplicateCommand(String),
    #[error("prefix {prefix} overlaps with {other}")]
    OverlappingPrefix { prefix: String, other: String },
    #[error("no serial number command in catalog")]
    MissingSerialNumberCommand,
}
