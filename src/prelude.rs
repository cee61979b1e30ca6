pub use anyhow::{anyhow, bail, Result};
pub use log::{debug, error, info, trace, warn};

pub use crate::config::Config;
pub use crate::error::{DeviceError, RegistryError, TransportError};
pub use crate::options::Options;
pub use crate::pi30::{
    command::Command,
    device::{ConnectionMode, Device},
    field::FieldValue,
    registry::{CommandDefinition, Descriptor, Registry},
};
pub use crate::transport::TestPort;
