pub mod hid;
pub mod serial;
pub mod test_port;

pub use hid::HidPort;
pub use serial::SerialPort;
pub use test_port::TestPort;

use crate::error::TransportError;
use crate::pi30::frame::TERMINATOR;

use enum_dispatch::*;

/// Upper bound on a single response, whatever the channel.
pub const MAX_FRAME_LEN: usize = 1024;

#[enum_dispatch]
pub trait Transport {
    fn send_frame(&mut self, frame: &[u8]) -> Result<(), TransportError>;

    /// Read one frame, up to and including the terminator.
    fn read_frame(&mut self) -> Result<Vec<u8>, TransportError>;
}

/// An open channel to one inverter. Dropping it releases the handle.
#[enum_dispatch(Transport)]
pub enum Port {
    Serial(SerialPort),
    Hid(HidPort),
    Test(TestPort),
}

/// Cut `buf` after the first terminator, returning whether one was found.
pub(crate) fn truncate_at_terminator(buf: &mut Vec<u8>) -> bool {
    match buf.iter().position(|&b| b == TERMINATOR) {
        Some(pos) => {
            buf.truncate(pos + 1);
            true
        }
        None => false,
    }
}
