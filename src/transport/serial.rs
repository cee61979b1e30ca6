use crate::prelude::*;
use crate::error::TransportError;
use crate::transport::{truncate_at_terminator, Transport, MAX_FRAME_LEN};

use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

pub const BAUD_RATE: u32 = 2400;

/// A PI30 inverter on an RS232 line, usually behind a USB serial adapter.
pub struct SerialPort {
    port: Box<dyn serialport::SerialPort>,
    timeout: Duration,
}

impl SerialPort {
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self, TransportError> {
        debug!("opening serial port {} at {} baud", path, baud_rate);

        let port = serialport::new(path, baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(timeout)
            .open()
            .map_err(|err| TransportError::Open {
                path: path.to_string(),
                source: err.into(),
            })?;

        Ok(Self { port, timeout })
    }
}

impl Transport for SerialPort {
    fn send_frame(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        // anything left over from an earlier exchange would be read as our reply
        self.port.clear(serialport::ClearBuffer::All)?;
        self.port.write_all(frame)?;
        self.port.flush()?;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        let deadline = Instant::now() + self.timeout;
        let mut response = Vec::with_capacity(128);
        let mut buf = [0u8; 64];

        loop {
            match self.port.read(&mut buf) {
                Ok(0) => {}
                Ok(n) => {
                    response.extend_from_slice(&buf[..n]);
                    if truncate_at_terminator(&mut response) {
                        return Ok(response);
                    }
                    if response.len() >= MAX_FRAME_LEN {
                        return Err(TransportError::Overflow(MAX_FRAME_LEN));
                    }
                }
                Err(err) if err.kind() == ErrorKind::TimedOut => {}
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }

            if Instant::now() >= deadline {
                return Err(TransportError::Timeout(self.timeout));
            }
        }
    }
}
