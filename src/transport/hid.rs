use crate::prelude::*;
use crate::error::TransportError;
use crate::transport::{truncate_at_terminator, Transport, MAX_FRAME_LEN};

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

/// Size of one HID report in either direction.
pub const REPORT_SIZE: usize = 8;

const FILLER: u8 = 0;
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Inverters that expose themselves as a USB HID device (`/dev/hidrawN`).
///
/// Frames are carried in fixed-size reports: writes are chopped into
/// `REPORT_SIZE` chunks padded with zeroes, and reads gather reports until
/// the terminator turns up.
pub struct HidPort {
    file: File,
    timeout: Duration,
}

impl HidPort {
    pub fn open(path: &str, timeout: Duration) -> Result<Self, TransportError> {
        debug!("opening hid device {}", path);

        let mut options = OpenOptions::new();
        options.read(true).write(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_NONBLOCK);
        }

        let file = options.open(path).map_err(|source| TransportError::Open {
            path: path.to_string(),
            source,
        })?;

        Ok(Self { file, timeout })
    }
}

/// Split a frame into zero-padded reports.
pub fn reports(frame: &[u8]) -> Vec<[u8; REPORT_SIZE]> {
    frame
        .chunks(REPORT_SIZE)
        .map(|chunk| {
            let mut report = [FILLER; REPORT_SIZE];
            report[..chunk.len()].copy_from_slice(chunk);
            report
        })
        .collect()
}

impl Transport for HidPort {
    fn send_frame(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        for report in reports(frame) {
            self.file.write_all(&report)?;
        }
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        let deadline = Instant::now() + self.timeout;
        let mut response = Vec::with_capacity(128);
        let mut report = [0u8; REPORT_SIZE];

        loop {
            match self.file.read(&mut report) {
                Ok(n) if n > 0 => {
                    response.extend_from_slice(&report[..n]);
                    if truncate_at_terminator(&mut response) {
                        return Ok(response);
                    }
                    if response.len() >= MAX_FRAME_LEN {
                        return Err(TransportError::Overflow(MAX_FRAME_LEN));
                    }
                    continue;
                }
                Ok(_) => {}
                Err(err) if err.kind() == ErrorKind::WouldBlock => {}
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }

            if Instant::now() >= deadline {
                return Err(TransportError::Timeout(self.timeout));
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

/// The report index encoded in a raw HID node path, `/dev/hidraw3` -> 3.
pub fn device_index(path: &str) -> u32 {
    let digits = path.len() - path.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    path[path.len() - digits..].parse().unwrap_or(0)
}
