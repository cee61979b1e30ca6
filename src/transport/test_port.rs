use crate::prelude::*;
use crate::error::TransportError;
use crate::pi30::frame;
use crate::transport::Transport;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Serial number reported by the default fixture.
pub const TEST_SERIAL_NUMBER: &str = "9293333010501";

// fixture {{{
const FIXTURE: &[(&str, &str)] = &[
    ("Q1", "(00000 00000 01 01 00 030 033 031 030 00 00 000 0040 0580 0000 50.00 13"),
    ("QBOOT", "(0"),
    ("QDI", "(230.0 50.0 0030 44.0 54.0 56.4 46.0 60 0 0 2 0 0 0 0 0 1 1 1 0 1 0 54.0 0 1"),
    ("QFLAG", "(EakxyDbjuvz"),
    ("QID", "(9293333010501"),
    ("QMCHGCR", "(010 020 030 040 050 060 070 080 090 100 110 120"),
    ("QMN", "(MKS2-8000"),
    ("QGMN", "(044"),
    ("QMOD", "(B"),
    ("QMUCHGCR", "(002 010 020 030 040 050 060"),
    ("QOPM", "(00"),
    (
        "QPGS0",
        "(1 92932004102453 B 00 000.0 00.00 230.0 50.00 0437 0397 008 53.6 000 059 000.0 000 00437 00397 008 10010110 0 1 060 080 10 00 000",
    ),
    ("QPI", "(PI30"),
    (
        "QPIGS",
        "(000.0 00.0 230.0 49.9 0161 0119 003 460 57.50 012 100 0069 0014 103.8 57.45 00000 00110110 00 00 00856 010",
    ),
    (
        "QPIRI",
        "(230.0 21.7 230.0 50.0 21.7 5000 4000 48.0 46.0 42.0 56.4 54.0 0 10 010 1 0 0 6 01 0 0 54.0 0 1",
    ),
    ("QPIWS", "(00000100000000000000000000000000"),
    ("QVFW", "(VERFW:00072.70"),
    ("QVFW2", "(VERFW2:00000.31"),
    // setters answer the same whatever the argument, so these are keyed by prefix
    ("PF", "(ACK"),
    ("PSDV", "(ACK"),
    ("PCVV", "(ACK"),
    ("PBFT", "(ACK"),
    ("PBCV", "(ACK"),
    ("PBDV", "(ACK"),
    ("PBT", "(ACK"),
    ("POP", "(ACK"),
    ("PCP", "(ACK"),
    ("PGR", "(ACK"),
    ("MCHGC", "(ACK"),
    ("MUCHGC", "(ACK"),
    ("F", "(ACK"),
];
// }}}

#[derive(Default)]
struct State {
    sent: Vec<String>,
    pending: Option<Vec<u8>>,
}

/// An in-memory inverter with canned responses, for running offline.
///
/// Clones share the recorded traffic, so a test can keep one handle while
/// the device owns another.
#[derive(Clone)]
pub struct TestPort {
    responses: Arc<HashMap<String, Vec<u8>>>,
    state: Arc<Mutex<State>>,
}

impl TestPort {
    pub fn empty() -> Self {
        Self {
            responses: Arc::new(HashMap::new()),
            state: Arc::default(),
        }
    }

    /// Respond to `command` with `payload`, framed with a good checksum.
    pub fn with_payload(self, command: &str, payload: &str) -> Self {
        self.with_response(command, &frame::encode(payload))
    }

    /// Respond to `command` with exactly `raw`, valid or not.
    pub fn with_response(mut self, command: &str, raw: &[u8]) -> Self {
        Arc::make_mut(&mut self.responses).insert(command.to_string(), raw.to_vec());
        self
    }

    /// Every command received so far, in order.
    pub fn sent(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.sent.clone())
            .unwrap_or_default()
    }

    // exact key first, then the longest key that prefixes the command
    fn lookup(&self, command: &str) -> Option<&Vec<u8>> {
        self.responses.get(command).or_else(|| {
            self.responses
                .iter()
                .filter(|(key, _)| command.starts_with(key.as_str()))
                .max_by_key(|(key, _)| key.len())
                .map(|(_, raw)| raw)
        })
    }
}

impl Default for TestPort {
    fn default() -> Self {
        FIXTURE
            .iter()
            .fold(Self::empty(), |port, (command, payload)| {
                port.with_payload(command, payload)
            })
    }
}

impl Transport for TestPort {
    fn send_frame(&mut self, raw: &[u8]) -> Result<(), TransportError> {
        let decoded = frame::decode(raw);
        let command = String::from_utf8_lossy(&decoded.payload).to_string();
        debug!("test port received {:?}", command);

        let response = self.lookup(&command).cloned();
        let mut state = self
            .state
            .lock()
            .map_err(|_| TransportError::NoData(command.clone()))?;
        state.sent.push(command.clone());
        state.pending = response;

        Ok(())
    }

    fn read_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| TransportError::NoData("poisoned test port".to_string()))?;
        let command = state.sent.last().cloned().unwrap_or_default();

        state.pending.take().ok_or(TransportError::NoData(command))
    }
}
