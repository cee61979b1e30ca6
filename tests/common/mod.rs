#![allow(dead_code)]

pub use mpp_solar::prelude::*;

pub fn common_setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct Factory();
impl Factory {
    pub fn test_device() -> Device {
        Device::new("TEST").unwrap()
    }

    /// A test device plus a handle onto its port, for checking traffic.
    pub fn recording_device() -> (Device, TestPort) {
        let port = TestPort::default();
        (Device::with_test_port(port.clone()), port)
    }

    pub fn bulk_queries() -> Vec<&'static str> {
        vec![
            "Q1", "QBOOT", "QDI", "QFLAG", "QID", "QMCHGCR", "QMOD", "QMUCHGCR", "QOPM", "QPGS0",
            "QPI", "QPIGS", "QPIRI", "QPIWS", "QVFW", "QVFW2",
        ]
    }
}
