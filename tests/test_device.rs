mod common;
use common::*;

use mpp_solar::transport::test_port::TEST_SERIAL_NUMBER;

#[test]
fn construction_requires_a_device() {
    common_setup();

    assert_eq!(Device::new("").unwrap_err(), DeviceError::NoDevice);
    assert_eq!(
        Device::from_config(&Config::default()).unwrap_err(),
        DeviceError::NoDevice
    );
}

#[test]
fn serial_defaults() {
    let device = Device::new("/dev/ttyUSB0").unwrap();
    assert_eq!(device.mode(), ConnectionMode::Serial);
    assert_eq!(device.baud_rate(), 2400);
    assert_eq!(device.device_path(), "/dev/ttyUSB0");
    assert_eq!(device.cached_serial_number(), None);
    assert!(!device.is_test());
    assert!(!device.is_direct_usb());
    assert!(!device.get_all_commands().is_empty());
}

#[test]
fn hidraw_is_direct_usb() {
    for (path, index) in [("/dev/hidraw0", 0), ("/dev/hidraw9", 9), ("/dev/hidraw12", 12)] {
        let device = Device::new(path).unwrap();
        assert_eq!(device.mode(), ConnectionMode::DirectUsb { index });
        assert_eq!(device.baud_rate(), 2400);
        assert_eq!(device.device_path(), path);
        assert_eq!(device.cached_serial_number(), None);
        assert!(!device.is_test());
        assert!(device.is_direct_usb());
        assert!(!device.get_all_commands().is_empty());
    }
}

#[test]
fn test_device_defaults() {
    let device = Factory::test_device();
    assert_eq!(device.mode(), ConnectionMode::Test);
    assert_eq!(device.baud_rate(), 2400);
    assert_eq!(device.device_path(), "TEST");
    assert_eq!(device.cached_serial_number(), None);
    assert!(device.is_test());
    assert!(!device.is_direct_usb());
    assert!(device.test_port().is_some());
}

#[test]
fn serial_number_is_cached() {
    common_setup();

    let (device, port) = Factory::recording_device();
    assert_eq!(device.get_serial_number().unwrap(), TEST_SERIAL_NUMBER);
    assert_eq!(device.get_serial_number().unwrap(), TEST_SERIAL_NUMBER);
    assert_eq!(device.cached_serial_number(), Some(TEST_SERIAL_NUMBER));
    assert_eq!(port.sent(), vec!["QID".to_string()]);
}

#[test]
fn serial_number_failure_is_not_cached() {
    let device = Device::with_test_port(TestPort::empty());
    assert!(device.get_serial_number().is_err());
    assert_eq!(device.cached_serial_number(), None);
}

#[test]
fn display() {
    let device = Factory::test_device();
    assert!(device.to_string().contains("TEST"));
    device.get_serial_number().unwrap();
    assert!(device.to_string().contains(TEST_SERIAL_NUMBER));

    let device = Device::new("/dev/hidraw0").unwrap();
    assert!(device.to_string().contains("/dev/hidraw0"));

    let device = Device::new("/dev/ttyUSB0").unwrap();
    assert!(device.to_string().contains("2400"));
}

#[test]
fn unrecognised_command_does_no_io() {
    common_setup();

    let (device, port) = Factory::recording_device();
    assert!(device.execute("INVALID99").is_none());
    assert!(port.sent().is_empty());
}

#[test]
fn q1() {
    common_setup();

    let device = Factory::test_device();
    let command = device.execute("Q1").unwrap();
    assert!(command.is_valid());
    assert_eq!(command.request(), "Q1");
    assert_eq!(command.definition().name, "Q1");
    assert_eq!(command.fields().len(), 17);
    assert_eq!(
        command.field("Inverter Charge Status"),
        Some(&FieldValue::Code {
            code: "13",
            label: "Float"
        })
    );
    assert_eq!(command.field("Sync Frequency"), Some(&FieldValue::Decimal(50.0)));
    assert_eq!(command.field("SCC Charge Power"), Some(&FieldValue::Integer(580)));
}

#[test]
fn qpigs_fields() {
    let device = Factory::test_device();
    let command = device.execute("QPIGS").unwrap();
    assert!(command.is_valid());
    assert_eq!(command.field("AC Output Voltage"), Some(&FieldValue::Decimal(230.0)));
    assert_eq!(command.field("BUS Voltage"), Some(&FieldValue::Integer(460)));
    assert_eq!(command.field("PV Charging Power"), Some(&FieldValue::Integer(856)));

    let Some(FieldValue::Flags(status)) = command.field("Device Status") else {
        panic!("device status should be flags");
    };
    assert_eq!(status.len(), 8);
    assert!(status.contains(&("Is Load On", true)));
    assert!(status.contains(&("Is AC Charging On", false)));
}

#[test]
fn qflag_settings() {
    let device = Factory::test_device();
    let command = device.execute("QFLAG").unwrap();
    assert!(command.is_valid());

    let Some(FieldValue::Flags(settings)) = command.field("Device Flags") else {
        panic!("device flags should be flags");
    };
    assert_eq!(settings.len(), 9);
    assert!(settings.contains(&("Buzzer", true)));
    assert!(settings.contains(&("LCD Backlight", true)));
    assert!(settings.contains(&("Overload Bypass", false)));
    assert!(settings.contains(&("Fault Code Record", false)));

    let port = TestPort::empty().with_payload("QFLAG", "(EaqDb");
    let command = Device::with_test_port(port).execute("QFLAG").unwrap();
    assert!(!command.is_valid());
}

#[test]
fn setters_with_valid_arguments() {
    common_setup();

    let (device, port) = Factory::recording_device();
    for text in ["PSDV56.4", "PCVV48.0", "POP02", "MCHGC030", "F50", "PF"] {
        let command = device.execute(text).unwrap();
        assert!(command.is_valid(), "{} should be valid", text);
        assert_eq!(
            command.field("Command Status"),
            Some(&FieldValue::Code {
                code: "ACK",
                label: "Succeeded"
            })
        );
    }
    assert_eq!(port.sent().len(), 6);
    assert_eq!(port.sent()[0], "PSDV56.4");
}

#[test]
fn setters_with_malformed_arguments() {
    let (device, port) = Factory::recording_device();
    let malformed = [
        "PSDV56", "PSDV5.64", "PSDV56.40", "PCVV4.80", "PCVV48", "PCVV60.0", "POP3", "F55",
        "MCHGC30",
    ];
    for text in malformed {
        assert!(device.execute(text).is_none(), "{} should not match", text);
    }
    assert!(port.sent().is_empty());
}

#[test]
fn bulk_queries() {
    common_setup();

    let device = Factory::test_device();
    for text in Factory::bulk_queries() {
        let command = device.execute(text).unwrap_or_else(|| panic!("{} returned None", text));
        assert!(command.is_valid(), "{} should be valid", text);
        assert_eq!(command.fields().len(), command.definition().fields.len());
    }
}

#[test]
fn corrupt_response_is_invalid_not_none() {
    let port = TestPort::empty().with_response("QMOD", b"(B\x00\x00\r");
    let device = Device::with_test_port(port);

    let command = device.execute("QMOD").unwrap();
    assert!(!command.is_valid());
    assert!(command.fields().is_empty());
    assert_eq!(command.raw_response(), b"(B");
}

#[test]
fn field_count_mismatch_is_invalid() {
    let port = TestPort::empty().with_payload("QMOD", "(B L");
    let device = Device::with_test_port(port);

    let command = device.execute("QMOD").unwrap();
    assert!(!command.is_valid());
    assert!(command.fields().is_empty());
}

#[test]
fn undecodable_field_is_invalid() {
    let port = TestPort::empty().with_payload("QMOD", "(X");
    let device = Device::with_test_port(port);

    let command = device.execute("QMOD").unwrap();
    assert!(!command.is_valid());
    assert!(command.fields().is_empty());
}

#[test]
fn transport_failure_is_none() {
    common_setup();

    let device = Device::with_test_port(TestPort::empty());
    assert!(device.execute("QPIGS").is_none());

    let device = Device::new("/dev/ttyUSB-mpp-solar-missing").unwrap();
    assert!(device.execute("Q1").is_none());

    let device = Device::new("/dev/hidraw-mpp-solar-missing1").unwrap();
    assert!(device.execute("Q1").is_none());
}

#[test]
fn command_json() {
    let device = Factory::test_device();
    let command = device.execute("QMOD").unwrap();

    let json = serde_json::to_value(&command).unwrap();
    assert_eq!(json["command"], "QMOD");
    assert_eq!(json["valid"], true);
    assert_eq!(json["fields"]["Device Mode"]["value"], "Battery");
}
