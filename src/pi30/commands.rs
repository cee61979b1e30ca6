//! The PI30 command catalog.

use crate::pi30::field::{FieldDef, FieldKind::*};
use crate::pi30::registry::{ArgumentFormat, CommandDefinition, CommandType::*, Matcher::*};

pub const SERIAL_NUMBER: &str = "QID";

// option tables {{{
const YES_NO: &[(&str, &str)] = &[("0", "No"), ("1", "Yes")];

const ENABLED: &[(&str, &str)] = &[("0", "Disabled"), ("1", "Enabled")];

const ACK: &[(&str, &str)] = &[("ACK", "Succeeded"), ("NAK", "Failed")];

const DEVICE_MODE: &[(&str, &str)] = &[
    ("P", "Power on"),
    ("S", "Standby"),
    ("L", "Line"),
    ("B", "Battery"),
    ("F", "Fault"),
    ("H", "Power saving"),
    ("D", "Shutdown"),
];

const BATTERY_TYPE: &[(&str, &str)] = &[("0", "AGM"), ("1", "Flooded"), ("2", "User")];

const INPUT_VOLTAGE_RANGE: &[(&str, &str)] = &[("0", "Appliance"), ("1", "UPS")];

const OUTPUT_SOURCE_PRIORITY: &[(&str, &str)] = &[
    ("0", "Utility first"),
    ("1", "Solar first"),
    ("2", "SBU first"),
];

const CHARGER_SOURCE_PRIORITY: &[(&str, &str)] = &[
    ("0", "Utility first"),
    ("1", "Solar first"),
    ("2", "Solar + Utility"),
    ("3", "Only solar charging permitted"),
];

const MACHINE_TYPE: &[(&str, &str)] = &[("00", "Grid tie"), ("01", "Off Grid"), ("10", "Hybrid")];

const TOPOLOGY: &[(&str, &str)] = &[("0", "Transformerless"), ("1", "Transformer")];

const OUTPUT_MODE: &[(&str, &str)] = &[
    ("0", "Single machine output"),
    ("1", "Parallel output"),
    ("2", "Phase 1 of 3 phase output"),
    ("3", "Phase 2 of 3 phase output"),
    ("4", "Phase 3 of 3 phase output"),
];

const OUTPUT_MODE_2: &[(&str, &str)] = &[
    ("00", "Single machine output"),
    ("01", "Parallel output"),
    ("02", "Phase 1 of 3 phase output"),
    ("03", "Phase 2 of 3 phase output"),
    ("04", "Phase 3 of 3 phase output"),
];

const PV_OK_CONDITION: &[(&str, &str)] = &[
    ("0", "PV OK when any unit has PV connected"),
    ("1", "PV OK only when all units have PV connected"),
];

const PV_POWER_BALANCE: &[(&str, &str)] = &[
    ("0", "PV input max current is the max charged current"),
    ("1", "PV input max power is charged power plus load power"),
];

const SCC_FLAG: &[(&str, &str)] = &[
    ("00", "SCC not communicating"),
    ("01", "SCC powered and communicating"),
];

const FAN_LOCK: &[(&str, &str)] = &[("00", "Not locked"), ("01", "Locked")];

const CHARGE_STATUS: &[(&str, &str)] = &[
    ("10", "No charging"),
    ("11", "Bulk stage"),
    ("12", "Absorb"),
    ("13", "Float"),
];

const PARALLEL_VALID: &[(&str, &str)] = &[("0", "Not valid"), ("1", "Valid")];

const FAULT_CODE: &[(&str, &str)] = &[
    ("00", "No fault"),
    ("01", "Fan is locked"),
    ("02", "Over temperature"),
    ("03", "Battery voltage is too high"),
    ("04", "Battery voltage is too low"),
    ("05", "Output short circuited or over temperature"),
    ("06", "Output voltage is too high"),
    ("07", "Over load time out"),
    ("08", "Bus voltage is too high"),
    ("09", "Bus soft start failed"),
    ("11", "Main relay failed"),
    ("51", "Over current inverter"),
    ("52", "Bus soft start failed"),
    ("53", "Inverter soft start failed"),
    ("54", "Self-test failed"),
    ("55", "Over DC voltage on output of inverter"),
    ("56", "Battery connection is open"),
    ("57", "Current sensor failed"),
    ("58", "Output voltage is too low"),
    ("60", "Inverter negative power"),
    ("71", "Parallel version different"),
    ("72", "Output circuit failed"),
    ("80", "CAN communication failed"),
    ("81", "Parallel host line lost"),
    ("82", "Parallel synchronized signal lost"),
    ("83", "Parallel battery voltage detect different"),
    ("84", "Parallel Line voltage or frequency detect different"),
    ("85", "Parallel Line input current unbalanced"),
    ("86", "Parallel output setting different"),
];
// }}}

// flag names {{{
const DEVICE_STATUS: &[&str] = &[
    "Is SBU Priority Version Added",
    "Is Configuration Changed",
    "Is SCC Firmware Updated",
    "Is Load On",
    "Is Battery Voltage to Steady While Charging",
    "Is Charging On",
    "Is SCC Charging On",
    "Is AC Charging On",
];

const DEVICE_STATUS_2: &[&str] = &[
    "Is Charging to Float",
    "Is Switched On",
    "Is Dustproof Installed",
];

const PARALLEL_STATUS: &[&str] = &[
    "Is SCC OK",
    "Is AC Charging",
    "Is SCC Charging",
    "Is Battery Over Voltage",
    "Is Battery Under Voltage",
    "Is Line Lost",
    "Is Load On",
    "Is Configuration Changed",
];

// QFLAG setting letters
const SETTINGS: &[(char, &str)] = &[
    ('a', "Buzzer"),
    ('b', "Overload Bypass"),
    ('j', "Power Saving"),
    ('k', "LCD Escape To Default"),
    ('u', "Overload Restart"),
    ('v', "Over Temperature Restart"),
    ('x', "LCD Backlight"),
    ('y', "Primary Source Interrupt Alarm"),
    ('z', "Fault Code Record"),
];

const WARNINGS: &[&str] = &[
    "Reserved a0",
    "Inverter Fault",
    "Bus Over Fault",
    "Bus Under Fault",
    "Bus Soft Fail Fault",
    "Line Fail Warning",
    "OPV Short Warning",
    "Inverter Voltage Too Low Fault",
    "Inverter Voltage Too High Fault",
    "Over Temperature Fault",
    "Fan Locked Fault",
    "Battery Voltage Too High Fault",
    "Battery Low Alarm Warning",
    "Reserved a13",
    "Battery Under Shutdown Warning",
    "Reserved a15",
    "Overload Fault",
    "EEPROM Fault",
    "Inverter Over Current Fault",
    "Inverter Soft Fail Fault",
    "Self Test Fail Fault",
    "OP DC Voltage Over Fault",
    "Battery Open Fault",
    "Current Sensor Fail Fault",
    "Battery Short Fault",
    "Power Limit Warning",
    "PV Voltage High Warning",
    "MPPT Overload Fault",
    "MPPT Overload Warning",
    "Battery Too Low to Charge Warning",
    "Reserved a30",
    "Reserved a31",
];
// }}}

// field layouts {{{
const Q1_FIELDS: &[FieldDef] = &[
    FieldDef::new("Time until the end of absorb charging", Integer, "sec"),
    FieldDef::new("Time until the end of float charging", Integer, "sec"),
    FieldDef::new("SCC Flag", Code(SCC_FLAG), ""),
    FieldDef::new("AllowSccOnFlag", Text, ""),
    FieldDef::new("Charge Average Current", Integer, "A"),
    FieldDef::new("SCC PWM Temperature", Integer, "°C"),
    FieldDef::new("Inverter Temperature", Integer, "°C"),
    FieldDef::new("Battery Temperature", Integer, "°C"),
    FieldDef::new("Transformer Temperature", Integer, "°C"),
    FieldDef::new("GPIO13", Integer, ""),
    FieldDef::new("Fan Lock Status", Code(FAN_LOCK), ""),
    FieldDef::new("Not Used", Text, ""),
    FieldDef::new("Fan PWM Speed", Integer, "%"),
    FieldDef::new("SCC Charge Power", Integer, "W"),
    FieldDef::new("Parallel Warning", Text, ""),
    FieldDef::new("Sync Frequency", Decimal, "Hz"),
    FieldDef::new("Inverter Charge Status", Code(CHARGE_STATUS), ""),
];

const QDI_FIELDS: &[FieldDef] = &[
    FieldDef::new("AC Output Voltage", Decimal, "V"),
    FieldDef::new("AC Output Frequency", Decimal, "Hz"),
    FieldDef::new("Max AC Charging Current", Integer, "A"),
    FieldDef::new("Battery Under Voltage", Decimal, "V"),
    FieldDef::new("Battery Float Charge Voltage", Decimal, "V"),
    FieldDef::new("Battery Bulk Charge Voltage", Decimal, "V"),
    FieldDef::new("Battery Recharge Voltage", Decimal, "V"),
    FieldDef::new("Max Charging Current", Integer, "A"),
    FieldDef::new("Input Voltage Range", Code(INPUT_VOLTAGE_RANGE), ""),
    FieldDef::new("Output Source Priority", Code(OUTPUT_SOURCE_PRIORITY), ""),
    FieldDef::new("Charger Source Priority", Code(CHARGER_SOURCE_PRIORITY), ""),
    FieldDef::new("Battery Type", Code(BATTERY_TYPE), ""),
    FieldDef::new("Buzzer", Code(ENABLED), ""),
    FieldDef::new("Power Saving", Code(ENABLED), ""),
    FieldDef::new("Overload Restart", Code(ENABLED), ""),
    FieldDef::new("Over Temperature Restart", Code(ENABLED), ""),
    FieldDef::new("LCD Backlight", Code(ENABLED), ""),
    FieldDef::new("Primary Source Interrupt Alarm", Code(ENABLED), ""),
    FieldDef::new("Record Fault Code", Code(ENABLED), ""),
    FieldDef::new("Overload Bypass", Code(ENABLED), ""),
    FieldDef::new("LCD Reset to Default", Code(ENABLED), ""),
    FieldDef::new("Output Mode", Code(OUTPUT_MODE), ""),
    FieldDef::new("Battery Redischarge Voltage", Decimal, "V"),
    FieldDef::new("PV OK Condition", Code(PV_OK_CONDITION), ""),
    FieldDef::new("PV Power Balance", Code(PV_POWER_BALANCE), ""),
];

const QMCHGCR_FIELDS: &[FieldDef] = &[
    FieldDef::new("Max Charging Current Option 1", Integer, "A"),
    FieldDef::new("Max Charging Current Option 2", Integer, "A"),
    FieldDef::new("Max Charging Current Option 3", Integer, "A"),
    FieldDef::new("Max Charging Current Option 4", Integer, "A"),
    FieldDef::new("Max Charging Current Option 5", Integer, "A"),
    FieldDef::new("Max Charging Current Option 6", Integer, "A"),
    FieldDef::new("Max Charging Current Option 7", Integer, "A"),
    FieldDef::new("Max Charging Current Option 8", Integer, "A"),
    FieldDef::new("Max Charging Current Option 9", Integer, "A"),
    FieldDef::new("Max Charging Current Option 10", Integer, "A"),
    FieldDef::new("Max Charging Current Option 11", Integer, "A"),
    FieldDef::new("Max Charging Current Option 12", Integer, "A"),
];

const QMUCHGCR_FIELDS: &[FieldDef] = &[
    FieldDef::new("Max Utility Charging Current Option 1", Integer, "A"),
    FieldDef::new("Max Utility Charging Current Option 2", Integer, "A"),
    FieldDef::new("Max Utility Charging Current Option 3", Integer, "A"),
    FieldDef::new("Max Utility Charging Current Option 4", Integer, "A"),
    FieldDef::new("Max Utility Charging Current Option 5", Integer, "A"),
    FieldDef::new("Max Utility Charging Current Option 6", Integer, "A"),
    FieldDef::new("Max Utility Charging Current Option 7", Integer, "A"),
];

const QPGS0_FIELDS: &[FieldDef] = &[
    FieldDef::new("Parallel Instance", Code(PARALLEL_VALID), ""),
    FieldDef::new("Serial Number", Text, ""),
    FieldDef::new("Work Mode", Code(DEVICE_MODE), ""),
    FieldDef::new("Fault Code", Code(FAULT_CODE), ""),
    FieldDef::new("Grid Voltage", Decimal, "V"),
    FieldDef::new("Grid Frequency", Decimal, "Hz"),
    FieldDef::new("AC Output Voltage", Decimal, "V"),
    FieldDef::new("AC Output Frequency", Decimal, "Hz"),
    FieldDef::new("AC Output Apparent Power", Integer, "VA"),
    FieldDef::new("AC Output Active Power", Integer, "W"),
    FieldDef::new("Load Percentage", Integer, "%"),
    FieldDef::new("Battery Voltage", Decimal, "V"),
    FieldDef::new("Battery Charging Current", Integer, "A"),
    FieldDef::new("Battery Capacity", Integer, "%"),
    FieldDef::new("PV Input Voltage", Decimal, "V"),
    FieldDef::new("Total Charging Current", Integer, "A"),
    FieldDef::new("Total AC Output Apparent Power", Integer, "VA"),
    FieldDef::new("Total AC Output Active Power", Integer, "W"),
    FieldDef::new("Total AC Output Percentage", Integer, "%"),
    FieldDef::new("Inverter Status", Flags(PARALLEL_STATUS), ""),
    FieldDef::new("Output Mode", Code(OUTPUT_MODE), ""),
    FieldDef::new("Charger Source Priority", Code(CHARGER_SOURCE_PRIORITY), ""),
    FieldDef::new("Max Charger Current", Integer, "A"),
    FieldDef::new("Max Charger Range", Integer, "A"),
    FieldDef::new("Max AC Charger Current", Integer, "A"),
    FieldDef::new("PV Input Current", Integer, "A"),
    FieldDef::new("Battery Discharge Current", Integer, "A"),
];

const QPIGS_FIELDS: &[FieldDef] = &[
    FieldDef::new("AC Input Voltage", Decimal, "V"),
    FieldDef::new("AC Input Frequency", Decimal, "Hz"),
    FieldDef::new("AC Output Voltage", Decimal, "V"),
    FieldDef::new("AC Output Frequency", Decimal, "Hz"),
    FieldDef::new("AC Output Apparent Power", Integer, "VA"),
    FieldDef::new("AC Output Active Power", Integer, "W"),
    FieldDef::new("AC Output Load", Integer, "%"),
    FieldDef::new("BUS Voltage", Integer, "V"),
    FieldDef::new("Battery Voltage", Decimal, "V"),
    FieldDef::new("Battery Charging Current", Integer, "A"),
    FieldDef::new("Battery Capacity", Integer, "%"),
    FieldDef::new("Inverter Heat Sink Temperature", Integer, "°C"),
    FieldDef::new("PV Input Current for Battery", Integer, "A"),
    FieldDef::new("PV Input Voltage", Decimal, "V"),
    FieldDef::new("Battery Voltage from SCC", Decimal, "V"),
    FieldDef::new("Battery Discharge Current", Integer, "A"),
    FieldDef::new("Device Status", Flags(DEVICE_STATUS), ""),
    FieldDef::scaled("Battery Voltage Offset for Fans On", Integer, 0.01, "V"),
    FieldDef::new("EEPROM Version", Integer, ""),
    FieldDef::new("PV Charging Power", Integer, "W"),
    FieldDef::new("Device Status 2", Flags(DEVICE_STATUS_2), ""),
];

const QPIRI_FIELDS: &[FieldDef] = &[
    FieldDef::new("AC Input Voltage", Decimal, "V"),
    FieldDef::new("AC Input Current", Decimal, "A"),
    FieldDef::new("AC Output Voltage", Decimal, "V"),
    FieldDef::new("AC Output Frequency", Decimal, "Hz"),
    FieldDef::new("AC Output Current", Decimal, "A"),
    FieldDef::new("AC Output Apparent Power", Integer, "VA"),
    FieldDef::new("AC Output Active Power", Integer, "W"),
    FieldDef::new("Battery Voltage", Decimal, "V"),
    FieldDef::new("Battery Recharge Voltage", Decimal, "V"),
    FieldDef::new("Battery Under Voltage", Decimal, "V"),
    FieldDef::new("Battery Bulk Charge Voltage", Decimal, "V"),
    FieldDef::new("Battery Float Charge Voltage", Decimal, "V"),
    FieldDef::new("Battery Type", Code(BATTERY_TYPE), ""),
    FieldDef::new("Max AC Charging Current", Integer, "A"),
    FieldDef::new("Max Charging Current", Integer, "A"),
    FieldDef::new("Input Voltage Range", Code(INPUT_VOLTAGE_RANGE), ""),
    FieldDef::new("Output Source Priority", Code(OUTPUT_SOURCE_PRIORITY), ""),
    FieldDef::new("Charger Source Priority", Code(CHARGER_SOURCE_PRIORITY), ""),
    FieldDef::new("Max Parallel Units", Integer, ""),
    FieldDef::new("Machine Type", Code(MACHINE_TYPE), ""),
    FieldDef::new("Topology", Code(TOPOLOGY), ""),
    FieldDef::new("Output Mode", Code(OUTPUT_MODE), ""),
    FieldDef::new("Battery Redischarge Voltage", Decimal, "V"),
    FieldDef::new("PV OK Condition", Code(PV_OK_CONDITION), ""),
    FieldDef::new("PV Power Balance", Code(PV_POWER_BALANCE), ""),
];

const QBOOT_FIELDS: &[FieldDef] = &[FieldDef::new("DSP Has Bootstrap", Code(YES_NO), "")];

const QFLAG_FIELDS: &[FieldDef] = &[FieldDef::new("Device Flags", Toggles(SETTINGS), "")];

const QID_FIELDS: &[FieldDef] = &[FieldDef::new("Serial Number", Text, "")];

const QMN_FIELDS: &[FieldDef] = &[FieldDef::new("Model Name", Text, "")];

const QGMN_FIELDS: &[FieldDef] = &[FieldDef::new("General Model Number", Text, "")];

const QMOD_FIELDS: &[FieldDef] = &[FieldDef::new("Device Mode", Code(DEVICE_MODE), "")];

const QOPM_FIELDS: &[FieldDef] = &[FieldDef::new("Output Mode", Code(OUTPUT_MODE_2), "")];

const QPI_FIELDS: &[FieldDef] = &[FieldDef::new("Protocol ID", Text, "")];

const QPIWS_FIELDS: &[FieldDef] = &[FieldDef::new("Warnings", Flags(WARNINGS), "")];

const QVFW_FIELDS: &[FieldDef] = &[FieldDef::new("Main CPU Firmware Version", Text, "")];

const QVFW2_FIELDS: &[FieldDef] = &[FieldDef::new("Secondary CPU Firmware Version", Text, "")];
// }}}

const SETTER_RESPONSE: &[FieldDef] = &[FieldDef::new("Command Status", Code(ACK), "")];

const fn query(
    command: &'static str,
    description: &'static str,
    fields: &'static [FieldDef],
) -> CommandDefinition {
    CommandDefinition {
        matcher: Exact(command),
        name: command,
        description,
        command_type: Query,
        fields,
    }
}

const fn setter(
    prefix: &'static str,
    format: ArgumentFormat,
    description: &'static str,
) -> CommandDefinition {
    CommandDefinition {
        matcher: Prefix(prefix, format),
        name: prefix,
        description,
        command_type: Setter,
        fields: SETTER_RESPONSE,
    }
}

const VOLTAGE: ArgumentFormat = ArgumentFormat::digits(2, 1);
const CHOICE: ArgumentFormat = ArgumentFormat::digits(2, 0);
const CURRENT: ArgumentFormat = ArgumentFormat::digits(3, 0);

pub static COMMANDS: &[CommandDefinition] = &[
    // queries {{{
    query("Q1", "Q1 Query", Q1_FIELDS),
    query("QBOOT", "DSP Has Bootstrap Inquiry", QBOOT_FIELDS),
    query("QDI", "Default Settings Inquiry", QDI_FIELDS),
    query("QFLAG", "Flag Status Inquiry", QFLAG_FIELDS),
    query(SERIAL_NUMBER, "Device Serial Number Inquiry", QID_FIELDS),
    query("QMCHGCR", "Max Charging Current Options Inquiry", QMCHGCR_FIELDS),
    query("QMN", "Model Name Inquiry", QMN_FIELDS),
    query("QGMN", "General Model Number Inquiry", QGMN_FIELDS),
    query("QMOD", "Device Mode Inquiry", QMOD_FIELDS),
    query("QMUCHGCR", "Max Utility Charging Current Options Inquiry", QMUCHGCR_FIELDS),
    query("QOPM", "Output Mode Inquiry", QOPM_FIELDS),
    query("QPGS0", "Parallel Information Inquiry", QPGS0_FIELDS),
    query("QPI", "Protocol ID Inquiry", QPI_FIELDS),
    query("QPIGS", "General Status Parameters Inquiry", QPIGS_FIELDS),
    query("QPIRI", "Device Rating Information Inquiry", QPIRI_FIELDS),
    query("QPIWS", "Warning Status Inquiry", QPIWS_FIELDS),
    query("QVFW", "Main CPU Firmware Version Inquiry", QVFW_FIELDS),
    query("QVFW2", "Secondary CPU Firmware Version Inquiry", QVFW2_FIELDS),
    // }}}
    // setters {{{
    CommandDefinition {
        matcher: Exact("PF"),
        name: "PF",
        description: "Set control parameters to default values",
        command_type: Setter,
        fields: SETTER_RESPONSE,
    },
    setter("PSDV", VOLTAGE, "Set battery cut-off voltage"),
    setter(
        "PCVV",
        VOLTAGE.within(48.0, 58.4),
        "Set battery C.V. (constant voltage) charging voltage",
    ),
    setter("PBFT", VOLTAGE.within(48.0, 58.4), "Set battery float charging voltage"),
    setter("PBCV", VOLTAGE.within(44.0, 51.0), "Set battery re-charge voltage"),
    setter(
        "PBDV",
        VOLTAGE.within(0.0, 58.0),
        "Set battery re-discharge voltage (00.0 means battery is full)",
    ),
    setter("PBT", CHOICE.within(0.0, 2.0), "Set battery type"),
    setter("POP", CHOICE.within(0.0, 2.0), "Set output source priority"),
    setter("PCP", CHOICE.within(0.0, 3.0), "Set charger source priority"),
    setter("PGR", CHOICE.within(0.0, 1.0), "Set grid working range"),
    setter("MCHGC", CURRENT, "Set max charging current"),
    setter("MUCHGC", CURRENT, "Set max utility charging current"),
    setter("F", CHOICE.one_of(&[50.0, 60.0]), "Set output rated frequency"),
    // }}}
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pi30::registry::Registry;

    #[test]
    fn catalog_is_unambiguous() {
        assert!(Registry::new(COMMANDS, SERIAL_NUMBER).is_ok());
    }

    #[test]
    fn warning_bits_cover_the_word() {
        assert_eq!(WARNINGS.len(), 32);
    }
}
