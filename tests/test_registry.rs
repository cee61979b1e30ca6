mod common;
use common::*;

use mpp_solar::pi30::{
    commands::{COMMANDS, SERIAL_NUMBER},
    field::{FieldDef, FieldKind},
    frame,
    registry::{ArgumentFormat, CommandType, Matcher, MatcherKind},
};
use std::collections::HashSet;

const ACK: &[FieldDef] = &[FieldDef::new("status", FieldKind::Text, "")];

static DUPLICATE_EXACT: &[CommandDefinition] = &[
    CommandDefinition {
        matcher: Matcher::Exact("QID"),
        name: "QID",
        description: "",
        command_type: CommandType::Query,
        fields: ACK,
    },
    CommandDefinition {
        matcher: Matcher::Exact("QID"),
        name: "QID again",
        description: "",
        command_type: CommandType::Query,
        fields: ACK,
    },
];

static PREFIX_SHADOWS_EXACT: &[CommandDefinition] = &[
    CommandDefinition {
        matcher: Matcher::Exact("QID"),
        name: "QID",
        description: "",
        command_type: CommandType::Query,
        fields: ACK,
    },
    CommandDefinition {
        matcher: Matcher::Exact("POP"),
        name: "POP",
        description: "",
        command_type: CommandType::Setter,
        fields: ACK,
    },
    CommandDefinition {
        matcher: Matcher::Prefix("PO", ArgumentFormat::digits(2, 0)),
        name: "PO",
        description: "",
        command_type: CommandType::Setter,
        fields: ACK,
    },
];

static NESTED_PREFIXES: &[CommandDefinition] = &[
    CommandDefinition {
        matcher: Matcher::Exact("QID"),
        name: "QID",
        description: "",
        command_type: CommandType::Query,
        fields: ACK,
    },
    CommandDefinition {
        matcher: Matcher::Prefix("PBT", ArgumentFormat::digits(2, 0)),
        name: "PBT",
        description: "",
        command_type: CommandType::Setter,
        fields: ACK,
    },
    CommandDefinition {
        matcher: Matcher::Prefix("PB", ArgumentFormat::digits(2, 0)),
        name: "PB",
        description: "",
        command_type: CommandType::Setter,
        fields: ACK,
    },
];

#[test]
fn catalog_is_complete_and_unique() {
    let device = Factory::test_device();
    let commands = device.get_all_commands();
    assert!(!commands.is_empty());

    let unique: HashSet<&str> = commands.iter().map(|c| c.command).collect();
    assert_eq!(unique.len(), commands.len());

    for query in Factory::bulk_queries() {
        assert!(unique.contains(query), "{} missing from catalog", query);
    }
}

#[test]
fn descriptors() {
    let registry = Registry::pi30();

    let qmod = registry.find("QMOD").unwrap().descriptor();
    assert_eq!(qmod.matcher, MatcherKind::Exact);
    assert_eq!(qmod.command_type, CommandType::Query);
    assert_eq!(qmod.fields, vec!["Device Mode"]);

    let pcvv = registry.find("PCVV48.0").unwrap().descriptor();
    assert_eq!(pcvv.name, "PCVV");
    assert_eq!(pcvv.matcher, MatcherKind::Prefix);
    assert_eq!(pcvv.command_type, CommandType::Setter);
    assert_eq!(pcvv.fields, vec!["Command Status"]);
}

#[test]
fn exact_match_wins() {
    let registry = Registry::pi30();
    assert_eq!(registry.find("QPI").unwrap().name, "QPI");
    assert_eq!(registry.find("QPIGS").unwrap().name, "QPIGS");
    assert_eq!(registry.find("PF").unwrap().name, "PF");
    assert!(registry.find("QPIG").is_none());
    assert!(registry.find("qpigs").is_none());
    assert!(registry.find("").is_none());
}

#[test]
fn prefix_resolution() {
    let registry = Registry::pi30();
    assert_eq!(registry.find("PSDV56.4").unwrap().name, "PSDV");
    assert_eq!(registry.find("PCVV48.0").unwrap().name, "PCVV");
    assert_eq!(registry.find("PBT01").unwrap().name, "PBT");
    assert_eq!(registry.find("MUCHGC002").unwrap().name, "MUCHGC");
    assert_eq!(registry.find("F60").unwrap().name, "F");
    assert!(registry.find("PSDV").is_none());
    assert!(registry.find("PSDV56.4 ").is_none());
    assert!(registry.find("PBT03").is_none());
}

#[test]
fn ambiguous_catalogs_are_rejected() {
    assert_eq!(
        Registry::new(DUPLICATE_EXACT, "QID").unwrap_err(),
        RegistryError::DuplicateCommand("QID".to_string())
    );
    assert_eq!(
        Registry::new(PREFIX_SHADOWS_EXACT, "QID").unwrap_err(),
        RegistryError::OverlappingPrefix {
            prefix: "PO".to_string(),
            other: "POP".to_string()
        }
    );
    assert_eq!(
        Registry::new(NESTED_PREFIXES, "QID").unwrap_err(),
        RegistryError::OverlappingPrefix {
            prefix: "PB".to_string(),
            other: "PBT".to_string()
        }
    );
    assert_eq!(
        Registry::new(COMMANDS, "QNOPE").unwrap_err(),
        RegistryError::MissingSerialNumberCommand
    );
}

#[test]
fn builtin_catalog_passes_validation() {
    let registry = Registry::new(COMMANDS, SERIAL_NUMBER).unwrap();
    assert_eq!(registry.all_commands().len(), Registry::pi30().all_commands().len());
    assert_eq!(registry.serial_number_command(), "QID");
}

#[test]
fn frame_round_trip_for_every_query() {
    for definition in Registry::pi30().all_commands() {
        if let Matcher::Exact(text) = definition.matcher {
            let decoded = frame::decode(&frame::encode(text));
            assert!(decoded.valid, "{} did not validate", text);
            assert_eq!(decoded.payload, text.as_bytes());
        }
    }
}
