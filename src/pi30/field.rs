use crate::prelude::*;

use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Integer,
    Decimal,
    /// Token is looked up in a `(code, label)` table.
    Code(&'static [(&'static str, &'static str)]),
    Text,
    /// One `0`/`1` character per named bit, most significant first.
    Flags(&'static [&'static str]),
    /// `E<letters>D<letters>`: settings named by letter, enabled then disabled.
    Toggles(&'static [(char, &'static str)]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub scale: Option<f64>,
    pub unit: &'static str,
}

impl FieldDef {
    pub const fn new(name: &'static str, kind: FieldKind, unit: &'static str) -> Self {
        Self {
            name,
            kind,
            scale: None,
            unit,
        }
    }

    pub const fn scaled(
        name: &'static str,
        kind: FieldKind,
        scale: f64,
        unit: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            scale: Some(scale),
            unit,
        }
    }

    pub fn decode(&self, token: &str) -> Result<FieldValue> {
        let value = match self.kind {
            FieldKind::Integer => {
                let raw = token.parse::<i64>().map_err(|err| {
                    anyhow!("{}: {:?} is not an integer: {}", self.name, token, err)
                })?;
                match self.scale {
                    Some(scale) => FieldValue::Decimal(raw as f64 * scale),
                    None => FieldValue::Integer(raw),
                }
            }
            FieldKind::Decimal => {
                let raw = token
                    .parse::<f64>()
                    .map_err(|err| anyhow!("{}: {:?} is not a number: {}", self.name, token, err))?;
                FieldValue::Decimal(raw * self.scale.unwrap_or(1.0))
            }
            FieldKind::Code(options) => {
                let &(code, label) = options
                    .iter()
                    .find(|(code, _)| *code == token)
                    .ok_or_else(|| anyhow!("{}: unknown code {:?}", self.name, token))?;
                FieldValue::Code { code, label }
            }
            FieldKind::Text => FieldValue::Text(token.to_string()),
            FieldKind::Flags(names) => {
                if token.len() != names.len() {
                    bail!(
                        "{}: expected {} flag bits, got {:?}",
                        self.name,
                        names.len(),
                        token
                    );
                }
                let flags = names
                    .iter()
                    .zip(token.chars())
                    .map(|(name, bit)| match bit {
                        '0' => Ok((*name, false)),
                        '1' => Ok((*name, true)),
                        _ => Err(anyhow!("{}: invalid flag bit {:?}", self.name, bit)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                FieldValue::Flags(flags)
            }
            FieldKind::Toggles(settings) => {
                FieldValue::Flags(self.decode_toggles(settings, token)?)
            }
        };

        Ok(value)
    }

    fn decode_toggles(
        &self,
        settings: &'static [(char, &'static str)],
        token: &str,
    ) -> Result<Vec<(&'static str, bool)>> {
        let rest = token
            .strip_prefix('E')
            .ok_or_else(|| anyhow!("{}: {:?} does not start with E", self.name, token))?;
        let (enabled, disabled) = rest.split_once('D').unwrap_or((rest, ""));

        for letter in enabled.chars().chain(disabled.chars()) {
            if !settings.iter().any(|(l, _)| *l == letter) {
                bail!("{}: unknown setting {:?}", self.name, letter);
            }
        }

        // settings the inverter did not mention are left out
        Ok(settings
            .iter()
            .filter_map(|&(letter, name)| {
                if enabled.contains(letter) {
                    Some((name, true))
                } else if disabled.contains(letter) {
                    Some((name, false))
                } else {
                    None
                }
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Decimal(f64),
    Code {
        code: &'static str,
        label: &'static str,
    },
    Text(String),
    Flags(Vec<(&'static str, bool)>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            Self::Code { label, .. } => Some(*label),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{}", i),
            Self::Decimal(d) => {
                // at least one decimal place, without float noise from scaling
                let text = format!("{:.6}", d);
                let text = text.trim_end_matches('0');
                if text.ends_with('.') {
                    write!(f, "{}0", text)
                } else {
                    write!(f, "{}", text)
                }
            }
            Self::Code { label, .. } => write!(f, "{}", label),
            Self::Text(s) => write!(f, "{}", s),
            Self::Flags(flags) => {
                let set: Vec<&str> = flags
                    .iter()
                    .filter(|(_, on)| *on)
                    .map(|(name, _)| *name)
                    .collect();
                write!(f, "[{}]", set.join(", "))
            }
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Decimal(d) => serializer.serialize_f64(*d),
            Self::Code { label, .. } => serializer.serialize_str(label),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Flags(flags) => {
                let mut map = serializer.serialize_map(Some(flags.len()))?;
                for (name, on) in flags {
                    map.serialize_entry(name, on)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: &[(&str, &str)] = &[("B", "Battery"), ("L", "Line")];

    #[test]
    fn scaled_integer_becomes_decimal() {
        let field = FieldDef::scaled("bus", FieldKind::Integer, 0.1, "V");
        let value = field.decode("385").unwrap();
        assert!(matches!(value, FieldValue::Decimal(_)));
        assert!((value.as_f64().unwrap() - 38.5).abs() < 1e-9);
    }

    #[test]
    fn unknown_code_is_rejected() {
        let field = FieldDef::new("mode", FieldKind::Code(MODES), "");
        assert_eq!(
            field.decode("L").unwrap(),
            FieldValue::Code {
                code: "L",
                label: "Line"
            }
        );
        assert!(field.decode("X").is_err());
    }

    #[test]
    fn flags_must_match_bit_count() {
        let field = FieldDef::new("status", FieldKind::Flags(&["a", "b"]), "");
        assert_eq!(
            field.decode("10").unwrap(),
            FieldValue::Flags(vec![("a", true), ("b", false)])
        );
        assert!(field.decode("101").is_err());
        assert!(field.decode("1x").is_err());
    }

    #[test]
    fn integer_rejects_garbage() {
        let field = FieldDef::new("n", FieldKind::Integer, "");
        assert!(field.decode("12.5").is_err());
    }

    const SETTINGS: &[(char, &str)] = &[('a', "Buzzer"), ('b', "Bypass"), ('k', "LCD Reset")];

    #[test]
    fn toggles_split_enabled_and_disabled() {
        let field = FieldDef::new("flags", FieldKind::Toggles(SETTINGS), "");
        assert_eq!(
            field.decode("EakDb").unwrap(),
            FieldValue::Flags(vec![("Buzzer", true), ("Bypass", false), ("LCD Reset", true)])
        );
        assert_eq!(
            field.decode("Eb").unwrap(),
            FieldValue::Flags(vec![("Bypass", true)])
        );
        assert!(field.decode("akDb").is_err());
        assert!(field.decode("EaDq").is_err());
    }

    #[test]
    fn decimals_keep_a_decimal_place() {
        assert_eq!(FieldValue::Decimal(230.0).to_string(), "230.0");
        assert_eq!(FieldValue::Decimal(57.45).to_string(), "57.45");
        assert_eq!(FieldValue::Decimal(0.0).to_string(), "0.0");

        let field = FieldDef::scaled("bus", FieldKind::Integer, 0.1, "V");
        assert_eq!(field.decode("385").unwrap().to_string(), "38.5");
    }
}
