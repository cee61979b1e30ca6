use crate::prelude::*;
use crate::pi30::field::FieldValue;
use crate::pi30::frame::{self, START_MARKER};
use crate::pi30::registry::CommandDefinition;

use serde::{ser::SerializeStruct, Serialize, Serializer};
use std::fmt;

/// The outcome of one round trip to the inverter.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    request: String,
    definition: &'static CommandDefinition,
    raw_response: Vec<u8>,
    fields: Vec<(&'static str, FieldValue)>,
    valid: bool,
}

impl Command {
    /// Build a command from a received frame, decoding fields only when the
    /// frame validates and every field parses.
    pub fn from_response(
        request: &str,
        definition: &'static CommandDefinition,
        raw: &[u8],
    ) -> Self {
        let decoded = frame::decode(raw);
        let mut command = Self {
            request: request.to_string(),
            definition,
            raw_response: decoded.payload,
            fields: Vec::new(),
            valid: false,
        };

        if !decoded.valid {
            warn!("{}: response failed checksum validation", request);
            return command;
        }

        match command.decode_fields() {
            Ok(fields) => {
                command.fields = fields;
                command.valid = true;
            }
            Err(err) => warn!("{}: {}", request, err),
        }

        command
    }

    fn decode_fields(&self) -> Result<Vec<(&'static str, FieldValue)>> {
        let body = self
            .raw_response
            .strip_prefix(&[START_MARKER])
            .unwrap_or(&self.raw_response);
        let body = std::str::from_utf8(body)
            .map_err(|err| anyhow!("response is not valid text: {}", err))?;

        let tokens: Vec<&str> = if body.is_empty() {
            Vec::new()
        } else {
            body.split(' ').collect()
        };

        let schema = self.definition.fields;
        if tokens.len() != schema.len() {
            bail!(
                "expected {} fields, response has {}",
                schema.len(),
                tokens.len()
            );
        }

        schema
            .iter()
            .zip(tokens)
            .map(|(field, token)| Ok((field.name, field.decode(token)?)))
            .collect()
    }

    pub fn request(&self) -> &str {
        &self.request
    }

    pub fn definition(&self) -> &'static CommandDefinition {
        self.definition
    }

    pub fn raw_response(&self) -> &[u8] {
        &self.raw_response
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Decoded fields in schema order. Empty unless the command is valid.
    pub fn fields(&self) -> &[(&'static str, FieldValue)] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}) valid={}",
            self.request, self.definition.description, self.valid
        )?;

        if !self.valid {
            return write!(f, "  raw: {:?}", String::from_utf8_lossy(&self.raw_response));
        }

        for (def, (name, value)) in self.definition.fields.iter().zip(&self.fields) {
            writeln!(f, "  {:<45} {} {}", name, value, def.unit)?;
        }
        Ok(())
    }
}

impl Serialize for Command {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct Reading<'a> {
            value: &'a FieldValue,
            unit: &'static str,
        }

        struct Fields<'a>(&'a Command);

        impl Serialize for Fields<'_> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                use serde::ser::SerializeMap;

                let command = self.0;
                let mut map = serializer.serialize_map(Some(command.fields.len()))?;
                for (def, (name, value)) in command.definition.fields.iter().zip(&command.fields) {
                    map.serialize_entry(
                        name,
                        &Reading {
                            value,
                            unit: def.unit,
                        },
                    )?;
                }
                map.end()
            }
        }

        let mut state = serializer.serialize_struct("Command", 5)?;
        state.serialize_field("command", &self.request)?;
        state.serialize_field("name", self.definition.name)?;
        state.serialize_field("description", self.definition.description)?;
        state.serialize_field("valid", &self.valid)?;
        state.serialize_field("fields", &Fields(self))?;
        state.end()
    }
}
