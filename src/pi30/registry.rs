use crate::prelude::*;
use crate::error::RegistryError;
use crate::pi30::field::FieldDef;

use nom::{
    bytes::complete::{tag, take_while_m_n},
    combinator::{all_consuming, recognize},
    sequence::{pair, preceded},
    IResult,
};
use serde::Serialize;

// ArgumentFormat {{{
/// Shape of the numeric argument that follows a setter prefix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArgumentFormat {
    pub int_digits: usize,
    /// Digits after the decimal point. Zero means no point is allowed.
    pub frac_digits: usize,
    pub range: Option<(f64, f64)>,
    /// When non-empty the value must be one of these.
    pub allowed: &'static [f64],
}

impl ArgumentFormat {
    pub const fn digits(int_digits: usize, frac_digits: usize) -> Self {
        Self {
            int_digits,
            frac_digits,
            range: None,
            allowed: &[],
        }
    }

    pub const fn within(self, min: f64, max: f64) -> Self {
        Self {
            range: Some((min, max)),
            ..self
        }
    }

    pub const fn one_of(self, allowed: &'static [f64]) -> Self {
        Self { allowed, ..self }
    }

    fn is_digit(c: char) -> bool {
        c.is_ascii_digit()
    }

    fn number<'a>(&self, input: &'a str) -> IResult<&'a str, &'a str> {
        let int = take_while_m_n(self.int_digits, self.int_digits, Self::is_digit);

        if self.frac_digits == 0 {
            all_consuming(int)(input)
        } else {
            let frac = preceded(
                tag("."),
                take_while_m_n(self.frac_digits, self.frac_digits, Self::is_digit),
            );
            all_consuming(recognize(pair(int, frac)))(input)
        }
    }

    /// Parse `argument` against this format, returning the numeric value.
    pub fn parse(&self, argument: &str) -> Option<f64> {
        let (_, number) = self.number(argument).ok()?;
        let value: f64 = number.parse().ok()?;

        if let Some((min, max)) = self.range {
            if value < min || value > max {
                return None;
            }
        }
        if !self.allowed.is_empty() && !self.allowed.contains(&value) {
            return None;
        }

        Some(value)
    }
}
// }}}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Matcher {
    Exact(&'static str),
    Prefix(&'static str, ArgumentFormat),
}

impl Matcher {
    pub fn kind(&self) -> MatcherKind {
        match self {
            Self::Exact(_) => MatcherKind::Exact,
            Self::Prefix(_, _) => MatcherKind::Prefix,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::Exact(text) | Self::Prefix(text, _) => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    Exact,
    Prefix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Query,
    Setter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandDefinition {
    pub matcher: Matcher,
    pub name: &'static str,
    pub description: &'static str,
    pub command_type: CommandType,
    pub fields: &'static [FieldDef],
}

impl CommandDefinition {
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    pub fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: self.name,
            command: self.matcher.text(),
            matcher: self.matcher.kind(),
            command_type: self.command_type,
            description: self.description,
            fields: self.field_names(),
        }
    }
}

/// What a reporting layer needs to know about a command without running it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    pub name: &'static str,
    pub command: &'static str,
    pub matcher: MatcherKind,
    pub command_type: CommandType,
    pub description: &'static str,
    pub fields: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy)]
pub struct Registry {
    commands: &'static [CommandDefinition],
    serial_number: &'static str,
}

impl Registry {
    /// Build a registry over `commands`, refusing any catalog where an input
    /// could match more than one definition.
    pub fn new(
        commands: &'static [CommandDefinition],
        serial_number: &'static str,
    ) -> Result<Self, RegistryError> {
        for (i, a) in commands.iter().enumerate() {
            for b in &commands[i + 1..] {
                Self::check_pair(a, b)?;
                Self::check_pair(b, a)?;
            }
        }

        if !commands
            .iter()
            .any(|c| c.matcher == Matcher::Exact(serial_number))
        {
            return Err(RegistryError::MissingSerialNumberCommand);
        }

        Ok(Self {
            commands,
            serial_number,
        })
    }

    fn check_pair(a: &CommandDefinition, b: &CommandDefinition) -> Result<(), RegistryError> {
        match (a.matcher, b.matcher) {
            (Matcher::Exact(x), Matcher::Exact(y)) if x == y => {
                Err(RegistryError::DuplicateCommand(x.to_string()))
            }
            (Matcher::Prefix(p, _), Matcher::Exact(other))
            | (Matcher::Prefix(p, _), Matcher::Prefix(other, _))
                if other.starts_with(p) =>
            {
                Err(RegistryError::OverlappingPrefix {
                    prefix: p.to_string(),
                    other: other.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// The built-in PI30 catalog.
    pub fn pi30() -> Self {
        Self {
            commands: crate::pi30::commands::COMMANDS,
            serial_number: crate::pi30::commands::SERIAL_NUMBER,
        }
    }

    pub fn all_commands(&self) -> &'static [CommandDefinition] {
        self.commands
    }

    pub fn descriptors(&self) -> Vec<Descriptor> {
        self.commands.iter().map(|c| c.descriptor()).collect()
    }

    pub fn serial_number_command(&self) -> &'static str {
        self.serial_number
    }

    /// Exact matches win; otherwise the first prefix whose remainder parses
    /// under its argument format.
    pub fn find(&self, input: &str) -> Option<&'static CommandDefinition> {
        let commands = self.commands;

        if let Some(definition) = commands
            .iter()
            .find(|c| matches!(c.matcher, Matcher::Exact(text) if text == input))
        {
            return Some(definition);
        }

        commands.iter().find(|c| match c.matcher {
            Matcher::Prefix(prefix, format) => input
                .strip_prefix(prefix)
                .map_or(false, |rest| format.parse(rest).is_some()),
            Matcher::Exact(_) => false,
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::pi30()
    }
}
