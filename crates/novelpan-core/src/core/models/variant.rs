use crate::core::utils::identifiers::{is_residue_code, three_letter_code};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single amino-acid substitution, written `<from>-<position>-<to>` (e.g. `L-7-R`).
///
/// `position` is 1-based within the full protein.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VariantDescriptor {
    pub from_residue: char,
    pub position: usize,
    pub to_residue: char,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid variant descriptor '{input}': {kind}")]
pub struct VariantParseError {
    pub input: String,
    pub kind: VariantParseErrorKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VariantParseErrorKind {
    #[error("expected 3 '-'-separated fields, found {0}")]
    FieldCount(usize),
    #[error("position '{0}' is not a positive integer")]
    InvalidPosition(String),
    #[error("'{0}' is not a single one-letter amino-acid code")]
    InvalidResidue(String),
}

impl VariantDescriptor {
    pub fn new(from_residue: char, position: usize, to_residue: char) -> Self {
        Self {
            from_residue,
            position,
            to_residue,
        }
    }

    /// Three-letter rendering used in log messages, e.g. `LEU7ARG`.
    pub fn long_form(&self) -> String {
        format!(
            "{}{}{}",
            three_letter_code(self.from_residue).unwrap_or("???"),
            self.position,
            three_letter_code(self.to_residue).unwrap_or("???")
        )
    }
}

fn parse_residue(field: &str, input: &str) -> Result<char, VariantParseError> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if is_residue_code(c.to_ascii_uppercase()) => Ok(c.to_ascii_uppercase()),
        _ => Err(VariantParseError {
            input: input.to_string(),
            kind: VariantParseErrorKind::InvalidResidue(field.to_string()),
        }),
    }
}

impl FromStr for VariantDescriptor {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parts: Vec<&str> = trimmed.split('-').collect();
        if parts.len() != 3 {
            return Err(VariantParseError {
                input: s.to_string(),
                kind: VariantParseErrorKind::FieldCount(parts.len()),
            });
        }

        let from_residue = parse_residue(parts[0].trim(), s)?;
        let position: usize = parts[1]
            .trim()
            .parse()
            .ok()
            .filter(|&p| p > 0)
            .ok_or_else(|| VariantParseError {
                input: s.to_string(),
                kind: VariantParseErrorKind::InvalidPosition(parts[1].to_string()),
            })?;
        let to_residue = parse_residue(parts[2].trim(), s)?;

        Ok(Self::new(from_residue, position, to_residue))
    }
}

impl fmt::Display for VariantDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.from_residue, self.position, self.to_residue)
    }
}
