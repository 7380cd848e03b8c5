//! Units of measure and their per-unit modifiers

use crate::error::QtyError;
use crate::Result;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Boost factor attached to a unit
///
/// The boost keeps the textual form it was declared with, so a catalogue
/// that says `2.0` produces `^2.0` in the synthesized query and not `^2`.
#[derive(Clone, Debug, PartialEq)]
pub struct Boost {
    value: f32,
    text: String,
}

impl Boost {
    /// Parse a boost from its textual form
    ///
    /// Only plain decimal notation is accepted (`2`, `2.0`, `0.75`) because
    /// that is what the query string lexer reads after a caret.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let plain_decimal = !text.is_empty()
            && text.chars().all(|c| c.is_ascii_digit() || c == '.')
            && text.chars().filter(|&c| c == '.').count() <= 1
            && !text.starts_with('.')
            && !text.ends_with('.');
        if !plain_decimal {
            return Err(QtyError::config(format!(
                "Invalid boost '{}': expected a plain decimal number",
                text
            )));
        }

        let value: f32 = text
            .parse()
            .map_err(|_| QtyError::config(format!("Invalid boost '{}'", text)))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(QtyError::config(format!(
                "Invalid boost '{}': must be a positive number",
                text
            )));
        }

        Ok(Self {
            value,
            text: text.to_string(),
        })
    }

    /// Numeric boost value
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Boost as it was declared
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Boost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Boost {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Boost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawBoost {
            Number(serde_json::Number),
            Text(String),
        }

        let text = match RawBoost::deserialize(deserializer)? {
            RawBoost::Number(n) => n.to_string(),
            RawBoost::Text(s) => s,
        };
        Boost::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Half-width of the range clause emitted around a detected amount
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Gap {
    value: f64,
}

impl Gap {
    /// Create a gap; it must be finite and non-negative
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(QtyError::config(format!(
                "Invalid gap {}: must be a non-negative number",
                value
            )));
        }
        Ok(Self { value })
    }

    /// Gap value as declared
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Gap truncated to an integer distance
    pub fn distance(&self) -> u64 {
        self.value.trunc() as u64
    }
}

impl TryFrom<f64> for Gap {
    type Error = QtyError;

    fn try_from(value: f64) -> Result<Self> {
        Gap::new(value)
    }
}

impl From<Gap> for f64 {
    fn from(gap: Gap) -> f64 {
        gap.value
    }
}

/// A unit of measure and the spellings that identify it in a query
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    name: String,
    variants: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boost: Option<Boost>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gap: Option<Gap>,
}

impl Unit {
    /// Create a unit with no variants yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
            boost: None,
            gap: None,
        }
    }

    /// Add a textual variant
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variants.push(variant.into());
        self
    }

    /// Add several textual variants, in order
    pub fn with_variants<I, S>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variants.extend(variants.into_iter().map(Into::into));
        self
    }

    /// Set the boost factor
    pub fn with_boost(mut self, boost: Boost) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Set the range gap
    pub fn with_gap(mut self, gap: Gap) -> Self {
        self.gap = Some(gap);
        self
    }

    /// Canonical unit name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared variants
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Configured boost, if any
    pub fn boost(&self) -> Option<&Boost> {
        self.boost.as_ref()
    }

    /// Gap declared on the unit itself, if any
    pub fn gap(&self) -> Option<Gap> {
        self.gap
    }

    pub(crate) fn validate(&mut self, field: &str) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(QtyError::config(format!(
                "Field '{}' declares a unit with an empty name",
                field
            )));
        }
        if self.variants.is_empty() {
            return Err(QtyError::config(format!(
                "Unit '{}' in field '{}' has no variants",
                self.name, field
            )));
        }

        for variant in &mut self.variants {
            let trimmed = variant.trim();
            if trimmed.is_empty() {
                return Err(QtyError::config(format!(
                    "Unit '{}' in field '{}' has a blank variant",
                    self.name, field
                )));
            }
            if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
                return Err(QtyError::config(format!(
                    "Variant '{}' of unit '{}' must not start with a digit",
                    trimmed, self.name
                )));
            }
            if trimmed.len() != variant.len() {
                *variant = trimmed.to_string();
            }
        }
        Ok(())
    }
}
