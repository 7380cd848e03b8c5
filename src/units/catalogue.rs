//! Field catalogue: which numeric fields exist and which units feed them

use super::unit::{Gap, Unit};
use crate::error::QtyError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Words the query string lexer treats as operators
const RESERVED_WORDS: [&str; 4] = ["AND", "OR", "NOT", "TO"];

/// A numeric index field and the units whose quantities land in it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gap: Option<Gap>,
    units: Vec<Unit>,
}

impl Field {
    /// Create a field with no units yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gap: None,
            units: Vec::new(),
        }
    }

    /// Add a unit
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    /// Set the range gap for the whole field
    pub fn with_gap(mut self, gap: Gap) -> Self {
        self.gap = Some(gap);
        self
    }

    /// Field name, as used in the synthesized query
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Range gap for this field, if any
    pub fn gap(&self) -> Option<Gap> {
        self.gap
    }

    /// Units feeding this field, in declaration order
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Look up a unit by canonical name
    pub fn unit(&self, name: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.name() == name)
    }

    fn validate(&mut self) -> Result<()> {
        validate_field_name(&self.name)?;
        if self.units.is_empty() {
            return Err(QtyError::config(format!(
                "Field '{}' has no units",
                self.name
            )));
        }

        let mut seen = Vec::with_capacity(self.units.len());
        for unit in &mut self.units {
            unit.validate(&self.name)?;
            if seen.contains(&unit.name().to_string()) {
                return Err(QtyError::config(format!(
                    "Unit '{}' is declared twice in field '{}'",
                    unit.name(),
                    self.name
                )));
            }
            seen.push(unit.name().to_string());

            // A field has one gap; unit-level gaps must agree with it
            if let Some(unit_gap) = unit.gap() {
                match self.gap {
                    None => self.gap = Some(unit_gap),
                    Some(gap) if gap.distance() != unit_gap.distance() => {
                        return Err(QtyError::config(format!(
                            "Unit '{}' declares gap {} but field '{}' uses gap {}",
                            unit.name(),
                            unit_gap.value(),
                            self.name,
                            gap.value()
                        )));
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }
}

fn validate_field_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_alphabetic() || c == '_')
        .unwrap_or(false);
    let valid_rest = chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if !valid_start || !valid_rest {
        return Err(QtyError::config(format!(
            "Invalid field name '{}': must start with a letter or '_' and contain only letters, digits, '_', '-' or '.'",
            name
        )));
    }
    if RESERVED_WORDS.contains(&name.to_uppercase().as_str()) {
        return Err(QtyError::config(format!(
            "Invalid field name '{}': reserved query keyword",
            name
        )));
    }
    Ok(())
}

/// One spelling in the variant lookup table
#[derive(Clone, Debug)]
pub(crate) struct VariantEntry {
    /// Lowercased variant characters
    pub chars: Vec<char>,
    pub field: usize,
    pub unit: usize,
}

/// On-disk shape of a catalogue
#[derive(Deserialize)]
struct CatalogueFile {
    fields: Vec<Field>,
}

/// Immutable catalogue of fields and units
///
/// Built once at plugin initialisation and shared read-only afterwards.
/// Construction validates the whole catalogue; a `Catalogue` value is
/// always well formed.
#[derive(Clone, Debug)]
pub struct Catalogue {
    fields: Vec<Field>,
    by_name: HashMap<String, usize>,
    /// Longest variant first; equal lengths keep declaration order
    variants: Vec<VariantEntry>,
}

impl Catalogue {
    /// Validate `fields` and build the catalogue
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        let mut fields = fields;
        let mut by_name = HashMap::with_capacity(fields.len());

        for (idx, field) in fields.iter_mut().enumerate() {
            field.validate()?;
            if by_name.insert(field.name.clone(), idx).is_some() {
                return Err(QtyError::config(format!(
                    "Field '{}' is declared twice",
                    field.name
                )));
            }
        }

        let variants = build_variant_table(&fields);
        let catalogue = Self {
            fields,
            by_name,
            variants,
        };

        info!(
            "Quantity catalogue loaded: {} fields, {} units, {} variants",
            catalogue.fields.len(),
            catalogue.unit_count(),
            catalogue.variants.len()
        );

        Ok(catalogue)
    }

    /// Start building a catalogue programmatically
    pub fn builder() -> CatalogueBuilder {
        CatalogueBuilder::default()
    }

    /// Parse a catalogue from its JSON form
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogueFile = serde_json::from_str(json)?;
        Self::new(file.fields)
    }

    /// Load a catalogue from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// All fields, in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name).map(|&idx| &self.fields[idx])
    }

    /// Range gap configured for a field
    pub fn gap(&self, field_name: &str) -> Option<Gap> {
        self.field(field_name).and_then(Field::gap)
    }

    /// Total number of units across all fields
    pub fn unit_count(&self) -> usize {
        self.fields.iter().map(|f| f.units.len()).sum()
    }

    /// Whether the catalogue declares no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn variant_table(&self) -> &[VariantEntry] {
        &self.variants
    }

    pub(crate) fn resolve(&self, entry: &VariantEntry) -> (&Field, &Unit) {
        let field = &self.fields[entry.field];
        (field, &field.units[entry.unit])
    }
}

fn build_variant_table(fields: &[Field]) -> Vec<VariantEntry> {
    let mut table: Vec<VariantEntry> = Vec::new();

    for (field_idx, field) in fields.iter().enumerate() {
        for (unit_idx, unit) in field.units.iter().enumerate() {
            for variant in unit.variants() {
                let chars: Vec<char> = variant.chars().flat_map(char::to_lowercase).collect();
                if let Some(existing) = table.iter().find(|e| e.chars == chars) {
                    warn!(
                        "Variant '{}' of {}/{} shadowed by {}/{}",
                        variant,
                        field.name,
                        unit.name(),
                        fields[existing.field].name,
                        fields[existing.field].units[existing.unit].name()
                    );
                }
                table.push(VariantEntry {
                    chars,
                    field: field_idx,
                    unit: unit_idx,
                });
            }
        }
    }

    // Stable sort keeps declaration order among equal lengths
    table.sort_by(|a, b| b.chars.len().cmp(&a.chars.len()));
    table
}

/// Builder for [`Catalogue`]
#[derive(Default)]
pub struct CatalogueBuilder {
    fields: Vec<Field>,
}

impl CatalogueBuilder {
    /// Add a field
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Validate and build the catalogue
    pub fn build(self) -> Result<Catalogue> {
        Catalogue::new(self.fields)
    }
}
