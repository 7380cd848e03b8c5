use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::detection::BuilderKind;
use crate::query::query_string::parser::DEFAULT_FIELD;
use crate::query::MatchOperator;
use crate::units::{Catalogue, Field};
use crate::Result;

/// Settings of the lexical query string parser
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Field searched by unqualified terms
    pub default_field: String,
    /// Operator placed between adjacent clauses
    pub default_operator: MatchOperator,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            default_field: DEFAULT_FIELD.to_string(),
            default_operator: MatchOperator::Or,
        }
    }
}

impl ParserSettings {
    pub fn with_default_field(mut self, field: impl Into<String>) -> Self {
        self.default_field = field.into();
        self
    }

    pub fn with_default_operator(mut self, operator: MatchOperator) -> Self {
        self.default_operator = operator;
        self
    }
}

/// Where a plugin's catalogue comes from
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogueSource {
    /// JSON catalogue file
    Path(PathBuf),
    /// Catalogue embedded in the plugin configuration
    Inline { fields: Vec<Field> },
}

/// Deployment configuration of one quantity detection parser
///
/// ```json
/// {
///   "name": "qty",
///   "kind": "boost",
///   "catalogue": "units.json",
///   "parser": { "default_field": "title", "default_operator": "or" }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Name the parser is registered under
    pub name: String,
    #[serde(default)]
    pub kind: BuilderKind,
    pub catalogue: CatalogueSource,
    /// Settings of the lexical parser the synthesized expression is handed to
    #[serde(default)]
    pub parser: ParserSettings,
}

impl PluginConfig {
    pub fn new(name: impl Into<String>, catalogue: CatalogueSource) -> Self {
        Self {
            name: name.into(),
            kind: BuilderKind::default(),
            catalogue,
            parser: ParserSettings::default(),
        }
    }

    pub fn with_kind(mut self, kind: BuilderKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_parser(mut self, parser: ParserSettings) -> Self {
        self.parser = parser;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration file; a relative catalogue path is resolved
    /// against the directory holding the configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::from_json_str(&std::fs::read_to_string(path)?)?;

        if let CatalogueSource::Path(catalogue) = &mut config.catalogue {
            if catalogue.is_relative() {
                if let Some(dir) = path.parent() {
                    *catalogue = dir.join(&*catalogue);
                }
            }
        }
        Ok(config)
    }

    /// Load and validate the catalogue
    pub fn load_catalogue(&self) -> Result<Catalogue> {
        match &self.catalogue {
            CatalogueSource::Path(path) => Catalogue::from_path(path),
            CatalogueSource::Inline { fields } => Catalogue::new(fields.clone()),
        }
    }
}
