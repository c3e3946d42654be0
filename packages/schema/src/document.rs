use crate::descriptor::ComponentDescriptor;
use crate::error::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Id given to the implicit section when a schema is a bare component list
pub const DEFAULT_SECTION_ID: &str = "main";

/// Root schema document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Top-level dashboard section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsections: Vec<Subsection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subsection {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentDescriptor>,
}

impl SchemaDocument {
    /// Parse a schema from JSON text.
    ///
    /// Accepts either `{ "sections": [...] }` or a bare array of component
    /// descriptors, which becomes a single section named `main`.
    pub fn from_json(source: &str) -> SchemaResult<Self> {
        let value: Value = serde_json::from_str(source)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> SchemaResult<Self> {
        if value.is_array() {
            let components: Vec<ComponentDescriptor> = serde_json::from_value(value)?;
            return Ok(Self {
                sections: vec![Section {
                    id: DEFAULT_SECTION_ID.to_string(),
                    components,
                    ..Default::default()
                }],
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn load(path: &Path) -> SchemaResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    pub fn section(&self, id: &str) -> SchemaResult<&Section> {
        self.sections
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| SchemaError::SectionNotFound {
                id: id.to_string(),
                available: self.section_ids(),
            })
    }

    /// The first section, used when no section is requested explicitly
    pub fn first_section(&self) -> SchemaResult<&Section> {
        self.sections.first().ok_or(SchemaError::Empty)
    }

    pub fn section_ids(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.id.clone()).collect()
    }
}

impl Section {
    /// Every descriptor tree root in the section, subsections included
    pub fn all_roots(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.components
            .iter()
            .chain(self.subsections.iter().flat_map(|s| s.components.iter()))
    }
}
