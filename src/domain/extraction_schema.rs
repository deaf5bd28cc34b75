use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One configured output field.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FieldSpec {
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_field_type() -> String {
    "string".to_string()
}

fn default_enabled() -> bool {
    true
}

impl FieldSpec {
    pub fn new(field_type: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            prompt: prompt.into(),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Ordered field name → spec mapping. Keys are unique; declaration order is kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractionSchema {
    fields: Vec<(String, FieldSpec)>,
}

impl ExtractionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.insert(name, spec);
        self
    }

    /// Inserts or replaces a field. A replaced field keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, spec: FieldSpec) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = spec,
            None => self.fields.push((name, spec)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, spec)| spec)
    }

    pub fn enabled_fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields
            .iter()
            .filter(|(_, spec)| spec.enabled)
            .map(|(name, spec)| (name.as_str(), spec))
    }

    /// Field → declared type, as sent to the model and echoed back as `schema_used`.
    pub fn target_schema(&self) -> Map<String, Value> {
        self.enabled_fields()
            .map(|(name, spec)| (name.to_string(), Value::String(spec.field_type.clone())))
            .collect()
    }

    /// `- field: prompt` lines, one per enabled field.
    pub fn field_instructions(&self) -> String {
        self.enabled_fields()
            .map(|(name, spec)| format!("- {name}: {}\n", spec.prompt))
            .collect()
    }
}

impl<'de> Deserialize<'de> for ExtractionSchema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let mut schema = Self::new();
        for (name, value) in raw {
            let spec = FieldSpec::deserialize(value)
                .map_err(|e| D::Error::custom(format!("field `{name}`: {e}")))?;
            schema.insert(name, spec);
        }
        Ok(schema)
    }
}
