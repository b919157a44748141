//! Dictionary schema types and record payload validation.
//!
//! # Responsibility
//! - Describe a dictionary's shape as an ordered, typed field list.
//! - Validate raw record payloads against that shape at write time.
//!
//! # Invariants
//! - Field names are unique within one structure.
//! - A payload is valid only when its key set exactly equals the declared
//!   field set and every value lexically matches its field type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound on dictionary names, mirrored by the `dictionaries` table.
pub const MAX_NAME_LENGTH: usize = 50;

/// Store-assigned record identifier.
pub type RecordId = i64;

/// Textual field-name -> value mapping as persisted in a record row.
pub type RecordData = BTreeMap<String, String>;

/// Raw, untyped payload accepted by add/update before canonicalization.
pub type RawRecordData = BTreeMap<String, serde_json::Value>;

/// Declared type of a dictionary field.
///
/// Serialized in lowercase to match the structure blob format
/// (`"string"`, `"number"`, `"double"`, `"boolean"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Any text; no lexical constraint.
    String,
    /// Base-10 integer literal.
    Number,
    /// Floating-point literal.
    Double,
    /// Exactly `true` or `false`, case-sensitive.
    Boolean,
}

impl FieldType {
    /// Stable lowercase name used in blobs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Double => "double",
            Self::Boolean => "boolean",
        }
    }

    /// Parses a textual value into its typed form.
    ///
    /// Returns `None` when the text does not lexically satisfy this type.
    pub fn parse_value(self, raw: &str) -> Option<FieldValue> {
        match self {
            Self::String => Some(FieldValue::String(raw.to_string())),
            Self::Number => raw.parse::<i64>().ok().map(FieldValue::Integer),
            Self::Double => raw.parse::<f64>().ok().map(FieldValue::Double),
            Self::Boolean => match raw {
                "true" => Some(FieldValue::Boolean(true)),
                "false" => Some(FieldValue::Boolean(false)),
                _ => None,
            },
        }
    }
}

/// Typed scalar produced by a successful validation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
}

/// One named, typed slot in a dictionary structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryField {
    pub name: String,
    /// Serialized as `type` to match the structure blob format.
    #[serde(rename = "type")]
    pub kind: FieldType,
}

impl DictionaryField {
    pub fn new(name: impl Into<String>, kind: FieldType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered field list defining a dictionary's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryStructure {
    pub fields: Vec<DictionaryField>,
}

impl DictionaryStructure {
    pub fn new(fields: Vec<DictionaryField>) -> Self {
        Self { fields }
    }

    /// Looks up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&DictionaryField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Checks structure sanity at dictionary-creation time.
    ///
    /// # Invariants
    /// - At least one field is declared.
    /// - Field names are non-empty and unique within the structure.
    pub fn validate(&self) -> Result<(), StructureError> {
        if self.fields.is_empty() {
            return Err(StructureError::Empty);
        }
        for (index, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(StructureError::EmptyFieldName);
            }
            if self.fields[..index].iter().any(|prev| prev.name == field.name) {
                return Err(StructureError::DuplicateField(field.name.clone()));
            }
        }
        Ok(())
    }

    /// Validates a canonicalized payload against this structure.
    ///
    /// Rules, in order:
    /// 1. every declared field must be present in `data`;
    /// 2. every key in `data` must be a declared field;
    /// 3. every value must lexically match its field's type.
    ///
    /// On success returns the typed values keyed by field name.
    pub fn validate_data(
        &self,
        data: &RecordData,
    ) -> Result<BTreeMap<String, FieldValue>, PayloadError> {
        for field in &self.fields {
            if !data.contains_key(&field.name) {
                return Err(PayloadError::MissingField(field.name.clone()));
            }
        }

        let mut typed = BTreeMap::new();
        for (key, value) in data {
            let field = self
                .field(key)
                .ok_or_else(|| PayloadError::UnknownField(key.clone()))?;
            let parsed =
                field
                    .kind
                    .parse_value(value)
                    .ok_or_else(|| PayloadError::TypeMismatch {
                        field: field.name.clone(),
                        expected: field.kind,
                    })?;
            typed.insert(key.clone(), parsed);
        }

        Ok(typed)
    }
}

/// A persisted record as returned to callers: id plus decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: RecordId,
    pub data: RecordData,
}

/// Rejection reason for a malformed dictionary structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    Empty,
    EmptyFieldName,
    DuplicateField(String),
}

impl Display for StructureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "structure must declare at least one field"),
            Self::EmptyFieldName => write!(f, "field names must not be empty"),
            Self::DuplicateField(name) => {
                write!(f, "duplicate field `{name}` in structure")
            }
        }
    }
}

impl Error for StructureError {}

/// Rejection reason for a record payload that does not match its structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    MissingField(String),
    UnknownField(String),
    TypeMismatch { field: String, expected: FieldType },
}

impl Display for PayloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(name) => write!(f, "missing value for declared field `{name}`"),
            Self::UnknownField(name) => write!(f, "unknown field `{name}` not in structure"),
            Self::TypeMismatch { field, expected } => {
                write!(f, "value of `{field}` is not a valid {}", expected.as_str())
            }
        }
    }
}

impl Error for PayloadError {}
