//! # Package Data Types
//!
//! Plain data produced by the wire decoder. Packages are immutable once decoded.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

use super::kind::PackageType;

/// A single scalar field value inside a subpackage
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Whether the value is numeric (used for right alignment in reports)
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldValue::Int(_) | FieldValue::Float(_))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

/// A named group of fields within a package (e.g. "Robot Mode Data")
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Subpackage {
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Subpackage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field insertion
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }
}

/// One decoded telemetry message
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Package {
    /// Wire type code; not necessarily one of [`PackageType`]
    #[serde(rename = "type")]
    pub package_type: i32,
    #[serde(default)]
    pub subpackages: Vec<Subpackage>,
}

impl Package {
    pub fn new(package_type: i32, subpackages: Vec<Subpackage>) -> Self {
        Self {
            package_type,
            subpackages,
        }
    }

    /// First subpackage with exactly this name
    pub fn get_subpackage(&self, name: &str) -> Option<&Subpackage> {
        self.subpackages.iter().find(|sub| sub.name == name)
    }

    /// Known type of this package, if any
    pub fn kind(&self) -> Option<PackageType> {
        PackageType::from_code(self.package_type)
    }
}

/// Text form persisted verbatim in the per-type logs
impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "Package type: {}", kind)?,
            None => write!(f, "Package type: {} (Unknown)", self.package_type)?,
        }
        for sub in &self.subpackages {
            write!(f, "\n  {}", sub.name)?;
            for (name, value) in &sub.fields {
                write!(f, "\n    {}: {}", name, value)?;
            }
        }
        Ok(())
    }
}
