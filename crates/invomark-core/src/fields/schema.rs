use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field definitions per PDF file name.
pub type FieldConfig = BTreeMap<String, FileFields>;

/// Field name -> where to find its value.
pub type FileFields = BTreeMap<String, FieldSpec>;

/// Locates one value relative to a keyword line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub keyword: String,
    /// Lines after (or, if negative, before) the keyword line.
    #[serde(default)]
    pub offset: i64,
    /// 1-based page to restrict the search to.
    #[serde(default)]
    pub page: Option<usize>,
}

/// Fields the extractor interprets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownField {
    Date,
    Value,
}

impl KnownField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Date" => Some(KnownField::Date),
            "Value" => Some(KnownField::Value),
            _ => None,
        }
    }
}
