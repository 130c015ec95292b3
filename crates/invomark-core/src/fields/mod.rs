pub mod keyword;
pub mod schema;

use crate::error::InvomarkError;
use schema::FieldConfig;
use std::path::Path;

/// Load a field configuration from a JSON file.
pub fn load_field_config(path: &Path) -> Result<FieldConfig, InvomarkError> {
    let content = std::fs::read_to_string(path).map_err(|e| InvomarkError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_field_config(&content, path)
}

/// Parse a field configuration from a JSON string.
pub fn parse_field_config(json: &str, source: &Path) -> Result<FieldConfig, InvomarkError> {
    let config: FieldConfig = serde_json::from_str(json).map_err(|e| InvomarkError::ConfigLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_field_config(&config)?;
    Ok(config)
}

/// Validate that every field can be looked up.
pub fn validate_field_config(config: &FieldConfig) -> Result<(), InvomarkError> {
    for (file_name, fields) in config {
        for (field, spec) in fields {
            if spec.keyword.trim().is_empty() {
                return Err(InvomarkError::ConfigInvalid(format!(
                    "'{}' field '{}' has an empty keyword",
                    file_name, field
                )));
            }
            if spec.page == Some(0) {
                return Err(InvomarkError::ConfigInvalid(format!(
                    "'{}' field '{}': page numbers start at 1",
                    file_name, field
                )));
            }
        }
    }
    Ok(())
}
