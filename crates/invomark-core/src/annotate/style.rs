use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::InvomarkError;
use crate::model::Rgb;

/// Visual parameters for annotation and the index table. Fixed for a run.
///
/// Every field is optional in a style file; missing fields take the
/// reference values from [`AnnotationStyle::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationStyle {
    pub rectangle_line_width: f32,
    pub rectangle_color: Rgb,
    pub index_color: Rgb,
    pub index_font_size: f32,
    /// Offset of the index label from the top-right corner of the line's box.
    pub index_offset: Offset,
    pub table_font_size: f32,
    /// Vertical distance per wrapped line in the index table.
    pub line_spacing: f32,
    pub max_entries_per_page: usize,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        AnnotationStyle {
            rectangle_line_width: 0.5,
            rectangle_color: Rgb::GREEN,
            index_color: Rgb::RED,
            index_font_size: 8.0,
            index_offset: Offset(5.0, -5.0),
            table_font_size: 8.0,
            line_spacing: 12.0,
            max_entries_per_page: 50,
        }
    }
}

/// `(dx, dy)` in points. Negative `dy` moves the label up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset(pub f32, pub f32);

/// Geometry of the generated index pages.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub margin: f32,
    pub title_y: f32,
    pub title_font_size: f32,
    pub title: String,
    pub continued_title: String,
    /// Baseline of the first entry on each index page.
    pub start_y: f32,
    /// Once the cursor is below this, the next entry goes to a new page.
    pub max_y: f32,
    /// Wrap width of entry text, in characters.
    pub wrap_width: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        TableLayout {
            margin: 50.0,
            title_y: 50.0,
            title_font_size: 12.0,
            title: "Text Index Table".into(),
            continued_title: "Text Index Table (Continued)".into(),
            start_y: 80.0,
            max_y: 800.0,
            wrap_width: 80,
        }
    }
}

/// Load an annotation style from a JSON file.
pub fn load_style(path: &Path) -> Result<AnnotationStyle, InvomarkError> {
    let content = std::fs::read_to_string(path).map_err(|e| InvomarkError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_style(&content, path)
}

/// Parse an annotation style from a JSON string.
pub fn parse_style(json: &str, source: &Path) -> Result<AnnotationStyle, InvomarkError> {
    let style: AnnotationStyle =
        serde_json::from_str(json).map_err(|e| InvomarkError::ConfigLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_style(&style)?;
    Ok(style)
}

/// Validate that a style can be rendered.
pub fn validate_style(style: &AnnotationStyle) -> Result<(), InvomarkError> {
    for (name, color) in [
        ("rectangle_color", style.rectangle_color),
        ("index_color", style.index_color),
    ] {
        if !color.is_valid() {
            return Err(InvomarkError::StyleInvalid(format!(
                "{name} components must be between 0 and 1, got {:?}",
                color.components()
            )));
        }
    }

    for (name, value) in [
        ("rectangle_line_width", style.rectangle_line_width),
        ("index_font_size", style.index_font_size),
        ("table_font_size", style.table_font_size),
        ("line_spacing", style.line_spacing),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(InvomarkError::StyleInvalid(format!(
                "{name} must be positive, got {value}"
            )));
        }
    }

    if !(style.index_offset.0.is_finite() && style.index_offset.1.is_finite()) {
        return Err(InvomarkError::StyleInvalid(
            "index_offset must be finite".into(),
        ));
    }

    if style.max_entries_per_page == 0 {
        return Err(InvomarkError::StyleInvalid(
            "max_entries_per_page must be at least 1".into(),
        ));
    }

    Ok(())
}
