use clap::Args;
use invomark_core::annotate::style::{load_style, validate_style, AnnotationStyle, Offset, TableLayout};
use invomark_core::document::pdftotext::PdftotextLoader;
use invomark_core::error::InvomarkError;
use invomark_core::model::Rgb;
use invomark_core::{annotate_batch, discover_pdfs};
use std::path::PathBuf;
use tracing::warn;

use crate::output;

/// Annotation style flags. Each one overrides the style file.
#[derive(Args, Debug, Default)]
pub struct StyleArgs {
    /// JSON style file
    #[arg(long, value_name = "FILE")]
    style: Option<PathBuf>,

    /// Outline color, components in [0, 1]
    #[arg(long, num_args = 3, value_names = ["R", "G", "B"])]
    rectangle_color: Option<Vec<f32>>,

    /// Index number color, components in [0, 1]
    #[arg(long, num_args = 3, value_names = ["R", "G", "B"])]
    index_color: Option<Vec<f32>>,

    #[arg(long, value_name = "WIDTH")]
    rectangle_line_width: Option<f32>,

    #[arg(long, value_name = "SIZE")]
    index_font_size: Option<f32>,

    /// Index number position relative to the top-right corner of the outline
    #[arg(long, num_args = 2, value_names = ["DX", "DY"], allow_negative_numbers = true)]
    index_offset: Option<Vec<f32>>,

    #[arg(long, value_name = "SIZE")]
    table_font_size: Option<f32>,

    /// Vertical distance between index table lines
    #[arg(long, value_name = "POINTS")]
    line_spacing: Option<f32>,

    #[arg(long, value_name = "N")]
    max_entries_per_page: Option<usize>,
}

impl StyleArgs {
    /// Style file (or defaults) with flag overrides applied, validated.
    pub fn resolve(&self) -> Result<AnnotationStyle, InvomarkError> {
        let mut style = match &self.style {
            Some(path) => load_style(path)?,
            None => AnnotationStyle::default(),
        };

        if let Some(c) = &self.rectangle_color {
            style.rectangle_color = rgb("rectangle-color", c)?;
        }
        if let Some(c) = &self.index_color {
            style.index_color = rgb("index-color", c)?;
        }
        if let Some(w) = self.rectangle_line_width {
            style.rectangle_line_width = w;
        }
        if let Some(s) = self.index_font_size {
            style.index_font_size = s;
        }
        if let Some(o) = &self.index_offset {
            style.index_offset = match o.as_slice() {
                [dx, dy] => Offset(*dx, *dy),
                _ => {
                    return Err(InvomarkError::StyleInvalid(
                        "index-offset takes DX and DY".into(),
                    ))
                }
            };
        }
        if let Some(s) = self.table_font_size {
            style.table_font_size = s;
        }
        if let Some(s) = self.line_spacing {
            style.line_spacing = s;
        }
        if let Some(n) = self.max_entries_per_page {
            style.max_entries_per_page = n;
        }

        validate_style(&style)?;
        Ok(style)
    }
}

fn rgb(flag: &str, components: &[f32]) -> Result<Rgb, InvomarkError> {
    match components {
        [r, g, b] => Ok(Rgb(*r, *g, *b)),
        _ => Err(InvomarkError::StyleInvalid(format!(
            "{flag} takes three components"
        ))),
    }
}

pub fn run(
    inputs: Vec<PathBuf>,
    output_folder: PathBuf,
    style_args: &StyleArgs,
    output_format: &str,
) -> Result<(), InvomarkError> {
    let style = style_args.resolve()?;
    let layout = TableLayout::default();

    let pdfs = collect_inputs(inputs)?;
    if pdfs.is_empty() {
        warn!("no PDF files found");
        return Ok(());
    }
    if !PdftotextLoader::is_available() {
        return Err(InvomarkError::PdftotextNotFound);
    }

    let loader = PdftotextLoader::new();
    let report = annotate_batch(&pdfs, &output_folder, &loader, &style, &layout);

    match output_format {
        "json" => output::json::print(&report.succeeded)?,
        _ => output::table::print_annotated(&report.succeeded),
    }

    if !report.is_success() {
        for (path, e) in &report.failed {
            eprintln!("  failed: {}: {}", path.display(), e);
        }
        return Err(InvomarkError::BatchFailed {
            failed: report.failed.len(),
            total: pdfs.len(),
        });
    }
    Ok(())
}

/// Expand directories to the PDFs inside them. No inputs means the current
/// directory.
fn collect_inputs(inputs: Vec<PathBuf>) -> Result<Vec<PathBuf>, InvomarkError> {
    let inputs = if inputs.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        inputs
    };

    let mut pdfs = Vec::new();
    for input in inputs {
        if input.is_dir() {
            pdfs.extend(discover_pdfs(&input)?);
        } else {
            pdfs.push(input);
        }
    }
    Ok(pdfs)
}
