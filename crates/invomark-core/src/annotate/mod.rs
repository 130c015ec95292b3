pub mod indexer;
pub mod paginate;
pub mod render;
pub mod style;

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::document::PdfDocument;
use crate::error::InvomarkError;
use crate::model::IndexedLine;
use indexer::index_page;
use paginate::{paginate, splice_index_pages};
use render::render_annotation;
use style::{AnnotationStyle, TableLayout};

/// What annotating one document produced.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationOutcome {
    /// Every annotated line, in page order then line order.
    pub indexed_lines: Vec<IndexedLine>,
    /// Number of index pages inserted at the front.
    pub index_pages: usize,
}

/// Annotate every locatable line of an open document and prepend the index
/// table.
///
/// Pages are processed in order. The index table is laid out only after all
/// pages are annotated, then inserted in one step.
pub fn annotate_document(
    doc: &mut dyn PdfDocument,
    style: &AnnotationStyle,
    layout: &TableLayout,
) -> Result<AnnotationOutcome, InvomarkError> {
    let mut indexed_lines = Vec::new();

    for page_index in 0..doc.page_count() {
        let lines = doc.extract_lines(page_index)?;
        let located = {
            let reader: &dyn PdfDocument = &*doc;
            index_page(page_index + 1, &lines, |text| {
                Ok(reader.search_text(page_index, text)?.into_iter().next())
            })?
        };

        for line in located {
            render_annotation(doc, page_index, &line, style)?;
            indexed_lines.push(line.line);
        }
    }

    let pages = paginate(&indexed_lines, style, layout);
    let index_pages = splice_index_pages(doc, &pages, style, layout)?;

    Ok(AnnotationOutcome {
        indexed_lines,
        index_pages,
    })
}

/// `<dir>/<stem>_annotated<.ext>` for an input file.
pub fn annotated_output_path(input: &Path, output_dir: &Path) -> Result<PathBuf, InvomarkError> {
    let stem = input.file_stem().ok_or_else(|| {
        InvomarkError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("'{}' has no file name", input.display()),
        ))
    })?;

    let mut name = stem.to_os_string();
    name.push("_annotated");
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    Ok(output_dir.join(name))
}
