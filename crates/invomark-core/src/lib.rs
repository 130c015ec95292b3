pub mod annotate;
pub mod document;
pub mod error;
pub mod export;
pub mod fields;
pub mod invoice;
pub mod model;
pub mod normalize;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use annotate::style::{AnnotationStyle, TableLayout};
use annotate::{annotate_document, annotated_output_path, AnnotationOutcome};
use document::DocumentLoader;
use error::InvomarkError;

pub use invoice::{extract_invoice, extract_invoices};

/// A document that was annotated and saved.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedPdf {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub outcome: AnnotationOutcome,
}

/// Result of annotating several documents.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<AnnotatedPdf>,
    pub failed: Vec<(PathBuf, InvomarkError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Main API entry point: annotate one PDF and save it as
/// `<output_dir>/<stem>_annotated<.ext>`.
///
/// The output directory is created if needed. The document handle is released
/// before returning, whether or not annotation succeeded.
pub fn annotate_pdf(
    input: &Path,
    output_dir: &Path,
    loader: &dyn DocumentLoader,
    style: &AnnotationStyle,
    layout: &TableLayout,
) -> Result<AnnotatedPdf, InvomarkError> {
    let output = annotated_output_path(input, output_dir)?;
    std::fs::create_dir_all(output_dir)?;

    let mut doc = loader.open(input)?;
    let outcome = annotate_document(doc.as_mut(), style, layout)?;
    doc.save(&output)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        lines = outcome.indexed_lines.len(),
        index_pages = outcome.index_pages,
        "saved annotated PDF"
    );

    Ok(AnnotatedPdf {
        input: input.to_path_buf(),
        output,
        outcome,
    })
}

/// Annotate every input in turn. A failing document is recorded and the
/// remaining documents are still processed.
pub fn annotate_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    loader: &dyn DocumentLoader,
    style: &AnnotationStyle,
    layout: &TableLayout,
) -> BatchReport {
    let mut report = BatchReport::default();
    for input in inputs {
        match annotate_pdf(input, output_dir, loader, style, layout) {
            Ok(done) => report.succeeded.push(done),
            Err(e) => {
                warn!(input = %input.display(), error = %e, "failed to annotate");
                report.failed.push((input.clone(), e));
            }
        }
    }
    report
}

/// PDF files directly inside `dir` (extension matched case-insensitively),
/// sorted by file name.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>, InvomarkError> {
    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(pdfs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_pdfs_sorted_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.PDF", "notes.txt", "c.pdf.bak"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("folder.pdf")).unwrap();

        let names: Vec<String> = discover_pdfs(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn test_discover_pdfs_missing_dir() {
        assert!(matches!(
            discover_pdfs(Path::new("/no/such/dir")),
            Err(InvomarkError::Io(_))
        ));
    }
}
