use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum InvomarkError {
    #[error("PDF text extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("page index {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("failed to load configuration from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid field configuration: {0}")]
    ConfigInvalid(String),

    #[error("invalid annotation style: {0}")]
    StyleInvalid(String),

    #[error("{failed} of {total} document(s) failed")]
    BatchFailed { failed: usize, total: usize },

    #[error("export failed: {0}")]
    Export(String),

    #[error("spreadsheet archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
