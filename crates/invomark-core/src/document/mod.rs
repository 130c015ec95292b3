pub mod lopdf_backend;
pub mod pdftotext;

use std::path::Path;

use crate::error::InvomarkError;
use crate::model::{BBox, Point, Rgb};

/// An open PDF document that can be read, searched and drawn on.
///
/// Pages are addressed by 0-based index. Dropping the handle closes the document.
pub trait PdfDocument {
    fn page_count(&self) -> usize;

    /// Text lines of a page, in the order the extraction backend reports them.
    fn extract_lines(&self, page_index: usize) -> Result<Vec<String>, InvomarkError>;

    /// Bounding boxes where `text` occurs on the page, in reading order.
    /// An empty result means the text was not found.
    fn search_text(&self, page_index: usize, text: &str) -> Result<Vec<BBox>, InvomarkError>;

    /// Draw an unfilled rectangle.
    fn draw_rect(
        &mut self,
        page_index: usize,
        rect: &BBox,
        color: Rgb,
        line_width: f32,
    ) -> Result<(), InvomarkError>;

    /// Insert text with its first baseline at `origin`. `\n` starts a new line.
    fn insert_text(
        &mut self,
        page_index: usize,
        origin: Point,
        text: &str,
        font_size: f32,
        color: Rgb,
    ) -> Result<(), InvomarkError>;

    /// Insert a blank page so that it ends up at document position `at`.
    /// Returns the new page's index.
    fn insert_page(&mut self, at: usize) -> Result<usize, InvomarkError>;

    fn save(&mut self, path: &Path) -> Result<(), InvomarkError>;
}

/// Opens PDF files into [`PdfDocument`] handles.
pub trait DocumentLoader {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, InvomarkError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Error for a page index outside `0..count`.
pub(crate) fn check_page(page: usize, count: usize) -> Result<(), InvomarkError> {
    if page < count {
        Ok(())
    } else {
        Err(InvomarkError::PageOutOfRange { page, count })
    }
}
