use crate::document::PdfDocument;
use crate::error::InvomarkError;

/// Find the first line containing `keyword` and return the trimmed line
/// `offset` lines away from it.
///
/// Pages are searched in order, restricted to the 1-based `page` when given.
/// A keyword line whose target falls outside its page is passed over and the
/// search continues. Returns `None` when nothing matches or `page` is past
/// the end of the document.
pub fn extract_value_by_keyword(
    doc: &dyn PdfDocument,
    keyword: &str,
    offset: i64,
    page: Option<usize>,
) -> Result<Option<String>, InvomarkError> {
    let pages = match page {
        Some(n) if n == 0 || n > doc.page_count() => return Ok(None),
        Some(n) => (n - 1)..n,
        None => 0..doc.page_count(),
    };

    for page_index in pages {
        let lines = doc.extract_lines(page_index)?;
        for (i, line) in lines.iter().enumerate() {
            if !line.contains(keyword) {
                continue;
            }
            let target = i as i64 + offset;
            if target >= 0 && (target as usize) < lines.len() {
                return Ok(Some(lines[target as usize].trim().to_string()));
            }
        }
    }
    Ok(None)
}
