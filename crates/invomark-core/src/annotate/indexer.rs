use tracing::debug;

use crate::error::InvomarkError;
use crate::model::{BBox, IndexedLine};

/// An indexed line together with the box it was found at.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedLine {
    pub line: IndexedLine,
    pub bbox: BBox,
}

/// Index the text lines of one page.
///
/// `locate` returns the first box where a text occurs, or `None`. The index
/// of a line is its position in `lines`, so blank and unlocated lines use up
/// an index without producing a record. When a text occurs several times on
/// the page, the first reported box is used.
pub fn index_page<F>(
    page_number: usize,
    lines: &[String],
    mut locate: F,
) -> Result<Vec<LocatedLine>, InvomarkError>
where
    F: FnMut(&str) -> Result<Option<BBox>, InvomarkError>,
{
    let mut located = Vec::new();

    for (index, raw) in lines.iter().enumerate() {
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }

        match locate(text)? {
            Some(bbox) => located.push(LocatedLine {
                line: IndexedLine {
                    index,
                    text: text.to_string(),
                    page_number,
                },
                bbox,
            }),
            None => debug!(page = page_number, index, text, "line not found on page, skipped"),
        }
    }

    Ok(located)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn found(_: &str) -> Result<Option<BBox>, InvomarkError> {
        Ok(Some(BBox::new(0.0, 0.0, 10.0, 10.0)))
    }

    #[test]
    fn test_blank_line_consumes_index() {
        let result = index_page(1, &lines(&["L0", "   ", "L2"]), found).unwrap();
        let indices: Vec<usize> = result.iter().map(|l| l.line.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_unlocated_line_is_skipped() {
        let result = index_page(3, &lines(&["a", "missing", "c"]), |t| {
            Ok((t != "missing").then(|| BBox::new(1.0, 2.0, 3.0, 4.0)))
        })
        .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].line.index, 2);
        assert_eq!(result[1].line.page_number, 3);
    }

    #[test]
    fn test_text_is_trimmed_before_search() {
        let mut searched = Vec::new();
        let result = index_page(1, &lines(&["  Total: 50 EUR \t"]), |t| {
            searched.push(t.to_string());
            found(t)
        })
        .unwrap();
        assert_eq!(searched, vec!["Total: 50 EUR"]);
        assert_eq!(result[0].line.text, "Total: 50 EUR");
    }

    #[test]
    fn test_blank_lines_are_not_searched() {
        let mut calls = 0;
        index_page(1, &lines(&["", " ", "x"]), |t| {
            calls += 1;
            found(t)
        })
        .unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_search_error_propagates() {
        let result = index_page(1, &lines(&["x"]), |_| {
            Err(InvomarkError::Extraction("broken".into()))
        });
        assert!(result.is_err());
    }
}
