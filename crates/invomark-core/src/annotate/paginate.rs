use crate::annotate::style::{AnnotationStyle, TableLayout};
use crate::document::PdfDocument;
use crate::error::InvomarkError;
use crate::model::{IndexedLine, Point, Rgb};

/// One pending index page.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexPage {
    pub title: String,
    pub entries: Vec<IndexEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub origin: Point,
    /// Entry text; wrapped lines are separated by `\n`.
    pub text: String,
    pub line_count: usize,
}

/// Position on the index page being filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    pub y_position: f32,
    pub entry_count: usize,
}

impl LayoutCursor {
    pub fn new(layout: &TableLayout) -> Self {
        LayoutCursor {
            y_position: layout.start_y,
            entry_count: 0,
        }
    }

    /// Whether the next entry must go to a new page.
    pub fn is_full(&self, style: &AnnotationStyle, layout: &TableLayout) -> bool {
        self.entry_count >= style.max_entries_per_page || self.y_position > layout.max_y
    }

    /// Cursor after placing an entry of `line_count` wrapped lines.
    pub fn advance(self, line_count: usize, line_spacing: f32) -> Self {
        LayoutCursor {
            y_position: self.y_position + line_spacing * line_count as f32,
            entry_count: self.entry_count + 1,
        }
    }
}

/// Lay out the index table for `lines`, in the order given.
///
/// Returns no pages for an empty input. A new page is opened whenever the
/// current one holds `max_entries_per_page` entries or the cursor has passed
/// the vertical limit.
pub fn paginate(
    lines: &[IndexedLine],
    style: &AnnotationStyle,
    layout: &TableLayout,
) -> Vec<IndexPage> {
    let mut pages = Vec::new();
    if lines.is_empty() {
        return pages;
    }

    let mut page = IndexPage {
        title: layout.title.clone(),
        entries: Vec::new(),
    };
    let mut cursor = LayoutCursor::new(layout);

    for line in lines {
        if cursor.is_full(style, layout) {
            pages.push(std::mem::replace(
                &mut page,
                IndexPage {
                    title: layout.continued_title.clone(),
                    entries: Vec::new(),
                },
            ));
            cursor = LayoutCursor::new(layout);
        }

        let wrapped = wrap_text(&line.text, layout.wrap_width);
        let line_count = wrapped.len();
        page.entries.push(IndexEntry {
            origin: Point::new(layout.margin, cursor.y_position),
            text: format!(
                "{}: [Page {}] {}",
                line.index,
                line.page_number,
                wrapped.join("\n")
            ),
            line_count,
        });
        cursor = cursor.advance(line_count, style.line_spacing);
    }

    pages.push(page);
    pages
}

/// Insert `pages` at the front of the document, first page first, and draw
/// their titles and entries. Returns the number of pages inserted.
///
/// Wrapped entry lines are drawn one by one, `line_spacing` apart, matching
/// the space the cursor reserved for them.
pub fn splice_index_pages(
    doc: &mut dyn PdfDocument,
    pages: &[IndexPage],
    style: &AnnotationStyle,
    layout: &TableLayout,
) -> Result<usize, InvomarkError> {
    for (position, page) in pages.iter().enumerate() {
        let page_index = doc.insert_page(position)?;
        doc.insert_text(
            page_index,
            Point::new(layout.margin, layout.title_y),
            &page.title,
            layout.title_font_size,
            Rgb::BLACK,
        )?;
        for entry in &page.entries {
            for (i, text) in entry.text.lines().enumerate() {
                let origin = Point::new(
                    entry.origin.x,
                    entry.origin.y + i as f32 * style.line_spacing,
                );
                doc.insert_text(page_index, origin, text, style.table_font_size, Rgb::BLACK)?;
            }
        }
    }
    Ok(pages.len())
}

/// Greedy word wrap to at most `width` characters per line.
///
/// Runs of whitespace collapse to one space, words longer than `width` are
/// split, and a blank text gives a single empty line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for chunk in chars.chunks(width) {
            let needed = if current_len == 0 {
                chunk.len()
            } else {
                current_len + 1 + chunk.len()
            };
            if needed > width && current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(chunk);
            current_len += chunk.len();
        }
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}
