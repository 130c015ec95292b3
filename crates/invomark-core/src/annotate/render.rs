use crate::annotate::indexer::LocatedLine;
use crate::annotate::style::AnnotationStyle;
use crate::document::PdfDocument;
use crate::error::InvomarkError;
use crate::model::Point;

/// Outline a located line and label it with its index, next to the top-right
/// corner of its box.
pub fn render_annotation(
    doc: &mut dyn PdfDocument,
    page_index: usize,
    located: &LocatedLine,
    style: &AnnotationStyle,
) -> Result<(), InvomarkError> {
    let bbox = &located.bbox;
    doc.draw_rect(
        page_index,
        bbox,
        style.rectangle_color,
        style.rectangle_line_width,
    )?;

    let label_at = Point::new(bbox.x1 + style.index_offset.0, bbox.y0 + style.index_offset.1);
    doc.insert_text(
        page_index,
        label_at,
        &located.line.index.to_string(),
        style.index_font_size,
        style.index_color,
    )
}
